use std::fmt;

use serde_json::Value;

/// Ordered argument list of one emission, event name excluded.
///
/// Payload arity and types are decided by the caller, so each argument is a
/// dynamically typed [`Value`]. Build one with the [`args!`](crate::args) macro.
pub type Args = Vec<Value>;

/// A single emission as seen by a listener: the event name and the
/// arguments it was emitted with.
///
/// `Occurrence` borrows from the emitting call and only lives for the
/// duration of the listener invocation. Clone the arguments out with
/// [`to_args`](Self::to_args) if they need to outlive it.
#[derive(Clone, Copy, PartialEq)]
pub struct Occurrence<'a> {
    name: &'a str,
    args: &'a [Value],
}

impl<'a> Occurrence<'a> {
    pub fn new(name: &'a str, args: &'a [Value]) -> Self {
        Self { name, args }
    }

    /// Returns the concrete event name, even when the listener subscribed
    /// with a wildcard pattern.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Returns the argument at `index`, if present.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn to_args(&self) -> Args {
        self.args.to_vec()
    }
}

impl fmt::Debug for Occurrence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Occurrence")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

/// Builds an [`Args`] list from heterogeneous expressions.
///
/// Each element is converted with `serde_json::Value::from`, so integers,
/// floats, booleans, strings and nested `Value`s can be mixed freely.
///
/// ```rust
/// use nigah::args;
/// use serde_json::json;
///
/// let args = args![1, "two", true, json!({"k": 3})];
/// assert_eq!(args.len(), 4);
/// assert_eq!(args[1], json!("two"));
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
