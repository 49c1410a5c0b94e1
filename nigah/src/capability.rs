use std::fmt;

/// One of the operations an object must support to be wrapped by a
/// [`Watcher`](crate::Watcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Attach a persistent listener (`on`).
    Subscribe,
    /// Attach a listener that fires a single time (`once`).
    SubscribeOnce,
    /// Emit a named event with arguments (`emit`).
    Emit,
}

impl Capability {
    /// Every capability a watcher requires, in the order they are checked.
    pub const REQUIRED: [Capability; 3] = [
        Capability::Subscribe,
        Capability::SubscribeOnce,
        Capability::Emit,
    ];

    /// The conventional method name for this capability.
    pub fn method_name(&self) -> &'static str {
        match self {
            Capability::Subscribe => "on",
            Capability::SubscribeOnce => "once",
            Capability::Emit => "emit",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// The set of capabilities an event source reports.
///
/// Sources built on [`Emitter`](crate::Emitter) support everything. Adapters
/// around foreign event objects can report a narrower set, which makes
/// [`Watcher::new`](crate::Watcher::new) reject them up front.
///
/// ```rust
/// use nigah::{Capabilities, Capability};
///
/// let caps = Capabilities::all().without(Capability::SubscribeOnce);
/// assert!(caps.supports(Capability::Emit));
/// assert_eq!(caps.first_missing(), Some(Capability::SubscribeOnce));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    subscribe: bool,
    subscribe_once: bool,
    emit: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            subscribe: true,
            subscribe_once: true,
            emit: true,
        }
    }

    pub fn none() -> Self {
        Self {
            subscribe: false,
            subscribe_once: false,
            emit: false,
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        *self.slot(capability) = true;
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        *self.slot(capability) = false;
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Subscribe => self.subscribe,
            Capability::SubscribeOnce => self.subscribe_once,
            Capability::Emit => self.emit,
        }
    }

    /// Returns the first required capability that is absent.
    pub fn first_missing(&self) -> Option<Capability> {
        Capability::REQUIRED
            .into_iter()
            .find(|c| !self.supports(*c))
    }

    fn slot(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::Subscribe => &mut self.subscribe,
            Capability::SubscribeOnce => &mut self.subscribe_once,
            Capability::Emit => &mut self.emit,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}
