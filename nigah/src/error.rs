use crate::Capability;

/// The single error type for all nigah operations.
///
/// Errors come in two tiers:
///
/// - **Precondition** ([`Error::MissingCapability`]): the object handed to
///   [`Watcher::new`](crate::Watcher::new) is not a usable event source.
///   This is a programming error in the calling test and is never retried.
/// - **Assertion** ([`Error::CountMismatch`], [`Error::MissingEvent`],
///   [`Error::UnexpectedEvent`]): returned by
///   [`Watcher::assert_count`](crate::Watcher::assert_count) when recorded
///   history does not meet the expectation. The message is meant to be shown
///   to the test author as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Emitter does not contain a `{0}` method")]
    MissingCapability(Capability),

    #[error("Expected `{event}` to be emitted {expected} times instead of {actual}")]
    CountMismatch {
        event: String,
        expected: usize,
        actual: usize,
    },

    #[error("Expected `{event}` to be emitted {expected} times but it was never emitted")]
    MissingEvent { event: String, expected: usize },

    #[error("Expected `{event}` to not be emitted.")]
    UnexpectedEvent { event: String },
}

impl Error {
    /// Returns true for the assertion tier (count checks), false for
    /// precondition failures.
    pub fn is_assertion(&self) -> bool {
        !matches!(self, Error::MissingCapability(_))
    }

    /// The event name the failure refers to, if any.
    pub fn event(&self) -> Option<&str> {
        match self {
            Error::MissingCapability(_) => None,
            Error::CountMismatch { event, .. }
            | Error::MissingEvent { event, .. }
            | Error::UnexpectedEvent { event } => Some(event),
        }
    }
}
