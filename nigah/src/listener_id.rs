use std::{
    fmt, hash,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a registered listener, used to remove it again.
///
/// Returned by `on`, `once`, `many` and `on_any` on both
/// [`Emitter`](crate::Emitter) and [`Watcher`](crate::Watcher). IDs are
/// unique within the process, so an ID from one registry never removes a
/// listener from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, hash::Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}
