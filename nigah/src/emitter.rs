use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use serde_json::Value;

use crate::{
    EmitFn, EventSource, ListenerId, Occurrence, WatcherConfig, internal::ListenerRegistry,
};

struct Inner {
    listeners: RefCell<ListenerRegistry>,
    entry: RefCell<EmitFn>,
}

impl Inner {
    fn dispatch(&self, event: &str, args: &[Value]) {
        let listeners = self.listeners.borrow_mut().take_matching(event);
        tracing::trace!(event = %event, listeners = listeners.len(), "emitter dispatch");
        let occurrence = Occurrence::new(event, args);
        for listener in listeners {
            listener(&occurrence);
        }
    }
}

/// A single-threaded event emitter.
///
/// `Emitter` is a cheap handle: clones share the same listeners and the
/// same emission entry point. Emissions are synchronous; every listener has
/// run by the time [`emit`](Self::emit) returns, and a listener may emit
/// further events, which are dispatched to completion before control
/// returns to it.
///
/// Names are matched exactly unless the emitter is built with
/// [`with_config`](Self::with_config) and wildcard matching enabled.
///
/// # Example
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
/// use nigah::{Emitter, args};
///
/// let emitter = Emitter::new();
/// let seen = Rc::new(Cell::new(0));
/// let s = seen.clone();
/// emitter.on("ping", move |e| s.set(s.get() + e.len()));
///
/// emitter.emit("ping", &args![1, 2]);
/// assert_eq!(seen.get(), 2);
/// ```
///
/// `Emitter` uses `Rc` internally and is `!Send`; it is meant for
/// single-threaded test code.
#[derive(Clone)]
pub struct Emitter {
    inner: Rc<Inner>,
}

impl Emitter {
    /// Create an emitter matching event names exactly.
    pub fn new() -> Self {
        Self::with_config(WatcherConfig::exact())
    }

    /// Create an emitter with custom name matching.
    pub fn with_config(config: WatcherConfig) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let dispatch: EmitFn = Rc::new(move |event: &str, args: &[Value]| {
                if let Some(inner) = weak.upgrade() {
                    inner.dispatch(event, args);
                }
            });
            Inner {
                listeners: RefCell::new(ListenerRegistry::new(config)),
                entry: RefCell::new(dispatch),
            }
        });
        Self { inner }
    }

    /// Attach a listener that runs on every matching emission.
    pub fn on<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.inner
            .listeners
            .borrow_mut()
            .add(event, None, Rc::new(listener))
    }

    /// Attach a listener that runs for the next matching emission only.
    pub fn once<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.many(event, 1, listener)
    }

    /// Attach a listener that runs for the next `times` matching emissions.
    pub fn many<F>(&self, event: &str, times: usize, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.inner
            .listeners
            .borrow_mut()
            .add(event, Some(times), Rc::new(listener))
    }

    /// Attach a listener that runs for every event regardless of name.
    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.inner.listeners.borrow_mut().add_any(Rc::new(listener))
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(id)
    }

    /// Remove listeners registered under `event`, or all listeners when
    /// `event` is `None`. Returns how many were removed.
    pub fn remove_all_listeners(&self, event: Option<&str>) -> usize {
        self.inner.listeners.borrow_mut().remove_all(event)
    }

    /// Number of listeners that would run for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.listeners.borrow().count(event)
    }

    /// Emit `event` with `args` through the current entry point.
    pub fn emit(&self, event: &str, args: &[Value]) {
        EventSource::emit(self, event, args);
    }
}

impl EventSource for Emitter {
    fn emit_entry(&self) -> Option<EmitFn> {
        Some(self.inner.entry.borrow().clone())
    }

    fn set_emit_entry(&self, entry: EmitFn) {
        *self.inner.entry.borrow_mut() = entry;
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use serde_json::json;

    use super::*;
    use crate::{args, same_entry};

    #[test]
    fn listeners_receive_arguments() {
        let emitter = Emitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        emitter.on("another event", move |e| s.borrow_mut().push(e.to_args()));

        emitter.emit("another event", &args![4, 5, 6]);
        assert_eq!(*seen.borrow(), vec![vec![json!(4), json!(5), json!(6)]]);
    }

    #[test]
    fn once_fires_a_single_time() {
        let emitter = Emitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        emitter.once("ping", move |_| h.set(h.get() + 1));

        emitter.emit("ping", &[]);
        emitter.emit("ping", &[]);
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count("ping"), 0);
    }

    #[test]
    fn many_fires_up_to_budget() {
        let emitter = Emitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        emitter.many("ping", 3, move |_| h.set(h.get() + 1));

        for _ in 0..5 {
            emitter.emit("ping", &[]);
        }
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn off_detaches_listener() {
        let emitter = Emitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = emitter.on("ping", move |_| h.set(h.get() + 1));

        emitter.emit("ping", &[]);
        assert!(emitter.off(id));
        emitter.emit("ping", &[]);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn names_match_exactly_by_default() {
        let emitter = Emitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        emitter.on("user.*", move |_| h.set(h.get() + 1));

        emitter.emit("user.created", &[]);
        assert_eq!(hits.get(), 0);
        emitter.emit("user.*", &[]);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn wildcard_config_matches_segments() {
        let emitter = Emitter::with_config(WatcherConfig::default());
        let names = Rc::new(RefCell::new(Vec::new()));
        let n = names.clone();
        emitter.on("user.*", move |e| n.borrow_mut().push(e.name().to_string()));

        emitter.emit("user.created", &[]);
        emitter.emit("order.created", &[]);
        assert_eq!(*names.borrow(), vec!["user.created".to_string()]);
    }

    #[test]
    fn listener_can_emit_reentrantly() {
        let emitter = Emitter::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let inner = emitter.clone();
        let o = order.clone();
        emitter.on("outer", move |_| {
            o.borrow_mut().push("outer:start");
            inner.emit("nested", &[]);
            o.borrow_mut().push("outer:end");
        });
        let o = order.clone();
        emitter.on("nested", move |_| o.borrow_mut().push("nested"));

        emitter.emit("outer", &[]);
        assert_eq!(*order.borrow(), vec!["outer:start", "nested", "outer:end"]);
    }

    #[test]
    fn once_listener_is_retired_before_it_runs() {
        let emitter = Emitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let again = emitter.clone();
        emitter.once("ping", move |_| {
            h.set(h.get() + 1);
            again.emit("ping", &[]);
        });

        emitter.emit("ping", &[]);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clones_share_entry_point() {
        let emitter = Emitter::new();
        let clone = emitter.clone();
        let a = emitter.emit_entry().unwrap();
        let b = clone.emit_entry().unwrap();
        assert!(same_entry(&a, &b));
    }

    #[test]
    fn replaced_entry_point_is_used_by_emit() {
        let emitter = Emitter::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        emitter.set_emit_entry(Rc::new(move |_: &str, _: &[Value]| c.set(c.get() + 1)));

        emitter.emit("anything", &[]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn remove_all_listeners() {
        let emitter = Emitter::new();
        emitter.on("a", |_| {});
        emitter.on("a", |_| {});
        emitter.on("b", |_| {});
        assert_eq!(emitter.remove_all_listeners(Some("a")), 2);
        assert_eq!(emitter.listener_count("b"), 1);
        assert_eq!(emitter.remove_all_listeners(None), 1);
    }
}
