use std::{
    cell::{Cell, Ref},
    fmt,
    rc::Rc,
};

use serde_json::Value;

use crate::{
    Args, Capability, EmitFn, Error, EventSource, ExpectedCounts, History, ListenerId, Occurrence,
    Result, WatcherConfig, assertion,
    interceptor::{Shared, intercept},
    same_entry,
};

/// Records every event emitted through a wrapped [`EventSource`] so a test
/// can assert how often, and with what arguments, each event occurred.
///
/// Constructing a watcher swaps the source's emission entry point for one
/// that records the call, forwards it unchanged to the entry point it
/// replaced, and then re-broadcasts it to listeners attached to the watcher
/// itself. Listeners on the source observe exactly what they would without
/// the watcher.
///
/// The wrap is undone by [`restore`](Self::restore), or automatically when
/// the watcher is dropped, so the patch cannot outlive a test even if the
/// test panics.
///
/// # Example
///
/// ```rust
/// use nigah::{Emitter, Watcher, args};
///
/// let emitter = Emitter::new();
/// let watcher = Watcher::new(emitter.clone())?;
///
/// emitter.emit("some event", &args![0, 0, 0]);
/// emitter.emit("some event", &args![1, 2, 3]);
/// emitter.emit("another event", &args![4, 5, 6]);
///
/// assert_eq!(
///     watcher.get_history("some event"),
///     Some(vec![args![0, 0, 0], args![1, 2, 3]])
/// );
/// watcher.assert_count([("some event", 2), ("another event", 1)], true)?;
/// watcher.restore();
/// # Ok::<(), nigah::Error>(())
/// ```
pub struct Watcher<S: EventSource> {
    source: S,
    original: EmitFn,
    replacement: EmitFn,
    shared: Rc<Shared>,
    restored: Cell<bool>,
}

impl<S: EventSource> Watcher<S> {
    /// Wrap `source` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCapability`] if `source` cannot subscribe,
    /// subscribe once, or emit.
    pub fn new(source: S) -> Result<Self> {
        Self::with_config(source, WatcherConfig::default())
    }

    /// Wrap `source`, matching the watcher's own listeners per `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCapability`] if `source` cannot subscribe,
    /// subscribe once, or emit.
    pub fn with_config(source: S, config: WatcherConfig) -> Result<Self> {
        if let Some(missing) = source.capabilities().first_missing() {
            return Err(Error::MissingCapability(missing));
        }
        let original = source
            .emit_entry()
            .ok_or(Error::MissingCapability(Capability::Emit))?;

        let shared = Shared::new(config);
        let replacement = intercept(original.clone(), &shared);
        source.set_emit_entry(replacement.clone());
        tracing::debug!("watcher installed");

        Ok(Self {
            source,
            original,
            replacement,
            shared,
            restored: Cell::new(false),
        })
    }

    /// Returns the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the entry point captured at wrap time.
    pub fn original_entry(&self) -> &EmitFn {
        &self.original
    }

    /// Put the captured entry point back on the source.
    ///
    /// Only the first call has an effect; later calls (including the one
    /// made on drop) leave the source untouched.
    pub fn restore(&self) {
        if self.restored.replace(true) {
            return;
        }
        let current = self.source.emit_entry();
        if !current.is_some_and(|c| same_entry(&c, &self.replacement)) {
            tracing::warn!("entry point was replaced after wrapping; restoring anyway");
        }
        self.source.set_emit_entry(self.original.clone());
        tracing::debug!("watcher restored");
    }

    pub fn is_restored(&self) -> bool {
        self.restored.get()
    }

    pub fn config(&self) -> WatcherConfig {
        self.shared.bus.config()
    }

    // ==================== History ====================

    /// Borrow the full history.
    ///
    /// Drop the guard before emitting again; recording needs a mutable borrow.
    pub fn history(&self) -> Ref<'_, History> {
        self.shared.history.borrow()
    }

    /// Returns the argument lists recorded for `event`, in emission order,
    /// or `None` if it never occurred.
    pub fn get_history(&self, event: &str) -> Option<Vec<Args>> {
        self.shared.history.borrow().get(event).map(<[Args]>::to_vec)
    }

    /// Forget everything recorded so far, keeping the wrap in place.
    pub fn reset_history(&self) {
        self.shared.history.borrow_mut().reset();
    }

    // ==================== Assertions ====================

    /// Assert that recorded events match `expected`.
    ///
    /// See [`assert_count`](crate::assert_count) for the exact rules. In short:
    /// every occurred event with a non-zero expectation must match it
    /// exactly, every positive expectation must have occurred, and in
    /// `strict` mode every occurred event must appear in `expected`.
    ///
    /// # Errors
    ///
    /// [`Error::CountMismatch`], [`Error::MissingEvent`] or
    /// [`Error::UnexpectedEvent`] for the first violated expectation.
    pub fn assert_count(&self, expected: impl Into<ExpectedCounts>, strict: bool) -> Result {
        let expected = expected.into();
        assertion::assert_count(&self.shared.history.borrow(), &expected, strict)
    }

    // ==================== Re-emission ====================

    /// Emit through the source's current entry point.
    ///
    /// While the wrap is active the emission is recorded and reaches the
    /// source's listeners exactly like one made on the source directly.
    pub fn emit(&self, event: &str, args: &[Value]) {
        self.source.emit(event, args);
    }

    /// Listen on the watcher for events matching `pattern`.
    pub fn on<F>(&self, pattern: &str, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.shared.bus.on(pattern, listener)
    }

    /// Listen on the watcher for the next event matching `pattern`.
    pub fn once<F>(&self, pattern: &str, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.shared.bus.many(pattern, 1, listener)
    }

    /// Listen on the watcher for the next `times` events matching `pattern`.
    pub fn many<F>(&self, pattern: &str, times: usize, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.shared.bus.many(pattern, times, listener)
    }

    /// Listen on the watcher for every event.
    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.shared.bus.on_any(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.shared.bus.off(id)
    }

    pub fn remove_all_listeners(&self, pattern: Option<&str>) -> usize {
        self.shared.bus.remove_all(pattern)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.shared.bus.listener_count(event)
    }
}

impl<S: EventSource> Drop for Watcher<S> {
    fn drop(&mut self) {
        self.restore();
    }
}

impl<S: EventSource> fmt::Debug for Watcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("restored", &self.restored.get())
            .field("events", &self.shared.history.borrow().len())
            .field("bus", &self.shared.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::{Capabilities, Emitter, args};

    struct NoOnce(Emitter);

    impl EventSource for NoOnce {
        fn capabilities(&self) -> Capabilities {
            Capabilities::all().without(Capability::SubscribeOnce)
        }
        fn emit_entry(&self) -> Option<EmitFn> {
            self.0.emit_entry()
        }
        fn set_emit_entry(&self, entry: EmitFn) {
            self.0.set_emit_entry(entry)
        }
    }

    struct Mute;

    impl EventSource for Mute {
        fn emit_entry(&self) -> Option<EmitFn> {
            None
        }
        fn set_emit_entry(&self, _entry: EmitFn) {}
    }

    #[test]
    fn rejects_source_without_once() {
        let err = Watcher::new(NoOnce(Emitter::new())).unwrap_err();
        assert_eq!(err, Error::MissingCapability(Capability::SubscribeOnce));
    }

    #[test]
    fn rejects_source_without_entry_point() {
        let err = Watcher::new(Mute).unwrap_err();
        assert_eq!(err, Error::MissingCapability(Capability::Emit));
    }

    #[test]
    fn failed_wrap_leaves_source_untouched() {
        let emitter = Emitter::new();
        let before = emitter.emit_entry().unwrap();
        let _ = Watcher::new(NoOnce(emitter.clone()));
        assert!(same_entry(&before, &emitter.emit_entry().unwrap()));
    }

    #[test]
    fn installs_replacement_and_restores_original() {
        let emitter = Emitter::new();
        let before = emitter.emit_entry().unwrap();
        let watcher = Watcher::new(emitter.clone()).unwrap();

        assert!(!same_entry(&before, &emitter.emit_entry().unwrap()));
        assert!(same_entry(&before, watcher.original_entry()));

        watcher.restore();
        assert!(watcher.is_restored());
        assert!(same_entry(&before, &emitter.emit_entry().unwrap()));
    }

    #[test]
    fn restore_twice_is_harmless() {
        let emitter = Emitter::new();
        let before = emitter.emit_entry().unwrap();
        let watcher = Watcher::new(emitter.clone()).unwrap();
        watcher.restore();
        watcher.restore();
        assert!(same_entry(&before, &emitter.emit_entry().unwrap()));
    }

    #[test]
    fn drop_restores() {
        let emitter = Emitter::new();
        let before = emitter.emit_entry().unwrap();
        {
            let _watcher = Watcher::new(emitter.clone()).unwrap();
        }
        assert!(same_entry(&before, &emitter.emit_entry().unwrap()));
    }

    #[test]
    fn emissions_after_restore_are_not_recorded() {
        let emitter = Emitter::new();
        let watcher = Watcher::new(emitter.clone()).unwrap();
        emitter.emit("before", &[]);
        watcher.restore();
        emitter.emit("after", &[]);

        assert_eq!(watcher.get_history("before"), Some(vec![vec![]]));
        assert_eq!(watcher.get_history("after"), None);
    }

    #[test]
    fn reset_history_keeps_recording() {
        let emitter = Emitter::new();
        let watcher = Watcher::new(emitter.clone()).unwrap();
        emitter.emit("a", &args![1]);
        watcher.reset_history();
        assert!(watcher.history().is_empty());

        emitter.emit("a", &args![2]);
        assert_eq!(watcher.get_history("a"), Some(vec![vec![json!(2)]]));
    }

    #[test]
    fn reentrant_emission_is_recorded_in_causal_order() {
        let emitter = Emitter::new();
        let watcher = Rc::new(Watcher::new(emitter.clone()).unwrap());
        let trail = Rc::new(RefCell::new(Vec::new()));

        let nested = emitter.clone();
        emitter.on("outer", move |_| nested.emit("inner", &args![2]));

        let w = watcher.clone();
        let t = trail.clone();
        emitter.on("inner", move |_| {
            // nested emission is already recorded when its listeners run
            t.borrow_mut().push(w.history().count("inner"));
        });

        emitter.emit("outer", &args![1]);
        assert_eq!(*trail.borrow(), vec![1]);
        watcher
            .assert_count([("outer", 1), ("inner", 1)], true)
            .unwrap();
    }

    #[test]
    fn stacked_watchers_both_record() {
        let emitter = Emitter::new();
        let before = emitter.emit_entry().unwrap();
        let outer = Watcher::new(emitter.clone()).unwrap();
        let inner = Watcher::new(emitter.clone()).unwrap();

        emitter.emit("ping", &[]);
        assert_eq!(outer.history().count("ping"), 1);
        assert_eq!(inner.history().count("ping"), 1);

        inner.restore();
        outer.restore();
        assert!(same_entry(&before, &emitter.emit_entry().unwrap()));
    }

    #[test]
    fn config_is_exposed() {
        let emitter = Emitter::new();
        let watcher =
            Watcher::with_config(emitter, WatcherConfig::default().with_delimiter("/")).unwrap();
        assert_eq!(watcher.config().delimiter(), "/");
        assert!(watcher.config().wildcard());
    }
}
