use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use serde_json::Value;

use crate::{EmitFn, EventBus, History, WatcherConfig};

/// State shared between a watcher and the entry point it installs.
pub(crate) struct Shared {
    pub(crate) history: RefCell<History>,
    pub(crate) bus: EventBus,
}

impl Shared {
    pub(crate) fn new(config: WatcherConfig) -> Rc<Self> {
        Rc::new(Self {
            history: RefCell::new(History::new()),
            bus: EventBus::new(config),
        })
    }
}

/// Build the replacement entry point for a wrapped source.
///
/// Each call records the arguments, forwards the untouched call to
/// `original`, then re-broadcasts to the watcher's own listeners. The
/// history borrow is released before forwarding, so listeners that emit
/// again re-enter here and are recorded before their own listeners run.
///
/// The entry point only holds a weak reference to the watcher state; once
/// the watcher is gone it degrades to plain forwarding.
pub(crate) fn intercept(original: EmitFn, shared: &Rc<Shared>) -> EmitFn {
    let shared: Weak<Shared> = Rc::downgrade(shared);
    Rc::new(move |event: &str, args: &[Value]| {
        let state = shared.upgrade();
        if let Some(state) = &state {
            tracing::trace!(event = %event, arity = args.len(), "event intercepted");
            state.history.borrow_mut().record(event, args.to_vec());
        }
        original(event, args);
        if let Some(state) = state {
            state.bus.broadcast(event, args);
        }
    })
}
