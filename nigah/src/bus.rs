use std::{cell::RefCell, fmt, rc::Rc};

use serde_json::Value;

use crate::{ListenerId, Occurrence, WatcherConfig, internal::ListenerRegistry};

/// The watcher's own listener set.
///
/// Every emission intercepted by a [`Watcher`](crate::Watcher) is
/// re-broadcast here after the wrapped source's listeners have run, so
/// tests can subscribe on the watcher instead of on the source. Matching
/// follows the watcher's [`WatcherConfig`].
pub struct EventBus {
    listeners: RefCell<ListenerRegistry>,
}

impl EventBus {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            listeners: RefCell::new(ListenerRegistry::new(config)),
        }
    }

    pub fn config(&self) -> WatcherConfig {
        self.listeners.borrow().config().clone()
    }

    pub fn on<F>(&self, pattern: &str, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.listeners
            .borrow_mut()
            .add(pattern, None, Rc::new(listener))
    }

    pub fn many<F>(&self, pattern: &str, times: usize, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.listeners
            .borrow_mut()
            .add(pattern, Some(times), Rc::new(listener))
    }

    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Occurrence<'_>) + 'static,
    {
        self.listeners.borrow_mut().add_any(Rc::new(listener))
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    pub fn remove_all(&self, pattern: Option<&str>) -> usize {
        self.listeners.borrow_mut().remove_all(pattern)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().count(event)
    }

    /// Deliver an occurrence to every matching listener.
    pub fn broadcast(&self, event: &str, args: &[Value]) {
        let listeners = self.listeners.borrow_mut().take_matching(event);
        if listeners.is_empty() {
            return;
        }
        tracing::trace!(event = %event, listeners = listeners.len(), "watcher broadcast");
        let occurrence = Occurrence::new(event, args);
        for listener in listeners {
            listener(&occurrence);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
