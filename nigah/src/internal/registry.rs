use std::rc::Rc;

use crate::{EventPattern, ListenerId, Occurrence, WatcherConfig};

pub(crate) type Listener = Rc<dyn Fn(&Occurrence<'_>)>;

enum Target {
    Pattern(EventPattern),
    Any,
}

struct Entry {
    id: ListenerId,
    target: Target,
    /// `None` for persistent listeners, otherwise calls left before removal.
    remaining: Option<usize>,
    listener: Listener,
}

impl Entry {
    fn matches(&self, name: &str) -> bool {
        match &self.target {
            Target::Pattern(p) => p.matches(name),
            Target::Any => true,
        }
    }
}

/// Listener storage shared by [`Emitter`](crate::Emitter) and the watcher's
/// event bus.
///
/// The registry never invokes listeners itself. [`take_matching`](Self::take_matching)
/// hands out the listeners to call so the owner can release its borrow
/// first; listeners are then free to subscribe, unsubscribe or emit.
pub(crate) struct ListenerRegistry {
    config: WatcherConfig,
    entries: Vec<Entry>,
}

impl ListenerRegistry {
    pub(crate) fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub(crate) fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Register a listener for `pattern`. `times` of `None` keeps it until removed.
    pub(crate) fn add(
        &mut self,
        pattern: &str,
        times: Option<usize>,
        listener: Listener,
    ) -> ListenerId {
        let target = Target::Pattern(EventPattern::new(pattern, &self.config));
        self.push(target, times, listener)
    }

    /// Register a listener that fires for every event.
    pub(crate) fn add_any(&mut self, listener: Listener) -> ListenerId {
        self.push(Target::Any, None, listener)
    }

    fn push(&mut self, target: Target, times: Option<usize>, listener: Listener) -> ListenerId {
        let id = ListenerId::next();
        if times == Some(0) {
            return id;
        }
        self.entries.push(Entry {
            id,
            target,
            remaining: times,
            listener,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Remove listeners subscribed under exactly `pattern`, or every
    /// listener when `pattern` is `None`. Returns how many were removed.
    pub(crate) fn remove_all(&mut self, pattern: Option<&str>) -> usize {
        let before = self.entries.len();
        match pattern {
            Some(pattern) => self.entries.retain(|e| match &e.target {
                Target::Pattern(p) => p.as_str() != pattern,
                Target::Any => true,
            }),
            None => self.entries.clear(),
        }
        before - self.entries.len()
    }

    /// Number of listeners that would fire for `name`.
    pub(crate) fn count(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.matches(name)).count()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Collect the listeners matching `name` in registration order, charging
    /// one call to each bounded listener and retiring the exhausted ones.
    pub(crate) fn take_matching(&mut self, name: &str) -> Vec<Listener> {
        let mut fired = Vec::new();
        for entry in self.entries.iter_mut().filter(|e| e.matches(name)) {
            if let Some(remaining) = entry.remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
            fired.push(entry.listener.clone());
        }
        self.entries.retain(|e| e.remaining != Some(0));
        fired
    }
}
