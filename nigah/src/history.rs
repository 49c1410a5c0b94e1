use std::collections::HashMap;

use crate::Args;

/// Ordered record of observed emissions, keyed by event name.
///
/// Each occurrence is stored as its argument list (the event name is the
/// key and is not repeated). Within one name the sequence follows emission
/// order; across names only the order in which each name was *first* seen
/// is kept, for reporting.
///
/// A name that never occurred has no entry at all: [`get`](Self::get)
/// returns `None` rather than an empty slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    events: HashMap<String, Vec<Args>>,
    order: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence of `event`.
    pub fn record(&mut self, event: &str, args: Args) {
        match self.events.get_mut(event) {
            Some(seq) => seq.push(args),
            None => {
                self.order.push(event.to_string());
                self.events.insert(event.to_string(), vec![args]);
            }
        }
    }

    /// Returns every recorded argument list for `event`, in emission order.
    pub fn get(&self, event: &str) -> Option<&[Args]> {
        self.events.get(event).map(Vec::as_slice)
    }

    /// Number of times `event` was recorded.
    pub fn count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, Vec::len)
    }

    pub fn contains(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Names of recorded events in order of first occurrence.
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterate `(name, occurrences)` in order of first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Args])> {
        self.order
            .iter()
            .filter_map(|name| self.events.get(name).map(|seq| (name.as_str(), seq.as_slice())))
    }

    /// Number of distinct event names recorded.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of occurrences across all names.
    pub fn total(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.events.clear();
        self.order.clear();
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for History {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, seq) in self.iter() {
            map.serialize_entry(name, seq)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::args;

    fn sample() -> History {
        let mut history = History::new();
        history.record("some event", args![0, 0, 0]);
        history.record("some event", args![1, 2, 3]);
        history.record("another event", args![4, 5, 6]);
        history
    }

    #[test]
    fn keeps_emission_order_per_name() {
        let history = sample();
        assert_eq!(
            history.get("some event"),
            Some(&[args![0, 0, 0], args![1, 2, 3]][..])
        );
        assert_eq!(history.get("another event"), Some(&[args![4, 5, 6]][..]));
    }

    #[test]
    fn unknown_name_is_absent_not_empty() {
        let history = sample();
        assert_eq!(history.get("non existent event"), None);
        assert_eq!(history.count("non existent event"), 0);
        assert!(!history.contains("non existent event"));
    }

    #[test]
    fn names_in_first_seen_order() {
        let history = sample();
        let names: Vec<_> = history.event_names().collect();
        assert_eq!(names, vec!["some event", "another event"]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.total(), 3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut history = sample();
        history.reset();
        assert!(history.is_empty());
        assert_eq!(history.total(), 0);
        assert_eq!(history.get("some event"), None);

        history.record("after", args![true]);
        assert_eq!(history.get("after"), Some(&[vec![json!(true)]][..]));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_map_of_argument_lists() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "some event": [[0, 0, 0], [1, 2, 3]],
                "another event": [[4, 5, 6]],
            })
        );
    }
}
