/// Expected occurrence counts per event name, supplied to
/// [`Watcher::assert_count`](crate::Watcher::assert_count).
///
/// Keys keep their insertion order so failures are reported
/// deterministically. Inserting a name twice overwrites its count.
///
/// ```rust
/// use nigah::ExpectedCounts;
///
/// let expected: ExpectedCounts = [("some event", 2), ("non existent event", 0)].into();
/// assert_eq!(expected.get("some event"), Some(2));
/// assert!(expected.contains("non existent event"));
/// assert_eq!(expected.get("another event"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedCounts {
    entries: Vec<(String, usize)>,
}

impl ExpectedCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, event: impl Into<String>, count: usize) -> Self {
        self.insert(event, count);
        self
    }

    pub fn insert(&mut self, event: impl Into<String>, count: usize) {
        let event = event.into();
        match self.entries.iter_mut().find(|(name, _)| *name == event) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((event, count)),
        }
    }

    pub fn get(&self, event: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, count)| *count)
    }

    pub fn contains(&self, event: &str) -> bool {
        self.get(event).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for ExpectedCounts {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        let mut expected = ExpectedCounts::new();
        for (event, count) in iter {
            expected.insert(event, count);
        }
        expected
    }
}

impl<K: Into<String>, const N: usize> From<[(K, usize); N]> for ExpectedCounts {
    fn from(entries: [(K, usize); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>> From<Vec<(K, usize)>> for ExpectedCounts {
    fn from(entries: Vec<(K, usize)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<&ExpectedCounts> for ExpectedCounts {
    fn from(expected: &ExpectedCounts) -> Self {
        expected.clone()
    }
}
