//! Hierarchical event-name patterns.

use std::fmt;

use crate::WatcherConfig;

const ANY_SEGMENT: &str = "*";
const ANY_SEGMENTS: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment.
    One,
    /// `**`: zero or more segments.
    Many,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Exact(String),
    Segments {
        segments: Vec<Segment>,
        delimiter: String,
    },
}

/// A listener subscription pattern.
///
/// With wildcard matching disabled a pattern is compared to event names
/// verbatim. With it enabled both the pattern and the event name are split
/// on the configured delimiter and compared segment by segment:
///
/// - a literal segment must be equal,
/// - `*` matches any single segment,
/// - `**` matches any number of segments, including none.
///
/// ```rust
/// use nigah::{EventPattern, WatcherConfig};
///
/// let config = WatcherConfig::default();
/// let pattern = EventPattern::new("order.*.shipped", &config);
/// assert!(pattern.matches("order.42.shipped"));
/// assert!(!pattern.matches("order.42.paid"));
///
/// let deep = EventPattern::new("order.**", &config);
/// assert!(deep.matches("order.42.line.7"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EventPattern {
    source: String,
    kind: Kind,
}

impl EventPattern {
    pub fn new(pattern: impl Into<String>, config: &WatcherConfig) -> Self {
        let source = pattern.into();
        let kind = if config.wildcard() {
            let delimiter = config.delimiter().to_string();
            let segments = source
                .split(delimiter.as_str())
                .map(|s| match s {
                    ANY_SEGMENT => Segment::One,
                    ANY_SEGMENTS => Segment::Many,
                    _ => Segment::Literal(s.to_string()),
                })
                .collect();
            Kind::Segments {
                segments,
                delimiter,
            }
        } else {
            Kind::Exact(source.clone())
        };
        Self { source, kind }
    }

    /// Pattern that compares names verbatim.
    pub fn exact(name: impl Into<String>) -> Self {
        Self::new(name, &WatcherConfig::exact())
    }

    /// Returns the pattern text as it was subscribed.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern contains a wildcard segment.
    pub fn is_wildcard(&self) -> bool {
        match &self.kind {
            Kind::Exact(_) => false,
            Kind::Segments { segments, .. } => segments
                .iter()
                .any(|s| matches!(s, Segment::One | Segment::Many)),
        }
    }

    /// Returns true if `name` is matched by this pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.kind {
            Kind::Exact(exact) => exact == name,
            Kind::Segments {
                segments,
                delimiter,
            } => {
                let parts: Vec<&str> = name.split(delimiter.as_str()).collect();
                match_segments(segments, &parts)
            }
        }
    }
}

/// Walks the pattern once, tracking every name position the segments seen
/// so far can end at. `reached[i]` means `name[..i]` has been consumed.
fn match_segments(pattern: &[Segment], name: &[&str]) -> bool {
    let mut reached = vec![false; name.len() + 1];
    reached[0] = true;

    for segment in pattern {
        match segment {
            Segment::Many => {
                // `**` extends every reached position to all later ones.
                let mut seen = false;
                for slot in reached.iter_mut() {
                    seen |= *slot;
                    *slot = seen;
                }
            }
            _ => {
                let mut next = vec![false; name.len() + 1];
                for (i, part) in name.iter().enumerate() {
                    next[i + 1] = reached[i] && segment.accepts(part);
                }
                reached = next;
            }
        }
        if !reached.contains(&true) {
            return false;
        }
    }
    reached[name.len()]
}

impl Segment {
    fn accepts(&self, part: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == part,
            Segment::One | Segment::Many => true,
        }
    }
}

impl fmt::Debug for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventPattern").field(&self.source).finish()
    }
}

impl fmt::Display for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
