/// Default separator between hierarchy segments of an event name.
pub const DEFAULT_DELIMITER: &str = ".";

/// Event-name matching options for a [`Watcher`](crate::Watcher)'s own
/// listeners (and optionally for an [`Emitter`](crate::Emitter)).
///
/// Use the builder methods to customize, or [`Default`] for wildcard
/// matching on `.`-separated names.
///
/// # Examples
///
/// ```rust
/// use nigah::WatcherConfig;
///
/// let config = WatcherConfig::default()
///     .with_wildcard(true)
///     .with_delimiter("::");
///
/// assert!(config.wildcard());
/// assert_eq!(config.delimiter(), "::");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatcherConfig {
    /// Whether listener patterns are matched segment by segment, with `*`
    /// standing for one segment and `**` for any number of segments.
    /// When false, names must be equal.
    /// Default: true
    wildcard: bool,

    /// String separating hierarchy segments.
    /// Default: "."
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_delimiter"))]
    delimiter: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        WatcherConfig {
            wildcard: true,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl WatcherConfig {
    /// Configuration with wildcard matching switched off.
    pub fn exact() -> Self {
        Self::default().with_wildcard(false)
    }

    /// Enable or disable hierarchical wildcard matching.
    pub fn with_wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard;
        self
    }

    /// Returns whether wildcard matching is enabled.
    pub fn wildcard(&self) -> bool {
        self.wildcard
    }

    /// Set the segment delimiter.
    ///
    /// An empty delimiter cannot split anything, so it falls back to
    /// [`DEFAULT_DELIMITER`].
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = normalize_delimiter(delimiter.into());
        self
    }

    /// Returns the segment delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

fn normalize_delimiter(delimiter: String) -> String {
    if delimiter.is_empty() {
        DEFAULT_DELIMITER.to_string()
    } else {
        delimiter
    }
}

#[cfg(feature = "serde")]
fn deserialize_delimiter<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let delimiter = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(normalize_delimiter(delimiter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_wildcard_on_dots() {
        let config = WatcherConfig::default();
        assert!(config.wildcard());
        assert_eq!(config.delimiter(), ".");
    }

    #[test]
    fn exact_disables_wildcard() {
        assert!(!WatcherConfig::exact().wildcard());
    }

    #[test]
    fn empty_delimiter_falls_back_to_default() {
        let config = WatcherConfig::default().with_delimiter("");
        assert_eq!(config.delimiter(), DEFAULT_DELIMITER);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_empty_delimiter_falls_back_to_default() {
        use crate::EventPattern;

        let config: WatcherConfig =
            serde_json::from_str(r#"{"wildcard":true,"delimiter":""}"#).unwrap();
        assert_eq!(config.delimiter(), DEFAULT_DELIMITER);

        let pattern = EventPattern::new("*", &config);
        assert!(pattern.matches("x"));
        assert!(pattern.matches("order"));
        assert!(!pattern.matches("order.placed"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_delimiter_is_kept() {
        let config: WatcherConfig =
            serde_json::from_str(r#"{"wildcard":false,"delimiter":"::"}"#).unwrap();
        assert!(!config.wildcard());
        assert_eq!(config.delimiter(), "::");
    }
}
