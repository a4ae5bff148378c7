//! Query keys.

use std::fmt;

/// Ordered list of segments identifying a cached query.
///
/// Keys form a hierarchy: `["tracking"]` is a prefix of
/// `["tracking", "favorites"]`, so invalidating the former covers both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Creates a key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Appends a segment.
    #[must_use]
    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// The key segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` matches the leading segments of this key.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for QueryKey {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prefix_matching() {
        let favorites = QueryKey::new(["tracking", "favorites"]);
        assert!(favorites.starts_with(&QueryKey::from("tracking")));
        assert!(favorites.starts_with(&favorites));
        assert!(!favorites.starts_with(&QueryKey::from("timeline")));
        assert!(!QueryKey::from("tracking").starts_with(&favorites));
        // Segment-wise, not string-wise.
        assert!(!QueryKey::from("notifications-count").starts_with(&QueryKey::from("notifications")));
    }

    #[test]
    fn test_display() {
        let key = QueryKey::from("season-detail").with(42).with(3);
        assert_eq!(key.to_string(), "[season-detail, 42, 3]");
        assert_eq!(key.segments().len(), 3);
    }
}
