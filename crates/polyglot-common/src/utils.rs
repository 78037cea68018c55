//! Shared utility functions for dotted keys and display.

use chrono::{DateTime, Utc};

/// Namespace used for keys without a namespace segment, and as the last
/// stop of the lookup chain.
pub const DEFAULT_NAMESPACE: &str = "common";

/// Separator between namespace and path segments in a key.
pub const KEY_SEPARATOR: char = '.';

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Splits a dotted key into `(namespace, path)`.
///
/// The first segment is the namespace and the rest, rejoined with `.`, is
/// the path inside it. A key without a separator belongs to
/// [`DEFAULT_NAMESPACE`].
///
/// ```
/// use polyglot_common::split_key;
///
/// assert_eq!(split_key("auth.login.title"), ("auth", "login.title"));
/// assert_eq!(split_key("welcome"), ("common", "welcome"));
/// ```
pub fn split_key(key: &str) -> (&str, &str) {
    key.split_once(KEY_SEPARATOR)
        .unwrap_or((DEFAULT_NAMESPACE, key))
}

/// Joins a namespace and a path into a full key.
pub fn join_key(namespace: &str, path: &str) -> String {
    format!("{namespace}{KEY_SEPARATOR}{path}")
}

/// Returns the key in its `namespace.path` form.
pub fn normalize_key(key: &str) -> String {
    let (namespace, path) = split_key(key);
    join_key(namespace, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
    }

    #[test]
    fn test_split_key_nested_path() {
        assert_eq!(split_key("diary.entry.title"), ("diary", "entry.title"));
    }

    #[test]
    fn test_split_key_without_namespace() {
        assert_eq!(split_key("hello"), ("common", "hello"));
    }

    #[test]
    fn test_split_key_trailing_separator() {
        assert_eq!(split_key("auth."), ("auth", ""));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("hello"), "common.hello");
        assert_eq!(normalize_key("auth.login"), "auth.login");
    }
}
