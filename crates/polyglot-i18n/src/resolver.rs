//! Lookup order shared by the engine and the snapshot resolver

use crate::config::MissingKeyHandler;
use crate::tree::DictionaryTable;
use polyglot_common::{join_key, split_key, DEFAULT_NAMESPACE};

/// Where a resolved string was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// The target language's own namespace.
    Primary,
    /// The same namespace in the fallback language.
    Fallback,
    /// The target language's `common` namespace.
    Common,
}

/// Runs the lookup chain for one `(namespace, path)`:
///
/// 1. `table[language][namespace]`
/// 2. `table[fallback][namespace]`, if a fallback is given and differs
/// 3. `table[language]["common"]`, if the namespace is not `common`
pub fn lookup<'a>(
    table: &'a DictionaryTable,
    namespace: &str,
    path: &str,
    language: &str,
    fallback: Option<&str>,
) -> Option<(&'a str, LookupSource)> {
    if let Some(text) = table.lookup(language, namespace, path) {
        return Some((text, LookupSource::Primary));
    }

    if let Some(fallback) = fallback.filter(|fallback| *fallback != language) {
        if let Some(text) = table.lookup(fallback, namespace, path) {
            return Some((text, LookupSource::Fallback));
        }
    }

    if namespace != DEFAULT_NAMESPACE {
        if let Some(text) = table.lookup(language, DEFAULT_NAMESPACE, path) {
            return Some((text, LookupSource::Common));
        }
    }

    None
}

/// Output for a key no dictionary contains: the handler's answer, or the
/// full `namespace.path` key.
pub fn missing_key(
    namespace: &str,
    path: &str,
    language: &str,
    handler: Option<&MissingKeyHandler>,
) -> String {
    let full_key = join_key(namespace, path);
    match handler {
        Some(handler) => handler(&full_key, language, namespace),
        None => full_key,
    }
}

/// Resolves a key against a preloaded table without an engine or cache.
///
/// Used where no engine instance exists yet, e.g. when rendering on a
/// server from a snapshot. Follows the same lookup order as
/// [`Engine::resolve`](crate::Engine::resolve).
pub fn resolve_snapshot(
    table: &DictionaryTable,
    key: &str,
    language: &str,
    fallback: Option<&str>,
    missing_key_handler: Option<&MissingKeyHandler>,
) -> String {
    let (namespace, path) = split_key(key);
    lookup(table, namespace, path, language, fallback).map_or_else(
        || missing_key(namespace, path, language, missing_key_handler),
        |(text, _)| text.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn table() -> DictionaryTable {
        DictionaryTable::from_json(json!({
            "ko": {
                "common": { "welcome": "환영합니다", "save": "저장" },
                "diary": { "title": "일기" }
            },
            "en": {
                "common": { "welcome": "Welcome", "goodbye": "Goodbye" },
                "diary": { "title": "Diary", "onlyInEnglish": "English only" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_primary_hit() {
        let table = table();
        assert_eq!(
            lookup(&table, "diary", "title", "ko", Some("en")),
            Some(("일기", LookupSource::Primary))
        );
    }

    #[test]
    fn test_fallback_language_before_common() {
        let table = table();
        assert_eq!(
            lookup(&table, "diary", "onlyInEnglish", "ko", Some("en")),
            Some(("English only", LookupSource::Fallback))
        );
    }

    #[test]
    fn test_common_namespace_last() {
        let table = table();
        assert_eq!(
            lookup(&table, "diary", "save", "ko", Some("en")),
            Some(("저장", LookupSource::Common))
        );
        assert_eq!(lookup(&table, "diary", "save", "en", Some("ko")), None);
    }

    #[test]
    fn test_fallback_equal_to_target_is_skipped() {
        let table = table();
        assert_eq!(lookup(&table, "common", "goodbye", "ko", Some("ko")), None);
        assert_eq!(lookup(&table, "common", "goodbye", "ko", None), None);
    }

    #[test]
    fn test_snapshot_dotless_key_uses_common() {
        let table = table();
        assert_eq!(
            resolve_snapshot(&table, "welcome", "ko", Some("en"), None),
            resolve_snapshot(&table, "common.welcome", "ko", Some("en"), None)
        );
        assert_eq!(resolve_snapshot(&table, "goodbye", "ko", Some("en"), None), "Goodbye");
    }

    #[test]
    fn test_snapshot_missing_key() {
        let table = table();
        assert_eq!(
            resolve_snapshot(&table, "common.missing", "ko", Some("en"), None),
            "common.missing"
        );
        assert_eq!(resolve_snapshot(&table, "missing", "ko", None, None), "common.missing");

        let handler: MissingKeyHandler =
            Arc::new(|key: &str, language: &str, namespace: &str| format!("[{language}:{namespace}] {key}"));
        assert_eq!(
            resolve_snapshot(&table, "diary.nope", "ko", Some("en"), Some(&handler)),
            "[ko:diary] diary.nope"
        );
    }

    #[test]
    fn test_snapshot_unknown_language() {
        let table = table();
        assert_eq!(
            resolve_snapshot(&table, "common.welcome", "fr", Some("en"), None),
            "Welcome"
        );
    }
}
