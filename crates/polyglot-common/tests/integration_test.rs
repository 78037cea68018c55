//! Integration tests for polyglot-common crate.

use chrono::{TimeZone, Utc};
use polyglot_common::{
    format_timestamp, join_key, normalize_key, split_key, Formality, LanguageDescriptor,
    LanguagePair, PolyglotError, Tone,
};
use proptest::prelude::*;

#[test]
fn test_language_pair_display() {
    let pair = LanguagePair::new("ko", "common");
    assert_eq!(pair.to_string(), "ko:common");
}

#[test]
fn test_language_descriptor_deserializes_wire_names() {
    let raw = r#"{"code":"ko","name":"Korean","nativeName":"한국어","tone":"calm","formality":"polite"}"#;
    let descriptor: LanguageDescriptor = serde_json::from_str(raw).unwrap();

    assert_eq!(descriptor.code, "ko");
    assert_eq!(descriptor.display_name, "Korean");
    assert_eq!(descriptor.native_name, "한국어");
    assert_eq!(descriptor.tone, Some(Tone::Calm));
    assert_eq!(descriptor.formality, Some(Formality::Polite));
}

#[test]
fn test_language_descriptor_builder() {
    let descriptor = LanguageDescriptor::new("en", "English", "English")
        .with_tone(Tone::Technical)
        .with_formality(Formality::Formal);

    assert_eq!(descriptor.tone, Some(Tone::Technical));
    assert_eq!(descriptor.formality, Some(Formality::Formal));
}

#[test]
fn test_format_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
}

#[test]
fn test_validation_error_field() {
    let err = PolyglotError::validation("defaultLanguage", "must not be empty");
    assert_eq!(err.field(), Some("defaultLanguage"));
    assert!(err.to_string().contains("must not be empty"));
    assert_eq!(PolyglotError::config("x").field(), None);
}

proptest! {
    #[test]
    fn prop_dotless_keys_live_in_common(key in "[a-zA-Z_][a-zA-Z0-9_]{0,16}") {
        prop_assert_eq!(normalize_key(&key), normalize_key(&format!("common.{key}")));
    }

    #[test]
    fn prop_split_then_join_is_identity_for_dotted_keys(
        ns in "[a-z]{1,8}",
        path in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
    ) {
        let key = join_key(&ns, &path);
        let (split_ns, split_path) = split_key(&key);
        prop_assert_eq!(split_ns, ns.as_str());
        prop_assert_eq!(split_path, path.as_str());
    }
}
