//! Integration tests for polyglot-config crate.

use polyglot_common::test_utils::{init_test_logging, sample_languages};
use polyglot_config::{
    LogLevel, Settings, SettingsFormat, SettingsLoader, DEFAULT_CACHE_TTL_MS, DEFAULT_MAX_RETRIES,
};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

#[test]
fn test_default_settings_validation() {
    let mut settings = Settings::default();

    // Default settings fail validation due to the empty default language
    assert!(settings.validate().is_err());

    settings.default_language = "ko".to_string();
    assert!(settings.validate().is_ok());
}

#[test]
fn test_defaults() {
    let settings = Settings::new("ko");
    assert_eq!(settings.namespaces, vec!["common".to_string()]);
    assert_eq!(settings.cache.ttl(), Duration::from_secs(24 * 60 * 60));
    assert_eq!(settings.error_handling.recovery.max_retries, 3);
    assert_eq!(
        settings.error_handling.recovery.retry_delay(),
        Duration::from_millis(1000)
    );
    assert!((settings.error_handling.recovery.backoff_multiplier - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_fallback_defaults_to_default_language() {
    let settings = Settings::new("ko");
    assert_eq!(settings.effective_fallback(), "ko");

    let settings = settings.with_fallback("en");
    assert_eq!(settings.effective_fallback(), "en");
}

#[test]
fn test_language_lookup_by_code() {
    let settings = Settings::new("ko").with_languages(sample_languages());
    assert_eq!(settings.language("en").map(|l| l.native_name.as_str()), Some("English"));
    assert!(settings.language("fr").is_none());
}

#[test]
fn test_load_json_with_camel_case_fields() {
    init_test_logging();

    let json = r#"{
        "defaultLanguage": "ko",
        "fallbackLanguage": "en",
        "supportedLanguages": [
            { "code": "ko", "name": "Korean", "nativeName": "한국어" },
            { "code": "en", "name": "English", "nativeName": "English", "tone": "formal" }
        ],
        "namespaces": ["common", "diary"],
        "debug": true,
        "cacheOptions": { "ttl": 5000 },
        "errorHandling": {
            "recoveryStrategy": { "maxRetries": 5, "retryDelay": 10, "backoffMultiplier": 3.0 },
            "logging": { "enabled": true, "level": "warn", "includeContext": false }
        }
    }"#;

    let settings = SettingsLoader::load_from_str(json, SettingsFormat::Json).unwrap();
    assert_eq!(settings.default_language, "ko");
    assert_eq!(settings.fallback_language.as_deref(), Some("en"));
    assert_eq!(settings.supported_languages.len(), 2);
    assert_eq!(settings.namespaces, vec!["common", "diary"]);
    assert!(settings.debug);
    assert_eq!(settings.cache.ttl_ms, 5000);
    assert_eq!(settings.error_handling.recovery.max_retries, 5);
    assert_eq!(settings.error_handling.recovery.retry_delay_ms, 10);
    assert_eq!(settings.error_handling.logging.level, LogLevel::Warn);
    assert!(!settings.error_handling.logging.include_context);
}

#[test]
fn test_load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("i18n.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
defaultLanguage = "en"
namespaces = ["common", "auth"]

[[supportedLanguages]]
code = "en"
name = "English"
nativeName = "English"
"#
    )
    .unwrap();

    let settings = SettingsLoader::load_from_file(&path).unwrap();
    assert_eq!(settings.default_language, "en");
    assert_eq!(settings.namespaces, vec!["common", "auth"]);
    assert_eq!(settings.cache.ttl_ms, DEFAULT_CACHE_TTL_MS);
    assert_eq!(settings.error_handling.recovery.max_retries, DEFAULT_MAX_RETRIES);
}

#[test]
fn test_load_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("i18n.yml");
    std::fs::write(
        &path,
        "defaultLanguage: ko\nfallbackLanguage: en\nnamespaces: [common]\n",
    )
    .unwrap();

    let settings = SettingsLoader::load_from_file(&path).unwrap();
    assert_eq!(settings.effective_fallback(), "en");
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("i18n.json");
    std::fs::write(&path, r#"{ "defaultLanguage": "" }"#).unwrap();

    assert!(SettingsLoader::load_from_file(&path).is_err());
}

#[test]
fn test_unknown_extension_is_rejected() {
    assert!(SettingsLoader::load_from_file("settings.ini").is_err());
    assert_eq!(SettingsFormat::from_path(Path::new("a.YAML")), Some(SettingsFormat::Yaml));
}
