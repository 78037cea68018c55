//! Runtime validation of [`Settings`].

use crate::schema::Settings;
use polyglot_common::{PolyglotError, Result, KEY_SEPARATOR};
use std::collections::HashSet;
use tracing::warn;

/// Configuration validator.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validates the settings, returning the first problem found.
    pub fn validate(settings: &Settings) -> Result<()> {
        if settings.default_language.trim().is_empty() {
            return Err(PolyglotError::validation(
                "defaultLanguage",
                "default language cannot be empty",
            ));
        }

        if let Some(fallback) = &settings.fallback_language {
            if fallback.trim().is_empty() {
                return Err(PolyglotError::validation(
                    "fallbackLanguage",
                    "fallback language cannot be empty when set",
                ));
            }
        }

        if settings.namespaces.is_empty() {
            return Err(PolyglotError::validation(
                "namespaces",
                "at least one namespace is required",
            ));
        }

        for namespace in &settings.namespaces {
            if namespace.is_empty() {
                return Err(PolyglotError::validation(
                    "namespaces",
                    "namespace names cannot be empty",
                ));
            }
            if namespace.contains(KEY_SEPARATOR) {
                return Err(PolyglotError::validation(
                    "namespaces",
                    format!("namespace '{namespace}' cannot contain '{KEY_SEPARATOR}'"),
                ));
            }
        }

        let mut codes = HashSet::new();
        for language in &settings.supported_languages {
            if language.code.trim().is_empty() {
                return Err(PolyglotError::validation(
                    "supportedLanguages",
                    "language code cannot be empty",
                ));
            }
            if !codes.insert(language.code.as_str()) {
                return Err(PolyglotError::validation(
                    "supportedLanguages",
                    format!("duplicate language code '{}'", language.code),
                ));
            }
        }

        let multiplier = settings.error_handling.recovery.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(PolyglotError::validation(
                "errorHandling.recovery.backoffMultiplier",
                format!("backoff multiplier must be a finite number >= 1.0, got {multiplier}"),
            ));
        }

        if settings.cache.max_entries == Some(0) {
            return Err(PolyglotError::validation(
                "cache.maxEntries",
                "cache size bound must be at least 1 when set",
            ));
        }

        if !codes.is_empty() && !codes.contains(settings.default_language.as_str()) {
            warn!(
                "Default language '{}' is not listed in supported languages",
                settings.default_language
            );
        }

        Ok(())
    }
}

impl Settings {
    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        SettingsValidator::validate(self)
    }
}
