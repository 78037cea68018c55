//! Configuration schema definitions using serde.

use polyglot_common::LanguageDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Declarative engine configuration.
///
/// Field names are camelCase on the wire so existing configuration files
/// can be read as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Language selected when the engine starts.
    pub default_language: String,
    /// Language consulted when a key is missing. Unset means "same as the
    /// default language".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_language: Option<String>,
    /// Languages offered to users, in listing order.
    pub supported_languages: Vec<LanguageDescriptor>,
    /// Namespaces loaded eagerly during initialization, in load order.
    pub namespaces: Vec<String>,
    /// Enables debug logging of fallback hits.
    pub debug: bool,
    /// Cache configuration.
    #[serde(alias = "cacheOptions")]
    pub cache: CacheOptions,
    /// Error handling configuration.
    pub error_handling: ErrorHandlingOptions,
}

impl Settings {
    /// Creates settings for the given default language with every other
    /// field at its default.
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            ..Self::default()
        }
    }

    /// Sets the fallback language.
    #[must_use]
    pub fn with_fallback(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = Some(language.into());
        self
    }

    /// Replaces the namespace list.
    #[must_use]
    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the supported language list.
    #[must_use]
    pub fn with_languages(mut self, languages: Vec<LanguageDescriptor>) -> Self {
        self.supported_languages = languages;
        self
    }

    /// Toggles debug mode.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Fallback language in effect: the configured one, or the default
    /// language when none is configured.
    pub fn effective_fallback(&self) -> &str {
        self.fallback_language
            .as_deref()
            .unwrap_or(&self.default_language)
    }

    /// Looks up a supported language by code.
    pub fn language(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.supported_languages.iter().find(|lang| lang.code == code)
    }
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheOptions {
    /// Time-to-live of every cache entry, in milliseconds.
    #[serde(alias = "ttl")]
    pub ttl_ms: u64,
    /// Upper bound on cached dictionaries; the oldest entry is evicted
    /// beyond it.
    #[serde(alias = "maxSize", skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl CacheOptions {
    /// TTL as a duration.
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Error handling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorHandlingOptions {
    /// Retry policy for dictionary loads.
    #[serde(alias = "recoveryStrategy")]
    pub recovery: RecoveryOptions,
    /// Structured logging of load errors.
    pub logging: LoggingOptions,
}

/// Retry policy for recoverable load failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecoveryOptions {
    /// Retries allowed after the first failed attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(alias = "retryDelay")]
    pub retry_delay_ms: u64,
    /// Factor applied to the delay for every further retry.
    pub backoff_multiplier: f64,
}

impl RecoveryOptions {
    /// Base retry delay as a duration.
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Severity used when logging load errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// `error!`
    #[default]
    Error,
    /// `warn!`
    Warn,
    /// `info!`
    Info,
    /// `debug!`
    Debug,
}

/// Structured logging of load errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingOptions {
    /// Whether load errors are logged at all.
    pub enabled: bool,
    /// Level of the emitted event.
    pub level: LogLevel,
    /// Whether language, namespace and key are attached to the event.
    pub include_context: bool,
}
