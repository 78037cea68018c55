//! Default values for every configuration section.

use crate::schema::*;
use polyglot_common::DEFAULT_NAMESPACE;

/// Default cache TTL: 24 hours.
pub const DEFAULT_CACHE_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Default number of retries after a failed load.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Default backoff multiplier.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_language: String::new(),
            fallback_language: None,
            supported_languages: Vec::new(),
            namespaces: vec![DEFAULT_NAMESPACE.to_string()],
            debug: false,
            cache: CacheOptions::default(),
            error_handling: ErrorHandlingOptions::default(),
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            max_entries: None,
        }
    }
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Error,
            include_context: true,
        }
    }
}
