//! Error types for translation loading and resolution

use chrono::{DateTime, Utc};
use polyglot_common::{LanguagePair, PolyglotError};
use polyglot_config::{LogLevel, LoggingOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Hook receiving every logged error instead of the tracing output.
pub type CustomLogger = Arc<dyn Fn(&TranslationError) + Send + Sync>;

/// Category of a [`TranslationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A key was not found in any dictionary of the lookup chain.
    MissingKey,
    /// The loader failed to produce a dictionary.
    LoadFailed,
    /// The key itself is malformed (e.g. empty).
    InvalidKey,
    /// The loader reported a network failure.
    NetworkError,
    /// The engine could not be initialized.
    InitializationError,
    /// Loaded data or configuration is malformed.
    ValidationError,
    /// The loader's own cache failed.
    CacheError,
}

impl ErrorKind {
    /// Kinds that may succeed when attempted again.
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::LoadFailed | Self::NetworkError | Self::CacheError)
    }

    /// Wire code of the kind.
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingKey => "MISSING_KEY",
            Self::LoadFailed => "LOAD_FAILED",
            Self::InvalidKey => "INVALID_KEY",
            Self::NetworkError => "NETWORK_ERROR",
            Self::InitializationError => "INITIALIZATION_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::CacheError => "CACHE_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors a [`TranslationLoader`](crate::TranslationLoader) may return.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Remote source unreachable or answered with a failure status.
    #[error("Network error: {0}")]
    Network(String),

    /// No dictionary exists for the requested pair.
    #[error("Dictionary not found: {0}")]
    NotFound(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dictionary source is not valid JSON.
    #[error("Failed to parse dictionary: {0}")]
    Parse(#[from] serde_json::Error),

    /// The loader's own cache failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl LoaderError {
    /// Maps the loader failure onto the engine's error kinds.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Cache(_) => ErrorKind::CacheError,
            Self::Parse(_) => ErrorKind::ValidationError,
            Self::NotFound(_) | Self::Io(_) | Self::Other(_) => ErrorKind::LoadFailed,
        }
    }
}

/// A tagged error raised while loading or resolving translations.
///
/// Cloneable so one failed in-flight load can be handed to every caller
/// that joined it.
#[derive(Error, Debug, Clone)]
#[error("[{kind}] {message}")]
pub struct TranslationError {
    /// Error category.
    pub kind: ErrorKind,
    /// Human readable description.
    pub message: String,
    /// Language involved, if any.
    pub language: Option<String>,
    /// Namespace involved, if any.
    pub namespace: Option<String>,
    /// Key involved, if any.
    pub key: Option<String>,
    /// Retries already spent when the error was raised.
    pub retry_count: u32,
    /// Retry budget in effect.
    pub max_retries: u32,
    /// When the error was raised.
    pub timestamp: DateTime<Utc>,
    /// Underlying failure.
    #[source]
    pub cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl TranslationError {
    /// Creates an error of the given kind with no context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            language: None,
            namespace: None,
            key: None,
            retry_count: 0,
            max_retries: 0,
            timestamp: Utc::now(),
            cause: None,
        }
    }

    /// Wraps a loader failure for the given pair.
    pub fn from_loader(err: LoaderError, pair: &LanguagePair) -> Self {
        Self::new(
            err.kind(),
            format!("Failed to load translations for {pair}: {err}"),
        )
        .for_pair(pair)
        .with_cause(err)
    }

    /// A loader returned something that is not a namespace tree.
    pub fn malformed(pair: &LanguagePair, found: &str) -> Self {
        Self::new(
            ErrorKind::ValidationError,
            format!("Loader returned {found} for {pair}, expected an object"),
        )
        .for_pair(pair)
    }

    /// The engine configuration is unusable.
    pub fn initialization(cause: PolyglotError, language: &str) -> Self {
        let mut err = Self::new(
            ErrorKind::InitializationError,
            format!("Failed to initialize translations: {cause}"),
        )
        .with_cause(cause);
        err.language = Some(language.to_string());
        err
    }

    /// The lookup key is malformed.
    pub fn invalid_key(key: &str) -> Self {
        let mut err = Self::new(ErrorKind::InvalidKey, format!("Invalid translation key: '{key}'"));
        err.key = Some(key.to_string());
        err
    }

    /// Attaches the language and namespace of a pair.
    #[must_use]
    pub fn for_pair(mut self, pair: &LanguagePair) -> Self {
        self.language = Some(pair.language.clone());
        self.namespace = Some(pair.namespace.clone());
        self
    }

    /// Records the retry position.
    #[must_use]
    pub const fn with_retries(mut self, retry_count: u32, max_retries: u32) -> Self {
        self.retry_count = retry_count;
        self.max_retries = max_retries;
        self
    }

    /// Attaches the underlying failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Whether another attempt is allowed: the kind is retryable and the
    /// retry budget is not yet spent.
    pub const fn is_recoverable(&self) -> bool {
        self.kind.is_retryable() && self.retry_count < self.max_retries
    }

    /// Whether the retry budget for a retryable kind is spent.
    pub const fn is_exhausted(&self) -> bool {
        self.kind.is_retryable() && self.retry_count >= self.max_retries
    }

    /// End-user presentation of the error.
    pub fn user_friendly(&self) -> UserFriendlyError {
        UserFriendlyError::from(self)
    }
}

/// How bad an error is from a user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic.
    Low,
    /// Degrades part of the UI.
    Medium,
    /// Degrades most of the UI.
    High,
    /// Nothing can be translated.
    Critical,
}

/// User-facing description of an error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFriendlyError {
    /// Wire code of the kind.
    pub code: &'static str,
    /// What happened.
    pub message: &'static str,
    /// What to check.
    pub suggestion: &'static str,
    /// What to do.
    pub action: &'static str,
    /// Severity.
    pub severity: Severity,
}

impl From<&TranslationError> for UserFriendlyError {
    fn from(err: &TranslationError) -> Self {
        let (message, suggestion, action, severity) = match err.kind {
            ErrorKind::MissingKey => (
                "The translation key could not be found",
                "Check that the key exists in the translation files",
                "Update translation files",
                Severity::Low,
            ),
            ErrorKind::LoadFailed => (
                "Failed to load the translation file",
                "Check the network connection and the file path",
                "Retry",
                Severity::Medium,
            ),
            ErrorKind::InvalidKey => (
                "The translation key is malformed",
                "Use the \"namespace.key\" form",
                "Fix the key",
                Severity::Low,
            ),
            ErrorKind::NetworkError => (
                "A network error occurred",
                "Check the internet connection and try again",
                "Retry",
                Severity::High,
            ),
            ErrorKind::InitializationError => (
                "The translation system failed to initialize",
                "Check the configuration and reload",
                "Reload",
                Severity::Critical,
            ),
            ErrorKind::ValidationError => (
                "Validation failed",
                "Check the translation configuration and data",
                "Fix the configuration",
                Severity::Medium,
            ),
            ErrorKind::CacheError => (
                "A cache error occurred",
                "Clear the cache and try again",
                "Clear cache",
                Severity::Low,
            ),
        };

        Self {
            code: err.kind.code(),
            message,
            suggestion,
            action,
            severity,
        }
    }
}

/// Emits a structured tracing event for a load error, or hands it to the
/// custom logger when one is configured.
pub fn log_translation_error(
    err: &TranslationError,
    options: &LoggingOptions,
    custom: Option<&CustomLogger>,
) {
    if !options.enabled {
        return;
    }

    if let Some(logger) = custom {
        logger(err);
        return;
    }

    macro_rules! emit {
        ($level:ident) => {
            if options.include_context {
                tracing::$level!(
                    code = %err.kind,
                    language = err.language.as_deref().unwrap_or("-"),
                    namespace = err.namespace.as_deref().unwrap_or("-"),
                    key = err.key.as_deref().unwrap_or("-"),
                    retry_count = err.retry_count,
                    max_retries = err.max_retries,
                    "Translation error: {}",
                    err.message
                )
            } else {
                tracing::$level!(
                    code = %err.kind,
                    retry_count = err.retry_count,
                    "Translation error: {}",
                    err.message
                )
            }
        };
    }

    match options.level {
        LogLevel::Error => emit!(error),
        LogLevel::Warn => emit!(warn),
        LogLevel::Info => emit!(info),
        LogLevel::Debug => emit!(debug),
    }
}

/// Result type for translation operations
pub type TranslationResult<T> = Result<T, TranslationError>;
