//! Runtime configuration: declarative settings plus loader and hooks

use crate::error::{CustomLogger, TranslationError};
use crate::loader::TranslationLoader;
use crate::recovery::RecoveryStrategy;
use polyglot_config::Settings;
use std::fmt;
use std::sync::Arc;

/// Produces the output for a key no dictionary contains.
/// Called with `(full_key, language, namespace)`.
pub type MissingKeyHandler = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

/// Observes every failed load attempt with `(error, language, namespace)`.
pub type ErrorHandler = Arc<dyn Fn(&TranslationError, &str, &str) + Send + Sync>;

/// Called with the error and the 1-based retry number before each retry wait.
pub type RetryHook = Arc<dyn Fn(&TranslationError, u32) + Send + Sync>;

/// Called once when a load spends its whole retry budget.
pub type MaxRetriesHook = Arc<dyn Fn(&TranslationError) + Send + Sync>;

/// Decides whether a failed attempt is retried.
pub type RetryPredicate = Arc<dyn Fn(&TranslationError) -> bool + Send + Sync>;

/// Everything an [`Engine`](crate::Engine) needs.
#[derive(Clone)]
pub struct I18nConfig {
    /// Declarative settings.
    pub settings: Settings,
    /// Dictionary source.
    pub loader: Arc<dyn TranslationLoader>,
    /// Output for unresolvable keys; the full key is echoed when unset.
    pub missing_key_handler: Option<MissingKeyHandler>,
    /// Observer of load failures.
    pub error_handler: Option<ErrorHandler>,
    /// Observer of retries.
    pub on_retry: Option<RetryHook>,
    /// Observer of exhausted retry budgets.
    pub on_max_retries_exceeded: Option<MaxRetriesHook>,
    /// Custom recoverability rule.
    pub should_retry: Option<RetryPredicate>,
    /// Replaces tracing output for load errors.
    pub custom_logger: Option<CustomLogger>,
}

impl fmt::Debug for I18nConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nConfig")
            .field("settings", &self.settings)
            .field("missing_key_handler", &self.missing_key_handler.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .field("on_max_retries_exceeded", &self.on_max_retries_exceeded.is_some())
            .field("should_retry", &self.should_retry.is_some())
            .field("custom_logger", &self.custom_logger.is_some())
            .finish_non_exhaustive()
    }
}

impl I18nConfig {
    /// Creates a configuration without hooks.
    pub fn new<L>(settings: Settings, loader: L) -> Self
    where
        L: TranslationLoader + 'static,
    {
        Self::builder(settings, loader).build()
    }

    /// Starts a builder.
    pub fn builder<L>(settings: Settings, loader: L) -> I18nConfigBuilder
    where
        L: TranslationLoader + 'static,
    {
        I18nConfigBuilder::new(settings, Arc::new(loader))
    }

    /// Retry policy assembled from the settings and hooks.
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        RecoveryStrategy::new(self.settings.error_handling.recovery.clone())
            .with_on_retry(self.on_retry.clone())
            .with_on_max_retries_exceeded(self.on_max_retries_exceeded.clone())
            .with_should_retry(self.should_retry.clone())
    }
}

/// Builder for [`I18nConfig`].
pub struct I18nConfigBuilder {
    config: I18nConfig,
}

impl fmt::Debug for I18nConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl I18nConfigBuilder {
    /// Starts from a shared loader.
    pub fn new(settings: Settings, loader: Arc<dyn TranslationLoader>) -> Self {
        Self {
            config: I18nConfig {
                settings,
                loader,
                missing_key_handler: None,
                error_handler: None,
                on_retry: None,
                on_max_retries_exceeded: None,
                should_retry: None,
                custom_logger: None,
            },
        }
    }

    /// Sets the missing-key handler.
    #[must_use]
    pub fn missing_key_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &str, &str) -> String + Send + Sync + 'static,
    {
        self.config.missing_key_handler = Some(Arc::new(handler));
        self
    }

    /// Sets the load error observer.
    #[must_use]
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&TranslationError, &str, &str) + Send + Sync + 'static,
    {
        self.config.error_handler = Some(Arc::new(handler));
        self
    }

    /// Sets the retry observer.
    #[must_use]
    pub fn on_retry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TranslationError, u32) + Send + Sync + 'static,
    {
        self.config.on_retry = Some(Arc::new(hook));
        self
    }

    /// Sets the exhausted-budget observer.
    #[must_use]
    pub fn on_max_retries_exceeded<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TranslationError) + Send + Sync + 'static,
    {
        self.config.on_max_retries_exceeded = Some(Arc::new(hook));
        self
    }

    /// Sets a custom retry predicate.
    #[must_use]
    pub fn should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TranslationError) -> bool + Send + Sync + 'static,
    {
        self.config.should_retry = Some(Arc::new(predicate));
        self
    }

    /// Sends load errors to a custom logger instead of tracing.
    #[must_use]
    pub fn custom_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&TranslationError) + Send + Sync + 'static,
    {
        self.config.custom_logger = Some(Arc::new(logger));
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> I18nConfig {
        self.config
    }
}
