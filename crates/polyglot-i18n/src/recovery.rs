//! Retry policy for dictionary loads

use crate::config::{MaxRetriesHook, RetryHook, RetryPredicate};
use crate::error::TranslationError;
use polyglot_config::RecoveryOptions;
use std::fmt;
use std::time::Duration;

/// Retry budget, backoff and observer hooks applied to every load.
#[derive(Clone, Default)]
pub struct RecoveryStrategy {
    options: RecoveryOptions,
    on_retry: Option<RetryHook>,
    on_max_retries_exceeded: Option<MaxRetriesHook>,
    should_retry: Option<RetryPredicate>,
}

impl fmt::Debug for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryStrategy")
            .field("options", &self.options)
            .field("on_retry", &self.on_retry.is_some())
            .field("on_max_retries_exceeded", &self.on_max_retries_exceeded.is_some())
            .field("should_retry", &self.should_retry.is_some())
            .finish()
    }
}

impl RecoveryStrategy {
    /// Creates a strategy without hooks.
    pub fn new(options: RecoveryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Sets the hook called before every retry wait.
    #[must_use]
    pub fn with_on_retry(mut self, hook: Option<RetryHook>) -> Self {
        self.on_retry = hook;
        self
    }

    /// Sets the hook called once when the retry budget is spent.
    #[must_use]
    pub fn with_on_max_retries_exceeded(mut self, hook: Option<MaxRetriesHook>) -> Self {
        self.on_max_retries_exceeded = hook;
        self
    }

    /// Replaces the default recoverability rule.
    #[must_use]
    pub fn with_should_retry(mut self, predicate: Option<RetryPredicate>) -> Self {
        self.should_retry = predicate;
        self
    }

    /// Retries allowed after the first attempt.
    pub const fn max_retries(&self) -> u32 {
        self.options.max_retries
    }

    /// Whether the error may be retried. Defaults to
    /// [`TranslationError::is_recoverable`]; a custom predicate is still
    /// bounded by the retry budget.
    pub fn should_retry(&self, err: &TranslationError) -> bool {
        match &self.should_retry {
            Some(predicate) => err.retry_count < err.max_retries && predicate(err),
            None => err.is_recoverable(),
        }
    }

    /// Whether the error would have been retried if the budget allowed it,
    /// and the budget is spent.
    pub fn is_exhausted(&self, err: &TranslationError) -> bool {
        let retryable = match &self.should_retry {
            Some(predicate) => predicate(err),
            None => err.kind.is_retryable(),
        };
        retryable && err.retry_count >= err.max_retries
    }

    /// Wait before retry number `attempt` (1-based):
    /// `retry_delay * backoff_multiplier^(attempt - 1)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let secs = self.options.retry_delay().as_secs_f64()
            * self.options.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    pub(crate) fn notify_retry(&self, err: &TranslationError, attempt: u32) {
        if let Some(hook) = &self.on_retry {
            hook(err, attempt);
        }
    }

    pub(crate) fn notify_exhausted(&self, err: &TranslationError) {
        if let Some(hook) = &self.on_max_retries_exceeded {
            hook(err);
        }
    }
}
