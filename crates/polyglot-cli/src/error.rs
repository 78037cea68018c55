//! Application-wide error types using thiserror.

use polyglot_common::PolyglotError;
use polyglot_i18n::TranslationError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] PolyglotError),

    /// The engine could not be initialized.
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// A `--param` argument is not `name=value`.
    #[error("Invalid parameter '{0}', expected name=value")]
    InvalidParam(String),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
