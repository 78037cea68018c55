//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Voice a language's translations are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Emotional, expressive copy.
    Emotional,
    /// Encouraging copy.
    Encouraging,
    /// Calm copy.
    Calm,
    /// Gentle copy.
    Gentle,
    /// Formal copy.
    Formal,
    /// Technical copy.
    Technical,
    /// Informal copy.
    Informal,
}

/// Register of address used by a language's translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    /// Informal address.
    Informal,
    /// Casual address.
    Casual,
    /// Formal address.
    Formal,
    /// Polite address.
    Polite,
}

/// A language offered to users, listed in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    /// Language code used for lookups, e.g. `ko` or `en`.
    pub code: String,
    /// Name shown in listings.
    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,
    /// Name of the language in the language itself.
    pub native_name: String,
    /// Optional tone metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    /// Optional formality metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<Formality>,
}

impl LanguageDescriptor {
    /// Creates a descriptor without tone or formality metadata.
    pub fn new(
        code: impl Into<String>,
        display_name: impl Into<String>,
        native_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            native_name: native_name.into(),
            tone: None,
            formality: None,
        }
    }

    /// Sets the tone.
    #[must_use]
    pub const fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Sets the formality.
    #[must_use]
    pub const fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = Some(formality);
        self
    }
}

/// A `(language, namespace)` pair identifying one loadable dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language code.
    pub language: String,
    /// Namespace name.
    pub namespace: String,
}

impl LanguagePair {
    /// Creates a new pair.
    pub fn new(language: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.language, self.namespace)
    }
}

/// Common result type for the workspace.
pub type Result<T> = std::result::Result<T, PolyglotError>;

/// Workspace-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum PolyglotError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configuration value failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong.
        message: String,
        /// The offending field, if known.
        field: Option<String>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PolyglotError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Returns the offending field for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PolyglotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
