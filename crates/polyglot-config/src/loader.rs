//! Loading [`Settings`] from TOML, YAML or JSON.

use crate::schema::Settings;
use polyglot_common::{PolyglotError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Serialization format of a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// TOML document.
    Toml,
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl SettingsFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Settings loader.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Loads and validates settings from a file; the format follows the
    /// file extension.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path).ok_or_else(|| {
            PolyglotError::config(format!(
                "unsupported configuration file extension: {}",
                path.display()
            ))
        })?;

        debug!("Loading settings from {}", path.display());
        let text = fs::read_to_string(path)?;
        let settings = Self::load_from_str(&text, format)?;
        info!(
            "Loaded settings from {} (default language: {})",
            path.display(),
            settings.default_language
        );
        Ok(settings)
    }

    /// Parses and validates settings from a string.
    pub fn load_from_str(text: &str, format: SettingsFormat) -> Result<Settings> {
        let settings: Settings = match format {
            SettingsFormat::Toml => {
                toml::from_str(text).map_err(|e| PolyglotError::Serialization(e.to_string()))?
            }
            SettingsFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| PolyglotError::Serialization(e.to_string()))?,
            SettingsFormat::Json => serde_json::from_str(text)?,
        };

        settings.validate()?;
        Ok(settings)
    }
}
