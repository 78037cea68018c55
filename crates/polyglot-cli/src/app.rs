//! Command line surface and the engine it drives.

use crate::error::{CliError, CliResult};
use clap::{Parser, Subcommand};
use polyglot_config::{Settings, SettingsLoader};
use polyglot_i18n::{
    CacheStats, DirectoryLoader, Engine, I18nConfig, InstanceRegistry, ParamValue,
    TranslationParams,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "polyglot", author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding `<language>/<namespace>.json` dictionaries
    #[arg(short, long, default_value = "locales")]
    pub dir: PathBuf,

    /// Default language when no settings file is given
    #[arg(long, default_value = "en")]
    pub default_language: String,

    /// Treat missing dictionary files as empty namespaces
    #[arg(long)]
    pub lenient: bool,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve keys and print one translation per line
    Resolve {
        /// Dotted keys, e.g. `common.welcome`
        #[arg(required = true)]
        keys: Vec<String>,

        /// Language to resolve in instead of the default
        #[arg(long)]
        lang: Option<String>,

        /// Interpolation parameter, repeatable
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// List the configured languages
    Languages,
    /// Print every loaded dictionary as JSON
    Dump {
        /// Language to switch to before dumping
        #[arg(long)]
        lang: Option<String>,
    },
    /// Print cache counters after initialization
    Stats,
}

/// Parses `name=value` into an interpolation parameter.
pub fn parse_param(raw: &str) -> CliResult<(String, ParamValue)> {
    let (name, value) = raw
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CliError::InvalidParam(raw.to_string()))?;
    Ok((name.trim().to_string(), ParamValue::from(value)))
}

/// Collects `--param` arguments.
pub fn parse_params(raw: &[String]) -> CliResult<TranslationParams> {
    raw.iter().map(|param| parse_param(param)).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    state: String,
    current_language: String,
    loaded_languages: Vec<String>,
    cache: CacheStats,
    hit_rate: f64,
}

/// An initialized engine plus the settings it was built from.
#[derive(Debug)]
pub struct App {
    engine: Engine,
    registry: InstanceRegistry,
}

impl App {
    /// Reads settings, builds the engine over the dictionary directory and
    /// initializes it.
    pub async fn from_args(args: &Args) -> CliResult<Self> {
        let settings = match &args.config {
            Some(path) => SettingsLoader::load_from_file(path)?,
            None => Settings::new(args.default_language.clone()),
        };
        Self::new(settings, &args.dir, args.lenient).await
    }

    /// Builds and initializes an engine.
    pub async fn new(settings: Settings, dir: &std::path::Path, lenient: bool) -> CliResult<Self> {
        info!(
            "Loading dictionaries from {:?} for '{}'",
            dir, settings.default_language
        );
        let loader = DirectoryLoader::new(dir).missing_as_empty(lenient);

        let registry = InstanceRegistry::new();
        let engine = registry.create(I18nConfig::new(settings, loader));
        engine.initialize().await?;
        debug!("Engine ready: {:?}", engine);

        Ok(Self { engine, registry })
    }

    /// The engine.
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Runs a subcommand and returns its output.
    pub async fn run(&self, command: &Command) -> CliResult<String> {
        match command {
            Command::Resolve { keys, lang, params } => {
                self.resolve(keys, lang.as_deref(), &parse_params(params)?)
                    .await
            }
            Command::Languages => Ok(self.languages()),
            Command::Dump { lang } => {
                if let Some(lang) = lang {
                    self.engine.change_language(lang).await;
                }
                Ok(serde_json::to_string_pretty(
                    &self.engine.dictionary_snapshot(),
                )?)
            }
            Command::Stats => self.stats(),
        }
    }

    /// Resolves keys, loading their namespaces when needed.
    pub async fn resolve(
        &self,
        keys: &[String],
        lang: Option<&str>,
        params: &TranslationParams,
    ) -> CliResult<String> {
        if let Some(lang) = lang {
            self.engine.change_language(lang).await;
        }

        let mut lines = Vec::with_capacity(keys.len());
        for key in keys {
            lines.push(self.engine.resolve_loaded(key, params).await);
        }
        Ok(lines.join("\n"))
    }

    /// One `code<TAB>name<TAB>native name` line per configured language.
    pub fn languages(&self) -> String {
        self.engine
            .supported_languages()
            .iter()
            .map(|lang| format!("{}\t{}\t{}", lang.code, lang.display_name, lang.native_name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Cache counters and engine state as JSON.
    pub fn stats(&self) -> CliResult<String> {
        let cache = self.engine.cache_stats();
        let report = StatsReport {
            state: self.engine.state().to_string(),
            current_language: self.engine.current_language(),
            loaded_languages: self.engine.loaded_languages(),
            hit_rate: cache.hit_rate(),
            cache,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Number of engines built so far.
    pub fn instance_count(&self) -> usize {
        self.registry.instance_count()
    }
}
