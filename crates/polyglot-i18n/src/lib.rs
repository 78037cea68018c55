//! # Polyglot I18n
//!
//! Dotted-key translation resolution for the polyglot workspace.
//!
//! This crate provides:
//!
//! - Namespace trees and the per-language dictionary table
//! - A TTL cache of loaded dictionaries with hit/miss counters
//! - A load coordinator that deduplicates concurrent loads, retries with
//!   exponential backoff and falls back to another language
//! - The [`Engine`] with its initialization state machine and lookup chain
//! - An [`InstanceRegistry`] sharing one engine per configuration
//! - [`resolve_snapshot`] for lookups without an engine
//!
//! # Example
//!
//! ```rust
//! use polyglot_config::Settings;
//! use polyglot_i18n::{params, Engine, I18nConfig, StaticLoader};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = StaticLoader::new(json!({
//!     "ko": { "common": { "greeting": "안녕하세요, {{name}}님!" } },
//!     "en": { "common": { "greeting": "Hello, {{name}}!" } }
//! }));
//! let engine = Engine::new(I18nConfig::new(Settings::new("ko").with_fallback("en"), loader));
//! engine.initialize().await?;
//!
//! let text = engine.resolve_with_params("common.greeting", &params! { "name" => "Cheolsu" }, None);
//! assert_eq!(text, "안녕하세요, Cheolsu님!");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod recovery;
pub mod registry;
pub mod resolver;
pub mod tree;

pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use config::*;
pub use coordinator::LoadCoordinator;
pub use engine::{Engine, InitState};
pub use error::*;
pub use interpolate::{interpolate, ParamValue, TranslationParams};
pub use loader::{loader_fn, DirectoryLoader, FnLoader, StaticLoader, TranslationLoader};
pub use recovery::RecoveryStrategy;
pub use registry::{fingerprint, InstanceRegistry};
pub use resolver::{resolve_snapshot, LookupSource};
pub use tree::{DictionaryTable, NamespaceTree, NotATree, TranslationNode};
