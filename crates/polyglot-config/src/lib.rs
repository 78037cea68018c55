//! # Polyglot Config
//!
//! Type-safe configuration for the polyglot translation engine.
//!
//! This crate holds the declarative half of the engine configuration:
//! languages, namespaces, cache and error-handling options. It provides
//! defaults, validation and loading from TOML, YAML or JSON files. The
//! runtime half (loader and hooks) is attached by `polyglot-i18n`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
