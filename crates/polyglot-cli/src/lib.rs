//! # Polyglot CLI
//!
//! Command line front end for the polyglot workspace.
//!
//! Builds a translation engine from a settings file and a directory of
//! `<language>/<namespace>.json` dictionaries, then resolves keys, lists
//! languages, dumps loaded dictionaries or reports cache counters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;

pub use app::*;
pub use error::*;
