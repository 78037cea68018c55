//! # Polyglot Common
//!
//! Shared types, utilities, and common functionality for the polyglot workspace.
//!
//! This crate provides the foundational types and utilities used across
//! all other crates in the workspace: language descriptors, the
//! `(language, namespace)` pair used as a cache key, dotted-key helpers and
//! the workspace-wide error type.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use types::*;
pub use utils::*;
