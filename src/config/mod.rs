//! Configuration for document building
//!
//! This module provides `BuildOptions` and its fluent builder. The dedup
//! mode is not an option; it is passed on every build call.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::BuildOptionsBuilder;
pub use types::BuildOptions;
