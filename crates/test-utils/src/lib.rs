//! Shared test utilities for the forest-alerts workspace.
//!
//! This crate provides:
//! - Encoders that build alert pixels from day/confidence/agreement values
//! - Synthetic tile generators
//! - Common decode parameter fixtures
//!
//! Generators return plain RGBA bytes so the crate stays independent of the
//! decoder crate it is used to test.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
