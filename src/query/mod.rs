//! Natural language query interface.
//!
//! This module provides:
//! - The structured query schema and its validator
//! - Heuristic player-name extraction
//! - In-domain/off-topic question classification
//! - Question-to-query translation with a deterministic fallback

pub mod classifier;
pub mod names;
pub mod prompt;
pub mod schema;
pub mod translator;
pub mod types;

pub use classifier::*;
pub use names::*;
pub use translator::*;
pub use types::*;
