//! Search index backend.
//!
//! The pipeline only talks to the [`IndexEngine`] trait. [`TantivyEngine`]
//! is the on-disk implementation used by the binary.

pub mod config;
pub mod engine;
pub mod error;
pub mod schema;
pub mod tantivy;

pub use config::IndexConfig;
pub use engine::{IndexEngine, Match};
pub use error::{IndexError, IndexResult};
pub use self::tantivy::TantivyEngine;
