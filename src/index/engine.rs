//! The index engine seam.

use serde::Serialize;

use super::config::IndexConfig;
use super::error::IndexResult;
use crate::documents::Document;

/// One hit returned by a collection lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Stored content of the matched document.
    pub content: serde_json::Value,

    /// True when the key equals one of the document's exact keys.
    pub exact: bool,

    /// Engine relevance score; only comparable within one lookup.
    pub score: f32,
}

/// Storage and matching backend for named document collections.
///
/// Implementations must tolerate concurrent `query` calls while a write is
/// in progress. At most one writer per collection is assumed.
pub trait IndexEngine: Send + Sync {
    fn collection_exists(&self, name: &str) -> bool;

    /// Create `name` with `config` and `documents` as its initial contents.
    fn create_collection(
        &self,
        name: &str,
        config: &IndexConfig,
        documents: &[Document],
    ) -> IndexResult<()>;

    /// Replace the entire contents of an existing collection.
    fn update_collection(&self, name: &str, documents: &[Document]) -> IndexResult<()>;

    /// Look `key` up in `name`. Exact matches sort before fuzzy ones.
    fn query(&self, name: &str, key: &str) -> IndexResult<Vec<Match>>;
}
