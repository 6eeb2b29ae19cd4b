//! Full-overwrite synchronization of one collection.

use std::sync::Arc;

use super::error::{SyncError, SyncResult};
use crate::documents::{CollectionKind, Document, DocumentSet};
use crate::index::{IndexConfig, IndexEngine};

/// Writes document sets into the index engine.
///
/// A collection is created with the process-wide [`IndexConfig`] on its
/// first write; every later write replaces its contents entirely.
#[derive(Clone)]
pub struct CollectionSynchronizer {
    engine: Arc<dyn IndexEngine>,
    config: IndexConfig,
}

impl std::fmt::Debug for CollectionSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSynchronizer")
            .field("config", &self.config)
            .finish()
    }
}

impl CollectionSynchronizer {
    pub fn new(engine: Arc<dyn IndexEngine>, config: IndexConfig) -> Self {
        Self { engine, config }
    }

    /// Make `collection` hold exactly `documents`.
    ///
    /// Every document is checked for non-empty key sets before anything is
    /// written. On error the caller must treat the run as failed.
    pub fn sync(&self, collection: &str, documents: &[Document]) -> SyncResult<()> {
        if let Some(position) = documents.iter().position(|d| !d.has_keys()) {
            return Err(SyncError::InvalidDocument {
                collection: collection.to_string(),
                position,
            });
        }

        let result = if self.engine.collection_exists(collection) {
            self.engine.update_collection(collection, documents)
        } else {
            self.engine.create_collection(collection, &self.config, documents)
        };

        result.map_err(|source| SyncError::Index {
            collection: collection.to_string(),
            source,
        })
    }

    /// Synchronize both collections, regions first. Stops at the first failure.
    pub fn sync_all(&self, documents: &DocumentSet) -> SyncResult<()> {
        for kind in CollectionKind::all() {
            let docs = documents.get(kind);
            self.sync(kind.as_str(), docs)?;
            crate::debug_event!("sync", "written", "{kind}: {} documents", docs.len());
        }
        Ok(())
    }
}
