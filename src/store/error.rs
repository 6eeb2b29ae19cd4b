//! Error types for pipeline runs, synchronization and lookups.

use thiserror::Error;

use crate::documents::CollectionKind;
use crate::harvest::HarvestError;
use crate::index::IndexError;

/// A collection could not be brought in line with the harvested dataset.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Document {position} for '{collection}' has an empty key set")]
    InvalidDocument {
        collection: String,
        position: usize,
    },

    #[error("Failed to write collection '{collection}': {source}")]
    Index {
        collection: String,
        #[source]
        source: IndexError,
    },
}

/// A single collection lookup failed. The router recovers from this by
/// treating the collection as having no matches.
#[derive(Error, Debug)]
#[error("Query against '{collection}' failed: {source}")]
pub struct QueryError {
    pub collection: CollectionKind,
    #[source]
    pub source: IndexError,
}

/// A pipeline run failed. The fingerprint is not recorded, so the next run
/// retries even if the dataset did not change.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Harvest failed: {0}")]
    Harvest(#[from] HarvestError),

    #[error("Failed to serialize documents: {0}")]
    Transform(#[from] serde_json::Error),

    #[error("Synchronization failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Synchronization task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type SyncResult<T> = Result<T, SyncError>;

pub type StoreResult<T> = Result<T, StoreError>;
