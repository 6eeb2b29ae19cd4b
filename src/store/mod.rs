//! The scrape, transform, synchronize and query pipeline.
//!
//! A [`Store`] owns one harvester, one change detector and handles to the
//! shared index engine. Runs never overlap: a run started while another is
//! in flight returns [`RunOutcome::Skipped`] without touching anything.

pub mod error;
pub mod fingerprint;
pub mod query;
pub mod sync;

pub use error::{QueryError, StoreError, StoreResult, SyncError, SyncResult};
pub use fingerprint::{ChangeDetector, Fingerprint};
pub use query::{QueryResult, QueryRouter};
pub use sync::CollectionSynchronizer;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::documents::{DocumentSet, build_documents};
use crate::harvest::Harvester;
use crate::index::{IndexConfig, IndexEngine};

/// What a single run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Both collections were rewritten.
    Synced { regions: usize, entities: usize },
    /// The dataset matched the last synchronized one; nothing was written.
    Unchanged,
    /// Another run was in flight.
    Skipped,
}

pub struct Store {
    harvester: Arc<dyn Harvester>,
    synchronizer: CollectionSynchronizer,
    router: QueryRouter,
    detector: ChangeDetector,
    run_lock: Mutex<()>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("harvester", &self.harvester.name())
            .field("last_fingerprint", &self.detector.last())
            .field("running", &self.is_running())
            .finish()
    }
}

impl Store {
    pub fn new(
        harvester: Arc<dyn Harvester>,
        engine: Arc<dyn IndexEngine>,
        config: IndexConfig,
    ) -> Self {
        Self {
            harvester,
            synchronizer: CollectionSynchronizer::new(Arc::clone(&engine), config),
            router: QueryRouter::new(engine),
            detector: ChangeDetector::new(),
            run_lock: Mutex::new(()),
        }
    }

    /// Harvest the current dataset and build its documents. Writes nothing.
    pub async fn scrape_and_transform(&self) -> StoreResult<DocumentSet> {
        let regions = self.harvester.harvest().await?;
        let documents = build_documents(&regions)?;

        crate::log_event!(
            "store",
            "harvested",
            "{} regions, {} entities",
            documents.regions.len(),
            documents.entities.len()
        );
        Ok(documents)
    }

    /// One full pass: harvest, transform, and synchronize if changed.
    ///
    /// The fingerprint is recorded only after both collections were written,
    /// so a failed write is retried on the next run.
    pub async fn run_once(&self) -> StoreResult<RunOutcome> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            crate::debug_event!("store", "run skipped", "another run is in flight");
            return Ok(RunOutcome::Skipped);
        };

        let documents = self.scrape_and_transform().await?;
        let fingerprint = Fingerprint::of(&documents)?;

        if !self.detector.has_changed(&fingerprint) {
            crate::debug_event!("store", "unchanged", "{fingerprint}");
            return Ok(RunOutcome::Unchanged);
        }

        crate::log_event!("store", "change detected", "{fingerprint}");

        let regions = documents.regions.len();
        let entities = documents.entities.len();
        let synchronizer = self.synchronizer.clone();
        tokio::task::spawn_blocking(move || synchronizer.sync_all(&documents)).await??;

        self.detector.record(fingerprint);
        crate::log_event!("store", "synced", "{regions} regions, {entities} entities");

        Ok(RunOutcome::Synced { regions, entities })
    }

    /// Query regions first, then entities. See [`QueryRouter::query`].
    pub fn query(&self, key: &str) -> QueryResult {
        self.router.query(key)
    }

    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.detector.last()
    }
}
