//! Harvester and engine doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use shoreline::documents::Document;
use shoreline::harvest::{HarvestError, HarvestResult, Harvester, Region, SubEntity};
use shoreline::index::{IndexConfig, IndexEngine, IndexError, IndexResult, Match, TantivyEngine};

/// Two regions, three beaches.
pub fn coastline() -> Vec<Region> {
    vec![
        Region::new(
            "Santos",
            vec![
                SubEntity::new("Gonzaga", "Santos").with_attribute("length_km", json!(1.2)),
                SubEntity::new("Ponta da Praia", "Santos"),
            ],
        ),
        Region::new("Guarujá", vec![SubEntity::new("Pitangueiras", "Guarujá")]),
    ]
}

/// Returns whatever dataset is currently loaded; can be told to fail.
#[derive(Default)]
pub struct ScriptedHarvester {
    dataset: Mutex<Vec<Region>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedHarvester {
    pub fn new(dataset: Vec<Region>) -> Self {
        Self {
            dataset: Mutex::new(dataset),
            ..Default::default()
        }
    }

    pub fn set_dataset(&self, dataset: Vec<Region>) {
        *self.dataset.lock() = dataset;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Harvester for ScriptedHarvester {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn harvest(&self) -> HarvestResult<Vec<Region>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(HarvestError::InvalidDataset {
                reason: "source unavailable".to_string(),
            });
        }
        Ok(self.dataset.lock().clone())
    }
}

/// Blocks inside `harvest` until released, one release per call.
#[derive(Default)]
pub struct GatedHarvester {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl Harvester for GatedHarvester {
    fn name(&self) -> &str {
        "gated"
    }

    async fn harvest(&self) -> HarvestResult<Vec<Region>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(coastline())
    }
}

/// Takes `delay` of tokio time and then fails.
pub struct SlowFailingHarvester {
    pub delay: Duration,
}

#[async_trait]
impl Harvester for SlowFailingHarvester {
    fn name(&self) -> &str {
        "slow-failing"
    }

    async fn harvest(&self) -> HarvestResult<Vec<Region>> {
        tokio::time::sleep(self.delay).await;
        Err(HarvestError::InvalidDataset {
            reason: "timed out upstream".to_string(),
        })
    }
}

/// Wraps a [`TantivyEngine`], counting writes and optionally failing them.
pub struct CountingEngine {
    pub inner: TantivyEngine,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingEngine {
    pub fn new(inner: TantivyEngine) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> IndexResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(IndexError::InvalidConfig("disk full".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl IndexEngine for CountingEngine {
    fn collection_exists(&self, name: &str) -> bool {
        self.inner.collection_exists(name)
    }

    fn create_collection(
        &self,
        name: &str,
        config: &IndexConfig,
        documents: &[Document],
    ) -> IndexResult<()> {
        self.check()?;
        self.inner.create_collection(name, config, documents)
    }

    fn update_collection(&self, name: &str, documents: &[Document]) -> IndexResult<()> {
        self.check()?;
        self.inner.update_collection(name, documents)
    }

    fn query(&self, name: &str, key: &str) -> IndexResult<Vec<Match>> {
        self.inner.query(name, key)
    }
}

pub fn counting_engine(dir: &std::path::Path) -> Arc<CountingEngine> {
    Arc::new(CountingEngine::new(TantivyEngine::open(dir).unwrap()))
}
