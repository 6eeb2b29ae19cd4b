//! Command implementations for the CLI.

pub mod init;
pub mod query;
pub mod serve;
pub mod sync;

use std::sync::Arc;

use anyhow::Context;

use crate::config::Settings;
use crate::harvest;
use crate::index::{IndexEngine, TantivyEngine};
use crate::store::Store;

/// Open the index under `index_path`.
pub fn open_engine(settings: &Settings) -> anyhow::Result<Arc<dyn IndexEngine>> {
    settings.index.validate()?;
    let engine = TantivyEngine::open(&settings.index_path).with_context(|| {
        format!("failed to open index at {}", settings.index_path.display())
    })?;
    Ok(Arc::new(engine))
}

/// Wire harvester and index engine into a store.
pub fn open_store(settings: &Settings) -> anyhow::Result<Arc<Store>> {
    let harvester = harvest::from_settings(&settings.harvester)
        .context("no usable dataset source in [harvester]")?;
    let engine = open_engine(settings)?;

    Ok(Arc::new(Store::new(
        Arc::from(harvester),
        engine,
        settings.index.clone(),
    )))
}
