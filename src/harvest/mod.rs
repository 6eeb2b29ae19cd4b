//! Dataset harvesting.
//!
//! A [`Harvester`] returns the full current dataset on every call: an
//! ordered sequence of regions, each with its sub-entities. Fetch or decode
//! failures surface as [`HarvestError`]; a partial dataset is never returned.

mod error;
mod file;
mod http;
mod types;

pub use error::{HarvestError, HarvestResult};
pub use file::FileHarvester;
pub use http::HttpHarvester;
pub use types::{Region, SubEntity, parse_dataset};

use async_trait::async_trait;

use crate::config::HarvesterConfig;

/// Source of the region/sub-entity dataset.
#[async_trait]
pub trait Harvester: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Fetch the complete dataset.
    async fn harvest(&self) -> HarvestResult<Vec<Region>>;
}

/// Build the harvester described by the settings.
///
/// `url` wins over `path` when both are set.
pub fn from_settings(config: &HarvesterConfig) -> HarvestResult<Box<dyn Harvester>> {
    if let Some(url) = &config.url {
        let harvester = HttpHarvester::new(url, config)?;
        return Ok(Box::new(harvester));
    }

    if let Some(path) = &config.path {
        return Ok(Box::new(FileHarvester::new(path)));
    }

    Err(HarvestError::NoSource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_requires_source() {
        let config = HarvesterConfig::default();
        assert!(matches!(from_settings(&config), Err(HarvestError::NoSource)));
    }

    #[test]
    fn test_from_settings_prefers_url() {
        let config = HarvesterConfig {
            url: Some("http://localhost:9/dataset.json".to_string()),
            path: Some("dataset.json".into()),
            ..Default::default()
        };
        let harvester = from_settings(&config).unwrap();
        assert_eq!(harvester.name(), "http");
    }

    #[test]
    fn test_from_settings_file() {
        let config = HarvesterConfig {
            path: Some("dataset.json".into()),
            ..Default::default()
        };
        let harvester = from_settings(&config).unwrap();
        assert_eq!(harvester.name(), "file");
    }
}
