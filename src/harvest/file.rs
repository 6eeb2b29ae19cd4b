//! Harvester backed by a JSON snapshot on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::HarvestResult;
use super::types::{Region, parse_dataset};
use super::Harvester;

/// Reads the dataset from a file on every harvest, so edits to the file
/// are picked up by the next run.
#[derive(Debug, Clone)]
pub struct FileHarvester {
    path: PathBuf,
}

impl FileHarvester {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Harvester for FileHarvester {
    fn name(&self) -> &str {
        "file"
    }

    async fn harvest(&self) -> HarvestResult<Vec<Region>> {
        crate::debug_event!("harvest", "reading", "{}", self.path.display());
        let bytes = tokio::fs::read(&self.path).await?;
        parse_dataset(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::HarvestError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_harvester_reads_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.json");
        std::fs::write(&path, r#"{"Santos": [{"name": "Gonzaga"}]}"#).unwrap();

        let regions = FileHarvester::new(&path).harvest().await.unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].entities[0].name, "Gonzaga");
    }

    #[tokio::test]
    async fn test_file_harvester_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let harvester = FileHarvester::new(temp_dir.path().join("missing.json"));
        assert!(matches!(harvester.harvest().await, Err(HarvestError::Io(_))));
    }
}
