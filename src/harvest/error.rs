//! Error types for dataset harvesting.

use thiserror::Error;

/// Errors raised while fetching or decoding a harvested dataset.
///
/// Any of these fails the whole run; a partial dataset is never used.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode dataset: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset: {reason}")]
    InvalidDataset { reason: String },

    #[error("No harvester source configured (set harvester.url or harvester.path)")]
    NoSource,
}

/// Result type for harvest operations.
pub type HarvestResult<T> = Result<T, HarvestError>;
