//! Matching configuration applied to a collection when it is created.

use serde::{Deserialize, Serialize};

use super::error::{IndexError, IndexResult};

/// Largest edit distance tantivy's fuzzy automaton supports.
pub const MAX_FUZZY_DISTANCE: u8 = 2;

/// Minimum writer heap tantivy accepts for a single indexing thread.
pub const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Levenshtein distance allowed between a query token and a fuzzy key token.
    #[serde(default = "default_fuzzy_distance")]
    pub fuzzy_distance: u8,

    /// Count a transposition as a single edit.
    #[serde(default = "default_true")]
    pub transposition_cost_one: bool,

    /// Maximum matches returned per collection lookup.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Memory budget for the index writer, in bytes.
    #[serde(default = "default_writer_heap_bytes")]
    pub writer_heap_bytes: usize,
}

fn default_fuzzy_distance() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_max_results() -> usize {
    10
}

fn default_writer_heap_bytes() -> usize {
    50_000_000
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            fuzzy_distance: default_fuzzy_distance(),
            transposition_cost_one: default_true(),
            max_results: default_max_results(),
            writer_heap_bytes: default_writer_heap_bytes(),
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> IndexResult<()> {
        if self.fuzzy_distance > MAX_FUZZY_DISTANCE {
            return Err(IndexError::InvalidConfig(format!(
                "fuzzy_distance ({}) must be at most {MAX_FUZZY_DISTANCE}",
                self.fuzzy_distance
            )));
        }

        if self.max_results == 0 {
            return Err(IndexError::InvalidConfig(
                "max_results must be greater than zero".to_string(),
            ));
        }

        if self.writer_heap_bytes < MIN_WRITER_HEAP_BYTES {
            return Err(IndexError::InvalidConfig(format!(
                "writer_heap_bytes ({}) must be at least {MIN_WRITER_HEAP_BYTES}",
                self.writer_heap_bytes
            )));
        }

        Ok(())
    }
}
