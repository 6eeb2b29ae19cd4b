//! Core types for index documents.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two collections every document is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// One document per region.
    Regions,
    /// One document per sub-entity.
    Entities,
}

impl CollectionKind {
    /// Collection name inside the index.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Regions => "regions",
            CollectionKind::Entities => "entities",
        }
    }

    /// Both collections, in query priority order.
    pub fn all() -> [CollectionKind; 2] {
        [CollectionKind::Regions, CollectionKind::Entities]
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit written to the index.
///
/// Key sets are ordered so that serializing a document is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Keys matched approximately.
    pub fuzzy_keys: BTreeSet<String>,

    /// Keys matched only on (case-insensitive) equality.
    pub exact_keys: BTreeSet<String>,

    /// The harvested record, kept verbatim.
    pub content: serde_json::Value,
}

impl Document {
    pub fn new(content: serde_json::Value) -> Self {
        Self {
            fuzzy_keys: BTreeSet::new(),
            exact_keys: BTreeSet::new(),
            content,
        }
    }

    /// Add a fuzzy key. Blank keys are ignored.
    pub fn fuzzy_key(mut self, key: impl Into<String>) -> Self {
        insert_key(&mut self.fuzzy_keys, key.into());
        self
    }

    /// Add an exact key. Blank keys are ignored.
    pub fn exact_key(mut self, key: impl Into<String>) -> Self {
        insert_key(&mut self.exact_keys, key.into());
        self
    }

    /// A document is writable only when both key sets are non-empty.
    pub fn has_keys(&self) -> bool {
        !self.fuzzy_keys.is_empty() && !self.exact_keys.is_empty()
    }
}

fn insert_key(keys: &mut BTreeSet<String>, key: String) {
    let key = key.trim();
    if !key.is_empty() {
        keys.insert(key.to_string());
    }
}

/// Output of one transformation pass, one sequence per collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub regions: Vec<Document>,
    pub entities: Vec<Document>,
}

impl DocumentSet {
    /// Documents destined for `kind`.
    pub fn get(&self, kind: CollectionKind) -> &[Document] {
        match kind {
            CollectionKind::Regions => &self.regions,
            CollectionKind::Entities => &self.entities,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.entities.is_empty()
    }
}
