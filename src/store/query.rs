//! Two-tier lookup: regions first, entities as fallback.

use std::sync::Arc;

use serde::Serialize;

use super::error::QueryError;
use crate::documents::CollectionKind;
use crate::index::{IndexEngine, Match};

/// Matches from the collection a query settled on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub collection: CollectionKind,
    pub matches: Vec<Match>,
}

impl QueryResult {
    pub fn empty(collection: CollectionKind) -> Self {
        Self {
            collection,
            matches: Vec::new(),
        }
    }

    pub fn has_exact_matches(&self) -> bool {
        self.matches.iter().any(|m| m.exact)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Sequences lookups across collections. Matching itself is left to the
/// index engine.
#[derive(Clone)]
pub struct QueryRouter {
    engine: Arc<dyn IndexEngine>,
}

impl std::fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRouter").finish_non_exhaustive()
    }
}

impl QueryRouter {
    pub fn new(engine: Arc<dyn IndexEngine>) -> Self {
        Self { engine }
    }

    /// Look `key` up in `regions`; if none of those hits is exact, answer
    /// from `entities` instead.
    ///
    /// Never fails: a collection whose lookup errors counts as empty.
    pub fn query(&self, key: &str) -> QueryResult {
        let regions = self.lookup(CollectionKind::Regions, key);
        if regions.has_exact_matches() {
            return regions;
        }

        crate::debug_event!(
            "query",
            "fallback",
            "{key:?}: {} non-exact region matches",
            regions.matches.len()
        );
        self.lookup(CollectionKind::Entities, key)
    }

    /// Single-collection lookup that degrades errors to an empty result.
    pub fn lookup(&self, collection: CollectionKind, key: &str) -> QueryResult {
        self.try_lookup(collection, key).unwrap_or_else(|e| {
            tracing::warn!("{e}");
            QueryResult::empty(collection)
        })
    }

    pub fn try_lookup(
        &self,
        collection: CollectionKind,
        key: &str,
    ) -> Result<QueryResult, QueryError> {
        let matches = self
            .engine
            .query(collection.as_str(), key)
            .map_err(|source| QueryError { collection, source })?;

        Ok(QueryResult {
            collection,
            matches,
        })
    }
}
