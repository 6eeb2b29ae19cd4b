//! Tantivy-backed index engine.
//!
//! Each collection lives in its own tantivy index under
//! `<base_path>/<collection>/`, next to a `collection.json` sidecar that
//! records the [`IndexConfig`] it was created with. The sidecar is written
//! only after the first successful commit, so a collection "exists" only
//! once it has been written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::tokenizer::TextAnalyzer;
use tantivy::{
    Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument, Term,
};

use super::config::IndexConfig;
use super::engine::{IndexEngine, Match};
use super::error::{IndexError, IndexResult};
use super::schema::{
    KeySchema, analyze, collapse_whitespace, exact_analyzer, fuzzy_analyzer, normalize_exact,
    register_analyzers,
};
use crate::documents::Document;

const META_FILE: &str = "collection.json";

/// Score multiplier for exact-key hits so they rank above fuzzy ones.
const EXACT_BOOST: f32 = 10.0;

/// Sidecar persisted next to each collection's index.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionMeta {
    name: String,
    config: IndexConfig,
    created_at: i64,
}

/// A single open collection.
struct Collection {
    name: String,
    index: Index,
    reader: IndexReader,
    fields: KeySchema,
    config: IndexConfig,
    fuzzy: TextAnalyzer,
    exact: TextAnalyzer,
    /// Serializes writers inside this process; tantivy's lock file covers
    /// other processes.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish()
    }
}

impl Collection {
    fn create(path: &Path, name: &str, config: &IndexConfig) -> IndexResult<Self> {
        std::fs::create_dir_all(path)?;
        let (schema, fields) = KeySchema::build();
        let dir = MmapDirectory::open(path)?;
        let index = Index::create(dir, schema, IndexSettings::default())?;
        Self::from_index(index, fields, name, config.clone())
    }

    fn open(path: &Path, meta: CollectionMeta) -> IndexResult<Self> {
        let index = Index::open_in_dir(path)?;
        let fields = KeySchema::from_schema(&index.schema())?;
        let collection = Self::from_index(index, fields, &meta.name, meta.config)?;
        collection.reader.reload()?;
        Ok(collection)
    }

    fn from_index(
        index: Index,
        fields: KeySchema,
        name: &str,
        config: IndexConfig,
    ) -> IndexResult<Self> {
        register_analyzers(&index);

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            name: name.to_string(),
            index,
            reader,
            fields,
            config,
            fuzzy: fuzzy_analyzer(),
            exact: exact_analyzer(),
            write_lock: Mutex::new(()),
        })
    }

    /// Replace every document in one commit. On failure the pending
    /// operations are rolled back and the previous commit stays visible.
    fn replace(&self, documents: &[Document]) -> IndexResult<()> {
        let _guard = self.write_lock.lock();
        let mut writer: IndexWriter<TantivyDocument> =
            self.index.writer(self.config.writer_heap_bytes)?;

        let result = self.stage(&mut writer, documents);
        let result = result.and_then(|()| writer.commit().map(|_| ()).map_err(IndexError::from));

        if let Err(e) = result {
            if let Err(rollback_err) = writer.rollback() {
                tracing::warn!("[{}] rollback failed: {rollback_err}", self.name);
            }
            return Err(e);
        }

        self.reader.reload()?;
        Ok(())
    }

    fn stage(
        &self,
        writer: &mut IndexWriter<TantivyDocument>,
        documents: &[Document],
    ) -> IndexResult<()> {
        writer.delete_all_documents()?;

        for document in documents {
            let mut doc = TantivyDocument::new();
            for key in &document.fuzzy_keys {
                doc.add_text(self.fields.fuzzy_key, key);
            }
            for key in &document.exact_keys {
                doc.add_text(self.fields.exact_key, collapse_whitespace(key));
            }
            doc.add_text(self.fields.content, serde_json::to_string(&document.content)?);
            writer.add_document(doc)?;
        }

        Ok(())
    }

    fn query(&self, key: &str) -> IndexResult<Vec<Match>> {
        let exact_key = normalize_exact(&self.exact, key);
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        if let Some(exact) = &exact_key {
            let term = Term::from_field_text(self.fields.exact_key, exact);
            let term_query = TermQuery::new(term, IndexRecordOption::Basic);
            clauses.push((
                Occur::Should,
                Box::new(BoostQuery::new(Box::new(term_query), EXACT_BOOST)),
            ));
        }

        for token in analyze(&self.fuzzy, key) {
            let term = Term::from_field_text(self.fields.fuzzy_key, &token);
            let fuzzy = FuzzyTermQuery::new(
                term,
                self.config.fuzzy_distance,
                self.config.transposition_cost_one,
            );
            clauses.push((Occur::Should, Box::new(fuzzy)));
        }

        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        let query = BooleanQuery::new(clauses);
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.config.max_results))?;

        let mut matches = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;

            let exact = match &exact_key {
                Some(wanted) => doc
                    .get_all(self.fields.exact_key)
                    .filter_map(|v| v.as_str())
                    .filter_map(|stored| normalize_exact(&self.exact, stored))
                    .any(|stored| &stored == wanted),
                None => false,
            };

            let content = doc
                .get_first(self.fields.content)
                .and_then(|v| v.as_str())
                .map(serde_json::from_str)
                .transpose()?
                .unwrap_or(serde_json::Value::Null);

            matches.push(Match {
                content,
                exact,
                score,
            });
        }

        // Stable: fuzzy hits keep tantivy's score order.
        matches.sort_by_key(|m| !m.exact);
        Ok(matches)
    }

    fn document_count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

/// Index engine storing every collection as a tantivy index on disk.
pub struct TantivyEngine {
    base_path: PathBuf,
    collections: DashMap<String, Arc<Collection>>,
}

impl std::fmt::Debug for TantivyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyEngine")
            .field("base_path", &self.base_path)
            .field("loaded_collections", &self.collections.len())
            .finish()
    }
}

impl TantivyEngine {
    /// Open the engine rooted at `base_path`, creating the directory if needed.
    ///
    /// Collections are opened lazily on first access.
    pub fn open(base_path: impl AsRef<Path>) -> IndexResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            collections: DashMap::new(),
        })
    }

    /// Number of documents visible in `name`.
    pub fn document_count(&self, name: &str) -> IndexResult<u64> {
        Ok(self.get_or_open(name)?.document_count())
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    fn get_or_open(&self, name: &str) -> IndexResult<Arc<Collection>> {
        if let Some(collection) = self.collections.get(name) {
            return Ok(Arc::clone(&collection));
        }

        let path = self.collection_path(name);
        let meta_path = path.join(META_FILE);
        if !meta_path.exists() {
            return Err(IndexError::CollectionNotFound(name.to_string()));
        }

        let meta: CollectionMeta = serde_json::from_str(&std::fs::read_to_string(&meta_path)?)?;
        let collection = Arc::new(Collection::open(&path, meta)?);
        crate::debug_event!("index", "opened", "{name}");

        let entry = self
            .collections
            .entry(name.to_string())
            .or_insert(collection);
        Ok(Arc::clone(&entry))
    }
}

impl IndexEngine for TantivyEngine {
    fn collection_exists(&self, name: &str) -> bool {
        self.collections.contains_key(name) || self.collection_path(name).join(META_FILE).exists()
    }

    fn create_collection(
        &self,
        name: &str,
        config: &IndexConfig,
        documents: &[Document],
    ) -> IndexResult<()> {
        config.validate()?;
        if self.collection_exists(name) {
            return Err(IndexError::CollectionExists(name.to_string()));
        }

        let path = self.collection_path(name);
        if path.exists() {
            // Leftover from a create that never committed.
            tracing::warn!("removing incomplete collection at {}", path.display());
            std::fs::remove_dir_all(&path)?;
        }

        let collection = Collection::create(&path, name, config)?;
        collection.replace(documents)?;

        let meta = CollectionMeta {
            name: name.to_string(),
            config: config.clone(),
            created_at: chrono::Utc::now().timestamp(),
        };
        std::fs::write(path.join(META_FILE), serde_json::to_string_pretty(&meta)?)?;

        self.collections
            .insert(name.to_string(), Arc::new(collection));
        crate::log_event!("index", "created", "{name} ({} documents)", documents.len());
        Ok(())
    }

    fn update_collection(&self, name: &str, documents: &[Document]) -> IndexResult<()> {
        let collection = self.get_or_open(name)?;
        collection.replace(documents)?;
        crate::log_event!("index", "updated", "{name} ({} documents)", documents.len());
        Ok(())
    }

    fn query(&self, name: &str, key: &str) -> IndexResult<Vec<Match>> {
        self.get_or_open(name)?.query(key)
    }
}
