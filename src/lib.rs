//! Harvests a region/sub-entity dataset, turns it into keyed documents and
//! keeps two fuzzy-searchable collections (`regions`, `entities`) in sync.
//!
//! A [`Store`] runs one pipeline pass; the [`Scheduler`] repeats it on an
//! interval without ever overlapping runs.

pub mod logging;

pub mod cli;
pub mod config;
pub mod documents;
pub mod harvest;
pub mod index;
pub mod scheduler;
pub mod store;

pub use config::Settings;
pub use documents::{CollectionKind, Document, DocumentSet, build_documents};
pub use harvest::{Harvester, Region, SubEntity};
pub use index::{IndexConfig, IndexEngine, IndexError, Match, TantivyEngine};
pub use scheduler::{Scheduler, SchedulerHandle, SchedulerStatus};
pub use store::{QueryResult, RunOutcome, Store, StoreError};
