//! Index documents and the transformation that produces them.
//!
//! Every harvested region becomes one document in the `regions`
//! collection; every sub-entity becomes one document in `entities`.

pub mod builder;
pub mod types;

pub use builder::build_documents;
pub use types::{CollectionKind, Document, DocumentSet};
