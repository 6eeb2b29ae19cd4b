//! Transformation from harvested regions into index documents.
//!
//! Key scheme:
//!
//! | collection | fuzzy keys                                     | exact keys          |
//! |------------|------------------------------------------------|---------------------|
//! | regions    | `<region>`                                     | `<region>`          |
//! | entities   | `<entity>`, `<region> <entity>`, `<entity> <region>` | `<region> <entity>` |
//!
//! Entity exact keys use the composite name only, so two regions that both
//! have an entity called "Centro" never produce an exact hit on each other.

use super::types::{Document, DocumentSet};
use crate::harvest::Region;

/// Build region and entity documents from a harvested dataset.
///
/// Pure and deterministic: identical input yields identical output, in
/// source order. A region without sub-entities still yields a region
/// document (with an empty content array). Blank names are dropped with a
/// warning: a blank region drops the region document, a blank entity name
/// drops that entity, since its composite keys would collapse to the
/// region name.
pub fn build_documents(regions: &[Region]) -> serde_json::Result<DocumentSet> {
    let mut set = DocumentSet::default();

    for region in regions {
        let region_doc = Document::new(serde_json::to_value(&region.entities)?)
            .fuzzy_key(region.name.as_str())
            .exact_key(region.name.as_str());
        push_checked(&mut set.regions, region_doc, &region.name);

        for entity in &region.entities {
            if entity.name.trim().is_empty() {
                tracing::warn!("dropping entity with blank name in region {:?}", region.name);
                continue;
            }

            let composite = format!("{} {}", region.name, entity.name);
            let reversed = format!("{} {}", entity.name, region.name);

            let entity_doc = Document::new(serde_json::to_value(entity)?)
                .fuzzy_key(entity.name.as_str())
                .fuzzy_key(composite.as_str())
                .fuzzy_key(reversed)
                .exact_key(composite.as_str());
            push_checked(&mut set.entities, entity_doc, &composite);
        }
    }

    Ok(set)
}

fn push_checked(target: &mut Vec<Document>, doc: Document, label: &str) {
    if doc.has_keys() {
        target.push(doc);
    } else {
        tracing::warn!("dropping document without keys: {label:?}");
    }
}
