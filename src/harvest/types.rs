//! Harvested dataset types.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::{HarvestError, HarvestResult};

/// A leaf record belonging to exactly one region.
///
/// `region` is a label used to build composite lookup keys, not an
/// ownership link. Every other field of the source record is kept in
/// `attributes` and written to the index verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEntity {
    pub name: String,

    #[serde(default)]
    pub region: String,

    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl SubEntity {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an opaque attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// A top-level grouping entity and its sub-entities, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub entities: Vec<SubEntity>,
}

impl Region {
    pub fn new(name: impl Into<String>, entities: Vec<SubEntity>) -> Self {
        Self {
            name: name.into(),
            entities,
        }
    }
}

/// Decode the wire format: a JSON object mapping region name to an array
/// of sub-entity records.
///
/// Region order follows the source document. The `region` back-reference
/// of every record is overwritten with the key it was listed under. Blank
/// region or entity names reject the whole dataset.
pub fn parse_dataset(bytes: &[u8]) -> HarvestResult<Vec<Region>> {
    let raw: IndexMap<String, Vec<SubEntity>> = serde_json::from_slice(bytes)?;

    raw.into_iter()
        .map(|(name, mut entities)| {
            if name.trim().is_empty() {
                return Err(HarvestError::InvalidDataset {
                    reason: "region with empty name".to_string(),
                });
            }
            for (position, entity) in entities.iter_mut().enumerate() {
                if entity.name.trim().is_empty() {
                    return Err(HarvestError::InvalidDataset {
                        reason: format!("entity {position} of region {name:?} has an empty name"),
                    });
                }
                entity.region = name.clone();
            }
            Ok(Region::new(name, entities))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_keeps_source_order() {
        let json = br#"{
            "Ubatuba": [{"name": "Itamambuca", "quality": "good"}],
            "Santos": [{"name": "Gonzaga", "quality": "poor"}, {"name": "Embare"}]
        }"#;

        let regions = parse_dataset(json).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Ubatuba");
        assert_eq!(regions[1].name, "Santos");
        assert_eq!(regions[1].entities[0].region, "Santos");
        assert_eq!(
            regions[1].entities[0].attributes.get("quality"),
            Some(&serde_json::json!("poor"))
        );
        assert!(regions[1].entities[1].attributes.is_empty());
    }

    #[test]
    fn test_parse_dataset_overrides_region_label() {
        let json = br#"{"Santos": [{"name": "Gonzaga", "region": "Elsewhere"}]}"#;
        let regions = parse_dataset(json).unwrap();
        assert_eq!(regions[0].entities[0].region, "Santos");
    }

    #[test]
    fn test_parse_dataset_rejects_missing_name() {
        let json = br#"{"Santos": [{"quality": "good"}]}"#;
        assert!(matches!(parse_dataset(json), Err(HarvestError::Decode(_))));
    }

    #[test]
    fn test_parse_dataset_rejects_blank_region() {
        let json = br#"{"  ": []}"#;
        assert!(matches!(
            parse_dataset(json),
            Err(HarvestError::InvalidDataset { .. })
        ));
    }

    #[test]
    fn test_parse_dataset_rejects_blank_entity_name() {
        let json = br#"{"Santos": [{"name": "Gonzaga"}, {"name": "  "}]}"#;
        match parse_dataset(json) {
            Err(HarvestError::InvalidDataset { reason }) => {
                assert!(reason.contains("entity 1"), "{reason}");
                assert!(reason.contains("Santos"), "{reason}");
            }
            other => panic!("expected InvalidDataset, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_dataset() {
        assert!(parse_dataset(b"{}").unwrap().is_empty());
    }
}
