//! Point-in-time per-entity-type state counts for one project.
//!
//! Snapshots arrive either from the pipeline endpoint's JSON
//! (`{ "<entity>": { "total": n, "counts": { "<state>": n } } }`) or from
//! the repository layer's GROUP BY queries. They are immutable value
//! objects; every aggregation is a pure read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::registry::EntityType;
use crate::state::EntityState;

/// State counts for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    /// Total rows of this type; must equal the sum of `counts`.
    pub total: i64,
    /// Rows per state string. Keys are state names as stored.
    #[serde(default)]
    pub counts: HashMap<String, i64>,
}

impl EntityCounts {
    /// Build counts from `(state, count)` pairs, deriving `total`.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let counts: HashMap<String, i64> = pairs.into_iter().collect();
        let total = counts.values().sum();
        Self { total, counts }
    }
}

/// A per-project mapping from entity-type key to state counts.
///
/// Entity types absent from the map contribute zero to every aggregate;
/// unknown keys are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineSnapshot {
    pub entities: HashMap<String, EntityCounts>,
}

impl PipelineSnapshot {
    /// The all-zero snapshot, used when the data source is unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert (or replace) the counts for an entity type.
    pub fn set(&mut self, entity: EntityType, counts: EntityCounts) {
        self.entities.insert(entity.key().to_string(), counts);
    }

    /// The count for one state of one entity type. Missing keys count zero.
    pub fn count(&self, entity: EntityType, state: EntityState) -> i64 {
        self.entities
            .get(entity.key())
            .and_then(|c| c.counts.get(state.as_str()))
            .copied()
            .unwrap_or(0)
    }

    /// The total row count for an entity type. Missing keys count zero.
    pub fn total(&self, entity: EntityType) -> i64 {
        self.entities.get(entity.key()).map(|c| c.total).unwrap_or(0)
    }

    /// Reject malformed counts: negative values, or a `total` that does not
    /// equal the sum of the per-state counts. A desync between total and
    /// counts is the one place a backend/client bug would otherwise surface
    /// as a silently wrong badge number.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (key, entry) in &self.entities {
            if entry.total < 0 {
                return Err(CoreError::Validation(format!(
                    "Entity type '{key}': total must be non-negative, got {}",
                    entry.total
                )));
            }
            for (state, count) in &entry.counts {
                if *count < 0 {
                    return Err(CoreError::Validation(format!(
                        "Entity type '{key}': count for state '{state}' must be non-negative, got {count}"
                    )));
                }
            }
            let sum: i64 = entry.counts.values().sum();
            if sum != entry.total {
                return Err(CoreError::Validation(format!(
                    "Entity type '{key}': counts sum to {sum} but total is {}",
                    entry.total
                )));
            }
        }
        Ok(())
    }

    /// State keys that are not legal for their entity type.
    ///
    /// Returned as `(entity key, state string)` pairs for the caller to log.
    /// Such states never crash aggregation; they simply contribute to no
    /// attention count. Unknown entity-type keys are not reported since
    /// the registry never reads them.
    pub fn unknown_states(&self) -> Vec<(String, String)> {
        let mut unknown = Vec::new();
        for (key, entry) in &self.entities {
            let Ok(entity) = EntityType::parse_key(key) else {
                continue;
            };
            let legal = entity.lifecycle().legal_states();
            for state in entry.counts.keys() {
                let recognized = EntityState::parse(state)
                    .map(|s| legal.contains(&s))
                    .unwrap_or(false);
                if !recognized {
                    unknown.push((key.clone(), state.clone()));
                }
            }
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, i64)]) -> EntityCounts {
        EntityCounts::from_pairs(pairs.iter().map(|(s, n)| (s.to_string(), *n)))
    }

    #[test]
    fn from_pairs_derives_total() {
        let c = counts(&[("draft", 2), ("approved", 3)]);
        assert_eq!(c.total, 5);
    }

    #[test]
    fn missing_entity_counts_zero() {
        let snap = PipelineSnapshot::empty();
        assert_eq!(snap.count(EntityType::Ideas, EntityState::Draft), 0);
        assert_eq!(snap.total(EntityType::Episodes), 0);
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn mismatched_total_rejected_naming_the_entity() {
        let mut snap = PipelineSnapshot::empty();
        snap.set(
            EntityType::Ideas,
            EntityCounts {
                total: 5,
                counts: HashMap::from([("draft".to_string(), 2), ("approved".to_string(), 2)]),
            },
        );
        let err = snap.validate().unwrap_err();
        assert!(err.to_string().contains("ideas"));
        assert!(err.to_string().contains("sum to 4"));
    }

    #[test]
    fn negative_count_rejected() {
        let mut snap = PipelineSnapshot::empty();
        snap.set(
            EntityType::Thumbnails,
            EntityCounts {
                total: -1,
                counts: HashMap::from([("pending".to_string(), -1)]),
            },
        );
        assert!(snap.validate().is_err());
    }

    #[test]
    fn unknown_state_reported_not_fatal() {
        let mut snap = PipelineSnapshot::empty();
        snap.set(EntityType::Episodes, counts(&[("pending", 1), ("archived", 2)]));
        assert!(snap.validate().is_ok());
        let unknown = snap.unknown_states();
        assert_eq!(
            unknown,
            vec![("episodes".to_string(), "archived".to_string())]
        );
    }

    #[test]
    fn state_illegal_for_lifecycle_reported() {
        // "rejected" is a real state, but episodes never hold it.
        let mut snap = PipelineSnapshot::empty();
        snap.set(EntityType::Episodes, counts(&[("rejected", 1)]));
        assert_eq!(snap.unknown_states().len(), 1);
    }

    #[test]
    fn unknown_entity_keys_ignored() {
        let mut snap = PipelineSnapshot::empty();
        snap.entities
            .insert("widgets".to_string(), counts(&[("draft", 1)]));
        assert!(snap.validate().is_ok());
        assert!(snap.unknown_states().is_empty());
    }

    #[test]
    fn deserializes_the_pipeline_endpoint_shape() {
        let json = r#"{
            "ideas": { "total": 3, "counts": { "draft": 1, "approved": 2 } },
            "episodes": { "total": 0 }
        }"#;
        let snap: PipelineSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.validate().is_ok());
        assert_eq!(snap.count(EntityType::Ideas, EntityState::Approved), 2);
        assert_eq!(snap.total(EntityType::Episodes), 0);
    }
}
