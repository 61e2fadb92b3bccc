//! Row types shared by the state-transition and pipeline-count queries.

use novela_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// The state-machine columns every entity table shares.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EntityStateRow {
    pub id: EntityId,
    pub state: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One bucket of a per-state GROUP BY count.
#[derive(Debug, Clone, FromRow)]
pub struct StateCountRow {
    pub state: String,
    pub count: i64,
}

/// An entity presumed stuck in `generating`, tagged with its type.
#[derive(Debug, Clone, Serialize)]
pub struct StuckEntity {
    pub entity_type: &'static str,
    pub id: EntityId,
    pub state: String,
    pub updated_at: Timestamp,
}
