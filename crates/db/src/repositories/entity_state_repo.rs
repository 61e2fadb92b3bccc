//! Generic state-column access for the twelve entity tables.
//!
//! Table names come from the closed [`EntityType`] enum, never from caller
//! input, so assembling queries with `format!` is safe here the same way
//! the shared column list is.

use chrono::{Duration, Utc};
use novela_core::recovery::RESETTABLE_TYPES;
use novela_core::registry::EntityType;
use novela_core::state::EntityState;
use novela_core::types::EntityId;
use sqlx::PgPool;

use crate::models::entity::{EntityStateRow, StuckEntity};
use crate::repositories::entity_source;

/// The state-machine columns every entity table shares.
const COLUMNS: &str = "id, state, created_at, updated_at";

/// Reads and writes entity states across all entity tables.
pub struct EntityStateRepo;

impl EntityStateRepo {
    /// Load the state-machine columns of one entity.
    pub async fn find_state(
        pool: &PgPool,
        entity: EntityType,
        id: EntityId,
    ) -> Result<Option<EntityStateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", entity.key());
        sqlx::query_as::<_, EntityStateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write a new state, bumping `updated_at`.
    ///
    /// Transition legality must already have been checked by the caller;
    /// this records the result. Returns `None` if the row is gone.
    pub async fn set_state(
        pool: &PgPool,
        entity: EntityType,
        id: EntityId,
        state: EntityState,
    ) -> Result<Option<EntityStateRow>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET state = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}",
            entity.key()
        );
        sqlx::query_as::<_, EntityStateRow>(&query)
            .bind(id)
            .bind(state.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List a project's entities stuck in `generating` since before
    /// `now - window`, across every resettable type.
    pub async fn list_stuck(
        pool: &PgPool,
        project_id: EntityId,
        window: Duration,
    ) -> Result<Vec<StuckEntity>, sqlx::Error> {
        let cutoff = Utc::now() - window;
        let mut stuck = Vec::new();
        for entity in RESETTABLE_TYPES {
            let src = entity_source(entity);
            let query = format!(
                "SELECT t.id AS id, t.state AS state, t.created_at AS created_at, \
                 t.updated_at AS updated_at
                 FROM {} WHERE {} AND t.state = 'generating' AND t.updated_at < $2
                 ORDER BY t.updated_at",
                src.from, src.scope
            );
            let rows: Vec<EntityStateRow> = sqlx::query_as(&query)
                .bind(project_id)
                .bind(cutoff)
                .fetch_all(pool)
                .await?;
            stuck.extend(rows.into_iter().map(|row| StuckEntity {
                entity_type: entity.key(),
                id: row.id,
                state: row.state,
                updated_at: row.updated_at,
            }));
        }
        Ok(stuck)
    }

    /// List stuck entities across all projects. Used by the background
    /// monitor, which has no project in hand.
    pub async fn list_stuck_all(
        pool: &PgPool,
        window: Duration,
    ) -> Result<Vec<StuckEntity>, sqlx::Error> {
        let cutoff = Utc::now() - window;
        let mut stuck = Vec::new();
        for entity in RESETTABLE_TYPES {
            let query = format!(
                "SELECT {COLUMNS} FROM {} WHERE state = 'generating' AND updated_at < $1
                 ORDER BY updated_at",
                entity.key()
            );
            let rows: Vec<EntityStateRow> = sqlx::query_as(&query)
                .bind(cutoff)
                .fetch_all(pool)
                .await?;
            stuck.extend(rows.into_iter().map(|row| StuckEntity {
                entity_type: entity.key(),
                id: row.id,
                state: row.state,
                updated_at: row.updated_at,
            }));
        }
        Ok(stuck)
    }
}
