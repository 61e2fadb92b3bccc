//! Pipeline snapshot assembly: per-state counts for every entity type.

use novela_core::registry::EntityType;
use novela_core::snapshot::{EntityCounts, PipelineSnapshot};
use novela_core::types::EntityId;
use sqlx::PgPool;

use crate::models::entity::StateCountRow;
use crate::repositories::entity_source;

/// Builds [`PipelineSnapshot`]s for the badge and progress endpoints.
pub struct PipelineRepo;

impl PipelineRepo {
    /// Count rows per state for every entity type in a project.
    ///
    /// The snapshot always contains all twelve entity keys; types with no
    /// rows get an empty counts map with total 0. Totals are derived from
    /// the GROUP BY buckets, so the snapshot is consistent by construction.
    pub async fn snapshot(
        pool: &PgPool,
        project_id: EntityId,
    ) -> Result<PipelineSnapshot, sqlx::Error> {
        let mut snapshot = PipelineSnapshot::empty();
        for entity in EntityType::ALL {
            let src = entity_source(entity);
            let query = format!(
                "SELECT t.state AS state, COUNT(*) AS count FROM {} WHERE {} GROUP BY t.state",
                src.from, src.scope
            );
            let rows: Vec<StateCountRow> = sqlx::query_as(&query)
                .bind(project_id)
                .fetch_all(pool)
                .await?;
            snapshot.set(
                entity,
                EntityCounts::from_pairs(rows.into_iter().map(|r| (r.state, r.count))),
            );
        }
        Ok(snapshot)
    }
}
