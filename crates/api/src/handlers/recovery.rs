//! Recovery endpoints for entities stuck in `generating`.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use novela_core::lifecycle::EntityAction;
use novela_core::types::EntityId;
use novela_db::models::entity::{EntityStateRow, StuckEntity};
use novela_db::repositories::EntityStateRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::entity_action::apply_action;
use crate::handlers::project::find_project;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/{entity_type}/{id}/reset
///
/// Force a stuck `generating` entity back to `pending` so its job can be
/// re-queued.
pub async fn reset(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, EntityId)>,
) -> AppResult<Json<DataResponse<EntityStateRow>>> {
    apply_action(&state, &entity_type, id, EntityAction::Reset).await
}

#[derive(Debug, Deserialize)]
pub struct StuckQuery {
    /// Staleness window in minutes; defaults to the configured window.
    pub minutes: Option<i64>,
}

/// The stuck-entity listing for a project.
#[derive(Debug, Serialize)]
pub struct StuckResponse {
    pub stuck: Vec<StuckEntity>,
    pub count: usize,
}

/// GET /api/v1/projects/{id}/stuck?minutes=N
///
/// All of a project's entities sitting in `generating` past the window.
pub async fn get_stuck(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Query(query): Query<StuckQuery>,
) -> AppResult<Json<DataResponse<StuckResponse>>> {
    let minutes = query.minutes.unwrap_or(state.config.staleness_minutes);
    if minutes < 1 {
        return Err(AppError::BadRequest(
            "minutes must be at least 1".to_string(),
        ));
    }

    find_project(&state, id).await?;

    let stuck =
        EntityStateRepo::list_stuck(&state.pool, id, chrono::Duration::minutes(minutes)).await?;
    let count = stuck.len();

    Ok(Json(DataResponse {
        data: StuckResponse { stuck, count },
    }))
}
