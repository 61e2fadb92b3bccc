//! Generic review actions over any pipeline entity.
//!
//! One handler per action, all delegating to [`apply_action`]: look the
//! entity up, resolve the action's target state for its lifecycle, validate
//! the transition, persist, and publish the change on the event bus.

use axum::extract::{Path, State};
use axum::Json;

use novela_core::error::CoreError;
use novela_core::lifecycle::EntityAction;
use novela_core::recovery::validate_reset;
use novela_core::registry::EntityType;
use novela_core::state::EntityState;
use novela_core::types::EntityId;
use novela_db::models::entity::EntityStateRow;
use novela_db::repositories::EntityStateRepo;
use novela_events::PipelineEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/{entity_type}/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, EntityId)>,
) -> AppResult<Json<DataResponse<EntityStateRow>>> {
    apply_action(&state, &entity_type, id, EntityAction::Approve).await
}

/// POST /api/v1/{entity_type}/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, EntityId)>,
) -> AppResult<Json<DataResponse<EntityStateRow>>> {
    apply_action(&state, &entity_type, id, EntityAction::Reject).await
}

/// POST /api/v1/{entity_type}/{id}/unapprove
pub async fn unapprove(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, EntityId)>,
) -> AppResult<Json<DataResponse<EntityStateRow>>> {
    apply_action(&state, &entity_type, id, EntityAction::Unapprove).await
}

/// POST /api/v1/{entity_type}/{id}/regenerate
pub async fn regenerate(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, EntityId)>,
) -> AppResult<Json<DataResponse<EntityStateRow>>> {
    apply_action(&state, &entity_type, id, EntityAction::Regenerate).await
}

/// Resolve, validate, persist, and publish one review action.
pub(crate) async fn apply_action(
    state: &AppState,
    entity_type: &str,
    id: EntityId,
    action: EntityAction,
) -> AppResult<Json<DataResponse<EntityStateRow>>> {
    let entity = EntityType::parse_key(entity_type)?;

    let row = EntityStateRepo::find_state(&state.pool, entity, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: entity.entity_name(),
            id,
        }))?;

    // A state outside the enum means the table and the registry disagree;
    // that is a server-side defect, not a bad request.
    let from = EntityState::parse(&row.state).map_err(|_| {
        AppError::InternalError(format!(
            "{} {id} has unrecognized state '{}'",
            entity.entity_name(),
            row.state
        ))
    })?;

    if action == EntityAction::Reset {
        validate_reset(entity, from)?;
    }

    let to = entity
        .lifecycle()
        .action_target(action)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "{} does not support the '{}' action",
                entity.entity_name(),
                action.as_str()
            )))
        })?;

    entity.validate_transition(from, to)?;

    let updated = EntityStateRepo::set_state(&state.pool, entity, id, to)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: entity.entity_name(),
            id,
        }))?;

    state.event_bus.publish(PipelineEvent::state_changed(
        entity.key(),
        id,
        action.as_str(),
        from.as_str(),
        to.as_str(),
    ));

    tracing::info!(
        entity_type = entity.key(),
        entity_id = %id,
        action = action.as_str(),
        from_state = from.as_str(),
        to_state = to.as_str(),
        "Entity state changed"
    );

    Ok(Json(DataResponse { data: updated }))
}
