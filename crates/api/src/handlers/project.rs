//! Handlers for the `/projects` resource and the step wizard.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use novela_core::error::CoreError;
use novela_core::gating::{can_advance_to, step_progress, StepProgress};
use novela_core::steps::{step_name, StepNumber, TOTAL_STEPS};
use novela_core::types::EntityId;
use novela_db::models::project::{CreateProject, Project, UpdateProject};
use novela_db::repositories::{PipelineRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let project = ProjectRepo::create(&state.pool, &input).await?;

    tracing::info!(project_id = %project.id, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = %id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// GET /api/v1/projects/{id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<StepProgress>>> {
    let project = find_project(&state, id).await?;
    let snapshot = PipelineRepo::snapshot(&state.pool, id).await?;
    let progress = step_progress(
        &snapshot,
        project.current_step,
        i64::from(project.num_episodes),
    );
    Ok(Json(DataResponse { data: progress }))
}

/// Response payload for a successful step advance.
#[derive(Debug, Serialize)]
pub struct AdvanceStepResponse {
    pub current_step: StepNumber,
    pub step_name: &'static str,
}

/// POST /api/v1/projects/{id}/advance-step
///
/// Moves the project to the next step if its prerequisites are met.
pub async fn advance_step(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<AdvanceStepResponse>>> {
    let project = find_project(&state, id).await?;

    let next_step = project.current_step + 1;
    if next_step > TOTAL_STEPS {
        return Err(AppError::BadRequest("Already at final step".to_string()));
    }

    let snapshot = PipelineRepo::snapshot(&state.pool, id).await?;
    if !can_advance_to(&snapshot, project.current_step, next_step) {
        return Err(AppError::BadRequest(format!(
            "Cannot advance to step {next_step} - prerequisites not met"
        )));
    }

    let updated = ProjectRepo::set_current_step(&state.pool, id, next_step)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(
        project_id = %id,
        current_step = updated.current_step,
        "Project advanced to next step"
    );

    Ok(Json(DataResponse {
        data: AdvanceStepResponse {
            current_step: updated.current_step,
            step_name: step_name(updated.current_step).unwrap_or("Unknown"),
        },
    }))
}

/// Load a project or produce a 404.
pub(crate) async fn find_project(state: &AppState, id: EntityId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}
