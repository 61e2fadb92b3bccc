//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{pipeline, project, recovery};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PATCH  /{id}                -> update
/// DELETE /{id}                -> delete
/// GET    /{id}/pipeline       -> get_pipeline
/// GET    /{id}/badges         -> get_badges
/// GET    /{id}/progress       -> get_progress
/// POST   /{id}/advance-step   -> advance_step
/// GET    /{id}/stuck          -> get_stuck
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/pipeline", get(pipeline::get_pipeline))
        .route("/{id}/badges", get(pipeline::get_badges))
        .route("/{id}/progress", get(project::get_progress))
        .route("/{id}/advance-step", post(project::advance_step))
        .route("/{id}/stuck", get(recovery::get_stuck))
}
