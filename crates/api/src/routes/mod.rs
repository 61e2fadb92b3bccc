pub mod entity_actions;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                 list, create
/// /projects/{id}                            get, update, delete
/// /projects/{id}/pipeline                   state-count snapshot
/// /projects/{id}/badges                     step/tab badge counts
/// /projects/{id}/progress                   current-step progress
/// /projects/{id}/advance-step               gated step advance (POST)
/// /projects/{id}/stuck                      stuck-entity listing
///
/// /{entity_type}/{id}/approve               review actions (POST);
/// /{entity_type}/{id}/reject                entity_type is any of the
/// /{entity_type}/{id}/unapprove             twelve pipeline entity keys,
/// /{entity_type}/{id}/regenerate            snake- or kebab-case
/// /{entity_type}/{id}/reset
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .merge(entity_actions::router())
}
