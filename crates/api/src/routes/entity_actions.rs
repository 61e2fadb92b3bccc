//! Route definitions for the generic entity review actions.
//!
//! These are mounted at the `/api/v1` root; the first path segment names
//! the entity type (snake- or kebab-case) and is validated against the
//! registry before anything touches the database.

use axum::routing::post;
use axum::Router;

use crate::handlers::{entity_action, recovery};
use crate::state::AppState;

/// Entity-scoped action routes.
///
/// ```text
/// POST   /{entity_type}/{id}/approve      -> approve
/// POST   /{entity_type}/{id}/reject       -> reject
/// POST   /{entity_type}/{id}/unapprove    -> unapprove
/// POST   /{entity_type}/{id}/regenerate   -> regenerate
/// POST   /{entity_type}/{id}/reset        -> reset (recovery)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{entity_type}/{id}/approve", post(entity_action::approve))
        .route("/{entity_type}/{id}/reject", post(entity_action::reject))
        .route(
            "/{entity_type}/{id}/unapprove",
            post(entity_action::unapprove),
        )
        .route(
            "/{entity_type}/{id}/regenerate",
            post(entity_action::regenerate),
        )
        .route("/{entity_type}/{id}/reset", post(recovery::reset))
}
