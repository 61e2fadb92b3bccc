use crate::state::EntityState;
use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity}: cannot transition from '{from}' to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        from: EntityState,
        to: EntityState,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
