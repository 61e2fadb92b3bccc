//! Recovery of entities stuck in `generating`.
//!
//! A generation job that dies without reporting back leaves its entity in
//! `generating` forever. Entities that have sat there past a staleness
//! window may be force-reset to `pending` so the job can be re-queued.

use chrono::Duration;

use crate::error::CoreError;
use crate::registry::EntityType;
use crate::state::EntityState;
use crate::types::Timestamp;

/// How long an entity may sit in `generating` before it is presumed stuck.
pub const DEFAULT_STALENESS_MINUTES: i64 = 10;

/// Entity types whose lifecycle includes a `generating` state and therefore
/// support the reset operation.
pub const RESETTABLE_TYPES: [EntityType; 6] = [
    EntityType::Episodes,
    EntityType::CharacterRefs,
    EntityType::LocationRefs,
    EntityType::GeneratedImages,
    EntityType::Thumbnails,
    EntityType::GeneratedVideos,
];

/// Whether this entity type supports the reset operation.
pub fn is_resettable(entity: EntityType) -> bool {
    RESETTABLE_TYPES.contains(&entity)
}

/// Validate a reset request: the type must be resettable and the entity
/// must currently be `generating`.
pub fn validate_reset(entity: EntityType, current: EntityState) -> Result<(), CoreError> {
    if !is_resettable(entity) {
        return Err(CoreError::Validation(format!(
            "Entity type '{}' does not support reset",
            entity.key()
        )));
    }
    if current != EntityState::Generating {
        return Err(CoreError::Validation(format!(
            "Entity is not stuck (state: {current})"
        )));
    }
    Ok(())
}

/// Whether an entity is presumed stuck: in `generating` and untouched since
/// before `now - window`.
pub fn is_stuck(
    state: EntityState,
    updated_at: Timestamp,
    now: Timestamp,
    window: Duration,
) -> bool {
    state == EntityState::Generating && updated_at < now - window
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn resettable_set_matches_generating_lifecycles() {
        for entity in EntityType::ALL {
            let has_generating = entity
                .lifecycle()
                .legal_states()
                .contains(&EntityState::Generating);
            assert_eq!(
                is_resettable(entity),
                has_generating,
                "{} resettability disagrees with its lifecycle",
                entity.key()
            );
        }
    }

    #[test]
    fn reset_rejected_for_prompt_types() {
        let err = validate_reset(EntityType::ImagePrompts, EntityState::Pending).unwrap_err();
        assert!(err.to_string().contains("does not support reset"));
    }

    #[test]
    fn reset_rejected_unless_generating() {
        let err = validate_reset(EntityType::Episodes, EntityState::Generated).unwrap_err();
        assert!(err.to_string().contains("not stuck"));
        assert!(validate_reset(EntityType::Episodes, EntityState::Generating).is_ok());
    }

    #[test]
    fn reset_target_is_a_legal_transition_for_every_resettable_type() {
        for entity in RESETTABLE_TYPES {
            assert!(entity
                .lifecycle()
                .can_transition(EntityState::Generating, EntityState::Pending));
        }
    }

    #[test]
    fn staleness_window_boundary() {
        let now = Utc::now();
        let window = Duration::minutes(DEFAULT_STALENESS_MINUTES);
        let stale = now - Duration::minutes(DEFAULT_STALENESS_MINUTES + 1);
        let fresh = now - Duration::minutes(DEFAULT_STALENESS_MINUTES - 1);
        assert!(is_stuck(EntityState::Generating, stale, now, window));
        assert!(!is_stuck(EntityState::Generating, fresh, now, window));
        assert!(!is_stuck(EntityState::Pending, stale, now, window));
    }
}
