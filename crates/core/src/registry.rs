//! The closed registry of pipeline entity types.
//!
//! Adding a variant here forces every consuming `match` to be updated, which
//! keeps the step table, the SQL layer, and the API surface from drifting
//! apart silently.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lifecycle::Lifecycle;
use crate::state::EntityState;
use crate::steps::StepNumber;

/// One of the twelve categories of pipeline artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Ideas,
    Characters,
    Locations,
    EpisodeSummaries,
    Episodes,
    ImagePrompts,
    CharacterRefs,
    LocationRefs,
    GeneratedImages,
    Thumbnails,
    VideoPrompts,
    GeneratedVideos,
}

impl EntityType {
    /// Every entity type, in pipeline order.
    pub const ALL: [EntityType; 12] = [
        Self::Ideas,
        Self::Characters,
        Self::Locations,
        Self::EpisodeSummaries,
        Self::Episodes,
        Self::ImagePrompts,
        Self::CharacterRefs,
        Self::LocationRefs,
        Self::GeneratedImages,
        Self::Thumbnails,
        Self::VideoPrompts,
        Self::GeneratedVideos,
    ];

    /// The snake_case key used in pipeline snapshots and as the table name.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ideas => "ideas",
            Self::Characters => "characters",
            Self::Locations => "locations",
            Self::EpisodeSummaries => "episode_summaries",
            Self::Episodes => "episodes",
            Self::ImagePrompts => "image_prompts",
            Self::CharacterRefs => "character_refs",
            Self::LocationRefs => "location_refs",
            Self::GeneratedImages => "generated_images",
            Self::Thumbnails => "thumbnails",
            Self::VideoPrompts => "video_prompts",
            Self::GeneratedVideos => "generated_videos",
        }
    }

    /// Singular display name used in error messages.
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Ideas => "Idea",
            Self::Characters => "Character",
            Self::Locations => "Location",
            Self::EpisodeSummaries => "EpisodeSummary",
            Self::Episodes => "Episode",
            Self::ImagePrompts => "ImagePrompt",
            Self::CharacterRefs => "CharacterRef",
            Self::LocationRefs => "LocationRef",
            Self::GeneratedImages => "GeneratedImage",
            Self::Thumbnails => "Thumbnail",
            Self::VideoPrompts => "VideoPrompt",
            Self::GeneratedVideos => "GeneratedVideo",
        }
    }

    /// Parse an entity-type key.
    ///
    /// Accepts both snake_case (snapshot keys) and kebab-case (URL path
    /// segments, e.g. `character-refs`).
    pub fn parse_key(s: &str) -> Result<Self, CoreError> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.key() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown entity type '{s}'. Must be one of: {}",
                    Self::ALL.map(|e| e.key()).join(", ")
                ))
            })
    }

    /// The state-machine shape this entity type follows.
    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Self::Ideas => Lifecycle::Idea,
            Self::Characters | Self::Locations | Self::EpisodeSummaries => Lifecycle::Structure,
            Self::Episodes => Lifecycle::Generation,
            Self::ImagePrompts | Self::VideoPrompts => Lifecycle::Prompt,
            Self::CharacterRefs
            | Self::LocationRefs
            | Self::GeneratedImages
            | Self::Thumbnails
            | Self::GeneratedVideos => Lifecycle::Media,
        }
    }

    /// The pipeline step this entity type is produced at.
    ///
    /// The structure types are produced at step 3 and reviewed at step 4;
    /// `generated_images` are produced at step 8 and reviewed at step 10.
    /// The step-level attention table in [`crate::steps`] owns those
    /// review-step placements.
    pub fn step(&self) -> StepNumber {
        match self {
            Self::Ideas => 1,
            Self::Characters | Self::Locations | Self::EpisodeSummaries => 3,
            Self::Episodes => 5,
            Self::ImagePrompts => 6,
            Self::CharacterRefs | Self::LocationRefs => 7,
            Self::GeneratedImages => 8,
            Self::Thumbnails => 9,
            Self::VideoPrompts => 11,
            Self::GeneratedVideos => 12,
        }
    }

    /// The states of this type that count as outstanding work in badges.
    pub fn attention_states(&self) -> &'static [EntityState] {
        use EntityState::{Draft, Generating, Modified, Pending};
        match self {
            Self::Ideas => &[Draft],
            Self::Characters | Self::Locations | Self::EpisodeSummaries => &[Draft, Modified],
            Self::Episodes => &[Pending, Generating],
            Self::ImagePrompts | Self::VideoPrompts => &[Pending],
            Self::CharacterRefs | Self::LocationRefs => &[Pending],
            Self::GeneratedImages | Self::Thumbnails | Self::GeneratedVideos => {
                &[Pending, Generating]
            }
        }
    }

    /// Validate a requested transition for this entity type.
    pub fn validate_transition(
        &self,
        from: EntityState,
        to: EntityState,
    ) -> Result<(), CoreError> {
        if self.lifecycle().can_transition(from, to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                entity: self.entity_name(),
                from,
                to,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn keys_parse_back_to_their_type() {
        for entity in EntityType::ALL {
            assert_eq!(EntityType::parse_key(entity.key()).unwrap(), entity);
        }
    }

    #[test]
    fn kebab_case_route_keys_accepted() {
        assert_eq!(
            EntityType::parse_key("character-refs").unwrap(),
            EntityType::CharacterRefs
        );
        assert_eq!(
            EntityType::parse_key("generated-videos").unwrap(),
            EntityType::GeneratedVideos
        );
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(EntityType::parse_key("widgets").is_err());
    }

    #[test]
    fn attention_states_are_legal_for_the_lifecycle() {
        for entity in EntityType::ALL {
            let legal = entity.lifecycle().legal_states();
            for state in entity.attention_states() {
                assert!(
                    legal.contains(state),
                    "{} flags {state} but its lifecycle never holds it",
                    entity.key()
                );
            }
        }
    }

    #[test]
    fn invalid_transition_names_the_entity() {
        let err = EntityType::Ideas
            .validate_transition(EntityState::Approved, EntityState::Draft)
            .unwrap_err();
        assert_matches!(
            err,
            crate::error::CoreError::InvalidTransition { entity: "Idea", .. }
        );
        assert!(err.to_string().contains("cannot transition"));
    }

    #[test]
    fn structure_types_share_step_three() {
        assert_eq!(EntityType::Characters.step(), 3);
        assert_eq!(EntityType::Locations.step(), 3);
        assert_eq!(EntityType::EpisodeSummaries.step(), 3);
    }
}
