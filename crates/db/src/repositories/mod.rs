pub mod entity_state_repo;
pub mod pipeline_repo;
pub mod project_repo;

pub use entity_state_repo::EntityStateRepo;
pub use pipeline_repo::PipelineRepo;
pub use project_repo::ProjectRepo;

use novela_core::registry::EntityType;

/// SQL fragments locating one entity type's rows within a project.
///
/// The entity table is always aliased `t`; `from` includes whatever
/// ownership joins reach the project, and `scope` is a WHERE fragment with
/// the project id bound as `$1`. All fragments are compile-time constants
/// keyed by the closed [`EntityType`] enum, so no caller-supplied text ever
/// reaches a query string.
pub(crate) struct EntitySource {
    pub from: &'static str,
    pub scope: &'static str,
}

pub(crate) fn entity_source(entity: EntityType) -> EntitySource {
    let (from, scope) = match entity {
        EntityType::Ideas => ("ideas t", "t.project_id = $1"),
        EntityType::Characters => ("characters t", "t.project_id = $1"),
        EntityType::Locations => ("locations t", "t.project_id = $1"),
        EntityType::EpisodeSummaries => ("episode_summaries t", "t.project_id = $1"),
        EntityType::Episodes => ("episodes t", "t.project_id = $1"),
        EntityType::Thumbnails => ("thumbnails t", "t.project_id = $1"),
        EntityType::CharacterRefs => (
            "character_refs t JOIN characters c ON t.character_id = c.id",
            "c.project_id = $1",
        ),
        EntityType::LocationRefs => (
            "location_refs t JOIN locations l ON t.location_id = l.id",
            "l.project_id = $1",
        ),
        EntityType::ImagePrompts => (
            "image_prompts t JOIN scenes s ON t.scene_id = s.id \
             JOIN episodes e ON s.episode_id = e.id",
            "e.project_id = $1",
        ),
        EntityType::VideoPrompts => (
            "video_prompts t JOIN scenes s ON t.scene_id = s.id \
             JOIN episodes e ON s.episode_id = e.id",
            "e.project_id = $1",
        ),
        EntityType::GeneratedImages => (
            "generated_images t JOIN image_prompts ip ON t.image_prompt_id = ip.id \
             JOIN scenes s ON ip.scene_id = s.id \
             JOIN episodes e ON s.episode_id = e.id",
            "e.project_id = $1",
        ),
        EntityType::GeneratedVideos => (
            "generated_videos t JOIN video_prompts vp ON t.video_prompt_id = vp.id \
             JOIN scenes s ON vp.scene_id = s.id \
             JOIN episodes e ON s.episode_id = e.id",
            "e.project_id = $1",
        ),
    };
    EntitySource { from, scope }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entity_source_starts_from_its_own_table() {
        for entity in EntityType::ALL {
            let src = entity_source(entity);
            assert!(
                src.from.starts_with(&format!("{} t", entity.key())),
                "{} source starts with '{}'",
                entity.key(),
                src.from
            );
        }
    }

    #[test]
    fn every_entity_source_binds_the_project_id() {
        for entity in EntityType::ALL {
            assert!(entity_source(entity).scope.contains("$1"));
        }
    }

    #[test]
    fn shot_level_entities_join_through_episodes() {
        for entity in [
            EntityType::ImagePrompts,
            EntityType::VideoPrompts,
            EntityType::GeneratedImages,
            EntityType::GeneratedVideos,
        ] {
            let src = entity_source(entity);
            assert!(src.from.contains("JOIN episodes e"), "{}", entity.key());
            assert_eq!(src.scope, "e.project_id = $1");
        }
    }
}
