//! Project entity model and DTOs.

use novela_core::steps::StepNumber;
use novela_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub title: Option<String>,
    pub setting: Option<String>,
    pub num_episodes: i16,
    pub current_step: StepNumber,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    pub title: Option<String>,
    pub setting: Option<String>,
    /// Defaults to 20 if omitted.
    #[validate(range(min = 5, max = 25, message = "num_episodes must be between 5 and 25"))]
    pub num_episodes: Option<i16>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub setting: Option<String>,
    #[validate(range(min = 5, max = 25, message = "num_episodes must be between 5 and 25"))]
    pub num_episodes: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_episodes_range_enforced() {
        let ok = UpdateProject {
            title: None,
            setting: None,
            num_episodes: Some(20),
        };
        assert!(ok.validate().is_ok());

        let too_few = UpdateProject {
            num_episodes: Some(4),
            ..ok.clone()
        };
        assert!(too_few.validate().is_err());

        let too_many = UpdateProject {
            num_episodes: Some(26),
            ..ok.clone()
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn omitted_num_episodes_passes_validation() {
        let input = CreateProject {
            title: Some("Corazón de Fuego".to_string()),
            setting: None,
            num_episodes: None,
        };
        assert!(input.validate().is_ok());
    }
}
