//! Pipeline steps, tab grouping, and the step-level attention table.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::registry::EntityType;
use crate::state::EntityState;

/// Pipeline steps are numbered 1 through [`TOTAL_STEPS`].
pub type StepNumber = i16;

/// The number of steps in the production pipeline.
pub const TOTAL_STEPS: StepNumber = 12;

/// Human-readable step names, indexed 1..=12.
const STEP_NAMES: [&str; TOTAL_STEPS as usize] = [
    "Generate Ideas",
    "Select Idea",
    "Generate Structure",
    "Approve Structure",
    "Generate Episode Scripts",
    "Generate Image Prompts",
    "Generate Reference Images",
    "Generate Images",
    "Generate Thumbnails",
    "Review Images",
    "Generate Video Prompts",
    "Generate Videos",
];

/// The display name for a step, or `None` outside 1..=12.
pub fn step_name(step: StepNumber) -> Option<&'static str> {
    if (1..=TOTAL_STEPS).contains(&step) {
        Some(STEP_NAMES[(step - 1) as usize])
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Step attention table
// ---------------------------------------------------------------------------

use EntityState::{Draft, Generated, Generating, Modified, Pending};
use EntityType::{
    CharacterRefs, Characters, EpisodeSummaries, Episodes, GeneratedImages, GeneratedVideos,
    Ideas, ImagePrompts, LocationRefs, Locations, Thumbnails, VideoPrompts,
};

/// Which (entity type, states) pairs feed a step's badge count.
///
/// Steps 2 and 3 intentionally have no entry and always count zero. Steps 4
/// and 7 aggregate across several entity types. Step 10 re-reads
/// `generated_images` with the `generated` state only: step 8 is the
/// generation queue, step 10 the review queue, and the two must never be
/// collapsed into one lookup.
pub fn attention_sources(
    step: StepNumber,
) -> &'static [(EntityType, &'static [EntityState])] {
    match step {
        1 => &[(Ideas, &[Draft])],
        4 => &[
            (Characters, &[Draft, Modified]),
            (Locations, &[Draft, Modified]),
            (EpisodeSummaries, &[Draft, Modified]),
        ],
        5 => &[(Episodes, &[Pending, Generating])],
        6 => &[(ImagePrompts, &[Pending])],
        7 => &[(CharacterRefs, &[Pending]), (LocationRefs, &[Pending])],
        8 => &[(GeneratedImages, &[Pending, Generating])],
        9 => &[(Thumbnails, &[Pending, Generating])],
        10 => &[(GeneratedImages, &[Generated])],
        11 => &[(VideoPrompts, &[Pending])],
        12 => &[(GeneratedVideos, &[Pending, Generating])],
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

pub const TAB_IDEA: &str = "idea";
pub const TAB_STRUCTURE: &str = "structure";
pub const TAB_PRODUCTION: &str = "production";

/// All valid tab keys.
pub const VALID_TABS: &[&str] = &[TAB_IDEA, TAB_STRUCTURE, TAB_PRODUCTION];

/// The coarse navigation grouping over steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Idea,
    Structure,
    Production,
}

impl Tab {
    /// Every tab, in navigation order.
    pub const ALL: [Tab; 3] = [Self::Idea, Self::Structure, Self::Production];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Idea => TAB_IDEA,
            Self::Structure => TAB_STRUCTURE,
            Self::Production => TAB_PRODUCTION,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            TAB_IDEA => Ok(Self::Idea),
            TAB_STRUCTURE => Ok(Self::Structure),
            TAB_PRODUCTION => Ok(Self::Production),
            _ => Err(CoreError::Validation(format!(
                "Invalid tab '{s}'. Must be one of: {}",
                VALID_TABS.join(", ")
            ))),
        }
    }

    /// The member steps of this tab.
    pub fn steps(&self) -> &'static [StepNumber] {
        match self {
            Self::Idea => &[1, 2],
            Self::Structure => &[3, 4],
            Self::Production => &[5, 6, 7, 8, 9, 10, 11, 12],
        }
    }

    /// Where navigation lands for a given pipeline step.
    pub fn for_step(step: StepNumber) -> Tab {
        if step <= 2 {
            Self::Idea
        } else if step <= 4 {
            Self::Structure
        } else {
            Self::Production
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_cover_every_step() {
        for step in 1..=TOTAL_STEPS {
            assert!(step_name(step).is_some(), "step {step} has no name");
        }
        assert_eq!(step_name(1), Some("Generate Ideas"));
        assert_eq!(step_name(10), Some("Review Images"));
        assert_eq!(step_name(0), None);
        assert_eq!(step_name(13), None);
    }

    #[test]
    fn every_step_belongs_to_exactly_one_tab() {
        for step in 1..=TOTAL_STEPS {
            let owners = Tab::ALL
                .iter()
                .filter(|t| t.steps().contains(&step))
                .count();
            assert_eq!(owners, 1, "step {step} owned by {owners} tabs");
        }
    }

    #[test]
    fn landing_resolution_matches_tab_boundaries() {
        assert_eq!(Tab::for_step(1), Tab::Idea);
        assert_eq!(Tab::for_step(2), Tab::Idea);
        assert_eq!(Tab::for_step(3), Tab::Structure);
        assert_eq!(Tab::for_step(4), Tab::Structure);
        assert_eq!(Tab::for_step(5), Tab::Production);
        assert_eq!(Tab::for_step(12), Tab::Production);
    }

    #[test]
    fn steps_two_and_three_have_no_attention_sources() {
        assert!(attention_sources(2).is_empty());
        assert!(attention_sources(3).is_empty());
    }

    #[test]
    fn steps_eight_and_ten_read_disjoint_states_of_the_same_type() {
        let gen_queue = attention_sources(8);
        let review_queue = attention_sources(10);
        assert_eq!(gen_queue[0].0, EntityType::GeneratedImages);
        assert_eq!(review_queue[0].0, EntityType::GeneratedImages);
        for state in gen_queue[0].1 {
            assert!(!review_queue[0].1.contains(state));
        }
    }

    #[test]
    fn attention_states_are_legal_for_their_entity() {
        for step in 1..=TOTAL_STEPS {
            for (entity, states) in attention_sources(step) {
                let legal = entity.lifecycle().legal_states();
                for state in *states {
                    assert!(
                        legal.contains(state),
                        "step {step}: {} never holds {state}",
                        entity.key()
                    );
                }
            }
        }
    }

    #[test]
    fn tab_keys_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::parse(tab.key()).unwrap(), tab);
        }
        assert!(Tab::parse("review").is_err());
    }
}
