//! Step prerequisite checks and per-step progress statistics.
//!
//! The wizard may always navigate backwards and at most one step forwards;
//! each forward move has a prerequisite expressed over the pipeline
//! snapshot. Checks that the source data models as "every X has a Y" become
//! count identities here (e.g. every character has a non-pending reference
//! iff `character_refs.total >= characters.total` and no reference is
//! pending), and empty collections satisfy universal checks vacuously.

use serde::Serialize;

use crate::aggregate::attention_count;
use crate::registry::EntityType;
use crate::snapshot::PipelineSnapshot;
use crate::state::EntityState;
use crate::steps::{step_name, StepNumber, TOTAL_STEPS};

use EntityState::{Approved, Generated, Pending, Rejected};
use EntityType::{
    CharacterRefs, Characters, EpisodeSummaries, Episodes, GeneratedImages, Ideas, ImagePrompts,
    LocationRefs, Locations, VideoPrompts,
};

/// Ideas are generated in batches of three; step 1 is complete once a full
/// batch exists.
pub const IDEA_BATCH_SIZE: i64 = 3;

/// Whether the project may move from `current_step` to `target_step`.
///
/// Moving backwards (or staying) is always allowed; skipping ahead more
/// than one step never is. A forward move of one step is gated by the
/// target step's prerequisite; steps without one are open.
pub fn can_advance_to(
    snapshot: &PipelineSnapshot,
    current_step: StepNumber,
    target_step: StepNumber,
) -> bool {
    if target_step <= current_step {
        return true;
    }
    if target_step > current_step + 1 {
        return false;
    }
    match target_step {
        // An idea must be selected before outlining begins.
        2 | 3 => snapshot.count(Ideas, Approved) >= 1,
        // Structure generation must have produced all three collections.
        4 => {
            snapshot.total(Characters) > 0
                && snapshot.total(Locations) > 0
                && snapshot.total(EpisodeSummaries) > 0
        }
        // Every structure entity must be approved.
        5 => {
            structure_fully_approved(snapshot, Characters)
                && structure_fully_approved(snapshot, Locations)
                && structure_fully_approved(snapshot, EpisodeSummaries)
        }
        // At least one episode script finished generating.
        6 | 7 => snapshot.count(Episodes, Generated) >= 1,
        // Prompts exist and every character/location has a usable reference.
        8 | 9 => {
            let has_prompts = snapshot.count(ImagePrompts, Generated)
                + snapshot.count(ImagePrompts, Approved)
                >= 1;
            has_prompts
                && refs_cover(snapshot, CharacterRefs, Characters)
                && refs_cover(snapshot, LocationRefs, Locations)
        }
        // At least one image is awaiting review.
        10 => snapshot.count(GeneratedImages, Generated) >= 1,
        // Every image reviewed, and at least one survived.
        11 => {
            let total = snapshot.total(GeneratedImages);
            let reviewed = snapshot.count(GeneratedImages, Approved)
                + snapshot.count(GeneratedImages, Rejected);
            total > 0 && reviewed == total && snapshot.count(GeneratedImages, Approved) >= 1
        }
        // At least one video prompt approved.
        12 => snapshot.count(VideoPrompts, Approved) >= 1,
        _ => true,
    }
}

fn structure_fully_approved(snapshot: &PipelineSnapshot, entity: EntityType) -> bool {
    snapshot.count(entity, Approved) == snapshot.total(entity)
}

fn refs_cover(snapshot: &PipelineSnapshot, refs: EntityType, owners: EntityType) -> bool {
    snapshot.total(refs) >= snapshot.total(owners) && snapshot.count(refs, Pending) == 0
}

// ---------------------------------------------------------------------------
// Per-step statistics
// ---------------------------------------------------------------------------

/// Item counts and blocking reason for one step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepStats {
    pub items_total: i64,
    pub items_completed: i64,
    pub items_pending: i64,
    pub blocking_reason: Option<String>,
}

/// Progress statistics for a step.
///
/// Steps without step-specific statistics return zeros and no reason.
pub fn step_stats(snapshot: &PipelineSnapshot, step: StepNumber, num_episodes: i64) -> StepStats {
    match step {
        1 => {
            let completed = snapshot.total(Ideas);
            let pending = (IDEA_BATCH_SIZE - completed).max(0);
            StepStats {
                items_total: IDEA_BATCH_SIZE,
                items_completed: completed,
                items_pending: pending,
                blocking_reason: (pending > 0).then(|| "Generate ideas first".to_string()),
            }
        }
        2 => {
            let completed = snapshot.count(Ideas, Approved);
            StepStats {
                items_total: snapshot.total(Ideas),
                items_completed: completed,
                items_pending: 0,
                blocking_reason: (completed == 0)
                    .then(|| "Select an idea to continue".to_string()),
            }
        }
        3 => {
            let collections = [Characters, Locations, EpisodeSummaries];
            let completed = collections
                .iter()
                .filter(|e| snapshot.total(**e) > 0)
                .count() as i64;
            let total = collections.len() as i64;
            StepStats {
                items_total: total,
                items_completed: completed,
                items_pending: total - completed,
                blocking_reason: (completed < total).then(|| {
                    "Generate structure (characters, locations, episode arc)".to_string()
                }),
            }
        }
        4 => {
            let collections = [Characters, Locations, EpisodeSummaries];
            let total: i64 = collections.iter().map(|e| snapshot.total(*e)).sum();
            let completed: i64 = collections
                .iter()
                .map(|e| snapshot.count(*e, Approved))
                .sum();
            StepStats {
                items_total: total,
                items_completed: completed,
                items_pending: total - completed,
                blocking_reason: (completed < total).then(|| {
                    "Approve all characters, locations, and episode summaries".to_string()
                }),
            }
        }
        5 => {
            let completed =
                snapshot.count(Episodes, Generated) + snapshot.count(Episodes, Approved);
            let pending = (num_episodes - completed).max(0);
            StepStats {
                items_total: num_episodes,
                items_completed: completed,
                items_pending: pending,
                blocking_reason: (pending > 0)
                    .then(|| format!("Generate remaining {pending} episodes")),
            }
        }
        10 => {
            let pending = snapshot.count(GeneratedImages, Generated);
            StepStats {
                items_total: snapshot.total(GeneratedImages),
                items_completed: snapshot.count(GeneratedImages, Approved),
                items_pending: pending,
                blocking_reason: (pending > 0)
                    .then(|| format!("Review {pending} pending images")),
            }
        }
        _ => StepStats::default(),
    }
}

/// The progress payload for a project's current step.
#[derive(Debug, Clone, Serialize)]
pub struct StepProgress {
    pub current_step: StepNumber,
    pub step_name: String,
    pub can_proceed: bool,
    pub blocking_reason: Option<String>,
    pub items_total: i64,
    pub items_completed: i64,
    pub items_pending: i64,
    /// Fraction of the pipeline completed, clamped to [0, 1].
    pub progress_fraction: f64,
    /// Outstanding work at the current step.
    pub attention_count: i64,
}

/// Assemble the full progress view for the project's current step.
pub fn step_progress(
    snapshot: &PipelineSnapshot,
    current_step: StepNumber,
    num_episodes: i64,
) -> StepProgress {
    let can_proceed = can_advance_to(snapshot, current_step, current_step + 1);
    let stats = step_stats(snapshot, current_step, num_episodes);
    StepProgress {
        current_step,
        step_name: step_name(current_step).unwrap_or("Unknown").to_string(),
        can_proceed,
        blocking_reason: if can_proceed {
            None
        } else {
            stats.blocking_reason
        },
        items_total: stats.items_total,
        items_completed: stats.items_completed,
        items_pending: stats.items_pending,
        progress_fraction: crate::aggregate::step_progress_fraction(current_step, TOTAL_STEPS),
        attention_count: attention_count(current_step, snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::EntityCounts;

    fn set(snap: &mut PipelineSnapshot, entity: EntityType, pairs: &[(&str, i64)]) {
        snap.set(
            entity,
            EntityCounts::from_pairs(pairs.iter().map(|(s, n)| (s.to_string(), *n))),
        );
    }

    #[test]
    fn backwards_and_current_always_allowed() {
        let snap = PipelineSnapshot::empty();
        assert!(can_advance_to(&snap, 7, 7));
        assert!(can_advance_to(&snap, 7, 2));
    }

    #[test]
    fn skipping_ahead_never_allowed() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Ideas, &[("approved", 1)]);
        assert!(!can_advance_to(&snap, 1, 3));
    }

    #[test]
    fn step_two_requires_an_approved_idea() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Ideas, &[("draft", 3)]);
        assert!(!can_advance_to(&snap, 1, 2));
        set(&mut snap, Ideas, &[("draft", 2), ("approved", 1)]);
        assert!(can_advance_to(&snap, 1, 2));
    }

    #[test]
    fn step_four_requires_all_three_collections() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Characters, &[("draft", 2)]);
        set(&mut snap, Locations, &[("draft", 1)]);
        assert!(!can_advance_to(&snap, 3, 4));
        set(&mut snap, EpisodeSummaries, &[("draft", 5)]);
        assert!(can_advance_to(&snap, 3, 4));
    }

    #[test]
    fn step_five_requires_full_structure_approval() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Characters, &[("approved", 2)]);
        set(&mut snap, Locations, &[("approved", 1), ("modified", 1)]);
        set(&mut snap, EpisodeSummaries, &[("approved", 5)]);
        assert!(!can_advance_to(&snap, 4, 5));
        set(&mut snap, Locations, &[("approved", 2)]);
        assert!(can_advance_to(&snap, 4, 5));
    }

    #[test]
    fn step_eight_requires_prompts_and_reference_coverage() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Characters, &[("approved", 2)]);
        set(&mut snap, Locations, &[("approved", 1)]);
        set(&mut snap, ImagePrompts, &[("generated", 4)]);
        // References missing entirely: coverage fails.
        assert!(!can_advance_to(&snap, 7, 8));
        set(&mut snap, CharacterRefs, &[("generated", 1), ("approved", 1)]);
        set(&mut snap, LocationRefs, &[("pending", 1)]);
        // A pending reference still blocks.
        assert!(!can_advance_to(&snap, 7, 8));
        set(&mut snap, LocationRefs, &[("generated", 1)]);
        assert!(can_advance_to(&snap, 7, 8));
    }

    #[test]
    fn step_eleven_requires_every_image_reviewed() {
        let mut snap = PipelineSnapshot::empty();
        set(
            &mut snap,
            GeneratedImages,
            &[("approved", 3), ("generated", 1)],
        );
        assert!(!can_advance_to(&snap, 10, 11));
        set(
            &mut snap,
            GeneratedImages,
            &[("approved", 3), ("rejected", 1)],
        );
        assert!(can_advance_to(&snap, 10, 11));
        // All rejected: reviewed, but nothing usable survived.
        set(&mut snap, GeneratedImages, &[("rejected", 4)]);
        assert!(!can_advance_to(&snap, 10, 11));
    }

    #[test]
    fn step_one_stats_count_the_idea_batch() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Ideas, &[("draft", 1)]);
        let stats = step_stats(&snap, 1, 20);
        assert_eq!(stats.items_total, IDEA_BATCH_SIZE);
        assert_eq!(stats.items_completed, 1);
        assert_eq!(stats.items_pending, 2);
        assert_eq!(stats.blocking_reason.as_deref(), Some("Generate ideas first"));
    }

    #[test]
    fn step_five_stats_track_episode_generation() {
        let mut snap = PipelineSnapshot::empty();
        set(
            &mut snap,
            Episodes,
            &[("generated", 3), ("approved", 2), ("pending", 15)],
        );
        let stats = step_stats(&snap, 5, 20);
        assert_eq!(stats.items_total, 20);
        assert_eq!(stats.items_completed, 5);
        assert_eq!(stats.items_pending, 15);
        assert_eq!(
            stats.blocking_reason.as_deref(),
            Some("Generate remaining 15 episodes")
        );
    }

    #[test]
    fn step_ten_stats_count_the_review_queue() {
        let mut snap = PipelineSnapshot::empty();
        set(
            &mut snap,
            GeneratedImages,
            &[("generated", 4), ("approved", 6)],
        );
        let stats = step_stats(&snap, 10, 20);
        assert_eq!(stats.items_total, 10);
        assert_eq!(stats.items_completed, 6);
        assert_eq!(stats.items_pending, 4);
    }

    #[test]
    fn unstated_steps_report_zeros() {
        let stats = step_stats(&PipelineSnapshot::empty(), 8, 20);
        assert_eq!(stats.items_total, 0);
        assert!(stats.blocking_reason.is_none());
    }

    #[test]
    fn progress_omits_reason_when_proceeding_is_allowed() {
        let mut snap = PipelineSnapshot::empty();
        set(&mut snap, Ideas, &[("draft", 2), ("approved", 1)]);
        let progress = step_progress(&snap, 1, 20);
        assert!(progress.can_proceed);
        assert!(progress.blocking_reason.is_none());
        assert_eq!(progress.step_name, "Generate Ideas");
        assert_eq!(progress.attention_count, 2);
    }

    #[test]
    fn progress_reports_reason_when_blocked() {
        let snap = PipelineSnapshot::empty();
        let progress = step_progress(&snap, 1, 20);
        assert!(!progress.can_proceed);
        assert_eq!(
            progress.blocking_reason.as_deref(),
            Some("Generate ideas first")
        );
    }

    #[test]
    fn final_step_can_always_proceed() {
        // Step 13 has no prerequisite; the route layer rejects it instead.
        let snap = PipelineSnapshot::empty();
        let progress = step_progress(&snap, TOTAL_STEPS, 20);
        assert!(progress.can_proceed);
    }
}
