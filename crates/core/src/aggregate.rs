//! Badge-count aggregation and progress math over pipeline snapshots.
//!
//! Every function here is a pure, total read of its snapshot: missing
//! entity types contribute zero, unknown states are never consulted, and
//! nothing is cached between calls.

use serde::Serialize;

use crate::snapshot::PipelineSnapshot;
use crate::steps::{attention_sources, step_name, StepNumber, Tab, TOTAL_STEPS};

/// The number of entities needing attention at a pipeline step.
///
/// Steps without an attention-table entry (including 2 and 3, and anything
/// outside 1..=12) count zero.
pub fn attention_count(step: StepNumber, snapshot: &PipelineSnapshot) -> i64 {
    attention_sources(step)
        .iter()
        .map(|(entity, states)| {
            states
                .iter()
                .map(|state| snapshot.count(*entity, *state))
                .sum::<i64>()
        })
        .sum()
}

/// The badge count for a tab: the sum over its member steps.
pub fn tab_attention_count(tab: Tab, snapshot: &PipelineSnapshot) -> i64 {
    tab.steps()
        .iter()
        .map(|step| attention_count(*step, snapshot))
        .sum()
}

/// Badge count for one step, with its display name.
#[derive(Debug, Clone, Serialize)]
pub struct StepBadge {
    pub step: StepNumber,
    pub name: &'static str,
    pub count: i64,
}

/// Badge count for one tab.
#[derive(Debug, Clone, Serialize)]
pub struct TabBadge {
    pub tab: Tab,
    pub count: i64,
}

/// Display-ready badge counts for all steps and tabs.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeSummary {
    pub steps: Vec<StepBadge>,
    pub tabs: Vec<TabBadge>,
}

/// Compute every step and tab badge for a snapshot.
pub fn badge_summary(snapshot: &PipelineSnapshot) -> BadgeSummary {
    let steps = (1..=TOTAL_STEPS)
        .map(|step| StepBadge {
            step,
            name: step_name(step).unwrap_or(""),
            count: attention_count(step, snapshot),
        })
        .collect();
    let tabs = Tab::ALL
        .iter()
        .map(|tab| TabBadge {
            tab: *tab,
            count: tab_attention_count(*tab, snapshot),
        })
        .collect();
    BadgeSummary { steps, tabs }
}

/// The fraction of the pipeline completed, for progress-bar rendering.
///
/// `current_step` comes from the project record; it is never inferred from
/// state counts. The result is clamped to `[0, 1]`.
pub fn step_progress_fraction(current_step: StepNumber, total_steps: StepNumber) -> f64 {
    if total_steps <= 0 {
        return 0.0;
    }
    (f64::from(current_step) / f64::from(total_steps)).clamp(0.0, 1.0)
}
