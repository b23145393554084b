//! Training progress rules: the per-module status may only move forward
//! through not_started -> in_progress -> completed, and completion scores
//! are drawn uniformly from [70, 100].

use crate::schema::{TrainingProgress, TrainingStatus};
use rand::Rng;

pub const MIN_SCORE: u32 = 70;
pub const MAX_SCORE: u32 = 100;

fn rank(status: TrainingStatus) -> u8 {
    match status {
        TrainingStatus::NotStarted => 0,
        TrainingStatus::InProgress => 1,
        TrainingStatus::Completed => 2,
    }
}

/// A transition is legal when it moves exactly one step forward.
pub fn can_transition(from: TrainingStatus, to: TrainingStatus) -> bool {
    rank(to) == rank(from) + 1
}

pub fn completion_score(rng: &mut impl Rng) -> u32 {
    rng.random_range(MIN_SCORE..=MAX_SCORE)
}

/// Status of a module for a user, defaulting to not_started when no
/// progress row exists yet.
pub fn status_for<'a>(
    progress: &'a [TrainingProgress],
    module_id: &str,
) -> (TrainingStatus, Option<&'a TrainingProgress>) {
    match progress.iter().find(|p| p.module_id == module_id) {
        Some(row) => (row.status, Some(row)),
        None => (TrainingStatus::NotStarted, None),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
}

impl ProgressSummary {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn summarize(progress: &[TrainingProgress], total_modules: usize) -> ProgressSummary {
    ProgressSummary {
        completed: progress
            .iter()
            .filter(|p| p.status == TrainingStatus::Completed)
            .count(),
        total: total_modules,
    }
}
