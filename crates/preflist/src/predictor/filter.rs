//! Conjunctive narrowing of the dataset by criteria and rank window.

use super::criteria::{RequestCriteria, SearchWindow, WILDCARD};
use super::dataset::CutoffRecord;
use tracing::debug;

/// The admissible cutoff-rank window for a student: clamped to 1 on the low
/// side, saturating on the high side.
pub fn window_bounds(student_rank: u32, window: SearchWindow) -> (u32, u32) {
    let min_cutoff = student_rank.saturating_sub(window.below).max(1);
    let max_cutoff = student_rank.saturating_add(window.above);
    (min_cutoff, max_cutoff)
}

/// Apply the categorical filters and the rank window, in a fixed pass order
/// so the per-stage survivor counts in the logs stay comparable. An empty
/// output is a valid result, not an error.
pub fn apply<'a>(records: &'a [CutoffRecord], criteria: &RequestCriteria) -> Vec<&'a CutoffRecord> {
    let mut remaining: Vec<&CutoffRecord> = records.iter().collect();
    debug!(rows = remaining.len(), "initial dataset size");

    if criteria.quota != WILDCARD {
        remaining.retain(|record| record.quota == criteria.quota);
        debug!(quota = %criteria.quota, rows = remaining.len(), "after quota filter");
    }

    if criteria.category != WILDCARD {
        remaining.retain(|record| record.category == criteria.category);
        debug!(category = %criteria.category, rows = remaining.len(), "after category filter");
    }

    if criteria.seat_type != WILDCARD {
        remaining.retain(|record| record.seat_type == criteria.seat_type);
        debug!(seat_type = %criteria.seat_type, rows = remaining.len(), "after seat type filter");
    }

    // The round is mandatory and always compared as text, so a round of
    // "01" never silently matches "1".
    remaining.retain(|record| record.round == criteria.round);
    debug!(round = %criteria.round, rows = remaining.len(), "after round filter");

    let (min_cutoff, max_cutoff) = window_bounds(criteria.student_rank, criteria.window);
    remaining.retain(|record| {
        record
            .cutoff_rank
            .is_some_and(|rank| min_cutoff <= rank && rank <= max_cutoff)
    });
    debug!(
        min_cutoff,
        max_cutoff,
        rows = remaining.len(),
        "after rank window filter"
    );

    remaining
}
