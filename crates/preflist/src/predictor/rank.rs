//! Ordering, preference numbering, and the distribution summary.

use super::dataset::CutoffRecord;
use super::scoring::ChanceLabel;
use serde::Serialize;

/// A dataset row annotated with its admission probability, before ordering.
#[derive(Debug, Clone)]
pub struct ScoredRecord<'a> {
    pub record: &'a CutoffRecord,
    pub probability: u8,
}

/// One line of the final preference list. Serialized field names are the
/// dataset's column names, which the presentation layer shows as-is; the
/// optional code columns are omitted when the source lacks them.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceRow {
    #[serde(rename = "Preference")]
    pub preference: usize,
    #[serde(rename = "College code", skip_serializing_if = "Option::is_none")]
    pub college_code: Option<String>,
    #[serde(rename = "College name")]
    pub college_name: String,
    #[serde(rename = "Branch code", skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(rename = "Branch name")]
    pub branch_name: String,
    #[serde(rename = "Category code", skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    #[serde(rename = "Cutoff rank", skip_serializing_if = "Option::is_none")]
    pub cutoff_rank: Option<u32>,
    #[serde(rename = "Cutoff percentile")]
    pub cutoff_percentile: f64,
    #[serde(rename = "Admission Probability (%)")]
    pub probability: u8,
    #[serde(rename = "Admission Chances")]
    pub chances: &'static str,
}

/// Raw material for the probability histogram. Binning itself is a
/// presentation concern; the bin count travels with the values.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityHistogram {
    pub values: Vec<u8>,
    pub bins: usize,
}

impl ProbabilityHistogram {
    pub const BINS: usize = 20;

    fn new(values: Vec<u8>) -> Self {
        Self {
            values,
            bins: Self::BINS,
        }
    }
}

/// The ordered result of one prediction request.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceList {
    pub rows: Vec<PreferenceRow>,
    pub histogram: ProbabilityHistogram,
}

/// Probability spread over the returned rows.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityStats {
    pub mean: f64,
    pub median: f64,
    pub min: u8,
    pub max: u8,
}

/// Row counts per chance band, mirroring the tiers of
/// [`ChanceLabel`](super::scoring::ChanceLabel) down to "below Moderate".
#[derive(Debug, Clone, Copy, Default)]
pub struct ChanceBandCounts {
    pub very_high: usize,
    pub high: usize,
    pub good: usize,
    pub moderate: usize,
    pub low: usize,
}

impl PreferenceList {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            histogram: ProbabilityHistogram::new(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn probability_stats(&self) -> Option<ProbabilityStats> {
        if self.rows.is_empty() {
            return None;
        }

        let mut sorted: Vec<u8> = self.rows.iter().map(|row| row.probability).collect();
        sorted.sort_unstable();
        let sum: u64 = sorted.iter().map(|p| u64::from(*p)).sum();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
        } else {
            f64::from(sorted[mid])
        };

        Some(ProbabilityStats {
            mean: sum as f64 / sorted.len() as f64,
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }

    pub fn chance_band_counts(&self) -> ChanceBandCounts {
        let mut counts = ChanceBandCounts::default();
        for row in &self.rows {
            match row.probability {
                p if p >= 85 => counts.very_high += 1,
                p if p >= 70 => counts.high += 1,
                p if p >= 50 => counts.good += 1,
                p if p >= 30 => counts.moderate += 1,
                _ => counts.low += 1,
            }
        }
        counts
    }
}

/// Order the scored rows, assign preference numbers, and summarize the
/// probability distribution.
///
/// Rows below the minimum probability are dropped, the rest are sorted by
/// probability descending then cutoff rank ascending (the sort is stable, so
/// two-key ties keep the incoming relative order), and preferences run 1..N
/// over the survivors. Empty input is an empty list, never an error.
pub fn assemble(mut scored: Vec<ScoredRecord<'_>>, min_probability: f64) -> PreferenceList {
    scored.retain(|entry| f64::from(entry.probability) >= min_probability);
    scored.sort_by(|a, b| {
        b.probability
            .cmp(&a.probability)
            .then_with(|| a.record.cutoff_rank.cmp(&b.record.cutoff_rank))
    });

    let rows: Vec<PreferenceRow> = scored
        .into_iter()
        .enumerate()
        .map(|(index, entry)| PreferenceRow {
            preference: index + 1,
            college_code: entry.record.college_code.clone(),
            college_name: entry.record.college_name.clone(),
            branch_code: entry.record.branch_code.clone(),
            branch_name: entry.record.branch_name.clone(),
            category_code: entry.record.category_code.clone(),
            cutoff_rank: entry.record.cutoff_rank,
            cutoff_percentile: entry.record.cutoff_percentile,
            probability: entry.probability,
            chances: ChanceLabel::from_probability(entry.probability).label(),
        })
        .collect();

    let values = rows.iter().map(|row| row.probability).collect();
    PreferenceList {
        rows,
        histogram: ProbabilityHistogram::new(values),
    }
}

/// Shape of the filtered set relative to the student's rank, logged at debug
/// level before scoring. None when the set is empty.
#[derive(Debug, Clone, Copy)]
pub struct DistributionSnapshot {
    pub total_records: usize,
    pub min_cutoff: u32,
    pub max_cutoff: u32,
    pub median_cutoff: f64,
    pub mean_cutoff: f64,
    /// Cutoffs at or beyond the student's rank, i.e. seats the student
    /// plausibly clears.
    pub at_or_beyond_rank: usize,
    pub better_than_rank: usize,
}

pub fn distribution(records: &[&CutoffRecord], student_rank: u32) -> Option<DistributionSnapshot> {
    let mut cutoffs: Vec<u32> = records
        .iter()
        .filter_map(|record| record.cutoff_rank)
        .collect();
    if cutoffs.is_empty() {
        return None;
    }

    cutoffs.sort_unstable();
    let sum: u64 = cutoffs.iter().map(|rank| u64::from(*rank)).sum();
    let mid = cutoffs.len() / 2;
    let median = if cutoffs.len() % 2 == 0 {
        (f64::from(cutoffs[mid - 1]) + f64::from(cutoffs[mid])) / 2.0
    } else {
        f64::from(cutoffs[mid])
    };
    let at_or_beyond = cutoffs.iter().filter(|rank| **rank >= student_rank).count();

    Some(DistributionSnapshot {
        total_records: records.len(),
        min_cutoff: cutoffs[0],
        max_cutoff: cutoffs[cutoffs.len() - 1],
        median_cutoff: median,
        mean_cutoff: sum as f64 / cutoffs.len() as f64,
        at_or_beyond_rank: at_or_beyond,
        better_than_rank: cutoffs.len() - at_or_beyond,
    })
}
