//! Admission-probability heuristic and its qualitative interpretation.

use super::dataset::CutoffRecord;

/// Swappable probability heuristic. The pipeline only ever sees this seam,
/// so an alternative tier table can be validated without touching it.
pub trait ProbabilityModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Map a student rank and a row's cutoff rank to a probability
    /// percentage. Total: rows without usable cutoff data score 0.
    fn probability(&self, student_rank: u32, cutoff_rank: Option<u32>) -> u8;

    fn score_record(&self, student_rank: u32, record: &CutoffRecord) -> u8 {
        self.probability(student_rank, record.cutoff_rank)
    }
}

/// The canonical heuristic: a monotone step function of the signed gap
/// between the student's rank and the cutoff rank, in absolute rank deltas.
/// The breakpoints and returned values are a contract with the presentation
/// layer; do not adjust them independently of [`ChanceLabel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDeltaModel;

impl ProbabilityModel for FixedDeltaModel {
    fn name(&self) -> &'static str {
        "fixed-delta"
    }

    fn probability(&self, student_rank: u32, cutoff_rank: Option<u32>) -> u8 {
        let cutoff = match cutoff_rank {
            Some(rank) if rank > 0 => rank,
            _ => return 0,
        };

        let diff = i64::from(student_rank) - i64::from(cutoff);
        if diff <= 0 {
            // Student rank is numerically better than or equal to the cutoff.
            match -diff {
                margin if margin >= 800 => 95,
                margin if margin >= 500 => 90,
                margin if margin >= 300 => 85,
                margin if margin >= 100 => 80,
                _ => 75,
            }
        } else {
            match diff {
                gap if gap <= 200 => 60,
                gap if gap <= 500 => 45,
                gap if gap <= 1000 => 30,
                gap if gap <= 1500 => 20,
                gap if gap <= 2000 => 10,
                gap if gap <= 3000 => 5,
                _ => 0,
            }
        }
    }
}

/// Qualitative reading of a probability percentage. Tiers are inclusive on
/// their lower bound and evaluated top-down, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanceLabel {
    VeryHigh,
    High,
    Good,
    Moderate,
    Low,
    VeryLow,
    NoChance,
}

impl ChanceLabel {
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            p if p >= 85 => Self::VeryHigh,
            p if p >= 70 => Self::High,
            p if p >= 50 => Self::Good,
            p if p >= 30 => Self::Moderate,
            p if p >= 15 => Self::Low,
            p if p > 0 => Self::VeryLow,
            _ => Self::NoChance,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High Chance",
            Self::High => "High Chance",
            Self::Good => "Good Chance",
            Self::Moderate => "Moderate Chance",
            Self::Low => "Low Chance",
            Self::VeryLow => "Very Low Chance",
            Self::NoChance => "No Chance",
        }
    }
}
