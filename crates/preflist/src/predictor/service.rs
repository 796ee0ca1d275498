//! Orchestration of the filter -> score -> rank pipeline.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::criteria::{RequestCriteria, ValidationError, WILDCARD};
use super::dataset::{DatasetError, DatasetSource};
use super::filter;
use super::rank::{assemble, distribution, PreferenceList, ScoredRecord};
use super::scoring::{FixedDeltaModel, ProbabilityModel};

/// Service tying a dataset source to a probability model. Holds no request
/// state; each call re-runs the whole pipeline over a freshly loaded (or
/// cache-validated) dataset.
pub struct PreferenceService<S> {
    source: Arc<S>,
    model: Arc<dyn ProbabilityModel>,
}

impl<S> PreferenceService<S>
where
    S: DatasetSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self::with_model(source, Arc::new(FixedDeltaModel))
    }

    pub fn with_model(source: Arc<S>, model: Arc<dyn ProbabilityModel>) -> Self {
        Self { source, model }
    }

    /// Generate the ordered preference list for one request.
    ///
    /// "No matching colleges" is an empty success; the only failures are
    /// invalid criteria and an unreadable dataset.
    pub fn generate(&self, criteria: &RequestCriteria) -> Result<PreferenceList, PredictError> {
        criteria.validate()?;

        info!(
            student_rank = criteria.student_rank,
            quota = %criteria.quota,
            category = %criteria.category,
            seat_type = %criteria.seat_type,
            round = %criteria.round,
            below = criteria.window.below,
            above = criteria.window.above,
            model = self.model.name(),
            "generating preference list"
        );

        let records = self.source.load()?;
        let filtered = filter::apply(&records, criteria);

        if let Some(snapshot) = distribution(&filtered, criteria.student_rank) {
            debug!(?snapshot, "filtered set distribution");
        }

        let scored: Vec<ScoredRecord<'_>> = filtered
            .into_iter()
            .map(|record| ScoredRecord {
                probability: self.model.score_record(criteria.student_rank, record),
                record,
            })
            .collect();

        let list = assemble(scored, criteria.min_probability);

        if let Some(stats) = list.probability_stats() {
            let bands = list.chance_band_counts();
            debug!(
                mean = stats.mean,
                median = stats.median,
                min = stats.min,
                max = stats.max,
                very_high = bands.very_high,
                high = bands.high,
                good = bands.good,
                moderate = bands.moderate,
                low = bands.low,
                "probability distribution of results"
            );
        }
        info!(results = list.rows.len(), "preference list generated");

        Ok(list)
    }

    /// Distinct branch names with a leading wildcard. An unreadable dataset
    /// degrades to just the wildcard rather than failing the caller.
    pub fn unique_branches(&self) -> Vec<String> {
        let mut branches = vec![WILDCARD.to_string()];
        match self.source.load() {
            Ok(records) => {
                let distinct: BTreeSet<&str> = records
                    .iter()
                    .map(|record| record.branch_name.as_str())
                    .filter(|name| !name.is_empty())
                    .collect();
                branches.extend(distinct.into_iter().map(str::to_string));
            }
            Err(err) => {
                warn!(error = %err, "could not load dataset for branch listing");
            }
        }
        branches
    }

    /// Summary counts over the cleaned dataset.
    pub fn statistics(&self) -> Result<DatasetStatistics, PredictError> {
        let records = self.source.load()?;

        let mut colleges = BTreeSet::new();
        let mut branches = BTreeSet::new();
        let mut quotas = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut seat_types = BTreeSet::new();
        let mut rounds = BTreeSet::new();
        for record in records.iter() {
            colleges.insert(record.college_name.as_str());
            branches.insert(record.branch_name.as_str());
            quotas.insert(record.quota.clone());
            categories.insert(record.category.clone());
            seat_types.insert(record.seat_type.clone());
            rounds.insert(record.round.clone());
        }

        Ok(DatasetStatistics {
            total_entries: records.len(),
            unique_colleges: colleges.len(),
            unique_branches: branches.len(),
            quotas: quotas.into_iter().collect(),
            categories: categories.into_iter().collect(),
            seat_types: seat_types.into_iter().collect(),
            rounds: rounds.into_iter().collect(),
        })
    }

    /// Whether the dataset is currently readable, for the health endpoint.
    pub fn healthy(&self) -> bool {
        self.source.load().is_ok()
    }
}

/// Summary of the cleaned dataset exposed at the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatistics {
    pub total_entries: usize,
    pub unique_colleges: usize,
    pub unique_branches: usize,
    pub quotas: Vec<String>,
    pub categories: Vec<String>,
    pub seat_types: Vec<String>,
    pub rounds: Vec<String>,
}

/// Error raised by the preference service.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
