//! The filter -> score -> rank pipeline over the cutoff dataset.

pub mod criteria;
pub mod dataset;
pub mod filter;
pub mod rank;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use criteria::{RequestCriteria, SearchWindow, ValidationError, WILDCARD};
pub use dataset::{
    records_from_reader, CachedCsvSource, CsvFileSource, CutoffRecord, DatasetError,
    DatasetSource, UnknownRankPolicy,
};
pub use rank::{PreferenceList, PreferenceRow, ProbabilityHistogram, ScoredRecord};
pub use scoring::{ChanceLabel, FixedDeltaModel, ProbabilityModel};
pub use service::{DatasetStatistics, PredictError, PreferenceService};
