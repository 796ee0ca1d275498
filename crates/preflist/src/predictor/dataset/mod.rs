//! Loading and cleaning of the cutoff CSV.
//!
//! The dataset is logically immutable for the lifetime of the process. The
//! default source re-reads and re-cleans the file on every call, so there is
//! no shared mutable state; the cached source is an explicit opt-in keyed by
//! the file's modification time.

mod parser;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// One row of the source dataset after cleaning.
///
/// `cutoff_rank` is `None` when the source value was unparsable; such rows
/// carry no usable cutoff data, are excluded from rank-window filtering, and
/// score a zero admission probability.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoffRecord {
    pub college_code: Option<String>,
    pub college_name: String,
    pub branch_code: Option<String>,
    pub branch_name: String,
    pub category_code: Option<String>,
    pub quota: String,
    pub category: String,
    pub seat_type: String,
    pub round: String,
    pub cutoff_rank: Option<u32>,
    pub cutoff_percentile: f64,
}

/// What to do with rows whose cutoff rank could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownRankPolicy {
    /// Remove the rows while loading (the historical pipeline behavior).
    #[default]
    DropAtLoad,
    /// Keep the rows; the range filter excludes them later.
    RetainUntilFilter,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read cutoff dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid cutoff CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Provider of the cleaned dataset; implementations decide caching.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<Arc<Vec<CutoffRecord>>, DatasetError>;
}

/// Parse and clean cutoff records from any reader. Used by the file sources
/// and directly by tests that embed CSV fixtures in memory.
pub fn records_from_reader<R: Read>(
    reader: R,
    policy: UnknownRankPolicy,
) -> Result<Vec<CutoffRecord>, DatasetError> {
    Ok(parser::parse_records(reader, policy)?)
}

/// Source that re-reads and re-cleans the CSV file on every call.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    policy: UnknownRankPolicy,
}

impl CsvFileSource {
    pub fn new<P: AsRef<Path>>(path: P, policy: UnknownRankPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<CutoffRecord>, DatasetError> {
        let file = File::open(&self.path)?;
        let records = parser::parse_records(file, self.policy)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = records.len(),
            "cutoff dataset loaded"
        );
        Ok(records)
    }
}

impl DatasetSource for CsvFileSource {
    fn load(&self) -> Result<Arc<Vec<CutoffRecord>>, DatasetError> {
        Ok(Arc::new(self.read()?))
    }
}

/// Source that memoizes the cleaned rows keyed by the file's modification
/// time. A changed mtime forces a re-read, so a stale copy is never served.
pub struct CachedCsvSource {
    inner: CsvFileSource,
    cache: Mutex<Option<(SystemTime, Arc<Vec<CutoffRecord>>)>>,
}

impl CachedCsvSource {
    pub fn new<P: AsRef<Path>>(path: P, policy: UnknownRankPolicy) -> Self {
        Self {
            inner: CsvFileSource::new(path, policy),
            cache: Mutex::new(None),
        }
    }
}

impl DatasetSource for CachedCsvSource {
    fn load(&self) -> Result<Arc<Vec<CutoffRecord>>, DatasetError> {
        let modified = std::fs::metadata(self.inner.path())?.modified()?;

        let mut guard = self.cache.lock().expect("dataset cache mutex poisoned");
        if let Some((cached_at, records)) = guard.as_ref() {
            if *cached_at == modified {
                return Ok(Arc::clone(records));
            }
        }

        let records = Arc::new(self.inner.read()?);
        *guard = Some((modified, Arc::clone(&records)));
        Ok(records)
    }
}
