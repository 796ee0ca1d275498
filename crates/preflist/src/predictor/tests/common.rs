use std::io::Cursor;
use std::sync::Arc;

use crate::predictor::criteria::{RequestCriteria, SearchWindow, WILDCARD};
use crate::predictor::dataset::{
    records_from_reader, CutoffRecord, DatasetError, DatasetSource, UnknownRankPolicy,
};

/// Fixture exercising every cleaning rule: whitespace padding, a float-form
/// rank, an unparsable rank, a missing percentile, and a second round.
pub(super) const DATASET_CSV: &str = "\
College code,College name,Branch code,Branch name,Category code,Quota,Category,Seat Type,Round,Cutoff rank,Cutoff percentile
01001,  Government College of Engineering Pune ,0100119110, Computer Engineering ,GOPENS,General,Open,State Level,1,9500,99.12
01001,Government College of Engineering Pune,0100129310,Mechanical Engineering,GOPENS,General,Open,State Level,1,12500.0,97.40
02005,Veermata Jijabai Technological Institute,0200524210,Information Technology,LOPENS,Ladies,Open,Home University,1,10200,98.55
03013,College of Engineering Karad,0301326310,Civil Engineering,GSCS,General,SC,State Level,2,9800,
04020,Walchand College of Engineering,0402029810,Electronics and Telecommunication,GOBCS,General,OBC,State Level,1,8400,99.01
05007,Pune Institute of Computer Technology,0500719110,Computer Engineering,GOPENS,General,Open,State Level,1,13800,95.00
06004,Shri Guru Gobind Singhji Institute,0600424610,Information Technology,GOPENS,General,Open,State Level,1,NA,94.20
";

pub(super) fn records(policy: UnknownRankPolicy) -> Vec<CutoffRecord> {
    records_from_reader(Cursor::new(DATASET_CSV), policy).expect("fixture parses")
}

pub(super) fn criteria(student_rank: u32) -> RequestCriteria {
    RequestCriteria {
        student_rank,
        quota: WILDCARD.to_string(),
        category: WILDCARD.to_string(),
        seat_type: WILDCARD.to_string(),
        round: "1".to_string(),
        min_probability: 0.0,
        window: SearchWindow::default(),
    }
}

/// In-memory source so service tests run without touching the filesystem.
pub(super) struct StubSource {
    records: Arc<Vec<CutoffRecord>>,
}

impl StubSource {
    pub(super) fn from_fixture(policy: UnknownRankPolicy) -> Self {
        Self {
            records: Arc::new(records(policy)),
        }
    }
}

impl DatasetSource for StubSource {
    fn load(&self) -> Result<Arc<Vec<CutoffRecord>>, DatasetError> {
        Ok(Arc::clone(&self.records))
    }
}

/// Source whose dataset is never available.
pub(super) struct FailingSource;

impl DatasetSource for FailingSource {
    fn load(&self) -> Result<Arc<Vec<CutoffRecord>>, DatasetError> {
        Err(DatasetError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "dataset missing",
        )))
    }
}
