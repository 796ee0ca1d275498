use super::common::*;
use std::io::Cursor;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::predictor::dataset::{
    records_from_reader, CachedCsvSource, CsvFileSource, DatasetError, DatasetSource,
    UnknownRankPolicy,
};
use crate::predictor::filter;

#[test]
fn drop_policy_removes_unparsable_ranks_at_load() {
    let records = records(UnknownRankPolicy::DropAtLoad);
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|record| record.cutoff_rank.is_some()));
}

#[test]
fn retain_policy_keeps_unparsable_ranks_as_none() {
    let records = records(UnknownRankPolicy::RetainUntilFilter);
    assert_eq!(records.len(), 7);

    let unknown = records
        .iter()
        .find(|record| record.college_code.as_deref() == Some("06004"))
        .expect("unknown-rank row retained");
    assert_eq!(unknown.cutoff_rank, None);
    assert_eq!(unknown.cutoff_percentile, 94.20);
}

#[test]
fn both_policies_produce_the_same_filtered_set() {
    let dropped = records(UnknownRankPolicy::DropAtLoad);
    let retained = records(UnknownRankPolicy::RetainUntilFilter);
    let criteria = criteria(10_000);

    let from_dropped: Vec<_> = filter::apply(&dropped, &criteria)
        .into_iter()
        .cloned()
        .collect();
    let from_retained: Vec<_> = filter::apply(&retained, &criteria)
        .into_iter()
        .cloned()
        .collect();

    assert_eq!(from_dropped, from_retained);
}

#[test]
fn text_columns_are_trimmed_and_round_stays_text() {
    let records = records(UnknownRankPolicy::DropAtLoad);
    let first = &records[0];
    assert_eq!(first.college_name, "Government College of Engineering Pune");
    assert_eq!(first.branch_name, "Computer Engineering");
    assert_eq!(first.round, "1");

    let second_round = records
        .iter()
        .find(|record| record.college_code.as_deref() == Some("03013"))
        .expect("round 2 row present");
    assert_eq!(second_round.round, "2");
}

#[test]
fn float_form_ranks_and_missing_percentiles_are_coerced() {
    let records = records(UnknownRankPolicy::DropAtLoad);

    let float_rank = records
        .iter()
        .find(|record| record.branch_name == "Mechanical Engineering")
        .expect("float-rank row present");
    assert_eq!(float_rank.cutoff_rank, Some(12_500));

    let missing_percentile = records
        .iter()
        .find(|record| record.college_code.as_deref() == Some("03013"))
        .expect("row with empty percentile");
    assert_eq!(missing_percentile.cutoff_percentile, 0.0);
}

#[test]
fn header_only_input_yields_no_records() {
    let header = DATASET_CSV.lines().next().expect("header line");
    let records = records_from_reader(
        Cursor::new(format!("{header}\n")),
        UnknownRankPolicy::DropAtLoad,
    )
    .expect("parses");
    assert!(records.is_empty());
}

#[test]
fn file_source_reports_missing_files_as_io_errors() {
    let source = CsvFileSource::new("./does-not-exist.csv", UnknownRankPolicy::DropAtLoad);
    let error = source.load().expect_err("expected io error");
    assert!(matches!(error, DatasetError::Io(_)));
}

#[test]
fn cached_source_reuses_rows_until_the_file_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cutoffs.csv");
    std::fs::write(&path, DATASET_CSV).expect("write fixture");

    let source = CachedCsvSource::new(&path, UnknownRankPolicy::DropAtLoad);
    let first = source.load().expect("first load");
    let second = source.load().expect("second load");
    assert!(Arc::ptr_eq(&first, &second), "unchanged mtime serves cache");

    // Truncate to the header and push the mtime forward so the change is
    // visible regardless of filesystem timestamp granularity.
    let mut file = std::fs::File::create(&path).expect("rewrite fixture");
    writeln!(file, "{}", DATASET_CSV.lines().next().expect("header")).expect("write header");
    file.set_modified(SystemTime::now() + Duration::from_secs(5))
        .expect("bump mtime");
    drop(file);

    let third = source.load().expect("reload after change");
    assert!(third.is_empty(), "changed file is re-read");
}
