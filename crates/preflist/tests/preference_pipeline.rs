//! End-to-end specifications for the preference pipeline through the public
//! crate surface: a CSV file on disk, a file-backed source, and the service
//! facade, without reaching into private modules.

mod common {
    use std::path::PathBuf;
    use std::sync::Arc;

    use preflist::predictor::{
        CsvFileSource, PreferenceService, RequestCriteria, SearchWindow, UnknownRankPolicy,
        WILDCARD,
    };
    use tempfile::TempDir;

    pub(crate) const DATASET_CSV: &str = "\
College code,College name,Branch code,Branch name,Category code,Quota,Category,Seat Type,Round,Cutoff rank,Cutoff percentile
01001,Government College of Engineering Pune,0100119110,Computer Engineering,GOPENS,General,Open,State Level,1,1800,99.12
01001,Government College of Engineering Pune,0100129310,Mechanical Engineering,GOPENS,General,Open,State Level,1,1100,97.40
02005,Veermata Jijabai Technological Institute,0200524210,Information Technology,LOPENS,Ladies,Open,Home University,1,900,98.55
03013,College of Engineering Karad,0301326310,Civil Engineering,GSCS,General,SC,State Level,1,200,91.30
05007,Pune Institute of Computer Technology,0500719110,Computer Engineering,GOPENS,General,Open,State Level,2,1350,96.80
06004,Shri Guru Gobind Singhji Institute,0600424610,Information Technology,GOPENS,General,Open,State Level,1,unknown,94.20
";

    pub(crate) fn dataset_dir() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("MHTCET_cutoff2024.csv");
        std::fs::write(&path, DATASET_CSV).expect("write dataset");
        (dir, path)
    }

    pub(crate) fn file_service() -> (TempDir, PreferenceService<CsvFileSource>) {
        let (dir, path) = dataset_dir();
        let source = CsvFileSource::new(path, UnknownRankPolicy::DropAtLoad);
        (dir, PreferenceService::new(Arc::new(source)))
    }

    pub(crate) fn criteria(student_rank: u32) -> RequestCriteria {
        RequestCriteria {
            student_rank,
            quota: WILDCARD.to_string(),
            category: WILDCARD.to_string(),
            seat_type: WILDCARD.to_string(),
            round: "1".to_string(),
            min_probability: 0.0,
            window: SearchWindow::new(1_000, 3_000),
        }
    }
}

mod generation {
    use super::common::*;

    #[test]
    fn scores_and_orders_the_round_one_window() {
        let (_dir, service) = file_service();
        let list = service.generate(&criteria(1_000)).expect("generates");

        // Round 1, window [1, 4000]: cutoffs 1800, 1100, 900, 200.
        let rows: Vec<(usize, Option<u32>, u8, &str)> = list
            .rows
            .iter()
            .map(|row| (row.preference, row.cutoff_rank, row.probability, row.chances))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, Some(1_800), 95, "Very High Chance"),
                (2, Some(1_100), 80, "High Chance"),
                (3, Some(900), 60, "Good Chance"),
                (4, Some(200), 0, "No Chance"),
            ]
        );
        assert_eq!(list.histogram.values, vec![95, 80, 60, 0]);
        assert_eq!(list.histogram.bins, 20);
    }

    #[test]
    fn no_round_match_returns_an_empty_list_with_an_empty_histogram() {
        let (_dir, service) = file_service();
        let mut unmatched = criteria(1_000);
        unmatched.round = "3".to_string();

        let list = service.generate(&unmatched).expect("empty success");
        assert!(list.is_empty());
        assert!(list.histogram.values.is_empty());
        assert_eq!(list.histogram.bins, 20);
    }

    #[test]
    fn probability_threshold_prunes_the_tail() {
        let (_dir, service) = file_service();
        let mut demanding = criteria(1_000);
        demanding.min_probability = 70.0;

        let list = service.generate(&demanding).expect("generates");
        assert_eq!(list.rows.len(), 2);
        assert_eq!(
            list.rows.last().map(|row| row.preference),
            Some(2),
            "preferences stay gapless after pruning"
        );
    }

    #[test]
    fn validation_failures_carry_the_presentation_message() {
        let (_dir, service) = file_service();
        let mut invalid = criteria(1_000);
        invalid.student_rank = 300_000;

        let error = service.generate(&invalid).expect_err("rejected");
        assert_eq!(
            error.to_string(),
            "MHTCET rank seems too high. Please check your rank."
        );
    }

    #[test]
    fn missing_dataset_fails_generation_but_not_branch_listing() {
        use preflist::predictor::{CsvFileSource, PreferenceService, UnknownRankPolicy};
        use std::sync::Arc;

        let source = CsvFileSource::new("./missing.csv", UnknownRankPolicy::DropAtLoad);
        let service = PreferenceService::new(Arc::new(source));

        assert!(service.generate(&criteria(1_000)).is_err());
        assert_eq!(service.unique_branches(), vec!["All".to_string()]);
        assert!(!service.healthy());
    }
}

mod dataset_access {
    use super::common::*;
    use std::sync::Arc;

    use preflist::predictor::{CachedCsvSource, DatasetSource, PreferenceService, UnknownRankPolicy};

    #[test]
    fn branches_lead_with_the_wildcard() {
        let (_dir, service) = file_service();
        let branches = service.unique_branches();
        assert_eq!(branches[0], "All");
        assert!(branches.contains(&"Computer Engineering".to_string()));
        let mut sorted = branches[1..].to_vec();
        sorted.sort();
        assert_eq!(branches[1..], sorted[..]);
    }

    #[test]
    fn statistics_reflect_the_cleaning_policy() {
        let (_dir, service) = file_service();
        let stats = service.statistics().expect("stats");
        // The unknown-rank row is dropped at load.
        assert_eq!(stats.total_entries, 5);
        assert_eq!(stats.rounds, vec!["1", "2"]);
    }

    #[test]
    fn cached_source_serves_one_shared_copy() {
        let (_dir, path) = dataset_dir();
        let source = Arc::new(CachedCsvSource::new(&path, UnknownRankPolicy::DropAtLoad));

        let first = source.load().expect("first load");
        let second = source.load().expect("second load");
        assert!(Arc::ptr_eq(&first, &second));

        let service = PreferenceService::new(source);
        let list = service.generate(&criteria(1_000)).expect("generates");
        assert_eq!(list.rows.len(), 4);
    }
}
