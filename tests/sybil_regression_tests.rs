#[cfg(test)]
mod sybil_regression_tests {
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    use repsim::analysis::aggregate::{aggregate_results, format_results_log, RESULTS_FILE};
    use repsim::analysis::{measure_attack, write_results_csv, EvaluationParams};
    use repsim::attack::inject_into;
    use repsim::config_loader::load_config;
    use repsim::ledger::{self, Transaction};
    use repsim::orchestrator::run_experiment;
    use repsim::rank::Algorithm;
    use repsim::ReputationError;

    /// Ten identities trading with every other one over three rounds;
    /// larger ids move larger amounts
    fn dense_log() -> String {
        let mut content = String::new();
        let mut seq = 1;
        for _round in 0..3 {
            for i in 0..10 {
                for j in (i + 1)..10 {
                    content.push_str(&format!("i{},i{},{},{}\n", i, j, (i + 1) * (j + 1), seq));
                    seq += 1;
                }
            }
        }
        content
    }

    fn write_log(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn dense_transactions() -> Vec<Transaction> {
        let file = write_log(&dense_log());
        ledger::load(file.path()).unwrap()
    }

    #[test]
    fn test_malformed_log_is_rejected() {
        let file = write_log("a,b,1.0,1\nb,c,not-a-number,2\n");
        let err = ledger::load(file.path()).unwrap_err();
        assert!(matches!(err, ReputationError::DataFormat { line: 2, .. }));
    }

    #[test]
    fn test_missing_log_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        let err = ledger::load(&path).unwrap_err();
        assert!(matches!(err, ReputationError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn test_temporal_ranking_resists_sybil_region() {
        let transactions = dense_transactions();
        assert_eq!(transactions.len(), 135);

        let compromised = vec!["i0".to_string()];
        let attack = inject_into(&transactions, &compromised, 50, 1_000_000.0).unwrap();
        assert_eq!(attack.fabricated_count(transactions.len()), 50);

        let params = EvaluationParams::default();
        let global = measure_attack("i9", &transactions, &attack, &params, Algorithm::PageRank).unwrap();
        let temporal =
            measure_attack("i9", &transactions, &attack, &params, Algorithm::TemporalPageRank).unwrap();

        // The weakest identity jumps to the top of the global ranking
        assert_eq!(global.outcomes[0].original_rank, 10);
        assert_eq!(global.outcomes[0].new_rank, 1);
        assert!(global.rank_ratio > 1.0);

        assert!((temporal.rank_ratio - 1.0).abs() < (global.rank_ratio - 1.0).abs());
    }

    #[test]
    fn test_empty_region_is_neutral() {
        let transactions = dense_transactions();
        let attack = inject_into(&transactions, &["i3".to_string()], 0, 1_000_000.0).unwrap();

        for algorithm in Algorithm::ALL {
            let report =
                measure_attack("i5", &transactions, &attack, &EvaluationParams::default(), algorithm).unwrap();
            assert!((report.rank_ratio - 1.0).abs() < 1e-12, "{}", algorithm);
            assert!((report.value_ratio - 1.0).abs() < 1e-12, "{}", algorithm);
        }
    }

    #[test]
    fn test_experiment_from_files() {
        let log = write_log(&dense_log());
        let mut config_file = NamedTempFile::new().unwrap();
        config_file
            .write_all(
                br#"
attack:
  num_compromised: 2
  region_size: 10
experiment:
  seed_identity_sample_size: 3
  rng_seed: 42
"#,
            )
            .unwrap();

        let config = load_config(config_file.path()).unwrap();
        let transactions = ledger::load(log.path()).unwrap();
        let outcome = run_experiment(&transactions, &config).unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.records.len(), 9);

        let out_dir = TempDir::new().unwrap();
        let results = out_dir.path().join(RESULTS_FILE);
        write_results_csv(&outcome.records, &results).unwrap();
        assert_eq!(fs::read_to_string(&results).unwrap().lines().count(), 9);
    }

    #[test]
    fn test_aggregate_experiment_tree() {
        let transactions = dense_transactions();
        let root = TempDir::new().unwrap();

        let mut config = repsim::config::Config::default();
        config.attack.num_compromised = 1;
        config.attack.region_size = 5;
        config.experiment.seed_identity_sample_size = 2;

        for (peer, rng_seed) in [("peer1", 1u64), ("peer2", 2u64)] {
            config.experiment.rng_seed = rng_seed;
            let outcome = run_experiment(&transactions, &config).unwrap();
            let dir = root.path().join(peer);
            fs::create_dir_all(&dir).unwrap();
            write_results_csv(&outcome.records, &dir.join(RESULTS_FILE)).unwrap();
        }

        let averages = aggregate_results(root.path()).unwrap();
        assert_eq!(averages.len(), 3);
        assert!(averages.iter().all(|avg| avg.samples == 4));

        let log = format_results_log(5, &averages);
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("5,"));
        assert!(lines[0].ends_with(",PageRank"));
        assert!(lines[2].ends_with(",Temporal PageRank"));
    }
}
