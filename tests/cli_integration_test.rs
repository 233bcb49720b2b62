//! CLI integration tests for config loading and the analyze command.
//!
//! Tests cover:
//! - Loading and validating real INI files on disk (load_app_config)
//! - Exit statuses for missing, unparsable and invalid configs
//! - The analyze path over CSV fixtures (analyze_with)
//! - The run summary over synthetic reports

mod common;

use common::*;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use stocksage::adapters::csv_adapter::CsvAdapter;
use stocksage::cli;
use stocksage::domain::analysis::{NotifyStatus, TickerOutcome, TickerReport};
use stocksage::domain::market::BarInterval;
use stocksage::domain::snapshot::compute_snapshot;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ExitCode doesn't implement PartialEq, so compare the debug format
fn assert_exit(actual: ExitCode, expected: u8) {
    assert_eq!(
        format!("{:?}", actual),
        format!("{:?}", ExitCode::from(expected))
    );
}

const VALID_INI: &str = r#"
[watchlist]
tickers = tsla, NVDA, aapl
pause_seconds = 5

[market]
lookback_days = 10
interval = 1d

[news]
enabled = false

[backend]
base_url = http://localhost:8080/v1beta
timeout_seconds = 12
max_attempts = 3
exclude = pro

[alerts]
keywords = BUY, SELL
confidence_markers = CONFIDENCE: HIGH

[email]
enabled = no
"#;

mod config_loading {
    use super::*;

    #[test]
    fn loads_valid_file() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_app_config(file.path()).unwrap();

        assert_eq!(config.tickers, vec!["TSLA", "NVDA", "AAPL"]);
        assert_eq!(config.pause, Duration::from_secs(5));
        assert_eq!(config.lookback_days, 10);
        assert_eq!(config.interval, BarInterval::Day);
        assert!(!config.news_enabled);
        assert!(!config.email_enabled);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.selector.max_attempts, Some(3));
        assert_eq!(config.selector.exclude, vec!["pro"]);
        assert_eq!(config.backend_url, "http://localhost:8080/v1beta");
    }

    #[test]
    fn missing_file_exits_with_io_status() {
        let dir = tempfile::tempdir().unwrap();
        let result = cli::load_app_config(&dir.path().join("absent.ini"));
        assert_exit(result.unwrap_err(), 1);
    }

    #[test]
    fn missing_tickers_exits_with_config_status() {
        let file = write_temp_ini("[market]\nlookback_days = 30\n");
        assert_exit(cli::load_app_config(file.path()).unwrap_err(), 2);
    }

    #[test]
    fn duplicate_tickers_exit_with_config_status() {
        let file = write_temp_ini("[watchlist]\ntickers = TSLA, tsla\n");
        assert_exit(cli::load_app_config(file.path()).unwrap_err(), 2);
    }

    #[test]
    fn invalid_interval_exits_with_config_status() {
        let file = write_temp_ini("[watchlist]\ntickers = TSLA\n[market]\ninterval = 4h\n");
        assert_exit(cli::load_app_config(file.path()).unwrap_err(), 2);
    }

    #[test]
    fn bad_port_exits_with_config_status() {
        let file = write_temp_ini("[watchlist]\ntickers = TSLA\n[email]\nsmtp_port = 70000\n");
        assert_exit(cli::load_app_config(file.path()).unwrap_err(), 2);
    }
}

mod analyze {
    use super::*;

    fn csv_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn csv_from_bars(count: usize) -> String {
        let mut out = String::from("timestamp,open,high,low,close,volume\n");
        for bar in generate_bars(count, 100.0) {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                bar.timestamp.to_rfc3339(),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            ));
        }
        out
    }

    #[test]
    fn snapshot_from_csv_succeeds() {
        let dir = csv_dir(&[("TSLA.csv", &csv_from_bars(48))]);
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let code = cli::analyze_with(&adapter, "TSLA", 30, BarInterval::Hour);
        assert_exit(code, 0);
    }

    #[test]
    fn header_only_csv_is_no_data() {
        let dir = csv_dir(&[("NVDA.csv", "timestamp,open,high,low,close,volume\n")]);
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let code = cli::analyze_with(&adapter, "NVDA", 30, BarInterval::Hour);
        assert_exit(code, 5);
    }

    #[test]
    fn missing_csv_is_data_unavailable() {
        let dir = csv_dir(&[]);
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let code = cli::analyze_with(&adapter, "AAPL", 30, BarInterval::Hour);
        assert_exit(code, 5);
    }

    #[test]
    fn mock_source_is_queried_with_requested_window() {
        let data = MockDataPort::new().with_bars("AMD", generate_bars(5, 50.0));

        let code = cli::analyze_with(&data, "AMD", 7, BarInterval::Day);

        assert_exit(code, 0);
        assert_eq!(
            *data.requests.borrow(),
            vec![("AMD".to_string(), 7, BarInterval::Day)]
        );
    }
}

mod summary {
    use super::*;

    #[test]
    fn report_lines_describe_each_outcome() {
        let snapshot = Box::new(compute_snapshot(&generate_bars(30, 100.0)).unwrap());
        let reports = vec![
            TickerReport {
                ticker: "BAD".into(),
                outcome: TickerOutcome::Skipped {
                    reason: "no price data for BAD".into(),
                },
            },
            TickerReport {
                ticker: "TSLA".into(),
                outcome: TickerOutcome::Advised {
                    snapshot: snapshot.clone(),
                    model: "gemma-3-27b-it".into(),
                    advice: "DECISION: LONG".into(),
                    actionable: true,
                    notification: NotifyStatus::Sent,
                },
            },
            TickerReport {
                ticker: "NVDA".into(),
                outcome: TickerOutcome::NoAdvice {
                    snapshot,
                    reason: "no backend candidate succeeded".into(),
                },
            },
        ];

        let lines: Vec<String> = reports.iter().map(|r| r.to_string()).collect();
        assert_eq!(lines[0], "BAD: skipped (no price data for BAD)");
        assert_eq!(lines[1], "TSLA: advice from gemma-3-27b-it, alert sent");
        assert_eq!(lines[2], "NVDA: no advice (no backend candidate succeeded)");

        // summary goes to stderr; it must not panic on mixed outcomes
        cli::print_summary(&reports);
    }
}
