//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::gemini_adapter::GeminiAdapter;
use crate::adapters::log_notifier::LogNotifier;
use crate::adapters::newsapi_adapter::NewsApiAdapter;
use crate::adapters::smtp_notifier::SmtpNotifier;
use crate::adapters::yahoo_adapter::YahooChartAdapter;
use crate::domain::analysis::{
    run_watchlist, AnalysisSettings, Services, TickerOutcome, TickerReport,
};
use crate::domain::backend_selector::BackendSelector;
use crate::domain::config_validation::validate_app_config;
use crate::domain::credentials::Credentials;
use crate::domain::error::{SelectorError, StockSageError};
use crate::domain::market::BarInterval;
use crate::domain::ohlcv::normalize_series;
use crate::domain::settings::{AppConfig, DEFAULT_LOOKBACK_DAYS, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::snapshot::{compute_snapshot, RECOMMENDED_MIN_BARS};
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use crate::ports::notify_port::NotifyPort;

/// Recipient shown in dry-run logs when email is disabled.
const LOG_RECIPIENT: &str = "log";

#[derive(Parser, Debug)]
#[command(
    name = "stocksage",
    about = "Technical snapshot and model-backed trade alerts for a stock watchlist"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze every watchlist ticker and send alerts
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Log alerts instead of emailing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the indicator snapshot for one ticker
    Analyze {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Read bars from <DIR>/<TICKER>.csv instead of the network
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// List text-capable models in the order they would be tried
    Models {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate configuration and credentials
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, dry_run } => run_batch(&config, dry_run),
        Command::Analyze {
            ticker,
            config,
            csv_dir,
        } => run_analyze(&ticker, config.as_deref(), csv_dir),
        Command::Models { config } => run_models(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &StockSageError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Load, validate and type the INI file.
pub fn load_app_config(path: &Path) -> Result<AppConfig, ExitCode> {
    let adapter = load_config(path)?;
    validate_app_config(&adapter).map_err(|e| fail(&e))?;
    AppConfig::from_port(&adapter).map_err(|e| fail(&e))
}

fn run_batch(config_path: &Path, dry_run: bool) -> ExitCode {
    // Stage 1: config and credentials
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_app_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let email_enabled = config.email_enabled && !dry_run;
    let Credentials {
        gemini_api_key,
        news_api_key,
        email,
    } = match Credentials::from_env(config.news_enabled, email_enabled) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    // Stage 2: adapters
    let data = match YahooChartAdapter::new(config.request_timeout) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let backend = match GeminiAdapter::new(
        &config.backend_url,
        gemini_api_key,
        config.request_timeout,
    ) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let news = match news_api_key {
        Some(key) => match NewsApiAdapter::new(key, config.request_timeout) {
            Ok(a) => Some(a),
            Err(e) => return fail(&e),
        },
        None => None,
    };
    let smtp = match &email {
        Some(email) => match SmtpNotifier::new(
            &config.smtp_host,
            config.smtp_port,
            email,
            config.request_timeout,
        ) {
            Ok(n) => Some(n),
            Err(e) => return fail(&e),
        },
        None => None,
    };
    let log_notifier = LogNotifier::new();

    let notifier: Option<&dyn NotifyPort> = if dry_run {
        Some(&log_notifier)
    } else {
        smtp.as_ref().map(|n| n as &dyn NotifyPort)
    };
    let recipient = email
        .as_ref()
        .map(|e| e.receiver.clone())
        .unwrap_or_else(|| LOG_RECIPIENT.to_string());

    let services = Services {
        data: &data,
        news: news.as_ref().map(|n| n as &dyn NewsPort),
        backend: &backend,
        notifier,
    };
    let settings = AnalysisSettings::from_config(&config, recipient);

    // Stage 3: watchlist
    eprintln!(
        "Analyzing {} tickers: {}{}",
        config.tickers.len(),
        config.tickers.join(", "),
        if dry_run { " (dry run)" } else { "" }
    );
    let reports = run_watchlist(&config.tickers, &services, &settings, &mut |pause: Duration| {
        std::thread::sleep(pause)
    });

    print_summary(&reports);
    ExitCode::SUCCESS
}

pub fn print_summary(reports: &[TickerReport]) {
    eprintln!("\nSummary:");
    for report in reports {
        eprintln!("  {}", report);
        if let TickerOutcome::Advised { advice, .. } = &report.outcome {
            for line in advice.lines() {
                eprintln!("    | {}", line);
            }
        }
    }

    let skipped = count(reports, |o| matches!(o, TickerOutcome::Skipped { .. }));
    let no_advice = count(reports, |o| matches!(o, TickerOutcome::NoAdvice { .. }));
    let actionable = count(reports, |o| {
        matches!(o, TickerOutcome::Advised { actionable: true, .. })
    });
    eprintln!(
        "{} analyzed, {} skipped, {} without advice, {} actionable",
        reports.len() - skipped,
        skipped,
        no_advice,
        actionable
    );
}

fn count(reports: &[TickerReport], pred: impl Fn(&TickerOutcome) -> bool) -> usize {
    reports.iter().filter(|r| pred(&r.outcome)).count()
}

fn run_analyze(ticker: &str, config_path: Option<&Path>, csv_dir: Option<PathBuf>) -> ExitCode {
    let ticker = ticker.trim().to_uppercase();
    let (lookback_days, interval, timeout) = match config_path {
        Some(path) => match load_app_config(path) {
            Ok(c) => (c.lookback_days, c.interval, c.request_timeout),
            Err(code) => return code,
        },
        None => (
            DEFAULT_LOOKBACK_DAYS as u32,
            BarInterval::Hour,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS as u64),
        ),
    };

    match csv_dir {
        Some(dir) => {
            eprintln!("Reading {} from {}", ticker, dir.display());
            analyze_with(&CsvAdapter::new(dir), &ticker, lookback_days, interval)
        }
        None => match YahooChartAdapter::new(timeout) {
            Ok(adapter) => analyze_with(&adapter, &ticker, lookback_days, interval),
            Err(e) => fail(&e),
        },
    }
}

/// Fetch one ticker and print its snapshot to stdout.
pub fn analyze_with(
    data_port: &dyn DataPort,
    ticker: &str,
    lookback_days: u32,
    interval: BarInterval,
) -> ExitCode {
    let mut bars = match data_port.fetch_series(ticker, lookback_days, interval) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    normalize_series(&mut bars);

    let snapshot = match compute_snapshot(&bars) {
        Ok(s) => s,
        Err(_) => {
            return fail(&StockSageError::NoData {
                ticker: ticker.to_string(),
            })
        }
    };
    if snapshot.bar_count < RECOMMENDED_MIN_BARS {
        eprintln!(
            "warning: only {} bars; long EMAs and averages are still warming up",
            snapshot.bar_count
        );
    }

    let name = data_port
        .company_name(ticker)
        .unwrap_or_else(|| ticker.to_string());
    println!("{} ({}), {} {} bars", ticker, name, snapshot.bar_count, interval);
    println!("{}", snapshot);
    ExitCode::SUCCESS
}

fn run_models(config_path: &Path) -> ExitCode {
    let config = match load_app_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let credentials = match Credentials::from_env(false, false) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let backend = match GeminiAdapter::new(
        &config.backend_url,
        credentials.gemini_api_key,
        config.request_timeout,
    ) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let selector = BackendSelector::new(&backend, config.selector.clone());
    let candidates = match selector.ranked_candidates() {
        Ok(c) => c,
        Err(e) => return fail(&StockSageError::Backend(SelectorError::Listing(e))),
    };

    if candidates.is_empty() {
        eprintln!("No text-capable models available");
        return ExitCode::SUCCESS;
    }
    let shown = config.selector.max_attempts.unwrap_or(candidates.len());
    for (rank, candidate) in candidates.iter().enumerate() {
        let marker = if rank < shown { "" } else { "  (beyond max_attempts)" };
        println!(
            "{:>2}. {:<40} tier {} ({}){}",
            rank + 1,
            candidate.id,
            candidate.tier.ordinal(),
            candidate.tier,
            marker
        );
    }
    eprintln!("{} candidates", candidates.len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_app_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = Credentials::from_env(config.news_enabled, config.email_enabled) {
        return fail(&e);
    }

    eprintln!("\nWatchlist: {}", config.tickers.join(", "));
    eprintln!(
        "Market:    {} days of {} bars, {}s between tickers",
        config.lookback_days,
        config.interval,
        config.pause.as_secs()
    );
    eprintln!(
        "News:      {}",
        if config.news_enabled {
            format!("up to {} headlines", config.news_limit)
        } else {
            "disabled".to_string()
        }
    );
    eprintln!(
        "Backend:   {} (timeout {}s, {})",
        config.backend_url,
        config.request_timeout.as_secs(),
        match config.selector.max_attempts {
            Some(n) => format!("at most {} attempts", n),
            None => "all candidates".to_string(),
        }
    );
    eprintln!(
        "Email:     {}",
        if config.email_enabled {
            format!("{}:{}", config.smtp_host, config.smtp_port)
        } else {
            "disabled".to_string()
        }
    );

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
