//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_sheet_adapter::CsvSheetAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::telegram_adapter::TelegramAdapter;
use crate::domain::config_validation::{MAX_LOOKBACK_MONTHS, validate_scan_config};
use crate::domain::error::ScanError;
use crate::domain::scan::{DEFAULT_LOOKBACK_MONTHS, ScanConfig, ScanReport, Scanner};
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::sheet_port::SheetPort;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "signalscan", about = "Technical-signal stock scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scan cycle
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Scan a single instrument instead of the configured list
        #[arg(long)]
        code: Option<String>,
        /// Directory holding <CODE>.csv price files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Report which notification and sheet sinks are configured
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file without fetching data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            code,
            data_dir,
        } => run_scan(&config, code.as_deref(), data_dir.as_deref()),
        Command::Check { config } => run_check(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_scan_config(config: &dyn ConfigPort) -> Result<ScanConfig, ScanError> {
    let codes_str = config
        .get_string("scan", "codes")
        .ok_or_else(|| ScanError::ConfigMissing {
            section: "scan".into(),
            key: "codes".into(),
        })?;
    let codes = parse_codes(&codes_str).map_err(|e| ScanError::ConfigInvalid {
        section: "scan".into(),
        key: "codes".into(),
        reason: e.to_string(),
    })?;

    let months = config.get_int("scan", "lookback_months", DEFAULT_LOOKBACK_MONTHS as i64);
    let lookback_months = u32::try_from(months)
        .ok()
        .filter(|m| (1..=MAX_LOOKBACK_MONTHS as u32).contains(m))
        .ok_or_else(|| ScanError::ConfigInvalid {
            section: "scan".into(),
            key: "lookback_months".into(),
            reason: format!("lookback_months must be between 1 and {}", MAX_LOOKBACK_MONTHS),
        })?;

    Ok(ScanConfig {
        codes,
        lookback_months,
    })
}

/// `--code` wins over the configured list.
pub fn resolve_codes(code_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(c) = code_override {
        let c = c.trim().to_uppercase();
        return if c.is_empty() { vec![] } else { vec![c] };
    }

    match config.get_string("scan", "codes") {
        Some(codes_str) => codes_str
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec![],
    }
}

pub fn resolve_data_dir(dir_override: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    match dir_override {
        Some(dir) => dir.to_path_buf(),
        None => config
            .get_string("scan", "data_dir")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
    }
}

fn run_scan(config_path: &Path, code_override: Option<&str>, data_dir: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let mut scan_config = match build_scan_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if code_override.is_some() {
        scan_config.codes = resolve_codes(code_override, &adapter);
        if scan_config.codes.is_empty() {
            eprintln!("error: no codes configured");
            return ExitCode::from(2);
        }
    }

    let data_dir = resolve_data_dir(data_dir, &adapter);
    let data_port = CsvAdapter::new(data_dir.clone());
    let notifier = TelegramAdapter::from_config(&adapter);
    let sheet = CsvSheetAdapter::from_config(&adapter);

    eprintln!(
        "Scanning {} codes from {} ({} month lookback)",
        scan_config.codes.len(),
        data_dir.display(),
        scan_config.lookback_months
    );

    let scanner = Scanner::new(scan_config, &data_port, &notifier, &sheet);
    match scanner.run(Local::now().naive_local()) {
        Some(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("error: no instrument yielded a usable price series");
            ExitCode::from(5)
        }
    }
}

fn print_report(report: &ScanReport) {
    eprintln!("\n=== Scan Results ===");
    eprintln!("Instruments:      {}", report.instruments_analyzed);
    if !report.skipped.is_empty() {
        eprintln!("Skipped:          {}", report.skipped.join(", "));
    }
    eprintln!("Total Trades:     {}", report.summary.total_trades);
    eprintln!("Completed:        {}", report.summary.completed_trades);
    eprintln!("Open Positions:   {}", report.summary.open_positions());
    eprintln!("Total P&L:        {:.2}", report.summary.total_pnl);
    eprintln!("Win Ratio:        {:.2}%", report.summary.win_ratio_pct);
    eprintln!("Alerts Sent:      {}", report.alerts_sent);

    if !report.scores.is_empty() {
        eprintln!("\n=== Prediction Accuracy ===");
        for score in &report.scores {
            eprintln!("  {}:  {:.2}%", score.code, score.accuracy_pct);
        }
    }
}

fn run_check(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let notifier = TelegramAdapter::from_config(&adapter);
    let sheet = CsvSheetAdapter::from_config(&adapter);
    let data_dir = resolve_data_dir(None, &adapter);

    eprintln!("Setup check:");
    eprintln!(
        "  telegram: {}",
        if notifier.is_configured() {
            "configured"
        } else {
            "not configured (alerts echoed to log)"
        }
    );
    match sheet.section_path("Trade Log") {
        Some(path) if sheet.is_configured() => {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            eprintln!("  sheets:   configured ({})", dir.display());
        }
        _ => eprintln!("  sheets:   not configured (sheet output echoed to log)"),
    }
    eprintln!(
        "  data dir: {}{}",
        data_dir.display(),
        if data_dir.is_dir() { "" } else { " (missing)" }
    );

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let scan_config = match build_scan_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let today = Local::now().date_naive();
    let (start, end) = scan_config.window(today);
    eprintln!("\nUniverse:");
    eprintln!("  codes:  {}", scan_config.codes.join(", "));
    eprintln!("  window: {} to {}", start, end);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
