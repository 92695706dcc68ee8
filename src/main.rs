// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! image-recovery CLI
//!
//! Sorts recovered images into camera/year/month folders based on their
//! EXIF metadata.

use clap::{Parser, ValueEnum};
use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use image_recovery::{Organizer, RecoveryError, Result, RunSummary, ScanTask, TimestampPolicy};

/// image-recovery - sort recovered images by camera model and date
#[derive(Parser, Debug)]
#[command(name = "image-recovery")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Sort recovered images by camera model and capture date", long_about = None)]
struct Cli {
    /// Directory tree to scan
    input_dir: PathBuf,

    /// Root of the sorted camera/year/month tree
    output_dir: PathBuf,

    /// Prefix for the quarantine dirs; "Images" and "Files" are appended
    skip_dir_prefix: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Stop after this many images have been placed
    #[arg(long, value_name = "N")]
    max_files: Option<usize>,

    /// Quarantine images with malformed dates instead of aborting the run
    #[arg(long)]
    lenient_dates: bool,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("args: {:?}", cli);

    match run(&cli) {
        Ok(summary) => match print_summary(&summary, cli.format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{}. Exiting.", e);
            error!("{}", fatal_report(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let policy = if cli.lenient_dates {
        TimestampPolicy::Lenient
    } else {
        TimestampPolicy::Strict
    };

    let task = ScanTask::resolve(
        &cli.input_dir,
        &cli.output_dir,
        &cli.skip_dir_prefix,
        cli.verbose,
    )?
    .with_max_files(cli.max_files)
    .with_timestamp_policy(policy);

    debug!("task: {}", serde_json::to_string(&task)?);

    let summary = Organizer::new(task).run()?;
    info!(
        "Done: {} placed, {} images and {} files quarantined",
        summary.stats.placed, summary.stats.quarantined_images, summary.stats.quarantined_files
    );
    Ok(summary)
}

/// Debug form of a fatal error followed by the stack trace at exit
fn fatal_report(e: &RecoveryError) -> String {
    format!("{:?}\nstack backtrace:\n{}", e, Backtrace::force_capture())
}

fn print_summary(summary: &RunSummary, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Text => println!("{}", summary),
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["image-recovery", "in", "out", "skip"]).unwrap();
        assert!(!cli.verbose);
        assert!(!cli.lenient_dates);
        assert_eq!(cli.max_files, None);
        assert_eq!(cli.format, SummaryFormat::Text);
        assert_eq!(cli.skip_dir_prefix, PathBuf::from("skip"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "image-recovery",
            "/media/card",
            "/photos",
            "/photos/skip",
            "-v",
            "--max-files",
            "10",
            "--lenient-dates",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(cli.lenient_dates);
        assert_eq!(cli.max_files, Some(10));
        assert_eq!(cli.format, SummaryFormat::Json);
        assert_eq!(cli.input_dir, PathBuf::from("/media/card"));
    }

    #[test]
    fn test_fatal_report_has_error_and_trace() {
        let err = RecoveryError::InputDirMissing(PathBuf::from("/nope"));
        let report = fatal_report(&err);
        assert!(report.starts_with("InputDirMissing(\"/nope\")"));
        assert!(report.contains("stack backtrace:"));
    }

    #[test]
    fn test_cli_requires_all_dirs() {
        assert!(Cli::try_parse_from(["image-recovery", "in", "out"]).is_err());
    }
}
