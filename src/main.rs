//! pathsweep - Delete a selection of files and directories as one batch.
//!
//! Usage:
//!   pathsweep count <PATH>...    Preview how many files a selection holds
//!   pathsweep delete <PATH>...   Confirm, then delete with progress
//!   pathsweep --help             Show help

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pathsweep_core::{BatchConfig, BatchError, EntryKind, FailurePolicy, ResolvedSelection};
use pathsweep_ops::{
    AlwaysConfirm, BatchListener, BatchReport, ConfirmationGate, Orchestrator, start_batch,
};
use pathsweep_scan::{Selection, SelectionResolver};

#[derive(Parser)]
#[command(
    name = "pathsweep",
    version,
    about = "Delete files and directories as one batch",
    long_about = "pathsweep deletes a mixed selection of files and directories permanently.\n\n\
                  It previews how many files are involved, asks for confirmation, shows \
                  progress while deleting, and lists every path that could not be removed."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SelectionArgs {
    /// Files and directories to select
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Threads used to count directories (0 = auto-detect)
    #[arg(short, long, default_value = "0")]
    threads: usize,

    /// Accept relative paths
    #[arg(long)]
    allow_relative: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show how many files each selected path holds
    Count {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Delete the selected paths permanently
    Delete {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Skip every remaining path after the first failure
        #[arg(long)]
        stop_on_error: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Count { selection } => run_count(&selection),
        Command::Delete {
            selection,
            yes,
            stop_on_error,
        } => run_delete(&selection, yes, stop_on_error).await,
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_config(args: &SelectionArgs, stop_on_error: bool) -> Result<BatchConfig> {
    let policy = if stop_on_error {
        FailurePolicy::StopOnFirstFailure
    } else {
        FailurePolicy::Continue
    };

    BatchConfig::builder()
        .failure_policy(policy)
        .threads(args.threads)
        .require_absolute(!args.allow_relative)
        .build()
        .context("Invalid configuration")
}

/// Resolve a selection and print the per-path breakdown.
fn run_count(args: &SelectionArgs) -> Result<ExitCode> {
    let config = build_config(args, false)?;
    let resolver = SelectionResolver::from_config(&config);
    let resolved = resolver
        .resolve(&Selection::new(args.paths.iter().cloned()))
        .context("Cannot resolve selection")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        print_selection(&mut io::stdout().lock(), &resolved)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Confirm and delete a selection, rendering progress as it runs.
async fn run_delete(args: &SelectionArgs, yes: bool, stop_on_error: bool) -> Result<ExitCode> {
    let config = build_config(args, stop_on_error)?;
    let mut orchestrator = Orchestrator::new(config);
    orchestrator
        .select(args.paths.iter().cloned())
        .context("Cannot resolve selection")?;

    if !args.json {
        orchestrator.subscribe(Box::new(ProgressLine::default()));
    }

    let mut gate: Box<dyn ConfirmationGate> = if yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(|selection: &ResolvedSelection| {
            prompt(selection).unwrap_or_else(|err| {
                warn!(error = %err, "cannot read confirmation");
                false
            })
        })
    };
    let batch = match orchestrator.begin_batch(&mut *gate) {
        Ok(batch) => batch,
        Err(BatchError::ConfirmationDeclined) => {
            eprintln!("Nothing deleted.");
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(err.into()),
    };

    let mut events = start_batch(batch, orchestrator.filesystem());
    while let Some(event) = events.recv().await {
        orchestrator.handle_event(&event);
    }

    let Some(report) = orchestrator.last_report().cloned() else {
        orchestrator.abort_batch();
        bail!(BatchError::TaskFailed {
            message: "deletion worker exited without completing".to_string(),
        });
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print every entry with its kind and unit count.
fn print_selection(out: &mut impl Write, resolved: &ResolvedSelection) -> io::Result<()> {
    writeln!(out, "{}", "─".repeat(70))?;
    for entry in resolved.iter() {
        let detail = match &entry.kind {
            EntryKind::Inaccessible { cause } => cause.to_string(),
            _ => plural(entry.units, "file"),
        };
        writeln!(
            out,
            " {:<44} {:<12} {}",
            truncate(&entry.path.display().to_string(), 44),
            entry.kind.to_string(),
            detail
        )?;
    }
    writeln!(out, "{}", "─".repeat(70))?;
    writeln!(
        out,
        " Total: {} in {}",
        plural(resolved.total, "file"),
        plural(resolved.len() as u64, "path")
    )?;

    if !resolved.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, " Warnings:")?;
        for warning in &resolved.warnings {
            writeln!(out, "   {}: {}", warning.path.display(), warning.message)?;
        }
    }

    Ok(())
}

/// Ask on the terminal whether to delete the selection.
fn prompt(selection: &ResolvedSelection) -> io::Result<bool> {
    let mut err = io::stderr().lock();
    print_selection(&mut err, selection)?;
    write!(
        err,
        "Delete {} ({})? [y/N] ",
        plural(selection.len() as u64, "selected path"),
        plural(selection.total, "file")
    )?;
    err.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes"))
}

fn print_report(report: &BatchReport) {
    println!("{}", report.summary());

    if report.is_success() {
        return;
    }

    println!();
    println!(" Failed paths:");
    for (path, cause) in report.failures() {
        println!("   {}: {}", path.display(), cause);
    }

    if !report.failed_units.is_empty() {
        println!();
        println!(" Files that could not be removed:");
        for unit in &report.failed_units {
            if let Some(error) = &unit.error {
                println!("   {}", error);
            }
        }
    }
}

/// Single-line progress bar on stderr.
#[derive(Default)]
struct ProgressLine {
    drawn: bool,
}

impl BatchListener for ProgressLine {
    fn on_progress(&mut self, value: u8) {
        eprint!("\r{} {:>3}%", make_bar(value as f64 / 100.0, 30), value);
        let _ = io::stderr().flush();
        self.drawn = true;
    }

    fn on_complete(&mut self, _report: &BatchReport) {
        if self.drawn {
            eprintln!();
        }
    }
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

fn plural(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Truncate a string to max length, keeping the end of long paths.
fn truncate(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len - (max_len - 1)).collect();
        format!("…{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_bar() {
        assert_eq!(make_bar(0.0, 4), "[░░░░]");
        assert_eq!(make_bar(0.5, 4), "[██░░]");
        assert_eq!(make_bar(1.0, 4), "[████]");
    }

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("/very/long/path/name", 8), "…th/name");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file"), "1 file");
        assert_eq!(plural(0, "file"), "0 files");
    }

    #[test]
    fn test_cli_parses_delete_flags() {
        let cli = Cli::try_parse_from([
            "pathsweep",
            "-v",
            "delete",
            "/a",
            "/b",
            "--yes",
            "--stop-on-error",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Delete {
                selection,
                yes,
                stop_on_error,
            } => {
                assert_eq!(selection.paths.len(), 2);
                assert!(yes);
                let config = build_config(&selection, stop_on_error).unwrap();
                assert!(config.stops_on_failure());
            }
            Command::Count { .. } => panic!("expected delete"),
        }
    }

    #[test]
    fn test_cli_requires_paths() {
        assert!(Cli::try_parse_from(["pathsweep", "count"]).is_err());
    }

    #[test]
    fn test_print_selection_lists_entries() {
        let resolved = ResolvedSelection::new(
            vec![
                pathsweep_core::SelectionEntry::directory("/data/cache", 12),
                pathsweep_core::SelectionEntry::file("/data/notes.txt"),
            ],
            Vec::new(),
        );
        let mut out = Vec::new();
        print_selection(&mut out, &resolved).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("/data/cache"));
        assert!(text.contains("12 files"));
        assert!(text.contains("Total: 13 files in 2 paths"));
    }
}
