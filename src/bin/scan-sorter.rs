//! Scan Sorter CLI tool
//!
//! A command-line tool for putting scanned booklets back into reading order.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use scan_sorter::batch::{run_batch, BatchOptions};
use scan_sorter::booklet::{describe_sequence, ordered_sequence};
use scan_sorter::pdf::{extract_metadata, reorder_pdf, ReorderOptions};
use scan_sorter::report::Reporter;

/// Scan Sorter - Reorder scanned booklet PDFs into reading order
#[derive(Parser)]
#[command(name = "scan-sorter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Sort every PDF in the current directory into ./sorted
    scan-sorter sort

    # Sort a scanner's output folder using four worker threads
    scan-sorter sort --input-dir ~/scans --output-dir ~/booklets --jobs 4

    # Reorder a single scan and open the result
    scan-sorter reorder scan.pdf -o booklet.pdf --open

    # Show which scan pages make up pages 1..12
    scan-sorter sequence 12")]
struct Cli {
    /// Show more detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort all PDFs in a directory and save them in a new directory
    Sort {
        /// Directory containing the scanned PDFs (default: current directory)
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Directory for the sorted PDFs (default: <input-dir>/sorted)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of files to process concurrently
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,
    },

    /// Reorder a single scanned booklet PDF
    Reorder {
        /// Scanned booklet PDF
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Print the scan pages in reading order for a booklet of N pages
    Sequence {
        /// Total number of scanned pages
        pages: usize,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Sort { input_dir, output_dir, jobs } => {
            cmd_sort(input_dir, output_dir, jobs, cli.quiet)
        }
        Commands::Reorder { input, output, open } => {
            cmd_reorder(input, output, open)
        }
        Commands::Sequence { pages } => {
            cmd_sequence(pages)
        }
        Commands::Info { input } => {
            cmd_info(input)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Install the tracing subscriber; RUST_LOG overrides the flags
fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Routes batch messages to tracing without tearing the progress bar
struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    fn new(quiet: bool) -> Result<Self> {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
                    .context("Invalid progress bar template")?,
            );
            bar
        };
        Ok(Self { bar })
    }
}

impl Reporter for ProgressReporter {
    fn debug(&self, message: &str) {
        self.bar.suspend(|| tracing::debug!("{message}"));
    }

    fn info(&self, message: &str) {
        self.bar.suspend(|| tracing::info!("{message}"));
    }

    fn error(&self, message: &str) {
        self.bar.suspend(|| tracing::error!("{message}"));
    }

    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn advance(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Sort every scan in a directory
fn cmd_sort(
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    jobs: usize,
    quiet: bool,
) -> Result<()> {
    let input_dir = match input_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    let mut options = BatchOptions::new(input_dir);
    if let Some(dir) = output_dir {
        options.output_dir = dir;
    }
    options.jobs = jobs.max(1);

    tracing::debug!(
        input = %options.input_dir.display(),
        output = %options.output_dir.display(),
        jobs = options.jobs,
        "Sorting scans"
    );

    let reporter = ProgressReporter::new(quiet)?;
    let summary = run_batch(&options, &reporter)
        .with_context(|| format!("Failed to sort {}", options.input_dir.display()))?;

    if summary.total() > 0 {
        println!();
        print!("{summary}");
    }

    if summary.has_failures() {
        bail!("{} of {} file(s) failed", summary.failed(), summary.total());
    }

    Ok(())
}

/// Reorder one scan
fn cmd_reorder(input: PathBuf, output: PathBuf, open: bool) -> Result<()> {
    let options = ReorderOptions {
        input_path: input,
        output_path: output.clone(),
    };

    let report = reorder_pdf(&options)
        .with_context(|| format!("Reordering of {} failed", options.input_path.display()))?;

    tracing::debug!("Scan pages in reading order: {}", describe_sequence(&report.sequence));
    eprintln!("Reordered {} pages to: {}", report.page_count, output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Print the reading order for a page count
fn cmd_sequence(pages: usize) -> Result<()> {
    let sequence = ordered_sequence(pages)?;
    println!("{}", describe_sequence(&sequence));
    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let metadata = extract_metadata(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    let booklet = if ordered_sequence(metadata.page_count).is_ok() { "yes" } else { "no" };
    println!("Reorderable as booklet: {}", booklet);

    Ok(())
}
