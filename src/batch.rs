//! Reorder every booklet scan in a directory
//!
//! One failing file never stops the batch: each input ends up as a
//! [`FileReport`] in the returned [`BatchSummary`], and inputs whose output
//! already exists are skipped.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;

use crate::booklet::describe_sequence;
use crate::error::{Error, Result};
use crate::pdf::{reorder_pdf, ReorderOptions, ReorderReport};
use crate::report::Reporter;

/// File name pattern of batch inputs
const PDF_PATTERN: &str = "*.pdf";

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned (non-recursively) for PDFs
    pub input_dir: PathBuf,
    /// Directory receiving the reordered PDFs, created if absent
    pub output_dir: PathBuf,
    /// Number of files processed concurrently
    pub jobs: usize,
}

impl BatchOptions {
    /// Sort `input_dir` into its `sorted` subdirectory, one file at a time
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let output_dir = input_dir.join("sorted");
        Self {
            input_dir,
            output_dir,
            jobs: 1,
        }
    }
}

/// What happened to one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// Written to the output directory
    Reordered(ReorderReport),
    /// Output already existed, nothing done
    Skipped,
    /// Reordering failed; no output was written
    Failed(Error),
}

/// Outcome for one input file
#[derive(Debug)]
pub struct FileReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    /// File name used in messages
    pub fn name(&self) -> String {
        display_name(&self.input_path)
    }
}

/// Per-file results of a batch run, in input order
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn reordered(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Reordered(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Failed files with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&FileReport, &Error)> {
        self.reports.iter().filter_map(|report| match &report.outcome {
            FileOutcome::Failed(error) => Some((report, error)),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|report| predicate(&report.outcome)).count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} files processed, {} skipped due to output file existing.",
            self.total(),
            self.skipped()
        )?;

        if self.has_failures() {
            writeln!(f)?;
            writeln!(f, "{} file(s) failed processing. See details below:", self.failed())?;
            for (report, error) in self.failures() {
                writeln!(f, "{}", failure_message(&report.name(), error))?;
            }
        }

        Ok(())
    }
}

/// List the PDFs directly inside `dir`, sorted by path
///
/// The extension is matched case-insensitively; subdirectories are not
/// descended into.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let pattern = Pattern::new(PDF_PATTERN).map_err(|e| Error::InvalidGlob(e.to_string()))?;
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        if pattern.matches_with(&file_name.to_string_lossy(), options) {
            paths.push(entry.path());
        }
    }

    paths.sort();
    Ok(paths)
}

/// Reorder every PDF in `options.input_dir` into `options.output_dir`
///
/// Only directory-level problems (unreadable input directory, output
/// directory that cannot be created) are returned as errors; per-file
/// failures are recorded in the summary.
pub fn run_batch(options: &BatchOptions, reporter: &dyn Reporter) -> Result<BatchSummary> {
    let inputs = discover_pdfs(&options.input_dir)?;
    fs::create_dir_all(&options.output_dir)?;

    if inputs.is_empty() {
        reporter.info(&format!(
            "No PDFs in {}. Done.",
            options.input_dir.display()
        ));
        return Ok(BatchSummary::default());
    }

    reporter.debug(&format!(
        "Found {} PDF(s) in {}",
        inputs.len(),
        options.input_dir.display()
    ));
    reporter.start(inputs.len());

    let process = |input: &PathBuf| {
        let report = process_file(input, &options.output_dir, reporter);
        reporter.advance();
        report
    };

    let reports: Vec<FileReport> = if options.jobs <= 1 {
        inputs.iter().map(process).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()
            .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        pool.install(|| inputs.par_iter().map(process).collect())
    };

    reporter.finish();

    Ok(BatchSummary { reports })
}

/// Reorder one input unless its output already exists
fn process_file(input: &Path, output_dir: &Path, reporter: &dyn Reporter) -> FileReport {
    let name = display_name(input);
    let output_path = match input.file_name() {
        Some(file_name) => output_dir.join(file_name),
        None => output_dir.join(&name),
    };

    let outcome = if output_path.exists() {
        reporter.debug(&format!("Skipping {name}: {} exists", output_path.display()));
        FileOutcome::Skipped
    } else {
        let options = ReorderOptions {
            input_path: input.to_path_buf(),
            output_path: output_path.clone(),
        };
        match reorder_pdf(&options) {
            Ok(report) => {
                reporter.debug(&format!(
                    "{name}: scan pages in reading order: {}",
                    describe_sequence(&report.sequence)
                ));
                reporter.info(&format!("Reordered {name} ({} pages)", report.page_count));
                FileOutcome::Reordered(report)
            }
            Err(error) => {
                reporter.error(&failure_message(&name, &error));
                FileOutcome::Failed(error)
            }
        }
    };

    FileReport {
        input_path: input.to_path_buf(),
        output_path,
        outcome,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn failure_message(name: &str, error: &Error) -> String {
    format!("Reordering of {name} failed, error was \"{error}\"")
}
