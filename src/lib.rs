//! Scan Sorter Library
//!
//! Reorders scanned booklet PDFs into reading order.
//! A booklet scan holds the front sides of its sheets first and the back
//! sides afterwards in reverse order. This library provides functionality to:
//! - Map a scan position to the page it shows
//! - Compute the scan order that reads as pages 1..N
//! - Rewrite a PDF's page tree in that order
//! - Sort a whole directory of scans
//!
//! # Example
//!
//! ```no_run
//! use scan_sorter::batch::{run_batch, BatchOptions};
//! use scan_sorter::report::TracingReporter;
//!
//! let options = BatchOptions::new("scans");
//! let summary = run_batch(&options, &TracingReporter).expect("Failed to sort scans");
//! print!("{summary}");
//! ```

pub mod batch;
pub mod booklet;
pub mod error;
pub mod pdf;
pub mod report;

// Re-export commonly used items
pub use booklet::{ordered_sequence, true_page, PageCount};
pub use error::{Error, ErrorKind, Result};
