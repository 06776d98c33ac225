//! Error types for the scan sorter library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scan sorter library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Booklet scans always have an even number of pages
    #[error("Number of pages must be even, but was {0}")]
    InvalidPageCount(usize),

    /// Two scan positions mapped to the same page
    #[error("Page {page} is produced by more than one scan position (page count {page_count})")]
    DuplicatePage { page_count: usize, page: usize },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Structurally broken document (missing catalog, page tree, ...)
    #[error("Malformed PDF: {0}")]
    MalformedDocument(String),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),
}

/// Coarse classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Odd page count
    InvalidPageCount,
    /// The position mapping did not produce a permutation
    InvalidMapping,
    /// Input unreadable or output unwritable
    Io,
    /// Input cannot be parsed as a usable PDF
    MalformedDocument,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPageCount(_) => ErrorKind::InvalidPageCount,
            Error::DuplicatePage { .. } => ErrorKind::InvalidMapping,
            Error::Io(_) | Error::FileNotFound(_) | Error::InvalidGlob(_) => ErrorKind::Io,
            Error::Pdf(err) if is_io_failure(err) => ErrorKind::Io,
            Error::Pdf(_) | Error::MalformedDocument(_) | Error::EmptyPdf(_) => {
                ErrorKind::MalformedDocument
            }
        }
    }
}

/// lopdf wraps read failures; those are I/O problems, not broken files
fn is_io_failure(err: &lopdf::Error) -> bool {
    std::error::Error::source(err).is_some_and(|source| source.is::<std::io::Error>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_page_count_names_the_count() {
        let err = Error::InvalidPageCount(7);
        assert!(err.to_string().contains('7'));
        assert_eq!(err.kind(), ErrorKind::InvalidPageCount);
    }

    #[test]
    fn test_kind_classification() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(Error::FileNotFound(PathBuf::from("x.pdf")).kind(), ErrorKind::Io);
        assert_eq!(
            Error::MalformedDocument("no catalog".to_string()).kind(),
            ErrorKind::MalformedDocument
        );
        assert_eq!(
            Error::DuplicatePage { page_count: 4, page: 2 }.kind(),
            ErrorKind::InvalidMapping
        );
    }
}
