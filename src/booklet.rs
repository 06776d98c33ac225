//! Booklet page arithmetic
//!
//! A booklet scan holds the front sides of the sheets in its first half and
//! the back sides, in reverse physical order, in its second half. For an
//! eight page booklet the scan positions carry these pages:
//!
//! ```text
//! position:  0  1  2  3  4  5  6  7
//! page:      4  5  2  7  8  1  6  3
//! ```
//!
//! Everything here is pure: no I/O, no logging.

use std::fmt;

use crate::error::{Error, Result};

/// Number of pages in a booklet scan, guaranteed to be even
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageCount(usize);

impl PageCount {
    /// Validate a raw page count
    pub fn new(pages: usize) -> Result<Self> {
        if pages % 2 != 0 {
            return Err(Error::InvalidPageCount(pages));
        }
        Ok(PageCount(pages))
    }

    /// The raw number of pages
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of pages on each half of the scan
    pub fn half(self) -> usize {
        self.0 / 2
    }
}

impl TryFrom<usize> for PageCount {
    type Error = Error;

    fn try_from(pages: usize) -> Result<Self> {
        PageCount::new(pages)
    }
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Return the true (1-based) page number shown at scan `position`.
///
/// # Panics
///
/// Panics if `position` is not smaller than `pages`.
pub fn true_page(position: usize, pages: PageCount) -> usize {
    let n = pages.get();
    let half = pages.half();
    assert!(
        position < n,
        "scan position {position} out of range for {n} pages"
    );

    let odd = position % 2 == 1;
    if position < half {
        // Front sides
        if odd {
            half + position
        } else {
            half - position
        }
    } else {
        // Back sides; parity is that of the position itself
        if odd {
            position - half
        } else {
            n - (position - half)
        }
    }
}

/// Get the sequence of 0-based scan positions in reading order.
///
/// Positions are sorted by their 0-based page key. When `page_count` is a
/// multiple of four the result reads as pages `1..=page_count`; for other
/// even counts the mapping yields page 0 once and never page `page_count`,
/// and the sort still gives a full permutation of the scan.
///
/// # Example
///
/// ```
/// use scan_sorter::booklet::ordered_sequence;
///
/// assert_eq!(ordered_sequence(4).unwrap(), vec![3, 0, 1, 2]);
/// assert!(ordered_sequence(3).is_err());
/// ```
pub fn ordered_sequence(page_count: usize) -> Result<Vec<usize>> {
    let pages = PageCount::new(page_count)?;

    let mut keyed: Vec<(usize, i64)> = (0..page_count)
        .map(|position| (position, true_page(position, pages) as i64 - 1))
        .collect();

    // Stable, so equal keys would keep scan order; they are rejected below anyway
    keyed.sort_by_key(|&(_, key)| key);

    for pair in keyed.windows(2) {
        if pair[0].1 == pair[1].1 {
            return Err(Error::DuplicatePage {
                page_count,
                page: (pair[1].1 + 1) as usize,
            });
        }
    }

    Ok(keyed.into_iter().map(|(position, _)| position).collect())
}

/// Render a sequence as 1-based scan page numbers, e.g. `"6, 3, 1, 8"`
pub fn describe_sequence(sequence: &[usize]) -> String {
    sequence
        .iter()
        .map(|position| (position + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
