//! Reporting seam between the batch driver and whoever presents its progress

use std::sync::Mutex;

/// Receives progress messages from [`crate::batch::run_batch`]
///
/// Implementations must be shareable across worker threads.
pub trait Reporter: Send + Sync {
    /// Detailed diagnostics
    fn debug(&self, message: &str);

    /// Normal progress messages
    fn info(&self, message: &str);

    /// Per-file failures
    fn error(&self, message: &str);

    /// Called once before processing with the number of files found
    fn start(&self, _total: usize) {}

    /// Called once per finished file, whatever its outcome
    fn advance(&self) {}

    /// Called once after the last file
    fn finish(&self) {}
}

/// Forwards every message to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Level of a message kept by [`MemoryReporter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

/// Keeps every message in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(Level, String)>>,
    advanced: Mutex<usize>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Messages recorded at `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// How many times [`Reporter::advance`] was called
    pub fn advanced(&self) -> usize {
        self.advanced.lock().map(|n| *n).unwrap_or_default()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Reporter for MemoryReporter {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn advance(&self) {
        if let Ok(mut advanced) = self.advanced.lock() {
            *advanced += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_levels() {
        let reporter = MemoryReporter::new();
        reporter.debug("d");
        reporter.info("i");
        reporter.error("e");
        reporter.advance();

        assert_eq!(reporter.messages().len(), 3);
        assert_eq!(reporter.messages_at(Level::Error), vec!["e".to_string()]);
        assert_eq!(reporter.advanced(), 1);
    }
}
