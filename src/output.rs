//! Per-file reports and run summaries returned by both batch drivers.

use crate::error::FileError;
use serde::Serialize;
use std::path::PathBuf;

// ── HTML → PDF ───────────────────────────────────────────────────────────

/// Terminal outcome of one conversion job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvertOutcome {
    /// The browser produced the PDF. `overwritten` is true when the
    /// destination existed before the run.
    Converted { overwritten: bool },
    /// The destination already existed and overwriting was not requested.
    Skipped,
    /// The browser could not be run or exited unsuccessfully.
    Failed { error: FileError },
}

impl ConvertOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConvertOutcome::Converted { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ConvertOutcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConvertOutcome::Failed { .. })
    }
}

/// Result of a single file in an HTML-to-PDF batch.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: ConvertOutcome,
    pub duration_ms: u64,
}

/// Aggregate counters for an HTML-to-PDF batch.
///
/// `converted + skipped + failed == total` once the batch finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// An explicit output name was dropped because several files were collected.
    pub output_name_ignored: bool,
    pub duration_ms: u64,
}

impl RunSummary {
    /// Count one terminal outcome.
    pub fn record(&mut self, outcome: &ConvertOutcome) {
        match outcome {
            ConvertOutcome::Converted { .. } => self.converted += 1,
            ConvertOutcome::Skipped => self.skipped += 1,
            ConvertOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Number of files that reached a terminal outcome.
    pub fn accounted(&self) -> usize {
        self.converted + self.skipped + self.failed
    }
}

/// Everything [`crate::convert_batch`] produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionRun {
    pub browser: PathBuf,
    pub reports: Vec<ConvertReport>,
    pub summary: RunSummary,
}

// ── Cleaner ──────────────────────────────────────────────────────────────

/// Outcome of cleaning one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanOutcome {
    /// Matches were removed and the document was written to `saved_to`.
    Cleaned {
        removed: usize,
        saved_to: PathBuf,
        in_place: bool,
        encoding: String,
    },
    /// Nothing matched the selector; the file was not touched.
    NoMatch,
    /// The file could not be read, decoded or written.
    Failed { error: FileError },
}

/// Result of a single file in a cleaning batch.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub path: PathBuf,
    pub outcome: CleanOutcome,
}

/// Aggregate counters for a cleaning batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub total: usize,
    pub cleaned: usize,
    pub unmatched: usize,
    pub failed: usize,
    /// Elements removed across all cleaned files.
    pub removed_nodes: usize,
}

impl CleanSummary {
    pub fn record(&mut self, outcome: &CleanOutcome) {
        match outcome {
            CleanOutcome::Cleaned { removed, .. } => {
                self.cleaned += 1;
                self.removed_nodes += removed;
            }
            CleanOutcome::NoMatch => self.unmatched += 1,
            CleanOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Everything [`crate::clean_batch`] produced.
#[derive(Debug, Clone, Serialize)]
pub struct CleanRun {
    pub selector: String,
    pub reports: Vec<CleanReport>,
    pub summary: CleanSummary,
}
