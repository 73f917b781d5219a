//! Error types for the html-batch library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the batch cannot start at all (no browser,
//!   missing input directory, unparsable selector). Returned as
//!   `Err(BatchError)` from [`crate::convert_batch`] and [`crate::clean_batch`].
//!
//! * [`FileError`] — **Non-fatal**: one file failed (decode error, browser
//!   exited non-zero) but the rest of the batch carries on. Stored inside the
//!   per-file outcome in [`crate::output`].

use crate::pipeline::invoke::format_limit;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// All fatal errors returned by the html-batch library.
///
/// Per-file failures use [`FileError`] and are recorded in the run reports.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Setup errors ──────────────────────────────────────────────────────
    /// No browser executable could be located.
    #[error(transparent)]
    BrowserNotFound(#[from] browser_locate::LocateError),

    /// The input directory does not exist.
    #[error("Input directory not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// The output directory could not be created.
    #[error("Cannot create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Argument errors ───────────────────────────────────────────────────
    /// The CSS selector did not parse.
    #[error("Invalid CSS selector '{selector}': {detail}")]
    InvalidSelector { selector: String, detail: String },

    /// The file pattern did not parse.
    #[error("Invalid file pattern '{pattern}': {detail}")]
    InvalidPattern { pattern: String, detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileError {
    /// The file could not be read.
    #[error("cannot read '{path}': {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// None of the candidate encodings decoded the file cleanly.
    #[error("cannot decode '{path}' as any of [{}]", .tried.join(", "))]
    DecodeFailed { path: PathBuf, tried: Vec<String> },

    /// The cleaned document could not be written.
    #[error("cannot write '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },

    /// The destination's parent directory could not be created.
    #[error("cannot create directory '{path}': {detail}")]
    CreateDirFailed { path: PathBuf, detail: String },

    /// The browser process could not be started.
    #[error("failed to launch '{program}': {detail}")]
    LaunchFailed { program: PathBuf, detail: String },

    /// The browser ran but exited unsuccessfully.
    #[error("browser exited with {}: {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}")), .stderr.trim())]
    BrowserExited { code: Option<i32>, stderr: String },

    /// The browser did not finish in time and was killed.
    #[error("browser timed out after {}", millis_label(.millis))]
    TimedOut { millis: u64 },
}

fn millis_label(millis: &u64) -> String {
    format_limit(&Duration::from_millis(*millis))
}
