//! # html-batch
//!
//! Batch utilities for local HTML files: print them to PDF through a headless
//! Chromium-family browser, or strip unwanted elements with a CSS selector.
//!
//! ## Pipeline Overview
//!
//! ```text
//! html2pdf
//!  ├─ 1. Locate   Chrome / Edge / Chromium, or a user-supplied executable
//!  ├─ 2. Collect  a single file, or .html/.htm files in a directory tree
//!  ├─ 3. Resolve  destination PDF per file (dir > explicit name > sibling)
//!  └─ 4. Invoke   one headless --print-to-pdf run per file, skip if present
//!
//! html-clean
//!  ├─ 1. Match    glob pattern inside the input directory
//!  ├─ 2. Decode   first encoding that accepts the bytes (UTF-8, then GBK)
//!  ├─ 3. Clean    remove every element matching the selector
//!  └─ 4. Write    re-encode in the original encoding, in place or to a dir
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html_batch::{convert, PdfConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PdfConfig::builder("./docs")
//!         .recursive(true)
//!         .output_dir("./pdfs")
//!         .build()?;
//!     let run = convert(&config).await?;
//!     eprintln!(
//!         "{} converted, {} skipped, {} failed",
//!         run.summary.converted, run.summary.skipped, run.summary.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ```rust,no_run
//! use html_batch::{clean_batch, CleanConfig};
//!
//! let config = CleanConfig::builder(".content script")
//!     .input_dir("./input")
//!     .output_dir("./output")
//!     .build()?;
//! let run = clean_batch(&config)?;
//! println!("removed {} elements", run.summary.removed_nodes);
//! # Ok::<(), html_batch::BatchError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `html2pdf` and `html-clean` binaries (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! html-batch = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clean;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use browser_locate::{locate_browser, LocateError, Platform};
pub use clean::clean_batch;
pub use config::{CleanConfig, CleanConfigBuilder, PdfConfig, PdfConfigBuilder};
pub use convert::{convert, convert_batch, convert_file, convert_sync, ConversionJob};
pub use error::{BatchError, FileError};
pub use output::{
    CleanOutcome, CleanReport, CleanRun, CleanSummary, ConversionRun, ConvertOutcome,
    ConvertReport, RunSummary,
};
pub use pipeline::invoke::{CommandOutput, CommandRunner, Invocation, RunError, TokioCommandRunner};
pub use progress::{
    CleanProgress, CleanProgressCallback, ConvertProgress, ConvertProgressCallback,
    NoopProgressCallback,
};
