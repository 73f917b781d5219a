//! Progress-callback traits for per-file batch events.
//!
//! Inject an `Arc<dyn ConvertProgressCallback>` via
//! [`crate::config::PdfConfigBuilder::progress_callback`] (or the cleaner
//! equivalent) to receive events as the batch processes each file.
//!
//! # Example
//!
//! ```rust
//! use html_batch::{ConvertProgressCallback, ConvertReport, PdfConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl ConvertProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, report: &ConvertReport) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, report.input.display());
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { done: AtomicUsize::new(0) });
//! let config = PdfConfig::builder("page.html")
//!     .progress_callback(cb as Arc<dyn ConvertProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{CleanReport, CleanSummary, ConvertReport, RunSummary};
use std::path::Path;
use std::sync::Arc;

/// Called by [`crate::convert_batch`] as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based.
pub trait ConvertProgressCallback: Send + Sync {
    /// Called once after collection, before the first file.
    fn on_batch_start(&self, total_files: usize, force: bool) {
        let _ = (total_files, force);
    }

    /// An explicit output name was dropped because several files were collected.
    fn on_output_name_ignored(&self, name: &Path, total_files: usize) {
        let _ = (name, total_files);
    }

    /// Called just before the skip check and browser launch for a file.
    fn on_file_start(&self, index: usize, total_files: usize, input: &Path) {
        let _ = (index, total_files, input);
    }

    /// Called with the terminal outcome of a file.
    fn on_file_complete(&self, index: usize, total_files: usize, report: &ConvertReport) {
        let _ = (index, total_files, report);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// Called by [`crate::clean_batch`] as it processes each file.
pub trait CleanProgressCallback: Send + Sync {
    /// Called once the matching files are known.
    fn on_batch_start(&self, total_files: usize, selector: &str) {
        let _ = (total_files, selector);
    }

    /// Called with the outcome of a file. `index` is 1-based.
    fn on_file_complete(&self, index: usize, total_files: usize, report: &CleanReport) {
        let _ = (index, total_files, report);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, summary: &CleanSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConvertProgressCallback for NoopProgressCallback {}
impl CleanProgressCallback for NoopProgressCallback {}

/// Type stored in [`crate::config::PdfConfig`].
pub type ConvertProgress = Arc<dyn ConvertProgressCallback>;

/// Type stored in [`crate::config::CleanConfig`].
pub type CleanProgress = Arc<dyn CleanProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{CleanOutcome, ConvertOutcome};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        skipped: AtomicUsize,
    }

    impl ConvertProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_files: usize, _force: bool) {
            self.started_total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _index: usize, _total: usize, _input: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _index: usize, _total: usize, report: &ConvertReport) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            if report.outcome.is_skipped() {
                self.skipped.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn report(outcome: ConvertOutcome) -> ConvertReport {
        ConvertReport {
            input: PathBuf::from("a.html"),
            output: PathBuf::from("a.pdf"),
            outcome,
            duration_ms: 0,
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        ConvertProgressCallback::on_batch_start(&cb, 2, false);
        cb.on_output_name_ignored(Path::new("x.pdf"), 2);
        cb.on_file_start(1, 2, Path::new("a.html"));
        ConvertProgressCallback::on_file_complete(&cb, 1, 2, &report(ConvertOutcome::Skipped));
        ConvertProgressCallback::on_batch_complete(&cb, &RunSummary::default());

        CleanProgressCallback::on_batch_start(&cb, 1, "p");
        CleanProgressCallback::on_file_complete(
            &cb,
            1,
            1,
            &CleanReport {
                path: PathBuf::from("a.html"),
                outcome: CleanOutcome::NoMatch,
            },
        );
        CleanProgressCallback::on_batch_complete(&cb, &CleanSummary::default());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_batch_start(2, false);
        tracker.on_file_start(1, 2, Path::new("a.html"));
        tracker.on_file_complete(1, 2, &report(ConvertOutcome::Skipped));
        tracker.on_file_start(2, 2, Path::new("b.html"));
        tracker.on_file_complete(2, 2, &report(ConvertOutcome::Converted { overwritten: false }));

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.skipped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ConvertProgress = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10, true);
        let cb: CleanProgress = Arc::new(NoopProgressCallback);
        cb.on_batch_start(3, "div");
    }
}
