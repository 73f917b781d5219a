//! Selector-based cleaning batch entry point.

use crate::config::CleanConfig;
use crate::error::BatchError;
use crate::output::{CleanReport, CleanRun, CleanSummary};
use crate::pipeline::clean::clean_file;
use crate::pipeline::pattern::FilePattern;
use std::fs;
use tracing::{debug, info};

/// Remove every element matching `config.selector` from each file matching
/// `config.pattern` inside `config.input_dir`.
///
/// # Errors
/// Fatal only before the first file is touched: an invalid selector or
/// pattern, a missing input directory, or an output directory that cannot be
/// created. Per-file failures are recorded in the reports.
pub fn clean_batch(config: &CleanConfig) -> Result<CleanRun, BatchError> {
    let matcher = config.matcher()?;
    let pattern = FilePattern::new(&config.pattern)?;

    if !config.input_dir.exists() {
        return Err(BatchError::InputNotFound {
            path: config.input_dir.clone(),
        });
    }

    if let Some(ref dir) = config.output_dir {
        fs::create_dir_all(dir).map_err(|e| BatchError::OutputDirFailed {
            path: dir.clone(),
            source: e,
        })?;
    }

    let files = pattern.find_in(&config.input_dir);
    let total = files.len();
    info!(
        "Cleaning {} files matching '{}' in {} (selector: {})",
        total,
        pattern.as_str(),
        config.input_dir.display(),
        config.selector
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total, &config.selector);
    }

    let mut summary = CleanSummary {
        total,
        ..Default::default()
    };
    let mut reports = Vec::with_capacity(total);
    for (i, path) in files.into_iter().enumerate() {
        let outcome = clean_file(
            &path,
            &matcher,
            config.output_dir.as_deref(),
            &config.encodings,
        );
        debug!("{}: {:?}", path.display(), outcome);
        summary.record(&outcome);

        let report = CleanReport { path, outcome };
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_complete(i + 1, total, &report);
        }
        reports.push(report);
    }

    info!(
        "Cleaning complete: {} cleaned, {} unmatched, {} failed, {} elements removed",
        summary.cleaned, summary.unmatched, summary.failed, summary.removed_nodes
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&summary);
    }

    Ok(CleanRun {
        selector: config.selector.clone(),
        reports,
        summary,
    })
}
