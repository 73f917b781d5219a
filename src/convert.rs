//! HTML-to-PDF batch entry points.
//!
//! [`convert_batch`] is generic over the [`CommandRunner`] so the whole
//! pipeline can be driven without a browser installed. [`convert`] and
//! [`convert_sync`] wire in the real [`TokioCommandRunner`].

use crate::config::PdfConfig;
use crate::error::{BatchError, FileError};
use crate::output::{ConversionRun, ConvertOutcome, ConvertReport, RunSummary};
use crate::pipeline::invoke::{
    self, CommandRunner, Invocation, InvocationOptions, RunError, TokioCommandRunner,
};
use crate::pipeline::{collect, resolve};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One input file and where its PDF goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Re-run the browser even when `output_path` already exists.
    pub overwrite_allowed: bool,
}

/// Convert every HTML file selected by `config`.
///
/// # Errors
/// Returns `Err(BatchError)` only when the batch cannot start, i.e. no
/// browser executable was found. A missing input or an empty directory
/// yields a run with `total == 0`; per-file failures are recorded in the
/// reports.
pub async fn convert_batch<R: CommandRunner>(
    config: &PdfConfig,
    runner: &R,
) -> Result<ConversionRun, BatchError> {
    let start = Instant::now();

    // ── Step 1: Locate the browser ───────────────────────────────────────
    let browser =
        browser_locate::locate_browser(config.browser_path.as_deref(), config.prefer_edge)?;
    info!("Using browser: {}", browser.display());

    // ── Step 2: Collect input files ──────────────────────────────────────
    let files = collect::collect_files(&config.input, config.recursive);
    let total = files.len();
    let mut summary = RunSummary {
        total,
        ..Default::default()
    };

    if files.is_empty() {
        info!("No HTML files found under {}", config.input.display());
        summary.duration_ms = start.elapsed().as_millis() as u64;
        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(&summary);
        }
        return Ok(ConversionRun {
            browser,
            reports: Vec::new(),
            summary,
        });
    }

    // ── Step 3: Apply the single-file output-name policy ─────────────────
    let policy = resolve::effective_output_name(total, config.output_name.as_deref());
    if policy.ignored {
        summary.output_name_ignored = true;
        if let Some(name) = config.output_name.as_deref() {
            warn!(
                "Ignoring output name '{}' for {} input files; use an output directory instead",
                name.display(),
                total
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_output_name_ignored(name, total);
            }
        }
    }

    info!("Processing {} files (overwrite: {})", total, config.force);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total, config.force);
    }

    // ── Step 4: Convert sequentially ─────────────────────────────────────
    let options = InvocationOptions {
        timeout: config.timeout,
        extra_args: config.browser_args.clone(),
    };
    let mut reports = Vec::with_capacity(total);
    for (i, input) in files.into_iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, &input);
        }

        let job = ConversionJob {
            output_path: resolve::resolve_output_path(
                &input,
                policy.effective,
                config.output_dir.as_deref(),
            ),
            input_path: input,
            overwrite_allowed: config.force,
        };

        let file_start = Instant::now();
        let outcome = convert_file(runner, &browser, &job, &options).await;
        summary.record(&outcome);

        let report = ConvertReport {
            input: job.input_path,
            output: job.output_path,
            outcome,
            duration_ms: file_start.elapsed().as_millis() as u64,
        };
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_complete(index, total, &report);
        }
        reports.push(report);
    }

    summary.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Batch complete: {} converted, {} skipped, {} failed in {}ms",
        summary.converted, summary.skipped, summary.failed, summary.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&summary);
    }

    Ok(ConversionRun {
        browser,
        reports,
        summary,
    })
}

/// Convert with the real browser subprocess runner.
pub async fn convert(config: &PdfConfig) -> Result<ConversionRun, BatchError> {
    convert_batch(config, &TokioCommandRunner).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(config: &PdfConfig) -> Result<ConversionRun, BatchError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BatchError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(config))
}

/// Run one job to its terminal outcome.
///
/// Never returns an error: every failure becomes [`ConvertOutcome::Failed`].
pub async fn convert_file<R: CommandRunner>(
    runner: &R,
    browser: &Path,
    job: &ConversionJob,
    options: &InvocationOptions,
) -> ConvertOutcome {
    let abs_input = match std::path::absolute(&job.input_path) {
        Ok(p) => p,
        Err(e) => {
            return ConvertOutcome::Failed {
                error: FileError::ReadFailed {
                    path: job.input_path.clone(),
                    detail: e.to_string(),
                },
            }
        }
    };
    let abs_output = match std::path::absolute(&job.output_path) {
        Ok(p) => p,
        Err(e) => {
            return ConvertOutcome::Failed {
                error: FileError::WriteFailed {
                    path: job.output_path.clone(),
                    detail: e.to_string(),
                },
            }
        }
    };

    let existed = abs_output.exists();
    if existed && !job.overwrite_allowed {
        debug!("Skipping {}: {} exists", job.input_path.display(), abs_output.display());
        return ConvertOutcome::Skipped;
    }

    if let Some(parent) = abs_output.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return ConvertOutcome::Failed {
                error: FileError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    detail: e.to_string(),
                },
            };
        }
    }

    let url = invoke::file_url(&abs_input, cfg!(windows));
    let invocation = Invocation {
        program: browser.to_path_buf(),
        args: invoke::print_to_pdf_args(&abs_output, &url, &options.extra_args),
        timeout: options.timeout,
    };

    match runner.run(&invocation).await {
        Ok(output) if output.success() => ConvertOutcome::Converted {
            overwritten: existed,
        },
        Ok(output) => {
            let stderr = output.stderr_lossy();
            warn!(
                "Browser failed on {} (code {:?}): {}",
                job.input_path.display(),
                output.code,
                stderr.trim()
            );
            ConvertOutcome::Failed {
                error: FileError::BrowserExited {
                    code: output.code,
                    stderr,
                },
            }
        }
        Err(RunError::Launch(e)) => ConvertOutcome::Failed {
            error: FileError::LaunchFailed {
                program: browser.to_path_buf(),
                detail: e.to_string(),
            },
        },
        Err(RunError::TimedOut(limit)) => {
            warn!(
                "Browser timed out on {} after {}",
                job.input_path.display(),
                invoke::format_limit(&limit)
            );
            ConvertOutcome::Failed {
                error: FileError::TimedOut {
                    millis: limit.as_millis() as u64,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::invoke::CommandOutput;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records invocations and replays a fixed result.
    struct FakeRunner {
        calls: Mutex<Vec<Invocation>>,
        result: fn() -> Result<CommandOutput, RunError>,
    }

    impl FakeRunner {
        fn new(result: fn() -> Result<CommandOutput, RunError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                result,
            }
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
            self.calls.lock().unwrap().push(invocation.clone());
            (self.result)()
        }
    }

    fn ok() -> Result<CommandOutput, RunError> {
        Ok(CommandOutput {
            code: Some(0),
            stderr: Vec::new(),
        })
    }

    fn job(dir: &TempDir, overwrite: bool) -> ConversionJob {
        let input = dir.path().join("page.html");
        std::fs::write(&input, "<p>x</p>").unwrap();
        ConversionJob {
            output_path: dir.path().join("out").join("page.pdf"),
            input_path: input,
            overwrite_allowed: overwrite,
        }
    }

    #[tokio::test]
    async fn converts_and_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, false);
        let runner = FakeRunner::new(ok);

        let outcome = convert_file(&runner, Path::new("/bin/chrome"), &job, &Default::default()).await;
        assert_eq!(outcome, ConvertOutcome::Converted { overwritten: false });
        assert!(dir.path().join("out").is_dir());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/bin/chrome"));
        assert_eq!(calls[0].args[0], "--headless");
        assert!(calls[0].args.last().unwrap().starts_with("file://"));
        assert!(calls[0].args.last().unwrap().ends_with("page.html"));
    }

    #[tokio::test]
    async fn existing_output_is_skipped_without_launch() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, false);
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        std::fs::write(&job.output_path, "%PDF").unwrap();
        let runner = FakeRunner::new(ok);

        let outcome = convert_file(&runner, Path::new("chrome"), &job, &Default::default()).await;
        assert_eq!(outcome, ConvertOutcome::Skipped);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn force_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, true);
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        std::fs::write(&job.output_path, "%PDF").unwrap();
        let runner = FakeRunner::new(ok);

        let outcome = convert_file(&runner, Path::new("chrome"), &job, &Default::default()).await;
        assert_eq!(outcome, ConvertOutcome::Converted { overwritten: true });
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure_with_stderr() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(|| {
            Ok(CommandOutput {
                code: Some(1),
                stderr: b"render error".to_vec(),
            })
        });
        let outcome = convert_file(&runner, Path::new("chrome"), &job(&dir, false), &Default::default()).await;
        assert_eq!(
            outcome,
            ConvertOutcome::Failed {
                error: FileError::BrowserExited {
                    code: Some(1),
                    stderr: "render error".into(),
                }
            }
        );
    }

    #[tokio::test]
    async fn timeout_and_launch_errors_map_to_file_errors() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(|| Err(RunError::TimedOut(Duration::from_millis(7500))));
        let outcome = convert_file(&runner, Path::new("chrome"), &job(&dir, false), &Default::default()).await;
        assert_eq!(
            outcome,
            ConvertOutcome::Failed {
                error: FileError::TimedOut { millis: 7500 }
            }
        );

        let runner = FakeRunner::new(|| {
            Err(RunError::Launch(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )))
        });
        let outcome = convert_file(&runner, Path::new("chrome"), &job(&dir, true), &Default::default()).await;
        assert!(matches!(
            outcome,
            ConvertOutcome::Failed {
                error: FileError::LaunchFailed { .. }
            }
        ));
    }

    #[tokio::test]
    async fn unresolvable_output_path_is_a_write_failure() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(ok);
        let job = ConversionJob {
            output_path: PathBuf::new(),
            ..job(&dir, false)
        };
        let outcome = convert_file(&runner, Path::new("chrome"), &job, &Default::default()).await;

        assert!(matches!(
            outcome,
            ConvertOutcome::Failed {
                error: FileError::WriteFailed { .. }
            }
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn extra_args_and_timeout_reach_invocation() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(ok);
        let options = InvocationOptions {
            timeout: Some(Duration::from_secs(30)),
            extra_args: vec!["--no-sandbox".into()],
        };
        convert_file(&runner, Path::new("chrome"), &job(&dir, false), &options).await;

        let call = &runner.calls()[0];
        assert_eq!(call.timeout, Some(Duration::from_secs(30)));
        let n = call.args.len();
        assert_eq!(call.args[n - 2], "--no-sandbox");
    }
}
