//! Browser invocation: the print-to-PDF command line and the subprocess seam.
//!
//! The conversion driver never spawns processes itself. It hands an
//! [`Invocation`] to a [`CommandRunner`], which reports the exit code and the
//! captured stderr. [`TokioCommandRunner`] is the real implementation; tests
//! plug in recording fakes.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A fully-specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Kill the process if it runs longer than this.
    pub timeout: Option<Duration>,
}

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stderr decoded as UTF-8, with invalid sequences replaced.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Why a command produced no [`CommandOutput`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Spawning or waiting on the process failed.
    #[error("{0}")]
    Launch(#[from] std::io::Error),

    /// The process exceeded [`Invocation::timeout`] and was killed.
    #[error("timed out after {}", format_limit(.0))]
    TimedOut(Duration),
}

/// Human-readable time limit: whole seconds as `7s`, otherwise `0.250s`.
pub fn format_limit(limit: &Duration) -> String {
    if limit.subsec_nanos() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{:.3}s", limit.as_secs_f64())
    }
}

/// Runs an external command to completion.
pub trait CommandRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<CommandOutput, RunError>> + Send;
}

/// Spawns real processes with `tokio::process`.
///
/// Stdout is discarded and stderr captured. With a timeout the child is
/// killed when the limit expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        debug!(
            "Launching {} with {} args",
            invocation.program.display(),
            invocation.args.len()
        );
        let child = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let wait = child.wait_with_output();
        let output = match invocation.timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| RunError::TimedOut(limit))??,
            None => wait.await?,
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stderr: output.stderr,
        })
    }
}

/// Options shared by every browser launch in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOptions {
    pub timeout: Option<Duration>,
    /// Inserted after the fixed flags, before the URL.
    pub extra_args: Vec<String>,
}

/// Build a `file://` URL for an absolute path.
///
/// Backslashes become forward slashes. Windows paths (`C:/...`) need the
/// three-slash form; elsewhere the path already starts with `/`.
pub fn file_url(abs_path: &Path, windows: bool) -> String {
    let normalized = abs_path.to_string_lossy().replace('\\', "/");
    let prefix = if windows { "file:///" } else { "file://" };
    format!("{prefix}{normalized}")
}

/// Headless print-to-PDF argument list for one file.
pub fn print_to_pdf_args(abs_output: &Path, url: &str, extra: &[String]) -> Vec<String> {
    let mut args = vec![
        "--headless".to_string(),
        "--disable-gpu".to_string(),
        format!("--print-to-pdf={}", abs_output.display()),
        "--no-pdf-header-footer".to_string(),
    ];
    args.extend(extra.iter().cloned());
    args.push(url.to_string());
    args
}
