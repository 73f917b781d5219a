//! CLI binary: print local HTML files to PDF with a headless browser.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PdfConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use html_batch::{
    convert, ConvertOutcome, ConvertProgress, ConvertProgressCallback, ConvertReport, PdfConfig,
    RunSummary,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Per-file status lines, optionally above an [indicatif] progress bar.
///
/// The bar stays hidden until the batch starts, so nothing is drawn when the
/// browser cannot be found.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(with_bar: bool) -> Arc<Self> {
        Arc::new(Self {
            bar: with_bar.then(ProgressBar::hidden),
        })
    }

    fn line(&self, text: String) {
        match &self.bar {
            Some(bar) if !bar.is_hidden() => bar.println(text),
            _ => println!("{text}"),
        }
    }

    fn activate_bar(&self, total: usize) {
        let Some(bar) = &self.bar else { return };
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.set_length(total as u64);
        bar.set_style(style);
        bar.set_prefix("Printing");
        bar.enable_steady_tick(Duration::from_millis(80));
    }
}

impl ConvertProgressCallback for CliProgressCallback {
    fn on_output_name_ignored(&self, name: &Path, total_files: usize) {
        self.line(format!(
            "{} {} files collected; ignoring -o/--output '{}' (use -d/--output-dir instead)",
            yellow("⚠"),
            total_files,
            name.display()
        ));
    }

    fn on_batch_start(&self, total_files: usize, force: bool) {
        self.activate_bar(total_files);
        self.line(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Processing {total_files} files (overwrite: {})…",
                if force { "on" } else { "off" }
            ))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        if let Some(bar) = &self.bar {
            bar.set_message(file_name(input));
        }
    }

    fn on_file_complete(&self, _index: usize, _total: usize, report: &ConvertReport) {
        let input = file_name(&report.input);
        let output = file_name(&report.output);
        let elapsed = dim(&format!("{:.1}s", report.duration_ms as f64 / 1000.0));
        let text = match &report.outcome {
            ConvertOutcome::Converted { overwritten: false } => {
                format!("  {} [converted]   {input} -> {output}  {elapsed}", green("✓"))
            }
            ConvertOutcome::Converted { overwritten: true } => {
                format!("  {} [overwritten] {input} -> {output}  {elapsed}", green("✓"))
            }
            ConvertOutcome::Skipped => {
                format!("  {} [skipped]     {output} already exists", dim("⏭"))
            }
            ConvertOutcome::Failed { error } => {
                let msg = error.to_string();
                let msg = if msg.chars().count() > 200 {
                    format!("{}\u{2026}", msg.chars().take(199).collect::<String>())
                } else {
                    msg
                };
                format!("  {} [failed]      {input}: {}", red("✗"), red(&msg))
            }
        };
        self.line(text);
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _summary: &RunSummary) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Single file (writes document.pdf next to it)
  html2pdf document.html

  # Single file with an explicit output name
  html2pdf index.html -o report.pdf

  # Every .html/.htm file in a directory (top level only)
  html2pdf ./docs

  # Recursive, all PDFs into one directory
  html2pdf ./docs -r -d ./all_pdfs

  # Regenerate PDFs that already exist (skipped by default)
  html2pdf ./docs -r -f

  # Prefer Microsoft Edge, or name the browser explicitly
  html2pdf input.html --edge
  html2pdf input.html --browser-path "C:/Program Files/Google/Chrome/Application/chrome.exe"

  # Running as root in a container
  html2pdf ./docs --browser-arg=--no-sandbox

BROWSER SEARCH ORDER:
  Windows  Chrome (Program Files, x86, per-user), then Edge; --edge searches Edge only
  macOS    Google Chrome, then Microsoft Edge; --edge tries Edge first
  Linux    google-chrome(-stable), chromium(-browser), snap chromium, then
           microsoft-edge(-stable); --edge tries Edge first

ENVIRONMENT VARIABLES:
  CHROME_PATH   Browser executable (same as --browser-path)
  RUST_LOG      Override the log filter (e.g. RUST_LOG=html_batch=debug)
"#;

/// Convert local HTML files to PDF using a headless Chrome/Edge.
#[derive(Parser, Debug)]
#[command(
    name = "html2pdf",
    version,
    about = "Convert local HTML files to PDF using a headless Chrome/Edge",
    long_about = "Convert a single HTML file or every .html/.htm file in a directory to PDF \
by driving an installed Chromium-family browser in headless print-to-PDF mode. Existing PDFs \
are skipped unless --force is given.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input HTML file or directory.
    input: PathBuf,

    /// Output PDF name (only honoured for a single input file).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory receiving every PDF (recommended for batches).
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Search subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// Overwrite existing PDF files.
    #[arg(short, long)]
    force: bool,

    /// Browser executable to use instead of searching install locations.
    #[arg(long, env = "CHROME_PATH")]
    browser_path: Option<PathBuf>,

    /// Prefer Microsoft Edge.
    #[arg(long)]
    edge: bool,

    /// Per-file browser time limit in seconds (0 disables).
    #[arg(long, default_value_t = html_batch::config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Extra browser flag, inserted before the file URL (repeatable).
    #[arg(long = "browser-arg", value_name = "ARG", allow_hyphen_values = true)]
    browser_args: Vec<String>,

    /// Print the full run (ConversionRun) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Status lines carry the per-file feedback; library warnings (missing
    // input, ignored --browser-path) still reach stderr unless --quiet.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let human = !cli.quiet && !cli.json;
    let show_progress = human && !cli.no_progress;

    let progress_cb: Option<ConvertProgress> = human.then(|| {
        CliProgressCallback::new(show_progress) as Arc<dyn ConvertProgressCallback>
    });

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let run = convert(&config).await.context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&run).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if human {
        let s = &run.summary;
        if s.total == 0 {
            println!("No HTML files found.");
            return Ok(());
        }
        println!();
        println!(
            "{} Done: {} converted, {} skipped, {} failed  {}",
            if s.failed == 0 { green("✔") } else { yellow("⚠") },
            bold(&s.converted.to_string()),
            s.skipped,
            if s.failed == 0 {
                s.failed.to_string()
            } else {
                red(&s.failed.to_string())
            },
            dim(&format!("{}ms", s.duration_ms)),
        );
        if s.skipped > 0 {
            println!("   (hint: add -f to regenerate skipped files)");
        }
    }

    Ok(())
}

/// Map CLI args to `PdfConfig`.
fn build_config(cli: &Cli, progress: Option<ConvertProgress>) -> Result<PdfConfig> {
    let mut builder = PdfConfig::builder(&cli.input)
        .recursive(cli.recursive)
        .force(cli.force)
        .prefer_edge(cli.edge)
        .timeout_secs(cli.timeout);

    if let Some(ref name) = cli.output {
        builder = builder.output_name(name);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref path) = cli.browser_path {
        builder = builder.browser_path(path);
    }
    for arg in &cli.browser_args {
        builder = builder.browser_arg(arg);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
