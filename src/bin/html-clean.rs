//! CLI binary: remove elements matching a CSS selector from HTML files.

use anyhow::{bail, Context, Result};
use clap::Parser;
use html_batch::pipeline::encoding::encoding_for_label;
use html_batch::{
    clean_batch, BatchError, CleanConfig, CleanOutcome, CleanProgress, CleanProgressCallback,
    CleanReport, CleanSummary,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const RULE: &str = "------------------------------";

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Plain per-file status lines on stdout.
struct LinePrinter {
    pattern: String,
    input_dir: PathBuf,
}

impl CleanProgressCallback for LinePrinter {
    fn on_batch_start(&self, total_files: usize, selector: &str) {
        if total_files == 0 {
            println!(
                "No files matching '{}' found in '{}'.",
                self.pattern,
                self.input_dir.display()
            );
            return;
        }
        println!("--- Cleaning ---");
        println!("Selector: {selector}");
        println!("Files found: {total_files}");
        println!("{RULE}");
    }

    fn on_file_complete(&self, _index: usize, _total: usize, report: &CleanReport) {
        let name = file_name(&report.path);
        match &report.outcome {
            CleanOutcome::Cleaned {
                removed,
                saved_to,
                in_place,
                ..
            } => {
                let action = if *in_place { "overwritten" } else { "saved" };
                println!("[{action}] removed {removed} -> {}", file_name(saved_to));
            }
            CleanOutcome::NoMatch => println!("[skipped] no match for selector: {name}"),
            CleanOutcome::Failed { error } => println!("[failed] {name}: {error}"),
        }
    }

    fn on_batch_complete(&self, summary: &CleanSummary) {
        if summary.total == 0 {
            return;
        }
        println!("{RULE}");
        println!(
            "Done. {} cleaned, {} unmatched, {} failed ({} elements removed).",
            summary.cleaned, summary.unmatched, summary.failed, summary.removed_nodes
        );
    }
}

const AFTER_HELP: &str = r##"EXAMPLES:
  # Remove the element with id 'js_row_immersive_stream_wrap' (files rewritten in place)
  html-clean -s "#js_row_immersive_stream_wrap"

  # Remove div.ad-banner and save cleaned copies to a new directory
  html-clean -i ./input -o ./output -s "div.ad-banner"

  # Only .htm files, remove the '.trash' class
  html-clean -s ".trash" -p "*.htm"

  # Complex selector: every script inside .content
  html-clean -s ".content script"

  # Try Shift_JIS before falling back to UTF-8
  html-clean -s "aside" -e shift_jis -e utf-8

ENCODINGS:
  Files are decoded with the first -e encoding that accepts every byte
  (default: utf-8, then gbk) and written back in that same encoding.
"##;

/// Batch-remove HTML elements by CSS selector.
#[derive(Parser, Debug)]
#[command(
    name = "html-clean",
    version,
    about = "Batch-remove HTML elements by CSS selector",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// CSS selector of the elements to remove (e.g. "#id", ".class").
    #[arg(short, long)]
    selector: String,

    /// File pattern inside the input directory.
    #[arg(short, long, default_value = html_batch::config::DEFAULT_PATTERN)]
    pattern: String,

    /// Input directory.
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Output directory (default: overwrite the original files).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Decode candidate, tried in order (repeatable).
    #[arg(short, long = "encoding", value_name = "LABEL")]
    encodings: Vec<String>,

    /// Print the full run (CleanRun) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

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
    let printer: Option<CleanProgress> = human.then(|| {
        Arc::new(LinePrinter {
            pattern: cli.pattern.clone(),
            input_dir: cli.input.clone(),
        }) as Arc<dyn CleanProgressCallback>
    });

    let config = build_config(&cli, printer)?;

    let run = match clean_batch(&config) {
        Ok(run) => run,
        // Missing or unwritable directories are reported, not fatal.
        Err(e @ (BatchError::InputNotFound { .. } | BatchError::OutputDirFailed { .. })) => {
            eprintln!("Error: {e}");
            return Ok(());
        }
        Err(e) => return Err(e).context("Cleaning failed"),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&run).context("Failed to serialise output")?;
        println!("{json}");
    }

    Ok(())
}

/// Map CLI args to `CleanConfig`.
fn build_config(cli: &Cli, progress: Option<CleanProgress>) -> Result<CleanConfig> {
    let mut encodings = Vec::with_capacity(cli.encodings.len());
    for label in &cli.encodings {
        match encoding_for_label(label) {
            Some(enc) => encodings.push(enc),
            None => bail!("Unknown encoding label '{label}'"),
        }
    }

    let mut builder = CleanConfig::builder(&cli.selector)
        .pattern(&cli.pattern)
        .input_dir(&cli.input)
        .encodings(encodings);

    if let Some(ref dir) = cli.output {
        builder = builder.output_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
