//! Configuration types for both batch tools.
//!
//! All batch behaviour is controlled through [`PdfConfig`] and
//! [`CleanConfig`], each built via its builder. A config is passed by
//! reference into every stage; nothing reads process-wide argument state.

use crate::error::BatchError;
use crate::pipeline::encoding;
use crate::pipeline::pattern::FilePattern;
use crate::progress::{CleanProgress, ConvertProgress};
use dom_query::Matcher;
use encoding_rs::Encoding;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-file browser time limit.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default cleaner file pattern.
pub const DEFAULT_PATTERN: &str = "*.html";

// ── HTML → PDF ───────────────────────────────────────────────────────────

/// Configuration for an HTML-to-PDF batch.
///
/// # Example
/// ```rust
/// use html_batch::PdfConfig;
///
/// let config = PdfConfig::builder("./docs")
///     .recursive(true)
///     .output_dir("./pdfs")
///     .build()
///     .unwrap();
/// assert!(config.recursive);
/// ```
#[derive(Clone)]
pub struct PdfConfig {
    /// File or directory to convert.
    pub input: PathBuf,

    /// Explicit destination file name. Only honoured when exactly one input
    /// file is collected; dropped with a warning otherwise.
    pub output_name: Option<PathBuf>,

    /// Directory receiving every PDF. Takes precedence over `output_name`.
    pub output_dir: Option<PathBuf>,

    /// Walk subdirectories when `input` is a directory. Default: false.
    pub recursive: bool,

    /// Overwrite existing PDFs instead of skipping them. Default: false.
    pub force: bool,

    /// Browser executable to use instead of searching install locations.
    pub browser_path: Option<PathBuf>,

    /// Search for Microsoft Edge before Chrome. Default: false.
    pub prefer_edge: bool,

    /// Per-file time limit for the browser process. Default: 120 s.
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Extra flags passed to the browser before the target URL.
    pub browser_args: Vec<String>,

    /// Optional per-file progress callback.
    pub progress_callback: Option<ConvertProgress>,
}

impl fmt::Debug for PdfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfConfig")
            .field("input", &self.input)
            .field("output_name", &self.output_name)
            .field("output_dir", &self.output_dir)
            .field("recursive", &self.recursive)
            .field("force", &self.force)
            .field("browser_path", &self.browser_path)
            .field("prefer_edge", &self.prefer_edge)
            .field("timeout", &self.timeout)
            .field("browser_args", &self.browser_args)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConvertProgressCallback>"),
            )
            .finish()
    }
}

impl PdfConfig {
    /// Create a new builder for `PdfConfig`.
    pub fn builder(input: impl Into<PathBuf>) -> PdfConfigBuilder {
        PdfConfigBuilder {
            config: Self {
                input: input.into(),
                output_name: None,
                output_dir: None,
                recursive: false,
                force: false,
                browser_path: None,
                prefer_edge: false,
                timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
                browser_args: Vec::new(),
                progress_callback: None,
            },
        }
    }
}

/// Builder for [`PdfConfig`].
pub struct PdfConfigBuilder {
    config: PdfConfig,
}

impl PdfConfigBuilder {
    pub fn output_name(mut self, name: impl Into<PathBuf>) -> Self {
        self.config.output_name = Some(name.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn recursive(mut self, v: bool) -> Self {
        self.config.recursive = v;
        self
    }

    pub fn force(mut self, v: bool) -> Self {
        self.config.force = v;
        self
    }

    pub fn browser_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.browser_path = Some(path.into());
        self
    }

    pub fn prefer_edge(mut self, v: bool) -> Self {
        self.config.prefer_edge = v;
        self
    }

    /// Per-file time limit in seconds; `0` disables the limit.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn browser_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.browser_args.push(arg.into());
        self
    }

    pub fn progress_callback(mut self, cb: ConvertProgress) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PdfConfig, BatchError> {
        let c = &self.config;
        if c.input.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig("input path is empty".into()));
        }
        if let Some(name) = &c.output_name {
            if name.file_name().is_none() {
                return Err(BatchError::InvalidConfig(format!(
                    "output name '{}' has no file name",
                    name.display()
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Cleaner ──────────────────────────────────────────────────────────────

/// Configuration for a selector-based cleaning batch.
///
/// # Example
/// ```rust
/// use html_batch::CleanConfig;
///
/// let config = CleanConfig::builder("div.ad-banner")
///     .input_dir("./input")
///     .output_dir("./output")
///     .build()
///     .unwrap();
/// assert_eq!(config.pattern, "*.html");
/// ```
#[derive(Clone)]
pub struct CleanConfig {
    /// CSS selector of the elements to remove.
    pub selector: String,

    /// Glob pattern for file names inside `input_dir`. Default: `*.html`.
    pub pattern: String,

    /// Directory to scan. Default: the current directory.
    pub input_dir: PathBuf,

    /// Where cleaned files go. `None` rewrites files in place.
    pub output_dir: Option<PathBuf>,

    /// Encodings tried in order when decoding a file. Default: UTF-8, GBK.
    pub encodings: Vec<&'static Encoding>,

    /// Optional per-file progress callback.
    pub progress_callback: Option<CleanProgress>,
}

impl fmt::Debug for CleanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanConfig")
            .field("selector", &self.selector)
            .field("pattern", &self.pattern)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field(
                "encodings",
                &self.encodings.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn CleanProgressCallback>"),
            )
            .finish()
    }
}

impl CleanConfig {
    /// Create a new builder for `CleanConfig`.
    pub fn builder(selector: impl Into<String>) -> CleanConfigBuilder {
        CleanConfigBuilder {
            config: Self {
                selector: selector.into(),
                pattern: DEFAULT_PATTERN.to_string(),
                input_dir: PathBuf::from("."),
                output_dir: None,
                encodings: encoding::default_encodings(),
                progress_callback: None,
            },
        }
    }

    /// Compile [`Self::selector`].
    pub fn matcher(&self) -> Result<Matcher, BatchError> {
        compile_selector(&self.selector)
    }
}

/// Compile a CSS selector, mapping parse failures to [`BatchError::InvalidSelector`].
pub fn compile_selector(selector: &str) -> Result<Matcher, BatchError> {
    if selector.trim().is_empty() {
        return Err(BatchError::InvalidSelector {
            selector: selector.to_string(),
            detail: "selector is empty".into(),
        });
    }
    Matcher::new(selector).map_err(|e| BatchError::InvalidSelector {
        selector: selector.to_string(),
        detail: format!("{e:?}"),
    })
}

/// Builder for [`CleanConfig`].
pub struct CleanConfigBuilder {
    config: CleanConfig,
}

impl CleanConfigBuilder {
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    /// Replace the decode candidates. An empty list keeps the defaults.
    pub fn encodings(mut self, encodings: Vec<&'static Encoding>) -> Self {
        if !encodings.is_empty() {
            self.config.encodings = encodings;
        }
        self
    }

    pub fn progress_callback(mut self, cb: CleanProgress) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating the selector and pattern.
    pub fn build(self) -> Result<CleanConfig, BatchError> {
        compile_selector(&self.config.selector)?;
        FilePattern::new(&self.config.pattern)?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_defaults() {
        let c = PdfConfig::builder("in.html").build().unwrap();
        assert_eq!(c.timeout, Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
        assert!(!c.force);
        assert!(!c.recursive);
        assert!(c.output_name.is_none());
        assert!(c.browser_args.is_empty());
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let c = PdfConfig::builder("in.html").timeout_secs(0).build().unwrap();
        assert_eq!(c.timeout, None);
    }

    #[test]
    fn empty_input_rejected() {
        let err = PdfConfig::builder("").build().unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }

    #[test]
    fn output_name_without_file_name_rejected() {
        let err = PdfConfig::builder("in.html").output_name("..").build().unwrap_err();
        assert!(err.to_string().contains("no file name"));
    }

    #[test]
    fn clean_defaults() {
        let c = CleanConfig::builder("#x").build().unwrap();
        assert_eq!(c.pattern, DEFAULT_PATTERN);
        assert_eq!(c.input_dir, PathBuf::from("."));
        assert!(c.output_dir.is_none());
        let names: Vec<_> = c.encodings.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["UTF-8", "GBK"]);
    }

    #[test]
    fn invalid_selector_rejected() {
        let err = CleanConfig::builder("div[").build().unwrap_err();
        assert!(matches!(err, BatchError::InvalidSelector { .. }));
        let err = CleanConfig::builder("   ").build().unwrap_err();
        assert!(matches!(err, BatchError::InvalidSelector { .. }));
    }

    #[test]
    fn complex_selector_accepted() {
        assert!(CleanConfig::builder(".content script").build().is_ok());
        assert!(CleanConfig::builder("div.wrapper > p").build().is_ok());
    }

    #[test]
    fn empty_encoding_list_keeps_defaults() {
        let c = CleanConfig::builder("p").encodings(vec![]).build().unwrap();
        assert_eq!(c.encodings.len(), 2);
    }
}
