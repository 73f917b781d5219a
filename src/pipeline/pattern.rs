//! Glob-style file selection for the cleaner.
//!
//! Supported syntax: `*` (any run of characters), `?` (one character),
//! `[abc]`, `[a-z]` and the negated `[!abc]` / `[^abc]`. A file name starting
//! with `.` only matches when the pattern itself starts with a literal `.`.
//! A pattern may carry literal directory components (`pages/*.html`); only
//! the final component may contain wildcards. Matching is case-sensitive
//! except on Windows.

use crate::error::BatchError;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use tracing::warn;

/// A compiled file-name pattern.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    dir_prefix: PathBuf,
    name: Regex,
    dot_literal: bool,
}

impl FilePattern {
    /// Compile `pattern` using the host platform's case rule.
    pub fn new(pattern: &str) -> Result<Self, BatchError> {
        Self::with_case(pattern, !cfg!(windows))
    }

    /// Compile `pattern` with explicit case sensitivity.
    pub fn with_case(pattern: &str, case_sensitive: bool) -> Result<Self, BatchError> {
        let invalid = |detail: String| BatchError::InvalidPattern {
            pattern: pattern.to_string(),
            detail,
        };

        let normalized = pattern.replace('\\', "/");
        let (prefix, name) = match normalized.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", normalized.as_str()),
        };
        if name.is_empty() {
            return Err(invalid("pattern has no file-name component".into()));
        }
        if prefix.contains(['*', '?', '[']) {
            return Err(invalid(
                "wildcards are only supported in the file-name component".into(),
            ));
        }

        let body = translate(name).map_err(invalid)?;
        let regex = RegexBuilder::new(&format!("^{body}$"))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            dir_prefix: PathBuf::from(prefix),
            name: regex,
            dot_literal: name.starts_with('.'),
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Literal directory components preceding the file-name glob.
    pub fn dir_prefix(&self) -> &Path {
        &self.dir_prefix
    }

    /// True when the bare file name `name` matches the final component.
    pub fn matches(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.dot_literal {
            return false;
        }
        self.name.is_match(name)
    }

    /// Regular files under `root` (joined with the directory prefix) whose
    /// names match, sorted by path.
    pub fn find_in(&self, root: &Path) -> Vec<PathBuf> {
        let dir = root.join(&self.dir_prefix);
        let entries = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) => {
                warn!("Cannot read directory {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| self.matches(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        files
    }
}

/// Translate one glob component into a regex body.
fn translate(glob: &str) -> Result<String, String> {
    let mut out = String::with_capacity(glob.len() * 2);
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => out.push_str(&parse_class(&mut chars)?),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    Ok(out)
}

/// Parse the remainder of a `[...]` class; the opening bracket is consumed.
/// A `]` directly after the opening (or after the negation) is literal.
fn parse_class(chars: &mut Peekable<Chars<'_>>) -> Result<String, String> {
    let mut class = String::from("[");
    if matches!(chars.peek(), Some('!' | '^')) {
        chars.next();
        class.push('^');
    }
    let mut first = true;
    loop {
        match chars.next() {
            None => return Err("unclosed '[' in pattern".to_string()),
            Some(']') if !first => break,
            Some(c) => {
                if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
                    class.push('\\');
                }
                class.push(c);
            }
        }
        first = false;
    }
    class.push(']');
    Ok(class)
}
