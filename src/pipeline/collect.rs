//! File collection: expand a user-supplied path into the files to convert.
//!
//! A regular file is taken as-is, whatever its extension. A directory yields
//! its `.html`/`.htm` files (case-insensitive), optionally recursing. Entries
//! are sorted by name within each directory; a recursive walk lists a
//! directory's own files before descending into its subdirectories.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static RE_HTML_EXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.html?$").unwrap());

/// True when `name` ends in `.html` or `.htm`, ignoring case.
pub fn is_html_name(name: &str) -> bool {
    RE_HTML_EXT.is_match(name)
}

/// Collect the files to process for `input`.
///
/// Returns an empty list (and logs a warning) when `input` is neither a file
/// nor a directory.
pub fn collect_files(input: &Path, recursive: bool) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    if !input.is_dir() {
        warn!("Input path does not exist: {}", input.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    walk(input, recursive, &mut files);
    debug!(
        "Collected {} HTML files from {} (recursive: {})",
        files.len(),
        input.display(),
        recursive
    );
    files
}

fn walk(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    let mut entries: Vec<fs::DirEntry> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        // file_type() does not follow symlinks, so linked directories are
        // never descended into.
        let is_real_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_real_dir {
            if recursive {
                subdirs.push(path);
            }
        } else if path.is_file() && is_html_name(&entry.file_name().to_string_lossy()) {
            out.push(path);
        }
    }

    for sub in subdirs {
        walk(&sub, recursive, out);
    }
}
