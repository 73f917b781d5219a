//! Output path resolution: one destination PDF per input file.
//!
//! Precedence, per file:
//!
//! 1. output directory: `dir / <input stem>.pdf` (wins even over an explicit name)
//! 2. explicit output name, used verbatim
//! 3. the input path with its extension replaced by `.pdf`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Compute the destination for `input`.
pub fn resolve_output_path(
    input: &Path,
    output_name: Option<&Path>,
    output_dir: Option<&Path>,
) -> PathBuf {
    if let Some(dir) = output_dir {
        let mut file_name: OsString = input
            .file_stem()
            .map(OsString::from)
            .unwrap_or_else(|| input.as_os_str().to_owned());
        file_name.push(".pdf");
        return dir.join(file_name);
    }
    if let Some(name) = output_name {
        return name.to_path_buf();
    }
    input.with_extension("pdf")
}

/// The explicit output name after the single-file policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamePolicy<'a> {
    /// Name to pass to [`resolve_output_path`].
    pub effective: Option<&'a Path>,
    /// True when a supplied name was dropped.
    pub ignored: bool,
}

/// An explicit output name only makes sense for one file; with more, drop it.
pub fn effective_output_name(file_count: usize, output_name: Option<&Path>) -> OutputNamePolicy<'_> {
    match output_name {
        Some(_) if file_count > 1 => OutputNamePolicy {
            effective: None,
            ignored: true,
        },
        other => OutputNamePolicy {
            effective: other,
            ignored: false,
        },
    }
}
