//! # browser-locate
//!
//! Find a Chromium-family browser that can run `--headless --print-to-pdf`.
//!
//! ## How it works
//!
//! [`locate_browser`] resolves an executable in this order:
//!
//! 1. The caller-supplied path, when it exists. It is returned as-is; nothing
//!    checks that it is really a browser.
//! 2. The well-known system install locations for the current OS, in a fixed
//!    order that depends on whether Microsoft Edge is preferred.
//! 3. Per-user install locations (`%LOCALAPPDATA%`, `~/Applications`).
//!
//! The first existing path wins. When nothing exists the call fails with
//! [`LocateError::NotFound`], listing every path that was probed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use browser_locate::locate_browser;
//!
//! let chrome = locate_browser(None, false).expect("no browser installed");
//! println!("using {}", chrome.display());
//! ```
//!
//! ## Search order
//!
//! | OS      | Default                                   | `prefer_edge`             |
//! |---------|-------------------------------------------|---------------------------|
//! | Windows | Chrome (x64, x86), Edge (x86, x64), user Chrome | Edge (x86, x64) only |
//! | macOS   | Chrome, Edge, `~/Applications` Chrome     | Edge, Chrome, user Chrome |
//! | Linux   | google-chrome(-stable), chromium(-browser), snap chromium, Edge | Edge first |

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by browser-locate operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// No candidate path exists on this machine.
    #[error(
        "No browser executable found on {platform} (searched {} locations).\n\
Install Google Chrome, Chromium or Microsoft Edge, or pass --browser-path.",
        .searched.len()
    )]
    NotFound {
        platform: String,
        searched: Vec<PathBuf>,
    },
}

// ── Platform detection ───────────────────────────────────────────────────────

/// Operating-system families with distinct install layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    /// Anything else; carries `std::env::consts::OS`.
    Other(&'static str),
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &'static str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other),
        }
    }

    /// Short human-readable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::Other(os) => *os,
        }
    }
}

// ── Candidate tables ─────────────────────────────────────────────────────────

const WINDOWS_CHROME: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

const WINDOWS_EDGE: &[&str] = &[
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
];

const MACOS_CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";
const MACOS_EDGE: &str = "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge";

const LINUX_CHROME: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

const LINUX_EDGE: &[&str] = &["/usr/bin/microsoft-edge", "/usr/bin/microsoft-edge-stable"];

fn paths<'a>(list: &'a [&'static str]) -> impl Iterator<Item = PathBuf> + 'a {
    list.iter().map(PathBuf::from)
}

/// Ordered list of install locations probed for `platform`.
///
/// System locations come first. Per-user locations are appended when the
/// relevant user directory can be determined.
pub fn candidate_paths(platform: Platform, prefer_edge: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    match platform {
        Platform::Windows => {
            if prefer_edge {
                out.extend(paths(WINDOWS_EDGE));
            } else {
                out.extend(paths(WINDOWS_CHROME));
                out.extend(paths(WINDOWS_EDGE));
                if let Some(local) = dirs::data_local_dir() {
                    out.push(local.join(r"Google\Chrome\Application\chrome.exe"));
                }
            }
        }
        Platform::MacOs => {
            if prefer_edge {
                out.push(PathBuf::from(MACOS_EDGE));
                out.push(PathBuf::from(MACOS_CHROME));
            } else {
                out.push(PathBuf::from(MACOS_CHROME));
                out.push(PathBuf::from(MACOS_EDGE));
            }
            if let Some(home) = dirs::home_dir() {
                out.push(home.join(MACOS_CHROME.trim_start_matches('/')));
            }
        }
        Platform::Linux => {
            if prefer_edge {
                out.extend(paths(LINUX_EDGE));
                out.extend(paths(LINUX_CHROME));
            } else {
                out.extend(paths(LINUX_CHROME));
                out.extend(paths(LINUX_EDGE));
            }
        }
        Platform::Other(_) => {}
    }
    out
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Locate a browser executable on the current machine.
///
/// See the crate docs for the search order.
pub fn locate_browser(user_path: Option<&Path>, prefer_edge: bool) -> Result<PathBuf, LocateError> {
    locate_with(Platform::current(), user_path, prefer_edge, |p| p.exists())
}

/// Like [`locate_browser`] with the platform and existence probe supplied by
/// the caller.
pub fn locate_with<F>(
    platform: Platform,
    user_path: Option<&Path>,
    prefer_edge: bool,
    exists: F,
) -> Result<PathBuf, LocateError>
where
    F: Fn(&Path) -> bool,
{
    if let Some(p) = user_path {
        if exists(p) {
            debug!("Using user-supplied browser: {}", p.display());
            return Ok(p.to_path_buf());
        }
        warn!(
            "Browser path '{}' does not exist; searching default locations",
            p.display()
        );
    }

    let candidates = candidate_paths(platform, prefer_edge);
    for candidate in &candidates {
        if exists(candidate) {
            debug!("Found browser: {}", candidate.display());
            return Ok(candidate.clone());
        }
    }

    Err(LocateError::NotFound {
        platform: platform.name().to_string(),
        searched: candidates,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
