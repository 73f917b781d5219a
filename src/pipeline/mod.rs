//! Pipeline stages for both batch tools.
//!
//! Each submodule implements exactly one step and is independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! html2pdf:   locate ──▶ collect ──▶ resolve ──▶ invoke
//!             (browser)  (files)     (dest)      (subprocess)
//!
//! html-clean: pattern ──▶ encoding ──▶ clean ──▶ encoding
//!             (files)     (decode)     (DOM)     (encode)
//! ```
//!
//! 1. [`collect`]  — expand a file or directory into the ordered HTML file list
//! 2. [`resolve`]  — compute the destination PDF for each input
//! 3. [`invoke`]   — build the browser command line and run it behind the
//!    [`invoke::CommandRunner`] seam
//! 4. [`pattern`]  — glob matching for the cleaner's file selection
//! 5. [`encoding`] — ordered decode attempts and re-encoding
//! 6. [`clean`]    — selector matching and node removal

pub mod clean;
pub mod collect;
pub mod encoding;
pub mod invoke;
pub mod pattern;
pub mod resolve;
