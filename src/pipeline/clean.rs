//! Selector-driven node removal for one file.

use crate::error::FileError;
use crate::output::CleanOutcome;
use crate::pipeline::encoding::{self, Decoded};
use dom_query::{Document, Matcher};
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static RE_HTML_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html[\s>/]").unwrap());
static RE_DOC_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:html|head|body)[\s>/]").unwrap());

/// Remove every element matching `matcher` from `html`.
///
/// Returns `None` when nothing matched, otherwise the serialized document and
/// the number of elements removed.
pub fn remove_matching(html: &str, matcher: &Matcher) -> Option<(String, usize)> {
    let doc = Document::from(html);
    let matches = doc.select_matcher(matcher);
    let count = matches.length();
    if count == 0 {
        return None;
    }
    matches.remove();
    Some((serialize(&doc, html), count))
}

/// Serialize `doc` in the shape `source` was written in.
///
/// Text before the `<html>` tag (doctype, comments, blank lines) is copied
/// from `source` verbatim. A fragment without document tags is written back
/// without the `html`/`head`/`body` wrappers the parser adds.
fn serialize(doc: &Document, source: &str) -> String {
    if let Some(open) = RE_HTML_OPEN.find(source) {
        let prolog = &source[..open.start()];
        return format!("{prolog}{}", doc.select("html").html());
    }
    if RE_DOC_TAG.is_match(source) {
        return doc.html().to_string();
    }
    format!(
        "{}{}",
        doc.select("head").inner_html(),
        doc.select("body").inner_html()
    )
}

/// Where the cleaned copy of `path` is written.
pub fn save_path(path: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Read, decode, clean and write back one file.
pub fn clean_file(
    path: &Path,
    matcher: &Matcher,
    output_dir: Option<&Path>,
    encodings: &[&'static Encoding],
) -> CleanOutcome {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            return CleanOutcome::Failed {
                error: FileError::ReadFailed {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                },
            }
        }
    };

    let Some(Decoded { text, encoding }) = encoding::decode_first(&bytes, encodings) else {
        return CleanOutcome::Failed {
            error: FileError::DecodeFailed {
                path: path.to_path_buf(),
                tried: encoding::names(encodings),
            },
        };
    };
    debug!("Decoded {} as {}", path.display(), encoding.name());

    let Some((cleaned, removed)) = remove_matching(&text, matcher) else {
        return CleanOutcome::NoMatch;
    };

    let dest = save_path(path, output_dir);
    if let Err(e) = fs::write(&dest, encoding::encode(&cleaned, encoding)) {
        return CleanOutcome::Failed {
            error: FileError::WriteFailed {
                path: dest,
                detail: e.to_string(),
            },
        };
    }

    CleanOutcome::Cleaned {
        removed,
        in_place: output_dir.is_none(),
        saved_to: dest,
        encoding: encoding.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_selector;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head><title>t</title></head><body>
<div id="js_row_immersive_stream_wrap">promo</div>
<div class="content"><p>keep</p><script>track()</script><script>more()</script></div>
<div class="ad-banner">ad</div>
</body></html>"#;

    fn matcher(css: &str) -> Matcher {
        compile_selector(css).unwrap()
    }

    #[test]
    fn removes_by_id() {
        let (out, n) = remove_matching(PAGE, &matcher("#js_row_immersive_stream_wrap")).unwrap();
        assert_eq!(n, 1);
        assert!(!out.contains("promo"));
        assert!(out.contains("keep"));
    }

    #[test]
    fn descendant_selector_removes_all_matches() {
        let (out, n) = remove_matching(PAGE, &matcher(".content script")).unwrap();
        assert_eq!(n, 2);
        assert!(!out.contains("track()"));
        assert!(!out.contains("more()"));
        assert!(out.contains("<p>keep</p>"));
        assert!(out.contains("ad-banner"));
    }

    #[test]
    fn fragment_keeps_its_shape() {
        let src = "<div class=\"ad\">x</div>\n<p>keep</p>\n";
        let (out, n) = remove_matching(src, &matcher(".ad")).unwrap();
        assert_eq!(n, 1);
        assert_eq!(out, "\n<p>keep</p>\n");
    }

    #[test]
    fn doctype_prolog_is_copied_verbatim() {
        let src = "<!DOCTYPE html>\n<html><head><title>t</title></head>\
                   <body><div class=\"ad\">x</div><p>k</p></body></html>";
        let (out, _) = remove_matching(src, &matcher(".ad")).unwrap();
        assert_eq!(
            out,
            "<!DOCTYPE html>\n<html><head><title>t</title></head><body><p>k</p></body></html>"
        );
    }

    #[test]
    fn no_match_is_none() {
        assert!(remove_matching(PAGE, &matcher(".missing")).is_none());
    }

    #[test]
    fn save_path_respects_output_dir() {
        let p = Path::new("in/page.html");
        assert_eq!(save_path(p, None), p);
        assert_eq!(save_path(p, Some(Path::new("out"))), Path::new("out/page.html"));
    }

    #[test]
    fn clean_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, PAGE).unwrap();

        let outcome = clean_file(&path, &matcher("div.ad-banner"), None, &encoding::default_encodings());
        match outcome {
            CleanOutcome::Cleaned { removed, in_place, ref saved_to, ref encoding } => {
                assert_eq!(removed, 1);
                assert!(in_place);
                assert_eq!(saved_to, &path);
                assert_eq!(encoding, "UTF-8");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("ad-banner"));
    }

    #[test]
    fn clean_file_no_match_leaves_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, PAGE).unwrap();

        let outcome = clean_file(&path, &matcher("#nothing"), None, &encoding::default_encodings());
        assert_eq!(outcome, CleanOutcome::NoMatch);
        assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
    }

    #[test]
    fn clean_file_undecodable_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.html");
        fs::write(&path, [0xffu8, 0xfe, 0xfd]).unwrap();

        let outcome = clean_file(&path, &matcher("p"), None, &encoding::default_encodings());
        match outcome {
            CleanOutcome::Failed { error: FileError::DecodeFailed { tried, .. } } => {
                assert_eq!(tried, vec!["UTF-8", "GBK"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn clean_file_missing_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let outcome = clean_file(
            &dir.path().join("gone.html"),
            &matcher("p"),
            None,
            &encoding::default_encodings(),
        );
        assert!(matches!(
            outcome,
            CleanOutcome::Failed { error: FileError::ReadFailed { .. } }
        ));
    }
}
