//! Ordered decode attempts and re-encoding for the cleaner.
//!
//! A file is decoded with the first candidate encoding that accepts every
//! byte; the cleaned document is written back in that same encoding.

use encoding_rs::{Encoding, GBK, UTF_8};
use tracing::warn;

/// UTF-8 first, then GBK.
pub fn default_encodings() -> Vec<&'static Encoding> {
    vec![UTF_8, GBK]
}

/// Resolve a WHATWG encoding label such as `utf-8`, `gbk` or `latin1`.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Text decoded from a file together with the encoding that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Decode `bytes` with the first encoding in `candidates` that has no
/// malformed sequences. Byte-order marks are not interpreted.
pub fn decode_first(bytes: &[u8], candidates: &[&'static Encoding]) -> Option<Decoded> {
    candidates.iter().find_map(|&encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| Decoded {
                text: text.into_owned(),
                encoding,
            })
    })
}

/// Encode `text` in `encoding`.
///
/// Characters the encoding cannot represent become HTML numeric character
/// references. UTF-16 targets are written as UTF-8, as the WHATWG encoder
/// does for every encoding without an encoder of its own.
pub fn encode(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, used, unmappable) = encoding.encode(text);
    if unmappable {
        warn!(
            "Some characters are not representable in {}; wrote numeric references",
            used.name()
        );
    }
    bytes.into_owned()
}

/// Encoding names, for error messages.
pub fn names(encodings: &[&'static Encoding]) -> Vec<String> {
    encodings.iter().map(|e| e.name().to_string()).collect()
}
