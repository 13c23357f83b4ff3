//! Repair of Meta's broken text encoding (Mojibake).
//!
//! Messenger exports UTF-8 text encoded as if it were ISO-8859-1: every UTF-8
//! byte is stored as a separate Unicode codepoint, so `"Привет"` arrives as
//! `"ÐŸÑ€Ð¸Ð²ÐµÑ‚"` and a curly apostrophe arrives as `"â\u{80}\u{99}"`.
//!
//! [`normalize`] undoes this in two steps:
//!
//! 1. a fixed substitution table rewrites a handful of sequences to plain
//!    ASCII punctuation (curly quotes) or removes them (a stray wave glyph
//!    the exporter duplicates),
//! 2. every remaining char is taken as its byte value and the bytes are
//!    decoded as UTF-8.
//!
//! # Example
//!
//! ```
//! use chatlens::normalize::normalize;
//!
//! // ASCII passes through unchanged
//! assert_eq!(normalize("Hello").unwrap(), "Hello");
//!
//! // Mojibake apostrophe becomes a plain one
//! assert_eq!(normalize("can\u{e2}\u{80}\u{99}t").unwrap(), "can't");
//!
//! // Double-encoded Cyrillic is restored
//! let raw = "\u{d0}\u{9f}\u{d1}\u{80}\u{d0}\u{b8}\u{d0}\u{b2}\u{d0}\u{b5}\u{d1}\u{82}";
//! assert_eq!(normalize(raw).unwrap(), "Привет");
//! ```

use std::borrow::Cow;

use crate::error::{ChatlensError, Result};

/// Sequences rewritten before the byte-level decode, applied in order.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{e2}\u{80}\u{99}", "'"),
    ("\u{e2}\u{80}\u{9c}", "\""),
    ("\u{1f44b}", ""),
    ("\u{e2}\u{80}\u{9d}", "\""),
];

/// Repairs a mis-encoded archive string.
///
/// Deterministic: the same input always yields the same output.
///
/// # Errors
///
/// Returns [`ChatlensError::MalformedArchive`] when the repaired bytes are not
/// valid UTF-8. The text is never silently replaced with a lossy version.
pub fn normalize(raw: &str) -> Result<String> {
    let mut text = Cow::Borrowed(raw);
    for (from, to) in REPLACEMENTS {
        if text.contains(from) {
            text = Cow::Owned(text.replace(from, to));
        }
    }
    decode_latin1_bytes(&text)
}

/// Takes each char as a byte and decodes the result as UTF-8.
///
/// Chars above U+00FF cannot come from the mis-encoding; they contribute
/// their own UTF-8 bytes so already-correct text survives.
fn decode_latin1_bytes(s: &str) -> Result<String> {
    if s.is_ascii() {
        return Ok(s.to_owned());
    }

    let mut bytes = Vec::with_capacity(s.len());
    for c in s.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(byte) => bytes.push(byte),
            Err(_) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(bytes).map_err(ChatlensError::undecodable)
}
