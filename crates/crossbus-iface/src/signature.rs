//! Opaque type-signature tokens
//!
//! Signatures are compact type-encoding strings produced and validated by the
//! marshaling layer. This crate stores and compares them verbatim; it never
//! validates their grammar. The one concession is [`split_complete_types`],
//! which slices a signature into complete single types so the introspection
//! renderer can pair each type with an argument name. Slicing is best-effort:
//! anything the slicer does not recognize is passed through as a single
//! trailing chunk.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque type-signature string for one or more marshaled values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap a signature string. No validation is performed.
    pub fn new(sig: impl Into<String>) -> Self {
        Self(sig.into())
    }

    /// The empty signature (no arguments).
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// The signature as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the signature encodes no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signature {
    fn from(sig: &str) -> Self {
        Self::new(sig)
    }
}

impl From<String> for Signature {
    fn from(sig: String) -> Self {
        Self(sig)
    }
}

/// Type codes that stand alone as one complete type.
const BASIC_TYPES: &[u8] = b"ybnqiuxtdsoghv";

/// Slice a signature into complete single types.
///
/// Handles array prefixes (`a`), struct containers (`(...)`) and dict-entry
/// containers (`{...}`). Unbalanced or unknown input is not an error: the
/// remainder is returned as one chunk and rendering degrades gracefully.
pub fn split_complete_types(sig: &str) -> Vec<&str> {
    let bytes = sig.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match next_complete_type(bytes, i) {
            Some(end) => {
                out.push(&sig[i..end]);
                i = end;
            }
            None => {
                out.push(&sig[i..]);
                break;
            }
        }
    }
    out
}

/// End index (exclusive) of the complete type starting at `start`, or `None`
/// when the input is not recognizable as one.
fn next_complete_type(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() && bytes[i] == b'a' {
        i += 1;
    }
    let first = *bytes.get(i)?;
    match first {
        b'(' | b'{' => matching_close(bytes, i),
        c if BASIC_TYPES.contains(&c) => Some(i + 1),
        _ => None,
    }
}

/// Index one past the bracket closing the container opened at `open`.
fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' | b'{' => depth += 1,
            b')' | b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic_types() {
        assert_eq!(split_complete_types("ss"), vec!["s", "s"]);
        assert_eq!(split_complete_types("ius"), vec!["i", "u", "s"]);
        assert!(split_complete_types("").is_empty());
    }

    #[test]
    fn test_split_containers() {
        assert_eq!(split_complete_types("a{sv}i"), vec!["a{sv}", "i"]);
        assert_eq!(split_complete_types("(ii)s"), vec!["(ii)", "s"]);
        assert_eq!(split_complete_types("aas(a{sv})"), vec!["aas", "(a{sv})"]);
    }

    #[test]
    fn test_split_is_not_validation() {
        // Unknown or unbalanced content comes back as one trailing chunk.
        assert_eq!(split_complete_types("s?i"), vec!["s", "?i"]);
        assert_eq!(split_complete_types("(is"), vec!["(is"]);
    }

    #[test]
    fn test_signature_is_opaque() {
        let sig = Signature::new("not a valid signature at all");
        assert_eq!(sig.as_str(), "not a valid signature at all");
    }
}
