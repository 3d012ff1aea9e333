//! Typed extraction of wildcard segments from request paths.
//!
//! A route pattern like `/users/*/posts/*` captures two path segments.
//! [`extract`] re-walks the concrete request path against that pattern and
//! decodes each captured segment into a caller-supplied [`Slot`], so
//! handlers state the expected types up front instead of parsing strings
//! by hand.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::trie::WILDCARD_SEGMENT;

/// A typed destination for one captured wildcard segment.
///
/// The set is closed: every variant has exactly one decoding, and a failed
/// decode turns the whole extraction into a non-match rather than an error
/// the handler has to unpack.
pub enum Slot<'a> {
    /// Receives the captured text verbatim.
    Text(&'a mut String),
    /// Receives the standard-alphabet, padded base64 decoding of the
    /// captured text.
    Bytes(&'a mut Vec<u8>),
    /// Parses the captured text as a decimal `i32`.
    I32(&'a mut i32),
    /// Parses the captured text as a decimal `i64`.
    I64(&'a mut i64),
    /// Parses the captured text as a decimal `isize`.
    Int(&'a mut isize),
}

impl Slot<'_> {
    /// Decodes one captured segment into the destination. Returns `false`
    /// when the text does not decode as the slot's type.
    fn fill(&mut self, captured: &str) -> bool {
        match self {
            Self::Text(dst) => {
                **dst = captured.to_owned();
                true
            }
            Self::Bytes(dst) => match STANDARD.decode(captured) {
                Ok(bytes) => {
                    **dst = bytes;
                    true
                }
                Err(_) => false,
            },
            Self::I32(dst) => match captured.parse::<i32>() {
                Ok(value) => {
                    **dst = value;
                    true
                }
                Err(_) => false,
            },
            Self::I64(dst) => match captured.parse::<i64>() {
                Ok(value) => {
                    **dst = value;
                    true
                }
                Err(_) => false,
            },
            Self::Int(dst) => match captured.parse::<isize>() {
                Ok(value) => {
                    **dst = value;
                    true
                }
                Err(_) => false,
            },
        }
    }
}

/// Captures the wildcard segments of `path` against `pattern` into `slots`.
///
/// The pattern is consumed chunk by chunk: the literal text before each `*`
/// must prefix the remaining path exactly, then the capture runs to the
/// next `/` (or the end of the path). Extraction succeeds only when the
/// whole path is consumed and every captured segment decodes into its
/// slot. On failure the return is `false` and slots already visited may
/// have been overwritten; treat their contents as unspecified.
///
/// # Panics
///
/// Panics when the number of `*` wildcards in `pattern` differs from
/// `slots.len()`. That mismatch is a bug at the call site, not a property
/// of the request.
pub fn extract(path: &str, pattern: &str, slots: &mut [Slot<'_>]) -> bool {
    let wildcards = pattern.matches(WILDCARD_SEGMENT).count();
    assert!(
        wildcards == slots.len(),
        "pattern {pattern:?} has {wildcards} wildcard(s) but {} slot(s) were supplied",
        slots.len()
    );

    let mut pattern = pattern;
    let mut path = path;
    let mut index = 0;

    while !pattern.is_empty() {
        pattern = pattern.strip_prefix('/').unwrap_or(pattern);
        path = path.strip_prefix('/').unwrap_or(path);

        match pattern.split_once(WILDCARD_SEGMENT) {
            Some((literal, rest)) => {
                let Some(remainder) = path.strip_prefix(literal) else {
                    return false;
                };
                path = remainder;
                pattern = rest;
            }
            None => {
                // No captures left: the rest of the pattern must consume
                // the rest of the path.
                let Some(remainder) = path.strip_prefix(pattern) else {
                    return false;
                };
                path = remainder;
                break;
            }
        }

        let (captured, rest) = match path.split_once('/') {
            Some((captured, rest)) => (captured, Some(rest)),
            None => (path, None),
        };
        if !slots[index].fill(captured) {
            return false;
        }
        match rest {
            Some(rest) => path = rest,
            None => {
                path = "";
                break;
            }
        }
        index += 1;
    }

    path.is_empty()
}
