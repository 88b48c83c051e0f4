//! Directional regex scanning over a full-text haystack.
//!
//! Forward scans run against the whole text. Backward scans run against the
//! text before the limit, so the limit is a hard upper bound while anchors
//! and `\b` still see the real left context. Offsets here are bytes.

use crate::string_utils::{floor_char_boundary, next_char_boundary};
use regex::Regex;

/// First match starting at or after `from` that `accept` agrees with.
pub fn forward<F>(re: &Regex, text: &str, from: usize, accept: F) -> Option<(usize, usize)>
where
    F: Fn(usize, usize) -> bool,
{
    let mut pos = floor_char_boundary(text, from);
    while pos <= text.len() {
        let m = re.find_at(text, pos)?;
        if accept(m.start(), m.end()) {
            return Some((m.start(), m.end()));
        }
        pos = next_char_boundary(text, m.start());
    }
    None
}

/// Last match of a left-to-right, non-overlapping scan of `text[..limit]`.
///
/// Walking back from `limit` this way visits the same matches a forward
/// scan from the top does, in reverse. An empty match at `limit` itself is
/// not a candidate, so repeated backward searches always move.
pub fn backward<F>(re: &Regex, text: &str, limit: usize, accept: F) -> Option<(usize, usize)>
where
    F: Fn(usize, usize) -> bool,
{
    let limit = floor_char_boundary(text, limit);
    let prefix = &text[..limit];
    let mut last = None;
    let mut pos = 0;

    while let Some((start, end)) =
        forward(re, prefix, pos, |s, e| s < limit && accept(s, e))
    {
        last = Some((start, end));
        pos = if start == end {
            next_char_boundary(prefix, end)
        } else {
            end
        };
        if pos > prefix.len() {
            break;
        }
    }
    last
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
