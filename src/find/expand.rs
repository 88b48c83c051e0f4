//! Back-reference expansion of replacement templates
//!
//! Template syntax:
//! - `\0` whole match, `\1`..`\99` numbered group (up to two digits)
//! - `\g<N>` numbered group, `\g<name>` named group
//! - `\n`, `\t`, `\r` control characters, `\\` a backslash
//! - any other non-letter escape yields the escaped character itself
//!
//! An unknown letter escape, a dangling backslash, or a reference to a group
//! the pattern does not have is an error. A group that did not take part in
//! the match expands to nothing.

use crate::error::ReplaceError;
use crate::find::search::MatchCaptures;
use std::iter::Peekable;
use std::str::Chars;

/// Expand `template` against the groups of one match.
pub fn expand(template: &str, captures: &MatchCaptures) -> Result<String, ReplaceError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            return Err(ReplaceError::ExpansionFailed(
                "trailing backslash".to_string(),
            ));
        };

        match escaped {
            '0'..='9' => {
                let mut index = digit(escaped);
                if let Some(&second) = chars.peek() {
                    if second.is_ascii_digit() {
                        chars.next();
                        index = index * 10 + digit(second);
                    }
                }
                out.push_str(group(captures, index)?);
            }
            'g' => {
                let reference = read_group_name(&mut chars)?;
                let index = match reference.parse::<usize>() {
                    Ok(index) => index,
                    Err(_) => captures.index_of(&reference).ok_or_else(|| {
                        ReplaceError::ExpansionFailed(format!("no group named '{}'", reference))
                    })?,
                };
                out.push_str(group(captures, index)?);
            }
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            c if c.is_ascii_alphabetic() => {
                return Err(ReplaceError::ExpansionFailed(format!(
                    "unknown escape '\\{}'",
                    c
                )));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn digit(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize)
}

fn group(captures: &MatchCaptures, index: usize) -> Result<&str, ReplaceError> {
    captures.group(index).ok_or_else(|| {
        ReplaceError::ExpansionFailed(format!(
            "group {} does not exist (pattern has {})",
            index,
            captures.len().saturating_sub(1)
        ))
    })
}

/// Read the `<...>` part of a `\g<...>` reference.
fn read_group_name(chars: &mut Peekable<Chars<'_>>) -> Result<String, ReplaceError> {
    if chars.next() != Some('<') {
        return Err(ReplaceError::ExpansionFailed(
            "expected '<' after \\g".to_string(),
        ));
    }
    let mut name = String::new();
    for c in chars.by_ref() {
        if c == '>' {
            if name.is_empty() {
                return Err(ReplaceError::ExpansionFailed("empty group reference".to_string()));
            }
            return Ok(name);
        }
        name.push(c);
    }
    Err(ReplaceError::ExpansionFailed(
        "unterminated \\g<...> reference".to_string(),
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
