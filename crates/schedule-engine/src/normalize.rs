//! Text normalization and the input guard.
//!
//! Schedule text arrives pasted from a student portal, often HTML-escaped and
//! full of non-breaking spaces, full-width digits and CRLF line endings.
//! [`normalize`] reduces it to a canonical form the extractors can match with
//! plain ASCII patterns; [`guard_input`] enforces the length and character
//! allow-list that the extractors assume.

use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, ScheduleError};

/// Default character limit for one schedule submission.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1000;

/// Punctuation accepted by [`guard_input`] in addition to ASCII letters, digits
/// and whitespace.
pub const ALLOWED_PUNCTUATION: &[char] = &[',', '.', '-', ':', '/', '#', '&', '(', ')'];

/// Canonicalize raw schedule text.
///
/// Applied in order: HTML entity un-escaping, Unicode NFKC, line endings to
/// `\n`, horizontal whitespace runs collapsed to one space, each line trimmed,
/// and leading/trailing blank lines removed.
pub fn normalize(raw: &str) -> String {
    let unescaped = unescape_html(raw);
    let composed: String = unescaped.nfkc().collect();
    let unified = composed.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = unified.split('\n').map(collapse_whitespace).collect();
    lines.join("\n").trim_matches('\n').to_string()
}

/// Reject text the extractors are not prepared to see.
///
/// Length is counted in characters, not bytes.
pub fn guard_input(text: &str, max_chars: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ScheduleError::EmptyInput);
    }

    let len = text.chars().count();
    if len > max_chars {
        return Err(ScheduleError::InputTooLong {
            len,
            max: max_chars,
        });
    }

    if let Some((position, ch)) = text.chars().enumerate().find(|(_, c)| !is_allowed(*c)) {
        return Err(ScheduleError::DisallowedCharacter { ch, position });
    }

    Ok(())
}

/// Normalize, then guard. The entry point for untrusted text.
pub fn prepare_input(raw: &str, max_chars: usize) -> Result<String> {
    let text = normalize(raw);
    guard_input(&text, max_chars)?;
    Ok(text)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(&c)
}

fn collapse_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;
    for c in line.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

/// Replace HTML character references with the characters they name.
///
/// Unknown or unterminated references are kept verbatim.
fn unescape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        // Entity names we care about are short; don't scan the whole tail.
        let semi = candidate
            .char_indices()
            .take(12)
            .find(|(_, c)| *c == ';')
            .map(|(i, _)| i);

        match semi.and_then(|end| decode_entity(&candidate[1..end]).map(|c| (end, c))) {
            Some((end, decoded)) => {
                out.push(decoded);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
