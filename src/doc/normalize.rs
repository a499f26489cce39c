//! Literal and comment normalization
//!
//! Turns raw token text into display text: string literals are unquoted and
//! runs of line comments are collapsed into newline-terminated prose.

use thiserror::Error;

use crate::ast::{Comment, CommentGroup, File};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnquoteError {
    #[error("literal is not enclosed in double quotes")]
    NotQuoted,

    #[error("literal contains a raw newline")]
    Newline,

    #[error("unescaped quote at byte {0}")]
    UnescapedQuote(usize),

    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
}

/// Unquote a double-quoted string literal, resolving escape sequences.
///
/// Accepts `\a \b \f \n \r \t \v \\ \"`, octal `\ooo`, `\xhh`, `\uhhhh` and
/// `\Uhhhhhhhh`. Byte escapes that do not form valid UTF-8 are replaced with
/// U+FFFD.
pub fn unquote(s: &str) -> Result<String, UnquoteError> {
    let inner = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(UnquoteError::NotQuoted)?;

    if inner.contains('\n') {
        return Err(UnquoteError::Newline);
    }
    if !inner.contains('\\') && !inner.contains('"') {
        return Ok(inner.to_string());
    }

    let bytes = inner.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Err(UnquoteError::UnescapedQuote(i + 1)),
            b'\\' => {
                let start = i;
                let esc = *bytes.get(i + 1).ok_or(UnquoteError::InvalidEscape(start + 1))?;
                i += 2;
                match esc {
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'v' => out.push(0x0b),
                    b'\\' => out.push(b'\\'),
                    b'"' => out.push(b'"'),
                    b'0'..=b'7' => {
                        let digits = bytes
                            .get(start + 1..start + 4)
                            .ok_or(UnquoteError::InvalidEscape(start + 1))?;
                        let mut value: u32 = 0;
                        for &d in digits {
                            if !(b'0'..=b'7').contains(&d) {
                                return Err(UnquoteError::InvalidEscape(start + 1));
                            }
                            value = value * 8 + u32::from(d - b'0');
                        }
                        if value > 0xff {
                            return Err(UnquoteError::InvalidEscape(start + 1));
                        }
                        out.push(value as u8);
                        i = start + 4;
                    }
                    b'x' | b'u' | b'U' => {
                        let width = match esc {
                            b'x' => 2,
                            b'u' => 4,
                            _ => 8,
                        };
                        let value = bytes
                            .get(i..i + width)
                            .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                            .and_then(|hex| std::str::from_utf8(hex).ok())
                            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                            .ok_or(UnquoteError::InvalidEscape(start + 1))?;
                        i += width;
                        if esc == b'x' {
                            out.push(value as u8);
                        } else {
                            let c = char::from_u32(value)
                                .ok_or(UnquoteError::InvalidEscape(start + 1))?;
                            let mut buf = [0u8; 4];
                            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                        }
                    }
                    _ => return Err(UnquoteError::InvalidEscape(start + 1)),
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Unquote, degrading to an empty string on malformed input.
pub fn unquote_or_empty(s: &str) -> String {
    match unquote(s) {
        Ok(value) => value,
        Err(e) => {
            if !s.is_empty() {
                tracing::warn!("Failed to unquote literal {}: {}", s, e);
            }
            String::new()
        }
    }
}

/// Collapse comment lines into text, one cleaned line per input line.
pub fn comment(list: &[Comment]) -> String {
    let mut ret = String::new();

    for c in list {
        let line = c.text.trim();
        let line = line
            .strip_prefix("//")
            .or_else(|| line.strip_prefix('#'))
            .unwrap_or(line);
        ret.push_str(line.trim());
        ret.push('\n');
    }

    ret
}

/// Module description taken from a leading `/** ... */` comment.
///
/// Only the first comment group of the file is considered, and only when its
/// first comment opens with `/**`.
pub fn header(file: &File) -> Option<String> {
    let group: &CommentGroup = file.comments.first()?;
    let first = group.list.first()?;
    let body = first.text.trim().strip_prefix("/**")?;
    let body = body.strip_suffix("*/").unwrap_or(body);

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.trim()
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;

    Some(lines[start..=end].join("\n"))
}
