//! Replacement template expansion
//!
//! Templates use backslash escapes rather than the `$N` syntax of the
//! `regex` crate, so they are scanned here and resolved against the capture
//! groups of the compiled pattern:
//!
//! - `\1`..`\99` - numbered group
//! - `\g<N>`, `\g<name>` - group by number or name
//! - `\\` - literal backslash
//! - `\a \b \f \n \r \t \v` - control characters
//! - `\0`, `\0oo`, `\ooo` - octal character escape
//!
//! Any other escaped ASCII letter is an error; other escaped characters
//! (such as `\/` or `\&`) are kept as written, backslash included.

use crate::error::ReplaceError;
use regex::{Captures, Regex};
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Group(usize),
}

/// A template resolved against one pattern's capture groups
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Resolve `template` against the capture groups of `regex`
    pub fn compile(template: &str, regex: &Regex) -> Result<Self, ReplaceError> {
        let mut builder = PieceBuilder::default();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != '\\' {
                builder.push_char(c);
                continue;
            }

            let Some((_, next)) = chars.next() else {
                return Err(ReplaceError::invalid_template(format!(
                    "bad escape (end of template) at position {}",
                    pos
                )));
            };

            match next {
                'g' => {
                    let group = parse_named_group(&mut chars, regex, pos)?;
                    builder.push_group(group);
                }
                '0' => {
                    let value = take_octal_digits(&mut chars, 2)
                        .into_iter()
                        .fold(0, |acc, d| acc * 8 + d);
                    builder.push_char(octal_char(value, pos)?);
                }
                '1'..='9' => {
                    let first = digit_value(next);
                    match chars.peek().copied() {
                        Some((_, second)) if second.is_ascii_digit() => {
                            chars.next();
                            let is_octal = is_octal_digit(next) && is_octal_digit(second);
                            match chars.peek().copied() {
                                Some((_, third)) if is_octal && is_octal_digit(third) => {
                                    chars.next();
                                    let value =
                                        first * 64 + digit_value(second) * 8 + digit_value(third);
                                    builder.push_char(octal_char(value, pos)?);
                                }
                                _ => {
                                    let group = first * 10 + digit_value(second);
                                    builder.push_group(check_group(group as usize, regex, pos)?);
                                }
                            }
                        }
                        _ => builder.push_group(check_group(first as usize, regex, pos)?),
                    }
                }
                '\\' => builder.push_char('\\'),
                'a' => builder.push_char('\x07'),
                'b' => builder.push_char('\x08'),
                'f' => builder.push_char('\x0c'),
                'n' => builder.push_char('\n'),
                'r' => builder.push_char('\r'),
                't' => builder.push_char('\t'),
                'v' => builder.push_char('\x0b'),
                c if c.is_ascii_alphabetic() => {
                    return Err(ReplaceError::invalid_template(format!(
                        "bad escape \\{} at position {}",
                        c, pos
                    )));
                }
                c => {
                    builder.push_char('\\');
                    builder.push_char(c);
                }
            }
        }

        Ok(Self {
            pieces: builder.finish(),
        })
    }

    /// Append the expansion for one match to `dst`
    ///
    /// Groups that did not take part in the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>, dst: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => dst.push_str(text),
                Piece::Group(index) => {
                    if let Some(m) = caps.get(*index) {
                        dst.push_str(m.as_str());
                    }
                }
            }
        }
    }

    /// The template text if it has no group references
    pub fn as_literal(&self) -> Option<&str> {
        match self.pieces.as_slice() {
            [] => Some(""),
            [Piece::Literal(text)] => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Default)]
struct PieceBuilder {
    pieces: Vec<Piece>,
    literal: String,
}

impl PieceBuilder {
    fn push_char(&mut self, c: char) {
        self.literal.push(c);
    }

    fn push_group(&mut self, index: usize) {
        if !self.literal.is_empty() {
            self.pieces.push(Piece::Literal(std::mem::take(&mut self.literal)));
        }
        self.pieces.push(Piece::Group(index));
    }

    fn finish(mut self) -> Vec<Piece> {
        if !self.literal.is_empty() {
            self.pieces.push(Piece::Literal(self.literal));
        }
        self.pieces
    }
}

fn parse_named_group(
    chars: &mut Peekable<CharIndices<'_>>,
    regex: &Regex,
    pos: usize,
) -> Result<usize, ReplaceError> {
    match chars.next() {
        Some((_, '<')) => {}
        _ => {
            return Err(ReplaceError::invalid_template(format!(
                "missing < at position {}",
                pos
            )));
        }
    }

    let mut name = String::new();
    loop {
        match chars.next() {
            Some((_, '>')) => break,
            Some((_, c)) => name.push(c),
            None => {
                return Err(ReplaceError::invalid_template(format!(
                    "missing >, unterminated name at position {}",
                    pos
                )));
            }
        }
    }

    if name.is_empty() {
        return Err(ReplaceError::invalid_template(format!(
            "missing group name at position {}",
            pos
        )));
    }

    if name.chars().all(|c| c.is_ascii_digit()) {
        let index = name.parse::<usize>().map_err(|_| {
            ReplaceError::invalid_template(format!(
                "invalid group reference {} at position {}",
                name, pos
            ))
        })?;
        return check_group(index, regex, pos);
    }

    regex
        .capture_names()
        .position(|n| n == Some(name.as_str()))
        .ok_or_else(|| {
            ReplaceError::invalid_template(format!("unknown group name '{}' at position {}", name, pos))
        })
}

fn take_octal_digits(chars: &mut Peekable<CharIndices<'_>>, max: usize) -> Vec<u32> {
    let mut digits = Vec::with_capacity(max);
    while digits.len() < max {
        match chars.peek().copied() {
            Some((_, c)) if is_octal_digit(c) => {
                chars.next();
                digits.push(digit_value(c));
            }
            _ => break,
        }
    }
    digits
}

fn check_group(index: usize, regex: &Regex, pos: usize) -> Result<usize, ReplaceError> {
    // captures_len counts the implicit whole-match group 0
    if index < regex.captures_len() {
        Ok(index)
    } else {
        Err(ReplaceError::invalid_template(format!(
            "invalid group reference {} at position {}",
            index, pos
        )))
    }
}

fn octal_char(value: u32, pos: usize) -> Result<char, ReplaceError> {
    if value > 0o377 {
        return Err(ReplaceError::invalid_template(format!(
            "octal escape value \\{:o} outside of range 0-0o377 at position {}",
            value, pos
        )));
    }
    char::from_u32(value).ok_or_else(|| {
        ReplaceError::invalid_template(format!("invalid octal escape at position {}", pos))
    })
}

fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

fn digit_value(c: char) -> u32 {
    c.to_digit(10).unwrap_or(0)
}
