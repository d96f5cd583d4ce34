//! The four TOML string forms.
//!
//! Basic strings (`"..."`, `"""..."""`) are decoded in two passes: first every
//! `\uXXXX` / `\UXXXXXXXX` sequence is replaced by its character, then the
//! remaining backslash escapes are checked and decoded. Any escape outside
//! `\b \t \n \f \r \" \\ \/` makes the value invalid. Literal strings
//! (`'...'`, `'''...'''`) are taken verbatim.

use crate::de::context::Context;
use crate::de::readers::{ValueReader, ValueReaders};
use crate::Value;

pub(crate) struct BasicStringReader;
pub(crate) struct MultilineBasicStringReader;
pub(crate) struct LiteralStringReader;
pub(crate) struct MultilineLiteralStringReader;

impl ValueReader for BasicStringReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with('"')
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let start = ctx.position();
        let line = ctx.line();
        ctx.advance();
        let content_start = ctx.position();

        loop {
            match ctx.peek() {
                None | Some('\n') => {
                    let (key, text) = (key(ctx), ctx.line_from(start));
                    ctx.errors.unterminated(&key, text, line);
                    return None;
                }
                Some('\\') => {
                    ctx.advance();
                    if ctx.peek().is_some_and(|c| c != '\n') {
                        ctx.advance();
                    }
                }
                Some('"') => break,
                Some(_) => {
                    ctx.advance();
                }
            }
        }

        let raw = ctx.slice(content_start, ctx.position());
        ctx.advance();
        decoded(ctx, raw, start, line)
    }
}

impl ValueReader for MultilineBasicStringReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with("\"\"\"")
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let start = ctx.position();
        let line = ctx.line();
        ctx.advance_by(3);
        skip_leading_newline(ctx);
        let content_start = ctx.position();

        loop {
            match ctx.peek() {
                None => {
                    let (key, text) = (key(ctx), ctx.line_from(start));
                    ctx.errors.unterminated(&key, text, line);
                    return None;
                }
                Some('\\') => {
                    ctx.advance_by(2);
                }
                Some('"') if ctx.rest().starts_with("\"\"\"") => break,
                Some(_) => {
                    ctx.advance();
                }
            }
        }

        let raw = ctx.slice(content_start, ctx.position());
        ctx.advance_by(3);
        let joined = join_continued_lines(raw);
        decoded(ctx, &joined, start, line)
    }
}

impl ValueReader for LiteralStringReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with('\'')
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let start = ctx.position();
        let line = ctx.line();
        ctx.advance();
        let content_start = ctx.position();

        loop {
            match ctx.peek() {
                None | Some('\n') => {
                    let (key, text) = (key(ctx), ctx.line_from(start));
                    ctx.errors.unterminated(&key, text, line);
                    return None;
                }
                Some('\'') => break,
                Some(_) => {
                    ctx.advance();
                }
            }
        }

        let value = ctx.slice(content_start, ctx.position()).to_string();
        ctx.advance();
        Some(Value::String(value))
    }
}

impl ValueReader for MultilineLiteralStringReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with("'''")
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let start = ctx.position();
        let line = ctx.line();
        ctx.advance_by(3);
        skip_leading_newline(ctx);
        let content_start = ctx.position();

        match ctx.rest().find("'''") {
            Some(len) => {
                let value = ctx.slice(content_start, content_start + len).to_string();
                let chars = value.chars().count() + 3;
                ctx.advance_by(chars);
                Some(Value::String(value))
            }
            None => {
                ctx.advance_by(ctx.rest().chars().count());
                let (key, text) = (key(ctx), ctx.line_from(start));
                ctx.errors.unterminated(&key, text, line);
                None
            }
        }
    }
}

fn key(ctx: &Context<'_>) -> String {
    ctx.key_name().to_string()
}

fn skip_leading_newline(ctx: &mut Context<'_>) {
    if ctx.rest().starts_with("\r\n") {
        ctx.advance_by(2);
    } else if ctx.peek() == Some('\n') {
        ctx.advance();
    }
}

fn decoded(ctx: &mut Context<'_>, raw: &str, start: usize, line: usize) -> Option<Value> {
    match decode_basic(raw) {
        Some(value) => Some(Value::String(value)),
        None => {
            let text = ctx.slice(start, ctx.position());
            let text = text.lines().next().unwrap_or_default();
            let key = key(ctx);
            ctx.errors.invalid_value(&key, text, line);
            None
        }
    }
}

/// Decodes the body of a basic string, or `None` on an invalid escape.
pub(crate) fn decode_basic(raw: &str) -> Option<String> {
    replace_special_characters(&replace_unicode_characters(raw))
}

/// Replaces `\uXXXX` and `\UXXXXXXXX` with the characters they name.
///
/// Sequences that are not valid hex or name no scalar value are left alone so
/// the escape pass rejects them. A decoded backslash is written back escaped,
/// keeping it from starting a new escape.
pub(crate) fn replace_unicode_characters(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(index) = rest.find('\\') {
        out.push_str(&rest[..index]);
        rest = &rest[index..];

        let width = match rest.as_bytes().get(1) {
            Some(b'u') => 4,
            Some(b'U') => 8,
            Some(b'\\') => {
                out.push_str("\\\\");
                rest = &rest[2..];
                continue;
            }
            _ => {
                out.push('\\');
                rest = &rest[1..];
                continue;
            }
        };

        let decoded = rest
            .get(2..2 + width)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some('\\') => out.push_str("\\\\"),
            Some(ch) => out.push(ch),
            None => {
                out.push('\\');
                rest = &rest[1..];
                continue;
            }
        }
        rest = &rest[2 + width..];
    }

    out.push_str(rest);
    out
}

/// Decodes the short escapes, returning `None` if any other escape is present.
pub(crate) fn replace_special_characters(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let decoded = match chars.next()? {
            'b' => '\u{8}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{c}',
            'r' => '\r',
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

/// Removes each backslash that ends a line together with the line break and
/// all whitespace up to the next non-whitespace character.
fn join_continued_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(index) = rest.find('\\') {
        out.push_str(&rest[..index]);
        let after = &rest[index + 1..];

        if after.starts_with('\\') {
            out.push_str("\\\\");
            rest = &after[1..];
            continue;
        }

        let trailing = after.trim_start_matches([' ', '\t', '\r']);
        if trailing.starts_with('\n') {
            rest = trailing.trim_start();
        } else {
            out.push('\\');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}
