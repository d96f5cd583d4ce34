//! The shared scan state of one parse.
//!
//! A single [`Context`] is created per document and passed by `&mut` through
//! every reader, the identifier scanner and the table builder. Its byte
//! position only ever moves forward, and its line counter is bumped for every
//! `\n` consumed, including newlines crossed inside nested reads (multi-line
//! arrays, multi-line strings). After any call returns, the position reflects
//! exactly what that call consumed.

use crate::de::identifier::Identifier;
use crate::error::Diagnostics;

pub(crate) struct Context<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    identifier: Identifier,
    pub(crate) errors: Diagnostics,
}

impl<'a> Context<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        let position = if input.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };

        Context {
            input,
            position,
            line: 1,
            identifier: Identifier::invalid(),
            errors: Diagnostics::new(),
        }
    }

    /// Byte offset of the next unconsumed character.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// The 1-based line of the next unconsumed character.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    #[cfg(test)]
    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// The unconsumed remainder of the document.
    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// The unconsumed remainder of the current line, without its line break.
    pub(crate) fn rest_of_line(&self) -> &'a str {
        line_of(self.rest())
    }

    /// Text from `start` to the end of the line `start` is on.
    pub(crate) fn line_from(&self, start: usize) -> &'a str {
        line_of(&self.input[start..])
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes one character, counting line breaks.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Consumes `count` characters.
    pub(crate) fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Skips spaces, tabs and carriage returns, stopping at a line feed.
    pub(crate) fn skip_blanks(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Moves to the line feed that ends the current line, leaving it unconsumed.
    pub(crate) fn skip_to_line_end(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Name of the key currently being read, for diagnostics.
    pub(crate) fn key_name(&self) -> &str {
        self.identifier.name()
    }

    /// Replaces the current identifier, returning the previous one so nested
    /// reads (inline tables) can restore it.
    pub(crate) fn set_identifier(&mut self, identifier: Identifier) -> Identifier {
        std::mem::replace(&mut self.identifier, identifier)
    }

    pub(crate) fn into_errors(self) -> Diagnostics {
        self.errors
    }
}

fn line_of(text: &str) -> &str {
    let end = text.find('\n').unwrap_or(text.len());
    text[..end].trim_end_matches('\r')
}
