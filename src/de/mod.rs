//! TOML parsing.
//!
//! The document is read in one pass, line by line. Each line is blank, a
//! comment, a `[table]` / `[[table array]]` header, or a `key = value` pair
//! (whose value may run over several lines). Headers and keys go through
//! [`identifier`], values through the [`readers`] registry, and the results are
//! assembled by [`results::Results`] into a table tree.
//!
//! A problem on one line never stops the parse. It is recorded, the rest of
//! the line is skipped, and scanning resumes on the next line, so a single call
//! reports every mistake it can find.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use tomlette::from_str;
//!
//! let table = from_str("[server]\nhost = \"localhost\"\nports = [80, 443]").unwrap();
//! let server = table.get("server").unwrap();
//! assert_eq!(server.get("host").and_then(|v| v.as_str()), Some("localhost"));
//! ```

mod container;
mod context;
mod identifier;
mod readers;
mod results;

use tracing::{debug, trace};

use self::context::Context;
use self::identifier::{scan_header, scan_key, Identifier, IdentifierKind};
use self::readers::ValueReaders;
use self::results::Results;
use crate::{Error, Result, Table};

pub(crate) use self::identifier::is_bare_key_char;

/// Parses a whole document into its root table.
pub(crate) fn parse(input: &str) -> Result<Table> {
    debug!(bytes = input.len(), "parsing TOML document");

    let mut parser = Parser::new(input);
    parser.run();
    let Parser { ctx, results, .. } = parser;

    let errors = ctx.into_errors();
    if errors.is_empty() {
        let table = results.consume();
        debug!(errors = 0, keys = table.len(), "TOML document parsed");
        Ok(table)
    } else {
        debug!(errors = errors.len(), "TOML document rejected");
        Err(Error::Parse(errors))
    }
}

struct Parser<'a> {
    ctx: Context<'a>,
    results: Results,
    readers: ValueReaders,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            ctx: Context::new(input),
            results: Results::new(),
            readers: ValueReaders::new(),
        }
    }

    fn run(&mut self) {
        loop {
            self.ctx.skip_blanks();
            match self.ctx.peek() {
                None => break,
                Some('\n') => {
                    self.ctx.advance();
                }
                Some('#') => self.ctx.skip_to_line_end(),
                Some('[') => self.header(),
                Some(_) => self.key_value(),
            }
        }
    }

    fn header(&mut self) {
        let Some(raw) = scan_header(&mut self.ctx) else {
            self.results.detach();
            self.recover();
            return;
        };

        let identifier = Identifier::from(raw, &mut self.ctx);
        match identifier.kind() {
            Some(IdentifierKind::Table) => self.results.start_tables(&identifier, &mut self.ctx),
            Some(IdentifierKind::TableArray) => {
                self.results.start_table_array(&identifier, &mut self.ctx);
            }
            Some(IdentifierKind::Key) | None => {
                self.results.detach();
                self.recover();
                return;
            }
        }
        self.expect_line_end(&identifier);
    }

    fn key_value(&mut self) {
        let Some(raw) = scan_key(&mut self.ctx, &[]) else {
            self.recover();
            return;
        };

        let identifier = Identifier::key(raw, &mut self.ctx);
        if !identifier.is_valid() {
            self.recover();
            return;
        }

        self.ctx.skip_blanks();
        if matches!(self.ctx.peek(), None | Some('\n' | '#')) {
            let line = self.ctx.line();
            self.ctx.errors.invalid_value(identifier.name(), "", line);
            self.recover();
            return;
        }

        self.ctx.set_identifier(identifier.clone());
        match self.readers.read(&mut self.ctx) {
            Some(value) => {
                self.results.add_key(&identifier, value, &mut self.ctx);
                self.expect_line_end(&identifier);
            }
            None => self.recover(),
        }
    }

    /// Only whitespace or a comment may follow a value or a header.
    fn expect_line_end(&mut self, identifier: &Identifier) {
        self.ctx.skip_blanks();
        match self.ctx.peek() {
            None | Some('\n') => {}
            Some('#') => self.ctx.skip_to_line_end(),
            Some(_) => {
                let line = self.ctx.line();
                self.ctx
                    .errors
                    .invalid_text_after_identifier(identifier.name(), line);
                self.recover();
            }
        }
    }

    fn recover(&mut self) {
        trace!(line = self.ctx.line(), "skipping rest of line after error");
        self.ctx.skip_to_line_end();
    }
}
