use std::collections::HashSet;

use crate::de::context::Context;
use crate::de::identifier::{scan_key, Identifier};
use crate::de::readers::{ValueReader, ValueReaders};
use crate::{Table, Value};

/// `{ key = value, ... }` on a single line.
pub(crate) struct InlineTableReader;

impl ValueReader for InlineTableReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with('{')
    }

    fn read(&self, ctx: &mut Context<'_>, readers: &ValueReaders) -> Option<Value> {
        let start = ctx.position();
        let line = ctx.line();
        ctx.advance();

        let mut table = Table::new();
        let mut dotted = DottedTables::default();
        let mut expecting_entry = true;

        loop {
            ctx.skip_blanks();
            match ctx.peek() {
                None | Some('\n') => {
                    let key = ctx.key_name().to_string();
                    let text = ctx.line_from(start);
                    ctx.errors.unterminated(&key, text, line);
                    return None;
                }
                Some('}') => {
                    if expecting_entry && !table.is_empty() {
                        invalid(ctx, start, line);
                        return None;
                    }
                    ctx.advance();
                    return Some(Value::Table(table));
                }
                Some(',') => {
                    if expecting_entry {
                        invalid(ctx, start, line);
                        return None;
                    }
                    expecting_entry = true;
                    ctx.advance();
                }
                Some(_) => {
                    if !expecting_entry {
                        invalid(ctx, start, line);
                        return None;
                    }
                    let raw = scan_key(ctx, &['}', ','])?;
                    let identifier = Identifier::key(raw, ctx);
                    if !identifier.is_valid() {
                        return None;
                    }

                    ctx.skip_blanks();
                    let outer = ctx.set_identifier(identifier.clone());
                    let value = readers.read(ctx);
                    ctx.set_identifier(outer);

                    if !dotted.insert(&mut table, identifier.segments(), value?) {
                        let line = ctx.line();
                        ctx.errors.duplicate_key(identifier.name(), Some(line));
                        return None;
                    }
                    expecting_entry = false;
                }
            }
        }
    }
}

fn invalid(ctx: &mut Context<'_>, start: usize, line: usize) {
    let key = ctx.key_name().to_string();
    let text = ctx.line_from(start).trim_end();
    ctx.errors.invalid_value(&key, text, line);
}

/// The intermediate tables that dotted keys created inside one inline table.
/// Only these may be extended by a later dotted key; a table written out as
/// a value is already complete.
#[derive(Default)]
struct DottedTables {
    paths: HashSet<Vec<String>>,
}

impl DottedTables {
    /// Inserts `value` under the dotted path `segments`, creating intermediate
    /// tables. Returns `false` if the path collides with an existing value.
    fn insert(&mut self, table: &mut Table, segments: &[String], value: Value) -> bool {
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut current = table;
        for (index, segment) in parents.iter().enumerate() {
            let path = &segments[..=index];
            if !current.contains_key(segment) {
                current.insert(segment.clone(), Value::Table(Table::new()));
                self.paths.insert(path.to_vec());
            } else if !self.paths.contains(path) {
                return false;
            }
            match current.get_mut(segment) {
                Some(Value::Table(inner)) => current = inner,
                _ => return false,
            }
        }

        if current.contains_key(last) {
            return false;
        }
        current.insert(last.clone(), value);
        true
    }
}
