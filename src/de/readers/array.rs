//! Arrays, which may span lines and hold comments between elements.
//!
//! Elements must all share one kind. A mismatching element is reported and
//! still appended so that reading can continue to the closing bracket.

use crate::de::context::Context;
use crate::de::readers::{ValueReader, ValueReaders};
use crate::Value;

pub(crate) struct ArrayReader;

impl ValueReader for ArrayReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with('[')
    }

    fn read(&self, ctx: &mut Context<'_>, readers: &ValueReaders) -> Option<Value> {
        let start = ctx.position();
        let line = ctx.line();
        ctx.advance();

        let mut items: Vec<Value> = Vec::new();
        let mut awaiting_comma = false;
        let mut failed = false;

        loop {
            match ctx.peek() {
                None => {
                    let key = ctx.key_name().to_string();
                    let text = ctx.line_from(start);
                    ctx.errors.unterminated(&key, text, line);
                    return None;
                }
                Some(']') => {
                    ctx.advance();
                    break;
                }
                Some('#') => ctx.skip_to_line_end(),
                Some(',') => {
                    if !awaiting_comma {
                        misplaced(ctx);
                        failed = true;
                    }
                    awaiting_comma = false;
                    ctx.advance();
                }
                Some(c) if c.is_whitespace() => {
                    ctx.advance();
                }
                Some(_) if awaiting_comma => {
                    misplaced(ctx);
                    failed = true;
                    skip_token(ctx);
                }
                Some(c) => {
                    let element = if c == '[' {
                        self.read(ctx, readers)
                    } else {
                        readers.read(ctx)
                    };

                    match element {
                        Some(element) => push_element(ctx, &mut items, element),
                        None => {
                            // the element already reported itself
                            failed = true;
                            skip_token(ctx);
                        }
                    }
                    awaiting_comma = true;
                }
            }
        }

        if failed {
            None
        } else {
            Some(Value::Array(items))
        }
    }
}

fn push_element(ctx: &mut Context<'_>, items: &mut Vec<Value>, element: Value) {
    if let Some(first) = items.first() {
        if !first.kind().is_compatible_with(element.kind()) {
            let (key, line) = (ctx.key_name().to_string(), ctx.line());
            ctx.errors.heterogeneous(&key, line);
        }
    }
    items.push(element);
}

fn misplaced(ctx: &mut Context<'_>) {
    let (key, line) = (ctx.key_name().to_string(), ctx.line());
    let text = ctx.rest_of_line().trim();
    ctx.errors.invalid_value(&key, text, line);
}

/// Skips to the next element boundary without recording anything.
fn skip_token(ctx: &mut Context<'_>) {
    while let Some(c) = ctx.peek() {
        if matches!(c, ',' | ']' | '\n' | '#') {
            break;
        }
        ctx.advance();
    }
}
