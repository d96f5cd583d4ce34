//! Value readers.
//!
//! Each reader recognises one kind of value from the text at the cursor and
//! consumes exactly that value. [`ValueReaders`] tries them in a fixed order, so
//! the more specific prefixes win: `"""` before `"`, a date before a number.
//!
//! A reader that fails records a diagnostic on the context and returns `None`.
//! It never returns `None` silently.

mod array;
mod boolean;
mod datetime;
mod inline_table;
mod number;
pub(crate) mod string;

use crate::de::context::Context;
use crate::Value;

use self::array::ArrayReader;
use self::boolean::BooleanReader;
use self::datetime::DatetimeReader;
use self::inline_table::InlineTableReader;
use self::number::NumberReader;
use self::string::{
    BasicStringReader, LiteralStringReader, MultilineBasicStringReader,
    MultilineLiteralStringReader,
};

pub(crate) trait ValueReader: Sync {
    /// Whether this reader recognises the value starting at `rest`.
    fn can_read(&self, rest: &str) -> bool;

    /// Consumes one value. Nested values are read through `readers`.
    fn read(&self, ctx: &mut Context<'_>, readers: &ValueReaders) -> Option<Value>;
}

static READERS: [&dyn ValueReader; 9] = [
    &MultilineBasicStringReader,
    &MultilineLiteralStringReader,
    &LiteralStringReader,
    &BasicStringReader,
    &DatetimeReader,
    &NumberReader,
    &BooleanReader,
    &ArrayReader,
    &InlineTableReader,
];

/// The ordered reader registry.
pub(crate) struct ValueReaders {
    readers: &'static [&'static dyn ValueReader],
}

impl ValueReaders {
    pub(crate) fn new() -> Self {
        ValueReaders { readers: &READERS }
    }

    /// Reads the value at the cursor with the first reader that recognises
    /// it. When none does, an invalid value is recorded and nothing is
    /// consumed.
    pub(crate) fn read(&self, ctx: &mut Context<'_>) -> Option<Value> {
        let rest = ctx.rest();
        match self.readers.iter().find(|reader| reader.can_read(rest)) {
            Some(reader) => reader.read(ctx, self),
            None => {
                let text = ctx.rest_of_line().trim();
                let (key, line) = (ctx.key_name().to_string(), ctx.line());
                ctx.errors.invalid_value(&key, text, line);
                None
            }
        }
    }
}

/// Consumes characters while `accept` holds, returning the consumed text.
pub(crate) fn take_while<'a>(ctx: &mut Context<'a>, accept: impl Fn(char) -> bool) -> &'a str {
    let start = ctx.position();
    while let Some(c) = ctx.peek() {
        if !accept(c) {
            break;
        }
        ctx.advance();
    }
    ctx.slice(start, ctx.position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_dispatch_order() {
        let readers = ValueReaders::new();
        let cases = [
            ("\"\"\"x\"\"\"", Value::from("x")),
            ("'''x'''", Value::from("x")),
            ("'x'", Value::from("x")),
            ("\"x\"", Value::from("x")),
            ("1", Value::from(1)),
            ("true", Value::from(true)),
            ("[]", Value::Array(vec![])),
            ("{}", Value::Table(crate::Table::new())),
        ];
        for (input, expected) in cases {
            let mut ctx = Context::new(input);
            assert_eq!(readers.read(&mut ctx), Some(expected), "{input}");
            assert!(ctx.is_at_end(), "{input}");
        }

        let mut ctx = Context::new("1979-05-27T07:32:00Z");
        assert!(readers.read(&mut ctx).is_some_and(|v| v.is_datetime()));
    }

    #[test]
    fn test_unrecognised_value_consumes_nothing() {
        let mut ctx = Context::new("abc # comment");
        assert_eq!(ValueReaders::new().read(&mut ctx), None);
        assert_eq!(ctx.position(), 0);
        assert_eq!(ctx.errors.kinds().collect::<Vec<_>>(), vec![ErrorKind::InvalidValue]);
        assert_eq!(
            ctx.errors.iter().next().map(|d| d.message().to_string()),
            Some("Invalid value on line 1:  = abc # comment".to_string())
        );
    }
}
