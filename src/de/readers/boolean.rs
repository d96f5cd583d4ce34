use crate::de::context::Context;
use crate::de::readers::{ValueReader, ValueReaders};
use crate::Value;

pub(crate) struct BooleanReader;

impl ValueReader for BooleanReader {
    fn can_read(&self, rest: &str) -> bool {
        rest.starts_with("true") || rest.starts_with("false")
    }

    fn read(&self, ctx: &mut Context<'_>, _readers: &ValueReaders) -> Option<Value> {
        let value = ctx.rest().starts_with("true");
        ctx.advance_by(if value { 4 } else { 5 });
        Some(Value::Boolean(value))
    }
}
