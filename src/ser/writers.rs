//! Value writers.
//!
//! The mirror image of the reader registry: each writer recognises one kind of
//! value and renders it. A table is written in two passes. The first emits
//! scalars and primitive arrays as `key = value` lines under the current
//! header; the second recurses into sub-tables and table arrays, each getting
//! its own header.

use chrono::SecondsFormat;

use crate::de::is_bare_key_char;
use crate::{DatePolicy, Error, Result, Table, Value, WriterOptions};

/// The role a writer plays when a table decides what goes where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriterKind {
    Primitive,
    PrimitiveArray,
    TableArray,
    Table,
}

pub(crate) trait ValueWriter: Sync {
    fn can_write(&self, value: &Value) -> bool;

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, writers: &ValueWriters) -> Result<()>;

    fn kind(&self) -> WriterKind;

    fn is_primitive_type(&self) -> bool {
        self.kind() == WriterKind::Primitive
    }
}

/// Output buffer plus the header path and indentation of the table being
/// written.
pub(crate) struct WriterContext<'o> {
    output: &'o mut String,
    options: &'o WriterOptions,
    key: String,
    array_key: Option<String>,
    table_indent: String,
    field_indent: String,
    is_array_of_table: bool,
}

impl<'o> WriterContext<'o> {
    pub(crate) fn new(output: &'o mut String, options: &'o WriterOptions) -> Self {
        WriterContext {
            output,
            options,
            key: String::new(),
            array_key: None,
            table_indent: String::new(),
            field_indent: String::new(),
            is_array_of_table: false,
        }
    }

    /// Context for the sub-table `key` of the current table.
    pub(crate) fn push_table(&mut self, key: &str) -> WriterContext<'_> {
        let (key, table_indent) = if self.key.is_empty() {
            (key.to_string(), String::new())
        } else {
            let indent = " ".repeat(self.options.indent_tables_by);
            (format!("{}.{key}", self.key), format!("{}{indent}", self.table_indent))
        };
        let field_indent = format!("{table_indent}{}", " ".repeat(self.options.indent_values_by));

        WriterContext {
            output: &mut *self.output,
            options: self.options,
            key,
            array_key: None,
            table_indent,
            field_indent,
            is_array_of_table: false,
        }
    }

    /// Context for one element of the table array this context names.
    pub(crate) fn push_table_from_array(&mut self) -> WriterContext<'_> {
        WriterContext {
            output: &mut *self.output,
            options: self.options,
            key: self.key.clone(),
            array_key: None,
            table_indent: self.table_indent.clone(),
            field_indent: self.field_indent.clone(),
            is_array_of_table: true,
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Writes `[key]` or `[[key]]`. The root table has no header.
    pub(crate) fn write_key(&mut self) {
        if self.key.is_empty() {
            return;
        }
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&self.table_indent);
        if self.is_array_of_table {
            self.output.push_str("[[");
            self.output.push_str(&self.key);
            self.output.push_str("]]\n");
        } else {
            self.output.push('[');
            self.output.push_str(&self.key);
            self.output.push_str("]\n");
        }
    }

    pub(crate) fn indent(&mut self) {
        if !self.key.is_empty() {
            self.output.push_str(&self.field_indent);
        }
    }

    fn padding(&mut self) {
        for _ in 0..self.options.pad_array_delimiters_by {
            self.output.push(' ');
        }
    }

    fn date_policy(&self) -> &DatePolicy {
        &self.options.date_policy
    }

    /// Dotted path of the value being written, for error messages.
    fn path(&self) -> String {
        match (&self.array_key, self.key.is_empty()) {
            (Some(array_key), true) => array_key.clone(),
            (Some(array_key), false) => format!("{}.{array_key}", self.key),
            (None, _) => self.key.clone(),
        }
    }
}

pub(crate) struct StringWriter;
pub(crate) struct NumberWriter;
pub(crate) struct BooleanWriter;
pub(crate) struct DatetimeWriter;
pub(crate) struct PrimitiveArrayWriter;
pub(crate) struct TableArrayWriter;
pub(crate) struct TableWriter;

static WRITERS: [&dyn ValueWriter; 7] = [
    &StringWriter,
    &NumberWriter,
    &BooleanWriter,
    &DatetimeWriter,
    &PrimitiveArrayWriter,
    &TableArrayWriter,
    &TableWriter,
];

/// The ordered writer registry.
pub(crate) struct ValueWriters {
    writers: &'static [&'static dyn ValueWriter],
}

impl ValueWriters {
    pub(crate) fn new() -> Self {
        ValueWriters { writers: &WRITERS }
    }

    pub(crate) fn find(&self, value: &Value) -> Result<&'static dyn ValueWriter> {
        self.writers
            .iter()
            .copied()
            .find(|writer| writer.can_write(value))
            .ok_or_else(|| Error::unsupported_type(value.type_name()))
    }

    /// Writes a whole document rooted at `table`.
    pub(crate) fn write_document(&self, table: &Table, ctx: &mut WriterContext<'_>) -> Result<()> {
        TableWriter.write_table(table, ctx, self)
    }
}

impl ValueWriter for StringWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_str()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, _writers: &ValueWriters) -> Result<()> {
        if let Value::String(text) = value {
            write_string(ctx.output, text);
        }
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Primitive
    }
}

impl ValueWriter for NumberWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_integer() || value.is_float()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, _writers: &ValueWriters) -> Result<()> {
        match value {
            Value::Integer(i) => ctx.write(&i.to_string()),
            Value::Float(f) => ctx.write(&format_float(*f)),
            _ => {}
        }
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Primitive
    }
}

impl ValueWriter for BooleanWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_bool()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, _writers: &ValueWriters) -> Result<()> {
        if let Value::Boolean(b) = value {
            ctx.write(if *b { "true" } else { "false" });
        }
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Primitive
    }
}

impl ValueWriter for DatetimeWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_datetime()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, _writers: &ValueWriters) -> Result<()> {
        if let Value::Datetime(dt) = value {
            let text = format_datetime(dt, ctx.date_policy());
            ctx.write(&text);
        }
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Primitive
    }
}

impl ValueWriter for PrimitiveArrayWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_array() && !value.is_table_array()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, writers: &ValueWriters) -> Result<()> {
        let Value::Array(items) = value else {
            return Ok(());
        };

        if let Some(first) = items.first() {
            if let Some(other) = items.iter().find(|item| !first.kind().is_compatible_with(item.kind())) {
                return Err(Error::HeterogeneousArray {
                    path: ctx.path(),
                    first: first.type_name(),
                    found: other.type_name(),
                });
            }
        }

        ctx.write("[");
        ctx.padding();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                ctx.write(", ");
            }
            match item {
                Value::Table(table) => {
                    let options = ctx.options;
                    write_inline_table(ctx.output, table, &options.date_policy);
                }
                Value::Array(_) => self.write(item, ctx, writers)?,
                _ => writers.find(item)?.write(item, ctx, writers)?,
            }
        }
        ctx.padding();
        ctx.write("]");
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::PrimitiveArray
    }
}

impl ValueWriter for TableArrayWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_table_array()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, writers: &ValueWriters) -> Result<()> {
        if let Value::Array(items) = value {
            for item in items {
                if let Value::Table(table) = item {
                    TableWriter.write_table(table, &mut ctx.push_table_from_array(), writers)?;
                }
            }
        }
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::TableArray
    }
}

impl TableWriter {
    fn write_table(&self, table: &Table, ctx: &mut WriterContext<'_>, writers: &ValueWriters) -> Result<()> {
        let mut has_primitives = false;
        for value in table.values() {
            if writes_inline(writers.find(value)?) {
                has_primitives = true;
                break;
            }
        }

        if has_primitives || table.is_empty() || ctx.is_array_of_table {
            ctx.write_key();
        }

        for (key, value) in table {
            let writer = writers.find(value)?;
            if writes_inline(writer) {
                ctx.indent();
                write_key(ctx.output, key);
                ctx.write(" = ");
                ctx.array_key = Some(quote_key(key));
                writer.write(value, ctx, writers)?;
                ctx.array_key = None;
                ctx.write("\n");
            }
        }

        for (key, value) in table {
            let writer = writers.find(value)?;
            if !writes_inline(writer) {
                writer.write(value, &mut ctx.push_table(&quote_key(key)), writers)?;
            }
        }

        Ok(())
    }
}

/// Scalars and primitive arrays stay with the `key = value` lines of their table.
fn writes_inline(writer: &dyn ValueWriter) -> bool {
    writer.is_primitive_type() || writer.kind() == WriterKind::PrimitiveArray
}

impl ValueWriter for TableWriter {
    fn can_write(&self, value: &Value) -> bool {
        value.is_table()
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>, writers: &ValueWriters) -> Result<()> {
        match value {
            Value::Table(table) => self.write_table(table, ctx, writers),
            _ => Ok(()),
        }
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Table
    }
}

/// Renders `value` as it would appear on the right of `=`, with tables inline.
pub(crate) fn write_inline_value(out: &mut String, value: &Value, policy: &DatePolicy) {
    match value {
        Value::String(text) => write_string(out, text),
        Value::Integer(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Datetime(dt) => out.push_str(&format_datetime(dt, policy)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_inline_value(out, item, policy);
            }
            out.push(']');
        }
        Value::Table(table) => write_inline_table(out, table, policy),
    }
}

fn write_inline_table(out: &mut String, table: &Table, policy: &DatePolicy) {
    if table.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{ ");
    for (i, (key, value)) in table.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_key(out, key);
        out.push_str(" = ");
        write_inline_value(out, value, policy);
    }
    out.push_str(" }");
}

fn write_key(out: &mut String, key: &str) {
    out.push_str(&quote_key(key));
}

/// Quotes a key unless it is a non-empty run of `A-Z a-z 0-9 _ -`.
pub(crate) fn quote_key(key: &str) -> String {
    if !key.is_empty() && key.chars().all(is_bare_key_char) {
        return key.to_string();
    }
    let mut quoted = String::with_capacity(key.len() + 2);
    quoted.push('"');
    escape_into(&mut quoted, key);
    quoted.push('"');
    quoted
}

/// Single-line strings are written quoted and escaped. A string with line
/// breaks becomes a `"""` block, escaped one line at a time.
fn write_string(out: &mut String, text: &str) {
    if !text.contains('\n') {
        out.push('"');
        escape_into(out, text);
        out.push('"');
        return;
    }

    out.push_str("\"\"\"\n");
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        escape_into(out, line);
    }
    out.push_str("\"\"\"");
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        // Debug keeps a fractional part or exponent, so the text reads back as a float
        format!("{f:?}")
    }
}

fn format_datetime(dt: &chrono::DateTime<chrono::FixedOffset>, policy: &DatePolicy) -> String {
    let format = if policy.show_fractional_seconds {
        SecondsFormat::AutoSi
    } else {
        SecondsFormat::Secs
    };
    dt.with_timezone(&policy.time_zone).to_rfc3339_opts(format, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn render(table: &Table, options: &WriterOptions) -> Result<String> {
        let mut out = String::new();
        let mut ctx = WriterContext::new(&mut out, options);
        ValueWriters::new().write_document(table, &mut ctx)?;
        Ok(out)
    }

    fn table(entries: Vec<(&str, Value)>) -> Table {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_primitives_before_sub_tables() {
        let doc = table(vec![
            ("owner", Value::Table(table(vec![("name", Value::from("Tom"))]))),
            ("title", Value::from("example")),
        ]);
        assert_eq!(
            render(&doc, &WriterOptions::new()).unwrap(),
            "title = \"example\"\n\n[owner]\nname = \"Tom\"\n"
        );
    }

    #[test]
    fn test_parent_header_only_when_needed() {
        let doc = table(vec![(
            "a",
            Value::Table(table(vec![("b", Value::Table(table(vec![("c", Value::from(1))])))])),
        )]);
        assert_eq!(render(&doc, &WriterOptions::new()).unwrap(), "[a.b]\nc = 1\n");

        let empty = table(vec![("e", Value::Table(Table::new()))]);
        assert_eq!(render(&empty, &WriterOptions::new()).unwrap(), "[e]\n");
    }

    #[test]
    fn test_table_arrays() {
        let doc = table(vec![(
            "fruit",
            Value::Array(vec![
                Value::Table(table(vec![("name", Value::from("apple"))])),
                Value::Table(Table::new()),
            ]),
        )]);
        assert_eq!(
            render(&doc, &WriterOptions::new()).unwrap(),
            "[[fruit]]\nname = \"apple\"\n\n[[fruit]]\n"
        );
    }

    #[test]
    fn test_indentation_and_padding() {
        let doc = table(vec![(
            "a",
            Value::Table(table(vec![
                ("x", Value::Array(vec![Value::from(1), Value::from(2)])),
                ("b", Value::Table(table(vec![("y", Value::from(true))]))),
            ])),
        )]);
        let options = WriterOptions::new()
            .with_indent_values_by(2)
            .with_indent_tables_by(1)
            .with_pad_array_delimiters_by(1);
        assert_eq!(
            render(&doc, &options).unwrap(),
            "[a]\n  x = [ 1, 2 ]\n\n [a.b]\n   y = true\n"
        );
    }

    #[test]
    fn test_keys_are_quoted_when_needed() {
        assert_eq!(quote_key("a-b_9"), "a-b_9");
        assert_eq!(quote_key("weird key"), "\"weird key\"");
        assert_eq!(quote_key(""), "\"\"");
        assert_eq!(quote_key("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_strings_and_floats() {
        let mut out = String::new();
        write_string(&mut out, "tab\there\u{1}");
        assert_eq!(out, "\"tab\\there\\u0001\"");

        let mut out = String::new();
        write_string(&mut out, "one\ntwo \"q\"");
        assert_eq!(out, "\"\"\"\none\ntwo \\\"q\\\"\"\"\"");

        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn test_date_policy() {
        let dt = DateTime::parse_from_rfc3339("1979-05-27T00:32:00.5-07:00").unwrap();
        assert_eq!(format_datetime(&dt, &DatePolicy::new()), "1979-05-27T07:32:00.500Z");

        let policy = DatePolicy::new()
            .with_time_zone(FixedOffset::east_opt(3600).unwrap())
            .with_fractional_seconds(false);
        assert_eq!(format_datetime(&dt, &policy), "1979-05-27T08:32:00+01:00");
    }

    #[test]
    fn test_heterogeneous_array_is_refused() {
        let doc = table(vec![(
            "t",
            Value::Table(table(vec![("mixed", Value::Array(vec![Value::from(1), Value::from("a")]))])),
        )]);
        match render(&doc, &WriterOptions::new()) {
            Err(Error::HeterogeneousArray { path, first, found }) => {
                assert_eq!(path, "t.mixed");
                assert_eq!((first, found), ("integer", "string"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_tables_inside_arrays_are_inline() {
        let doc = table(vec![(
            "points",
            Value::Array(vec![Value::Array(vec![Value::Table(table(vec![("x", Value::from(1))]))])]),
        )]);
        assert_eq!(render(&doc, &WriterOptions::new()).unwrap(), "points = [[{ x = 1 }]]\n");
    }
}
