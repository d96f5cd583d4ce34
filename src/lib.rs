//! # tomlette
//!
//! A TOML parser and writer that reports every problem in a document at once.
//!
//! Parsing produces a [`Table`] of [`Value`]s. When the document is malformed,
//! parsing does not stop at the first mistake: each bad line is recorded as a
//! [`Diagnostic`] and scanning resumes on the next line, so
//! [`Error::Parse`] carries the whole report.
//!
//! Writing goes the other way for any `T: Serialize` whose root is a table.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tomlette = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Parsing
//!
//! ```rust
//! use tomlette::{from_str, Value};
//!
//! let doc = r#"
//! title = "example"
//!
//! [owner]
//! name = "Tom"
//! dob = 1979-05-27T07:32:00Z
//!
//! [[products]]
//! name = "Hammer"
//!
//! [[products]]
//! name = "Nail"
//! "#;
//!
//! let table = from_str(doc).unwrap();
//! assert_eq!(table.get("title"), Some(&Value::from("example")));
//! assert!(table.get("owner").and_then(|o| o.get("dob")).map_or(false, Value::is_datetime));
//! assert_eq!(table.get("products").and_then(Value::as_array).map(Vec::len), Some(2));
//! ```
//!
//! ### Diagnostics
//!
//! ```rust
//! use tomlette::{from_str, ErrorKind};
//!
//! let err = from_str("a = 1\n[a]\nb = [1, 2.0]").unwrap_err();
//! let kinds: Vec<_> = err.diagnostics().unwrap().kinds().collect();
//! assert_eq!(kinds, vec![ErrorKind::TableDuplicatesKey, ErrorKind::HeterogeneousArray]);
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use serde::Serialize;
//! use tomlette::to_string;
//!
//! #[derive(Serialize)]
//! struct Config {
//!     name: String,
//!     database: Database,
//! }
//!
//! #[derive(Serialize)]
//! struct Database {
//!     ports: Vec<u16>,
//! }
//!
//! let config = Config {
//!     name: "app".to_string(),
//!     database: Database { ports: vec![8000, 8001] },
//! };
//! assert_eq!(
//!     to_string(&config).unwrap(),
//!     "name = \"app\"\n\n[database]\nports = [8000, 8001]\n"
//! );
//! ```

mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
mod ser;
pub mod value;

pub use error::{Diagnostic, Diagnostics, Error, ErrorKind, Result};
pub use map::Table;
pub use options::{DatePolicy, WriterOptions};
pub use value::{Value, ValueKind};

use serde::Serialize;
use std::io;

/// Parses a TOML document.
///
/// # Errors
///
/// Returns [`Error::Parse`] with every diagnostic found when the document is
/// malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Table> {
    de::parse(s)
}

/// Parses a TOML document from UTF-8 bytes.
///
/// # Examples
///
/// ```rust
/// let table = tomlette::from_slice(b"answer = 42").unwrap();
/// assert_eq!(table.get("answer").and_then(|v| v.as_integer()), Some(42));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or the document is
/// malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Table> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Reads a whole TOML document from an I/O stream and parses it.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, or the parse error otherwise.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Table>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Serializes `value` to a TOML document with default options.
///
/// # Errors
///
/// Returns an error if the value does not convert to a table, contains a
/// type TOML cannot represent, or holds a heterogeneous array.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, WriterOptions::default())
}

/// Serializes `value` to a TOML document with custom layout options.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: WriterOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    ser::serialize(value, &options)
}

/// Converts any `T: Serialize` to a [`Value`].
///
/// ```rust
/// use tomlette::{to_value, Value};
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("x", 1);
/// let value = to_value(&map).unwrap();
/// assert_eq!(value.get("x"), Some(&Value::Integer(1)));
/// ```
///
/// # Errors
///
/// Returns an error for values with no TOML counterpart, such as a bare `None`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

/// Serializes `value` as a TOML document into `writer`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, WriterOptions::default())
}

/// Serializes `value` as a TOML document into `writer` with custom options.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: WriterOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::io::Cursor;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_from_reader_and_slice_agree() {
        let text = "[point]\nx = 1\ny = 2\n";
        let from_reader = from_reader(Cursor::new(text)).unwrap();
        let from_slice = from_slice(text.as_bytes()).unwrap();
        assert_eq!(from_reader, from_slice);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert!(matches!(from_slice(&[0x61, 0x20, 0x3d, 0xff]), Err(Error::Custom(_))));
    }

    #[test]
    fn test_root_must_be_a_table() {
        assert!(matches!(to_string(&vec![1, 2]), Err(Error::UnsupportedType(_))));
        assert!(matches!(to_string("text"), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        assert!(value.is_table());
        assert_eq!(value.get("y"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_written_document_parses_back() {
        let doc = crate::toml!({
            "title": "demo",
            "owner": { "name": "Tom", "tags": ["a", "b"] },
            "servers": [{ "ip": "10.0.0.1" }, { "ip": "10.0.0.2" }]
        });
        let text = to_string(&doc).unwrap();
        assert_eq!(Value::Table(from_str(&text).unwrap()), doc);
    }
}
