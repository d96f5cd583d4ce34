//! TOML writing.
//!
//! Serialization runs in two steps. Any `Serialize` type is first turned into a
//! [`Value`] tree by [`value::ValueSerializer`]; the tree is then rendered by
//! the writer registry in [`writers`]. The root must be a table, since a TOML
//! document is one.
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Owner {
//!     name: String,
//!     admin: bool,
//! }
//!
//! let text = tomlette::to_string(&Owner { name: "Tom".into(), admin: true }).unwrap();
//! assert_eq!(text, "name = \"Tom\"\nadmin = true\n");
//! ```

mod value;
mod writers;

use tracing::debug;

use self::writers::{ValueWriters, WriterContext};
use crate::{Error, Result, Table, Value, WriterOptions};

pub(crate) use self::value::{to_value, DATETIME_TOKEN};
pub(crate) use self::writers::write_inline_value;

/// Renders a document rooted at `table`.
pub(crate) fn write_document(table: &Table, options: &WriterOptions) -> Result<String> {
    debug!(keys = table.len(), "writing TOML document");

    let mut output = String::new();
    let mut ctx = WriterContext::new(&mut output, options);
    ValueWriters::new().write_document(table, &mut ctx)?;
    Ok(output)
}

/// Converts `value` to a tree and renders it; anything but a table is refused.
pub(crate) fn serialize<T: serde::Serialize + ?Sized>(value: &T, options: &WriterOptions) -> Result<String> {
    match to_value(value)? {
        Value::Table(table) => write_document(&table, options),
        other => Err(Error::UnsupportedType(format!(
            "{} at the document root; a TOML document must be a table",
            other.type_name()
        ))),
    }
}
