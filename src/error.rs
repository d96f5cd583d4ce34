//! Error types for TOML parsing and writing.
//!
//! Parsing never stops at the first problem. Every reader and the table builder
//! record what they find in a shared [`Diagnostics`] accumulator and keep going,
//! so a single pass over a hand-edited file reports all of its mistakes at once.
//! Only when the whole document has been scanned is the accumulator inspected:
//! if it holds anything, the parse fails with [`Error::Parse`].
//!
//! ## Diagnostic wording
//!
//! Each diagnostic renders as `<description> on line <N>: <offending text>`.
//! The wording is stable; tooling may grep for it.
//!
//! ## Examples
//!
//! ```rust
//! use tomlette::{from_str, Error, ErrorKind};
//!
//! let result = from_str("a = 1\na = 2\nb = \"open");
//! match result {
//!     Err(Error::Parse(diagnostics)) => {
//!         assert_eq!(diagnostics.len(), 2);
//!         assert_eq!(
//!             diagnostics.kinds().collect::<Vec<_>>(),
//!             vec![ErrorKind::DuplicateKey, ErrorKind::UnterminatedValue]
//!         );
//!     }
//!     _ => panic!("expected diagnostics"),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Everything that can go wrong while reading or writing TOML.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The document is not valid TOML. Carries every problem found in one pass.
    #[error("{0}")]
    Parse(Diagnostics),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A value that has no TOML representation
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// `None` was serialized where a value was required.
    #[error("Unsupported type: None has no TOML representation")]
    UnsupportedNone,

    /// The writer refused an array whose elements have different kinds.
    #[error("{path}: cannot write a heterogeneous array; first element was of type {first} but found {found}")]
    HeterogeneousArray {
        path: String,
        first: &'static str,
        found: &'static str,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomlette::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an unsupported type error for values that cannot be written as TOML.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Returns the parse diagnostics if this is a parse failure.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Error::Parse(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The category of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidKey,
    InvalidTable,
    InvalidTableArray,
    /// A dotted name with an empty segment, such as `a..b`.
    EmptyImplicitTable,
    DuplicateKey,
    DuplicateTable,
    /// A table header names a key that already holds a plain value.
    TableDuplicatesKey,
    /// A key is assigned where a table already exists.
    KeyDuplicatesTable,
    InvalidValue,
    UnterminatedValue,
    /// A key line without `=`.
    UnterminatedKey,
    HeterogeneousArray,
    /// Something other than whitespace or a comment follows a value or header.
    InvalidTextAfterIdentifier,
}

/// A single problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: ErrorKind,
    line: Option<usize>,
    message: String,
}

impl Diagnostic {
    fn new(kind: ErrorKind, line: Option<usize>, message: String) -> Self {
        Diagnostic {
            kind,
            line,
            message,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The 1-based line the problem was reported on, when one is known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered, append-only collection of parse diagnostics.
///
/// Recording a diagnostic never interrupts parsing. A non-empty accumulator at
/// the end of a parse marks the whole document as invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// The kinds of the recorded diagnostics, in detection order.
    pub fn kinds(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        self.0.iter().map(Diagnostic::kind)
    }

    /// Returns `true` if at least one diagnostic of `kind` was recorded.
    #[must_use]
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|d| d.kind == kind)
    }

    /// Appends every diagnostic of `other`, keeping order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    fn push(&mut self, kind: ErrorKind, line: Option<usize>, message: String) {
        self.0.push(Diagnostic::new(kind, line, message));
    }

    pub(crate) fn duplicate_table(&mut self, table: &str, line: usize) {
        self.push(
            ErrorKind::DuplicateTable,
            Some(line),
            format!("Duplicate table definition on line {line}: [{table}]"),
        );
    }

    pub(crate) fn table_duplicates_key(&mut self, table: &str, line: usize) {
        self.push(
            ErrorKind::TableDuplicatesKey,
            Some(line),
            format!("Key already exists for table defined on line {line}: [{table}]"),
        );
    }

    pub(crate) fn key_duplicates_table(&mut self, key: &str, line: usize) {
        self.push(
            ErrorKind::KeyDuplicatesTable,
            Some(line),
            format!("Table already exists for key defined on line {line}: {key}"),
        );
    }

    pub(crate) fn empty_implicit_table(&mut self, table: &str, line: usize) {
        self.push(
            ErrorKind::EmptyImplicitTable,
            Some(line),
            format!("Invalid table definition due to empty implicit table name: {table}"),
        );
    }

    pub(crate) fn invalid_table(&mut self, table: &str, line: usize) {
        self.push(
            ErrorKind::InvalidTable,
            Some(line),
            format!("Invalid table definition on line {line}: {table}"),
        );
    }

    pub(crate) fn duplicate_key(&mut self, key: &str, line: Option<usize>) {
        let message = match line {
            Some(line) => format!("Duplicate key on line {line}: {key}"),
            None => format!("Duplicate key: {key}"),
        };
        self.push(ErrorKind::DuplicateKey, line, message);
    }

    pub(crate) fn invalid_text_after_identifier(&mut self, identifier: &str, line: usize) {
        self.push(
            ErrorKind::InvalidTextAfterIdentifier,
            Some(line),
            format!(
                "Invalid text after key {identifier} on line {line}. \
                 Make sure to terminate the value or add a comment (#)."
            ),
        );
    }

    pub(crate) fn invalid_key(&mut self, key: &str, line: usize) {
        self.push(
            ErrorKind::InvalidKey,
            Some(line),
            format!("Invalid key on line {line}: {key}"),
        );
    }

    pub(crate) fn invalid_table_array(&mut self, table_array: &str, line: usize) {
        self.push(
            ErrorKind::InvalidTableArray,
            Some(line),
            format!("Invalid table array definition on line {line}: {table_array}"),
        );
    }

    pub(crate) fn invalid_value(&mut self, key: &str, value: &str, line: usize) {
        self.push(
            ErrorKind::InvalidValue,
            Some(line),
            format!("Invalid value on line {line}: {key} = {value}"),
        );
    }

    pub(crate) fn unterminated_key(&mut self, key: &str, line: usize) {
        self.push(
            ErrorKind::UnterminatedKey,
            Some(line),
            format!("Key is not followed by an equals sign on line {line}: {key}"),
        );
    }

    pub(crate) fn unterminated(&mut self, key: &str, value: &str, line: usize) {
        self.push(
            ErrorKind::UnterminatedValue,
            Some(line),
            format!("Unterminated value on line {line}: {key} = {}", value.trim()),
        );
    }

    pub(crate) fn heterogeneous(&mut self, key: &str, line: usize) {
        self.push(
            ErrorKind::HeterogeneousArray,
            Some(line),
            format!("{key} becomes a heterogeneous array on line {line}"),
        );
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
