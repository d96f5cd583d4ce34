//! Configuration options for TOML writing.
//!
//! - [`WriterOptions`]: indentation and array padding
//! - [`DatePolicy`]: how date-times are rendered
//!
//! Parsing has no options; the grammar is fixed.
//!
//! ## Examples
//!
//! ```rust
//! use tomlette::{to_string_with_options, toml, DatePolicy, WriterOptions};
//!
//! let doc = toml!({ "server": { "ports": [80, 443] } });
//!
//! let options = WriterOptions::new()
//!     .with_indent_values_by(2)
//!     .with_pad_array_delimiters_by(1);
//! let text = to_string_with_options(&doc, options).unwrap();
//! assert_eq!(text, "[server]\n  ports = [ 80, 443 ]\n");
//! ```

use chrono::{FixedOffset, Offset, Utc};

/// How date-time values are rendered by the writer.
///
/// Values are converted to `time_zone` before formatting. UTC is written with a
/// `Z` suffix, any other offset as `+HH:MM`.
///
/// # Examples
///
/// ```rust
/// use chrono::FixedOffset;
/// use tomlette::DatePolicy;
///
/// let policy = DatePolicy::new()
///     .with_time_zone(FixedOffset::east_opt(2 * 3600).unwrap())
///     .with_fractional_seconds(false);
/// assert!(!policy.show_fractional_seconds);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePolicy {
    pub time_zone: FixedOffset,
    /// Render non-zero fractional seconds. When `false` they are dropped.
    pub show_fractional_seconds: bool,
}

impl Default for DatePolicy {
    fn default() -> Self {
        DatePolicy {
            time_zone: utc(),
            show_fractional_seconds: true,
        }
    }
}

impl DatePolicy {
    /// UTC, fractional seconds shown when present.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: FixedOffset) -> Self {
        self.time_zone = time_zone;
        self
    }

    #[must_use]
    pub fn with_fractional_seconds(mut self, show: bool) -> Self {
        self.show_fractional_seconds = show;
        self
    }

    #[must_use]
    pub fn is_utc(&self) -> bool {
        self.time_zone.local_minus_utc() == 0
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Configuration options for TOML writing.
///
/// # Examples
///
/// ```rust
/// use tomlette::WriterOptions;
///
/// // Flat output, no padding
/// let options = WriterOptions::new();
///
/// // Nested tables indented by 2, values by 4
/// let options = WriterOptions::new()
///     .with_indent_tables_by(2)
///     .with_indent_values_by(4);
/// assert_eq!(options.indent_tables_by, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WriterOptions {
    /// Spaces before each `key = value` line inside a named table.
    pub indent_values_by: usize,
    /// Extra spaces before the header of each nested table level.
    pub indent_tables_by: usize,
    /// Spaces just inside the brackets of a primitive array.
    pub pad_array_delimiters_by: usize,
    pub date_policy: DatePolicy,
}

impl WriterOptions {
    /// Creates default options (no indentation, no padding, UTC dates).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomlette::WriterOptions;
    ///
    /// let options = WriterOptions::new();
    /// assert_eq!(options.indent_values_by, 0);
    /// assert!(options.date_policy.is_utc());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent_values_by(mut self, spaces: usize) -> Self {
        self.indent_values_by = spaces;
        self
    }

    #[must_use]
    pub fn with_indent_tables_by(mut self, spaces: usize) -> Self {
        self.indent_tables_by = spaces;
        self
    }

    #[must_use]
    pub fn with_pad_array_delimiters_by(mut self, spaces: usize) -> Self {
        self.pad_array_delimiters_by = spaces;
        self
    }

    #[must_use]
    pub fn with_date_policy(mut self, date_policy: DatePolicy) -> Self {
        self.date_policy = date_policy;
        self
    }
}
