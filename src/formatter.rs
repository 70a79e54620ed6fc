//! Laying out a list of records as a report.
//!
//! Each record becomes one block:
//!
//! ```text
//! #1 2024-05-01T12:00:00.000Z
//!
//! stack: at main
//!
//! error: "boom"
//!
//! meta: {
//!   from: "console.error"
//! }
//! ================================================================
//! ```
//!
//! Blocks are joined with the newline token and the whole text goes through
//! [`reformat`] once.

use alloc::string::String;
use core::fmt::Write;

use crate::{
    layout::{FormatOptions, reformat},
    record::ErrorRecord,
};

/// The labels and divider of a report.
///
/// ```
/// use chrono::DateTime;
/// use errscribe::{
///     formatter::RecordFormatter, layout::FormatOptions, record::ErrorRecord, value::Value,
/// };
///
/// let created = DateTime::from_timestamp_millis(0).unwrap();
/// let record = ErrorRecord::new(&Value::from("boom"), None, "", created);
/// let formatter = RecordFormatter {
///     divider: "----",
///     ..RecordFormatter::DEFAULT
/// };
///
/// assert_eq!(
///     formatter.format_record(&record, &FormatOptions::DEFAULT),
///     "#1 1970-01-01T00:00:00.000Z\n\nstack: \n\nerror: \"boom\"\n\nmeta: undefined\n----"
/// );
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordFormatter {
    /// Written before the 1-based position of the record.
    pub header_marker: &'static str,
    /// Label of the stack line.
    pub stack_label: &'static str,
    /// Label of the error line.
    pub error_label: &'static str,
    /// Label of the metadata line.
    pub meta_label: &'static str,
    /// The line closing each block.
    pub divider: &'static str,
}

impl RecordFormatter {
    /// `#`, `stack:`, `error:`, `meta:` and a divider of 64 `=`.
    pub const DEFAULT: Self = Self {
        header_marker: "#",
        stack_label: "stack:",
        error_label: "error:",
        meta_label: "meta:",
        divider: "================================================================",
    };

    /// Formats the records in order. An empty slice yields an empty string.
    #[must_use]
    pub fn format_records(&self, records: &[ErrorRecord], options: &FormatOptions) -> String {
        let newline: &str = &options.newline;
        let separator = if options.colon_space { " " } else { "" };
        let mut raw = String::new();
        for (index, record) in records.iter().enumerate() {
            if index > 0 {
                raw.push_str(newline);
            }
            let _ = write!(
                raw,
                "{marker}{position} {time}{newline}{newline}\
                 {stack_label}{separator}{stack}{newline}{newline}\
                 {error_label}{separator}{error}{newline}{newline}\
                 {meta_label}{separator}{meta}{newline}\
                 {divider}",
                marker = self.header_marker,
                position = index + 1,
                time = record.create_time(),
                stack_label = self.stack_label,
                stack = record.stack(),
                error_label = self.error_label,
                error = record.error(),
                meta_label = self.meta_label,
                meta = record.meta(),
                divider = self.divider,
            );
        }
        reformat(&raw, options)
    }

    /// Formats a single record, numbered `#1`.
    #[must_use]
    pub fn format_record(&self, record: &ErrorRecord, options: &FormatOptions) -> String {
        self.format_records(core::slice::from_ref(record), options)
    }
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Formats records with [`RecordFormatter::DEFAULT`].
#[must_use]
pub fn format_records(records: &[ErrorRecord], options: &FormatOptions) -> String {
    RecordFormatter::DEFAULT.format_records(records, options)
}

/// Formats one record with [`RecordFormatter::DEFAULT`].
#[must_use]
pub fn format_record(record: &ErrorRecord, options: &FormatOptions) -> String {
    RecordFormatter::DEFAULT.format_record(record, options)
}
