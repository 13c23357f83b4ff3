//! Unified error types for chatlens.
//!
//! This module provides a single [`ChatlensError`] enum that covers all error
//! cases in the library, the same way `reqwest`, `serde_json` and `csv` do it.
//!
//! # Error Handling Philosophy
//!
//! - **Load-time errors** ([`ChatlensError::Io`], [`ChatlensError::MalformedArchive`])
//!   abort the load of that archive and are never recovered internally
//! - **Query-time errors** ([`ChatlensError::NotAParticipant`],
//!   [`ChatlensError::IndexOutOfRange`]) are caller mistakes; they never
//!   touch cached state
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
///
/// # Example
///
/// ```rust
/// use chatlens::error::Result;
/// use chatlens::Conversation;
///
/// fn load() -> Result<Conversation> {
///     Ok(Conversation::empty())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// The error type for all chatlens operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlensError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The archive file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing a report)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be turned into messages.
    ///
    /// Covers invalid JSON, missing required fields (`sender_name`,
    /// `timestamp_ms`) and text that stays undecodable after encoding repair.
    #[error("Malformed archive{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    MalformedArchive {
        /// The file path, if available
        path: Option<PathBuf>,
        /// What exactly went wrong
        #[source]
        source: ArchiveErrorKind,
    },

    /// A per-person query named somebody outside the conversation.
    #[error("'{name}' is not a participant of this conversation")]
    NotAParticipant {
        /// The unknown name
        name: String,
    },

    /// A date index was outside the conversation's distinct-date range.
    #[error("Date index {index} is out of range (conversation spans {len} distinct dates)")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Number of distinct dates available
        len: usize,
    },

    /// Invalid date format in a command-line filter.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// Unknown or unavailable report format.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// Which kind of format was being chosen
        format: &'static str,
        /// Details
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error while writing a report.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of archive errors.
#[derive(Debug, Error)]
pub enum ArchiveErrorKind {
    /// Structural problem: invalid JSON, wrong types, missing required fields
    #[error("{0}")]
    Json(#[source] serde_json::Error),

    /// Text that is not valid UTF-8 once the legacy encoding is undone
    #[error("undecodable text: {0}")]
    Encoding(#[source] std::string::FromUtf8Error),

    /// A timestamp outside the representable range
    #[error("timestamp {0} is out of range")]
    Timestamp(i64),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlensError {
    /// Creates a malformed-archive error from a JSON error.
    pub fn archive_json(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatlensError::MalformedArchive {
            path,
            source: ArchiveErrorKind::Json(source),
        }
    }

    /// Creates a malformed-archive error for text that failed to decode.
    pub fn undecodable(source: std::string::FromUtf8Error) -> Self {
        ChatlensError::MalformedArchive {
            path: None,
            source: ArchiveErrorKind::Encoding(source),
        }
    }

    /// Creates a malformed-archive error for an unrepresentable timestamp.
    pub fn bad_timestamp(value: i64) -> Self {
        ChatlensError::MalformedArchive {
            path: None,
            source: ArchiveErrorKind::Timestamp(value),
        }
    }

    /// Creates a not-a-participant error.
    pub fn not_a_participant(name: impl Into<String>) -> Self {
        ChatlensError::NotAParticipant { name: name.into() }
    }

    /// Creates an index-out-of-range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        ChatlensError::IndexOutOfRange { index, len }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatlensError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Attaches the archive path to a malformed-archive error that has none.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn in_file(self, file: &Path) -> Self {
        match self {
            ChatlensError::MalformedArchive { path: None, source } => {
                ChatlensError::MalformedArchive {
                    path: Some(file.to_path_buf()),
                    source,
                }
            }
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlensError::Io(_))
    }

    /// Returns `true` if this is a malformed-archive error.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ChatlensError::MalformedArchive { .. })
    }

    /// Returns `true` if this is a not-a-participant error.
    pub fn is_not_a_participant(&self) -> bool {
        matches!(self, ChatlensError::NotAParticipant { .. })
    }

    /// Returns `true` if this is an index-out-of-range error.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, ChatlensError::IndexOutOfRange { .. })
    }

    /// Returns `true` if this is a format-selection error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatlensError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatlensError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("invalid").unwrap_err()
    }

    // =========================================================================
    // Display tests
    // =========================================================================

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatlensError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_malformed_archive_with_path() {
        let err = ChatlensError::archive_json(json_error(), Some(PathBuf::from("/inbox/message_1.json")));
        let display = err.to_string();
        assert!(display.contains("Malformed archive"));
        assert!(display.contains("/inbox/message_1.json"));
    }

    #[test]
    fn test_malformed_archive_without_path() {
        let err = ChatlensError::bad_timestamp(i64::MAX);
        let display = err.to_string();
        assert!(display.contains("out of range"));
        assert!(!display.contains("file:"));
    }

    #[test]
    fn test_undecodable_display() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = ChatlensError::undecodable(utf8_err);
        assert!(err.to_string().contains("undecodable text"));
    }

    #[test]
    fn test_not_a_participant_display() {
        let err = ChatlensError::not_a_participant("Mallory");
        assert!(err.to_string().contains("Mallory"));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = ChatlensError::index_out_of_range(7, 3);
        let display = err.to_string();
        assert!(display.contains('7'));
        assert!(display.contains('3'));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = ChatlensError::invalid_date("not-a-date");
        let display = err.to_string();
        assert!(display.contains("not-a-date"));
        assert!(display.contains("YYYY-MM-DD"));
    }

    // =========================================================================
    // Path attachment
    // =========================================================================

    #[test]
    fn test_in_file_fills_missing_path() {
        let err = ChatlensError::bad_timestamp(-1).in_file(Path::new("a.json"));
        assert!(err.to_string().contains("a.json"));
    }

    #[test]
    fn test_in_file_keeps_existing_path() {
        let err = ChatlensError::archive_json(json_error(), Some(PathBuf::from("first.json")))
            .in_file(Path::new("second.json"));
        let display = err.to_string();
        assert!(display.contains("first.json"));
        assert!(!display.contains("second.json"));
    }

    #[test]
    fn test_in_file_ignores_other_variants() {
        let err = ChatlensError::not_a_participant("Eve").in_file(Path::new("x.json"));
        assert!(err.is_not_a_participant());
        assert!(!err.to_string().contains("x.json"));
    }

    // =========================================================================
    // Source chain and predicates
    // =========================================================================

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = ChatlensError::archive_json(json_error(), None);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_methods() {
        let io_err = ChatlensError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_malformed());

        let date_err = ChatlensError::invalid_date("bad");
        assert!(date_err.is_invalid_date());
        assert!(!date_err.is_io());

        assert!(ChatlensError::index_out_of_range(1, 0).is_index_out_of_range());
        assert!(ChatlensError::bad_timestamp(0).is_malformed());
    }

    #[test]
    fn test_from_json_error() {
        let err: ChatlensError = json_error().into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_from_csv_error() {
        let csv_err = csv::Error::from(io::Error::other("test"));
        let err: ChatlensError = csv_err.into();
        assert!(err.to_string().contains("CSV error"));
    }

    #[test]
    fn test_error_debug() {
        let err = ChatlensError::invalid_date("bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidDate"));
    }
}
