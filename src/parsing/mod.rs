//! Archive parsing.
//!
//! This module contains the raw serde shapes of Messenger's JSON export and
//! the functions that turn them into [`Message`](crate::Message)s.

pub mod messenger;

// Re-export commonly used items
pub use messenger::{MessengerExport, ParsedArchive, RawMessage, parse_export, parse_message};
