//! Messenger JSON archive structure.
//!
//! One archive file looks like this (fields not listed are ignored):
//!
//! ```json
//! {
//!   "participants": [{"name": "Alice"}, {"name": "Bob"}],
//!   "messages": [
//!     {"sender_name": "Alice", "timestamp_ms": 1593328159250, "content": "hi",
//!      "reactions": [{"reaction": "...", "actor": "Bob"}],
//!      "photos": [{"uri": "...", "creation_timestamp": 1593328159}]}
//!   ],
//!   "title": "Alice",
//!   "thread_type": "Regular"
//! }
//! ```
//!
//! All strings are Mojibake-encoded; see [`normalize`](crate::normalize).

use serde::Deserialize;

use crate::Message;
use crate::config::ArchiveConfig;
use crate::error::{ChatlensError, Result};

/// `thread_type` of a one-to-one chat, whose title is derived from its participants.
pub const REGULAR_THREAD: &str = "Regular";

/// Raw Messenger message structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reactions: Vec<RawReaction>,
    #[serde(default)]
    pub photos: Vec<RawMedia>,
    #[serde(default)]
    pub videos: Vec<RawMedia>,
    #[serde(default)]
    pub gifs: Vec<RawMedia>,
    #[serde(default)]
    pub audio_files: Vec<RawMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReaction {
    pub reaction: String,
    pub actor: String,
}

/// Messenger media (photo/video/gif/audio) structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    pub uri: String,
    #[serde(default)]
    pub creation_timestamp: Option<i64>,
    #[serde(default)]
    pub thumbnail: Option<RawThumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawThumbnail {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParticipant {
    pub name: String,
}

/// Messenger export wrapper.
#[derive(Debug, Deserialize)]
pub struct MessengerExport {
    #[serde(default)]
    pub participants: Vec<RawParticipant>,
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thread_type: Option<String>,
}

/// The normalized content of one archive file.
#[derive(Debug, Clone)]
pub struct ParsedArchive {
    /// Participants as listed by the archive, in archive order.
    pub participants: Vec<String>,
    /// Messages in archive order (Messenger stores them newest first).
    pub messages: Vec<Message>,
    pub title: Option<String>,
}

/// Parses a single archive message object.
///
/// # Errors
///
/// Fails with [`ChatlensError::MalformedArchive`] when `sender_name` or
/// `timestamp_ms` is missing or any text cannot be repaired.
pub fn parse_message(entry: &serde_json::Value, config: &ArchiveConfig) -> Result<Message> {
    let raw = RawMessage::deserialize(entry).map_err(|e| ChatlensError::archive_json(e, None))?;
    Message::from_raw(&raw, config)
}

/// Parses a whole archive file from its JSON text.
pub fn parse_export(content: &str, config: &ArchiveConfig) -> Result<ParsedArchive> {
    let export: MessengerExport =
        serde_json::from_str(content).map_err(|e| ChatlensError::archive_json(e, None))?;

    let participants = export
        .participants
        .iter()
        .map(|p| config.repair(&p.name))
        .collect::<Result<Vec<_>>>()?;

    let messages = export
        .messages
        .iter()
        .map(|m| Message::from_raw(m, config))
        .collect::<Result<Vec<_>>>()?;

    let title = if export.thread_type.as_deref() == Some(REGULAR_THREAD) {
        Some(regular_title(&participants))
    } else {
        export.title.as_deref().map(|t| config.repair(t)).transpose()?
    };

    Ok(ParsedArchive {
        participants,
        messages,
        title,
    })
}

/// Title of a one-to-one chat: `"Alice and Bob's chat"`.
fn regular_title(participants: &[String]) -> String {
    format!("{}'s chat", participants.join(" and "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_regular() {
        let json = r#"{
            "participants": [{"name": "Alice"}, {"name": "Bob"}],
            "messages": [
                {"sender_name": "Bob", "timestamp_ms": 2000, "content": "hey"},
                {"sender_name": "Alice", "timestamp_ms": 1000, "content": "hi"}
            ],
            "title": "Bob",
            "thread_type": "Regular"
        }"#;
        let parsed = parse_export(json, &ArchiveConfig::default()).unwrap();
        assert_eq!(parsed.participants, ["Alice", "Bob"]);
        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.title.as_deref(), Some("Alice and Bob's chat"));
    }

    #[test]
    fn test_parse_export_group_title_is_normalized() {
        let json = r#"{
            "participants": [{"name": "A"}, {"name": "B"}, {"name": "C"}],
            "messages": [],
            "title": "CafÃ© crew",
            "thread_type": "RegularGroup"
        }"#;
        let parsed = parse_export(json, &ArchiveConfig::default()).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Café crew"));
    }

    #[test]
    fn test_parse_export_without_title() {
        let json = r#"{"participants": [], "messages": []}"#;
        let parsed = parse_export(json, &ArchiveConfig::default()).unwrap();
        assert!(parsed.title.is_none());
        assert!(parsed.messages.is_empty());
    }

    #[test]
    fn test_parse_export_missing_messages() {
        let err = parse_export(r#"{"participants": []}"#, &ArchiveConfig::default()).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_export_invalid_json() {
        let err = parse_export("not json", &ArchiveConfig::default()).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_export_missing_sender() {
        let json = r#"{"messages": [{"timestamp_ms": 1000, "content": "who?"}]}"#;
        let err = parse_export(json, &ArchiveConfig::default()).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("sender_name"));
    }

    #[test]
    fn test_parse_message_value() {
        let entry = serde_json::json!({"sender_name": "Alice", "timestamp_ms": 100_000, "content": "hi"});
        let msg = parse_message(&entry, &ArchiveConfig::default()).unwrap();
        assert_eq!(msg.sender(), "Alice");
        assert_eq!(msg.timestamp().timestamp(), 100);
    }

    #[test]
    fn test_parse_message_missing_timestamp() {
        let entry = serde_json::json!({"sender_name": "Alice"});
        let err = parse_message(&entry, &ArchiveConfig::default()).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("timestamp_ms"));
    }
}
