//! The immutable chat message.
//!
//! This module provides [`Message`], one normalized chat event parsed from a
//! Messenger archive entry, together with its attachments ([`Media`],
//! [`MediaItem`]) and [`Reaction`]s.
//!
//! # Text views
//!
//! Every message carries its text in three forms, all derived once at
//! construction:
//!
//! | View | Description |
//! |------|-------------|
//! | [`raw_text`](Message::raw_text) | Normalized text, casing and punctuation kept |
//! | [`clean_text`](Message::clean_text) | Lower-cased, newlines as spaces, [`FORBIDDEN`] chars stripped |
//! | [`word_list`](Message::word_list) | `clean_text` split on whitespace, in order, duplicates kept |
//!
//! # Example
//!
//! ```
//! use chatlens::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2020, 6, 28, 7, 9, 19).unwrap();
//! let msg = Message::new("Alice", ts, "Can't stop, won't stop!");
//!
//! assert_eq!(msg.clean_text(), "cant stop wont stop");
//! assert_eq!(msg.word_list(), ["cant", "stop", "wont", "stop"]);
//! assert_eq!(msg.word_count()["stop"], 2);
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::config::ArchiveConfig;
use crate::error::{ChatlensError, Result};
use crate::parsing::messenger::{RawMedia, RawMessage};

/// Characters removed from text before it is split into words.
///
/// Tab and carriage return are stripped too; newlines become spaces.
pub const FORBIDDEN: &str = "!@#$%^&*()-_=+[]{}\\|;:'\",<.>/?`~\t\r";

/// How timestamps are rendered in text output.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single attachment reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    /// Path of the file inside the export.
    pub uri: String,

    /// When the attachment was created, if the archive says.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Preview image, only present for videos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
}

impl MediaItem {
    /// Creates an attachment with only a URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            timestamp: None,
            thumbnail_uri: None,
        }
    }

    fn from_raw(raw: &RawMedia) -> Result<Self> {
        let timestamp = raw
            .creation_timestamp
            .map(|secs| {
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| ChatlensError::bad_timestamp(secs))
            })
            .transpose()?;

        Ok(Self {
            uri: raw.uri.clone(),
            timestamp,
            thumbnail_uri: raw.thumbnail.as_ref().map(|t| t.uri.clone()),
        })
    }
}

/// All attachments of a message, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Media {
    pub photos: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub gifs: Vec<MediaItem>,
    pub audio: Vec<MediaItem>,
}

impl Media {
    /// Returns `true` if there are no attachments of any kind.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
            && self.videos.is_empty()
            && self.gifs.is_empty()
            && self.audio.is_empty()
    }

    /// Total number of attachments.
    pub fn len(&self) -> usize {
        self.photos.len() + self.videos.len() + self.gifs.len() + self.audio.len()
    }
}

/// An emoji reaction left on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reaction {
    /// The reaction glyph.
    pub emoji: String,
    /// Who reacted.
    pub reactor: String,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, reactor: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            reactor: reactor.into(),
        }
    }
}

/// A normalized, immutable chat message.
///
/// Messages are value objects: conversations share them through
/// [`Arc`](std::sync::Arc) and never modify them after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    sender: String,
    timestamp: DateTime<Utc>,
    raw_text: String,
    #[serde(skip)]
    clean_text: String,
    #[serde(skip)]
    word_list: Vec<String>,
    #[serde(skip)]
    word_count: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Media::is_empty")]
    media: Media,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reactions: Vec<Reaction>,
}

impl Message {
    /// Creates a message from already-normalized parts.
    ///
    /// Sub-second precision is dropped from `timestamp`.
    pub fn new(sender: impl Into<String>, timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        let raw_text = text.into();
        let clean_text = clean(&raw_text);
        let word_list: Vec<String> = clean_text.split_whitespace().map(str::to_owned).collect();

        let mut word_count = HashMap::new();
        for word in &word_list {
            *word_count.entry(word.clone()).or_insert(0) += 1;
        }

        let timestamp = Utc
            .timestamp_opt(timestamp.timestamp(), 0)
            .single()
            .unwrap_or(timestamp);

        Self {
            sender: sender.into(),
            timestamp,
            raw_text,
            clean_text,
            word_list,
            word_count,
            media: Media::default(),
            reactions: Vec::new(),
        }
    }

    /// Builder method to attach media.
    #[must_use]
    pub fn with_media(mut self, media: Media) -> Self {
        self.media = media;
        self
    }

    /// Builder method to attach reactions.
    #[must_use]
    pub fn with_reactions(mut self, reactions: Vec<Reaction>) -> Self {
        self.reactions = reactions;
        self
    }

    /// Builds a message from one raw archive entry.
    ///
    /// Sender, text and reactions are repaired with
    /// [`normalize`](crate::normalize::normalize) unless
    /// [`ArchiveConfig::fix_encoding`] is off. Media URIs are kept verbatim.
    pub fn from_raw(raw: &RawMessage, config: &ArchiveConfig) -> Result<Self> {
        let sender = config.repair(&raw.sender_name)?;
        let timestamp = timestamp_from_millis(raw.timestamp_ms)?;
        let text = match raw.content.as_deref() {
            Some(content) => config.repair(content)?,
            None => String::new(),
        };

        let media = Media {
            photos: media_items(&raw.photos)?,
            videos: media_items(&raw.videos)?,
            gifs: media_items(&raw.gifs)?,
            audio: media_items(&raw.audio_files)?,
        };

        let reactions = raw
            .reactions
            .iter()
            .map(|r| -> Result<Reaction> {
                Ok(Reaction::new(config.repair(&r.reaction)?, config.repair(&r.actor)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(sender, timestamp, text)
            .with_media(media)
            .with_reactions(reactions))
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns when the message was sent, at second precision.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the normalized text with original casing and punctuation.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Returns the lower-cased, punctuation-free text.
    pub fn clean_text(&self) -> &str {
        &self.clean_text
    }

    /// Returns the words of the message in order of appearance.
    pub fn word_list(&self) -> &[String] {
        &self.word_list
    }

    /// Returns how often each word occurs in this message.
    pub fn word_count(&self) -> &HashMap<String, usize> {
        &self.word_count
    }

    pub fn media(&self) -> &Media {
        &self.media
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns `true` if the message has any attachment.
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }

    /// Returns `true` if the message has non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }

    /// Word-wraps the text into lines of exactly `line_length` chars.
    ///
    /// Explicit newlines always start a new line, words longer than a line are
    /// split, and every line is right-padded with spaces. An empty message
    /// yields a single blank line.
    pub fn wrap(&self, line_length: usize) -> Vec<String> {
        let width = line_length.max(1);
        let mut lines = Vec::new();

        for paragraph in self.raw_text.split('\n') {
            let mut line = String::new();
            let mut line_len = 0;

            for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
                let chars: Vec<char> = word.chars().collect();
                let mut pieces = chars.chunks(width).peekable();

                while let Some(piece) = pieces.next() {
                    let needed = if line_len == 0 { piece.len() } else { piece.len() + 1 };
                    if line_len + needed > width {
                        lines.push(std::mem::take(&mut line));
                        line_len = 0;
                    }
                    if line_len > 0 {
                        line.push(' ');
                        line_len += 1;
                    }
                    line.extend(piece);
                    line_len += piece.len();

                    if pieces.peek().is_some() {
                        lines.push(std::mem::take(&mut line));
                        line_len = 0;
                    }
                }
            }
            lines.push(line);
        }

        lines
            .into_iter()
            .map(|line| format!("{line:<width$}"))
            .collect()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.sender,
            self.raw_text
        )
    }
}

/// Lower-cases, turns newlines into spaces and strips [`FORBIDDEN`] chars.
fn clean(text: &str) -> String {
    text.replace('\n', " ")
        .to_lowercase()
        .chars()
        .filter(|c| !FORBIDDEN.contains(*c))
        .collect()
}

fn media_items(items: &[RawMedia]) -> Result<Vec<MediaItem>> {
    items.iter().map(MediaItem::from_raw).collect()
}

/// Converts an archive millisecond timestamp to a second-precision instant.
pub(crate) fn timestamp_from_millis(timestamp_ms: i64) -> Result<DateTime<Utc>> {
    let secs = timestamp_ms / 1000;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| ChatlensError::bad_timestamp(timestamp_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn raw(json: &str) -> RawMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new("Alice", ts(100), "Hello World");
        assert_eq!(msg.sender(), "Alice");
        assert_eq!(msg.timestamp(), ts(100));
        assert_eq!(msg.raw_text(), "Hello World");
        assert_eq!(msg.clean_text(), "hello world");
        assert!(!msg.has_media());
        assert!(msg.reactions().is_empty());
    }

    #[test]
    fn test_clean_text_strips_forbidden() {
        let msg = Message::new("A", ts(0), "Wait...\nwhat?!\t(really) #1 @you");
        assert_eq!(msg.clean_text(), "wait what really 1 you");
        for c in FORBIDDEN.chars() {
            assert!(!msg.clean_text().contains(c));
        }
        assert!(!msg.clean_text().contains('\n'));
    }

    #[test]
    fn test_word_list_keeps_order_and_duplicates() {
        let msg = Message::new("A", ts(0), "the cat and the  hat");
        assert_eq!(msg.word_list(), ["the", "cat", "and", "the", "hat"]);
        assert_eq!(msg.word_count()["the"], 2);
        assert_eq!(msg.word_count().values().sum::<usize>(), msg.word_list().len());
    }

    #[test]
    fn test_punctuation_only_words_dropped() {
        let msg = Message::new("A", ts(0), "hi - there ...");
        assert_eq!(msg.word_list(), ["hi", "there"]);
    }

    #[test]
    fn test_empty_message() {
        let msg = Message::new("A", ts(0), "");
        assert!(!msg.has_text());
        assert!(msg.word_list().is_empty());
        assert!(msg.word_count().is_empty());
    }

    #[test]
    fn test_subsecond_precision_dropped() {
        let precise = Utc.timestamp_millis_opt(1_500).unwrap();
        let msg = Message::new("A", precise, "x");
        assert_eq!(msg.timestamp(), ts(1));
    }

    #[test]
    fn test_timestamp_from_millis_truncates() {
        assert_eq!(timestamp_from_millis(1_999).unwrap(), ts(1));
        assert_eq!(timestamp_from_millis(1_593_328_159_250).unwrap(), ts(1_593_328_159));
    }

    #[test]
    fn test_timestamp_from_millis_out_of_range() {
        assert!(timestamp_from_millis(i64::MAX).unwrap_err().is_malformed());
    }

    #[test]
    fn test_from_raw_minimal() {
        let msg = Message::from_raw(
            &raw(r#"{"sender_name": "Bob", "timestamp_ms": 50000}"#),
            &ArchiveConfig::default(),
        )
        .unwrap();
        assert_eq!(msg.sender(), "Bob");
        assert_eq!(msg.timestamp(), ts(50));
        assert_eq!(msg.raw_text(), "");
        assert!(!msg.has_media());
    }

    #[test]
    fn test_from_raw_repairs_encoding() {
        let msg = Message::from_raw(
            &raw(r#"{"sender_name": "RenÃ©e", "timestamp_ms": 0, "content": "itâ\u0080\u0099s ð\u009f\u0091\u008d",
                     "reactions": [{"reaction": "ð\u009f\u0098\u0082", "actor": "RenÃ©e"}]}"#),
            &ArchiveConfig::default(),
        )
        .unwrap();
        assert_eq!(msg.sender(), "Renée");
        assert_eq!(msg.raw_text(), "it's 👍");
        assert_eq!(msg.word_list(), ["its", "👍"]);
        assert_eq!(msg.reactions(), [Reaction::new("😂", "Renée")]);
    }

    #[test]
    fn test_from_raw_without_fix_encoding() {
        let msg = Message::from_raw(
            &raw(r#"{"sender_name": "Zoë", "timestamp_ms": 0, "content": "café"}"#),
            &ArchiveConfig::new().with_fix_encoding(false),
        )
        .unwrap();
        assert_eq!(msg.sender(), "Zoë");
        assert_eq!(msg.raw_text(), "café");
    }

    #[test]
    fn test_from_raw_undecodable_is_error() {
        let err = Message::from_raw(
            &raw(r#"{"sender_name": "Zoë", "timestamp_ms": 0}"#),
            &ArchiveConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_raw_media() {
        let msg = Message::from_raw(
            &raw(r#"{
                "sender_name": "A", "timestamp_ms": 0,
                "photos": [{"uri": "photos/1.jpg", "creation_timestamp": 1600000000}],
                "videos": [{"uri": "videos/1.mp4", "creation_timestamp": 1600000001, "thumbnail": {"uri": "videos/thumbs/1.jpg"}}],
                "gifs": [{"uri": "gifs/1.gif"}],
                "audio_files": [{"uri": "audio/1.mp4", "creation_timestamp": 1600000002}]
            }"#),
            &ArchiveConfig::default(),
        )
        .unwrap();

        let media = msg.media();
        assert!(msg.has_media());
        assert_eq!(media.len(), 4);
        assert_eq!(media.photos[0].timestamp, Some(ts(1_600_000_000)));
        assert_eq!(media.videos[0].thumbnail_uri.as_deref(), Some("videos/thumbs/1.jpg"));
        assert_eq!(media.gifs[0], MediaItem::new("gifs/1.gif"));
        assert_eq!(media.audio[0].uri, "audio/1.mp4");
    }

    #[test]
    fn test_wrap_pads_to_width() {
        let msg = Message::new("A", ts(0), "hello there general kenobi");
        let lines = msg.wrap(12);
        assert_eq!(lines, ["hello there ", "general     ", "kenobi      "]);
    }

    #[test]
    fn test_wrap_respects_newlines() {
        let msg = Message::new("A", ts(0), "one\ntwo");
        assert_eq!(msg.wrap(5), ["one  ", "two  "]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let msg = Message::new("A", ts(0), "abcdefghij");
        assert_eq!(msg.wrap(4), ["abcd", "efgh", "ij  "]);
    }

    #[test]
    fn test_wrap_empty() {
        let msg = Message::new("A", ts(0), "");
        assert_eq!(msg.wrap(3), ["   "]);
    }

    #[test]
    fn test_display() {
        let msg = Message::new("Alice", ts(0), "hi");
        assert_eq!(msg.to_string(), "1970-01-01 00:00:00: Alice: hi");
    }

    #[test]
    fn test_serialization_skips_derived_fields() {
        let msg = Message::new("Alice", ts(0), "Hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"raw_text\":\"Hello\""));
        assert!(!json.contains("clean_text"));
        assert!(!json.contains("media"));
    }
}
