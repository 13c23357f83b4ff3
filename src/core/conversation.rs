//! The [`Conversation`] aggregate.
//!
//! A conversation is an ordered collection of shared [`Message`]s plus the
//! participant list and title. Every query returns a new conversation that
//! shares message storage with its source; nothing is ever mutated after
//! construction.
//!
//! # Invariants
//!
//! - messages are sorted by timestamp (stable, so ties keep input order)
//! - every sender appears in [`participants`](Conversation::participants)
//! - participants are unique and keep first-insertion order

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::ops::{Add, Index};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::counter::{ByParticipant, EmojiCount, WordCount};
use crate::Message;
use crate::config::ArchiveConfig;
use crate::error::{ChatlensError, Result};
use crate::message::TIMESTAMP_FORMAT;
use crate::parsing::parse_export;

/// Width of a rendered [`TIMESTAMP_FORMAT`] value.
const TIMESTAMP_WIDTH: usize = 19;

#[derive(Debug)]
pub(super) struct Inner {
    pub(super) participants: Vec<String>,
    pub(super) messages: Vec<Arc<Message>>,
    pub(super) title: Option<String>,
    pub(super) word_count: OnceCell<WordCount>,
    pub(super) total_emoji_counts: OnceCell<EmojiCount>,
    pub(super) personal_emoji_counts: OnceCell<ByParticipant<EmojiCount>>,
}

/// An immutable, queryable chat conversation.
///
/// Cloning is cheap: clones share messages and cached aggregates.
///
/// # Example
///
/// ```
/// use chatlens::{Conversation, Message};
/// use chrono::{TimeZone, Utc};
///
/// let conversation = Conversation::from_parts(
///     vec![
///         Message::new("Alice", Utc.timestamp_opt(100, 0).unwrap(), "hi 👍"),
///         Message::new("Bob", Utc.timestamp_opt(50, 0).unwrap(), "hello"),
///     ],
///     Vec::<String>::new(),
///     None,
/// );
///
/// assert_eq!(conversation.first().unwrap().sender(), "Bob");
/// assert_eq!(conversation.participants(), ["Bob", "Alice"]);
/// ```
#[derive(Debug, Clone)]
pub struct Conversation {
    pub(super) inner: Arc<Inner>,
}

impl Conversation {
    /// A conversation with no messages, participants or title.
    pub fn empty() -> Self {
        Self::assemble(Vec::new(), Vec::new(), None)
    }

    /// Builds a conversation from explicit parts.
    ///
    /// `participants` come first in the given order (duplicates dropped),
    /// followed by any sender not already listed, in message order.
    pub fn from_parts<I, P, S>(messages: I, participants: P, title: Option<String>) -> Self
    where
        I: IntoIterator<Item = Message>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::assemble(
            messages.into_iter().map(Arc::new).collect(),
            participants.into_iter().map(Into::into).collect(),
            title,
        )
    }

    /// Builds a conversation from messages already shared with another one.
    pub(crate) fn from_shared(
        messages: Vec<Arc<Message>>,
        participants: Vec<String>,
        title: Option<String>,
    ) -> Self {
        Self::assemble(messages, participants, title)
    }

    fn assemble(
        mut messages: Vec<Arc<Message>>,
        explicit: Vec<String>,
        title: Option<String>,
    ) -> Self {
        if !messages.is_sorted_by_key(|m| m.timestamp()) {
            messages.sort_by_key(|m| m.timestamp());
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut participants = Vec::with_capacity(explicit.len());
        for name in explicit {
            if seen.insert(name.clone()) {
                participants.push(name);
            }
        }
        for message in &messages {
            if !seen.contains(message.sender()) {
                seen.insert(message.sender().to_owned());
                participants.push(message.sender().to_owned());
            }
        }

        Self {
            inner: Arc::new(Inner {
                participants,
                messages,
                title,
                word_count: OnceCell::new(),
                total_emoji_counts: OnceCell::new(),
                personal_emoji_counts: OnceCell::new(),
            }),
        }
    }

    /// Loads one Messenger archive file with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::Io`] if the file cannot be read and
    /// [`ChatlensError::MalformedArchive`] if its content is invalid.
    pub fn from_archive(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_archive_with(path, &ArchiveConfig::default())
    }

    /// Loads one Messenger archive file.
    pub fn from_archive_with(path: impl AsRef<Path>, config: &ArchiveConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| ChatlensError::undecodable(e).in_file(path))?;

        let conversation =
            Self::from_archive_str(&content, config).map_err(|e| e.in_file(path))?;

        debug!(
            path = %path.display(),
            messages = conversation.len(),
            participants = conversation.participants().len(),
            "loaded archive"
        );
        Ok(conversation)
    }

    /// Builds a conversation from archive JSON text.
    pub fn from_archive_str(content: &str, config: &ArchiveConfig) -> Result<Self> {
        let archive = parse_export(content, config)?;
        Ok(Self::from_parts(
            archive.messages,
            archive.participants,
            archive.title,
        ))
    }

    /// Loads several archive files of one thread and combines them.
    ///
    /// An empty list yields an empty conversation.
    pub fn from_archives<I, P>(paths: I, config: &ArchiveConfig) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut combined = Self::empty();
        for path in paths {
            let part = Self::from_archive_with(path, config)?;
            combined = combined.combine(&part);
        }
        Ok(combined)
    }

    /// Merges two conversations.
    ///
    /// Participants are `self`'s followed by `other`'s new names. Titles are
    /// kept when equal, the non-empty one wins when only one is set, and two
    /// different titles are joined as `"a + b"`.
    pub fn combine(&self, other: &Conversation) -> Conversation {
        let messages = self
            .inner
            .messages
            .iter()
            .chain(other.inner.messages.iter())
            .cloned()
            .collect();
        let participants = self
            .inner
            .participants
            .iter()
            .chain(other.inner.participants.iter())
            .cloned()
            .collect();

        Self::assemble(
            messages,
            participants,
            join_titles(self.title(), other.title()),
        )
    }

    /// Keeps the messages matching `keep`, with the same participants and title.
    pub(crate) fn filtered<F>(&self, keep: F) -> Conversation
    where
        F: Fn(&Message) -> bool,
    {
        Self::from_shared(
            self.inner
                .messages
                .iter()
                .filter(|m| keep(m))
                .cloned()
                .collect(),
            self.inner.participants.clone(),
            self.inner.title.clone(),
        )
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    pub fn participants(&self) -> &[String] {
        &self.inner.participants
    }

    /// Messages in timestamp order.
    pub fn messages(&self) -> &[Arc<Message>] {
        &self.inner.messages
    }

    pub fn title(&self) -> Option<&str> {
        self.inner.title.as_deref()
    }

    pub fn len(&self) -> usize {
        self.inner.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.inner.messages.iter().map(|m| &**m)
    }

    /// The message at `index` in timestamp order.
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.inner.messages.get(index).map(|m| &**m)
    }

    /// Senders in order of their first message.
    ///
    /// Unlike [`participants`](Self::participants) this leaves out anyone who
    /// never wrote.
    pub fn participants_from_message_order(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.iter()
            .map(Message::sender)
            .filter(|sender| seen.insert(*sender))
            .map(str::to_owned)
            .collect()
    }

    /// Renders a plain-text transcript.
    ///
    /// Each message is wrapped to `line_max` chars; its first line is prefixed
    /// by `"{timestamp}: {sender}:"`, padded so all text starts in one column.
    /// Trailing whitespace of each line is dropped.
    pub fn transcript(&self, line_max: usize) -> String {
        let longest = self
            .participants()
            .iter()
            .map(|p| p.chars().count())
            .max()
            .unwrap_or(0);
        let padding = TIMESTAMP_WIDTH + 2 + longest + 3;

        let mut out = String::new();
        for message in self.iter() {
            let label = format!(
                "{}: {}:",
                message.timestamp().format(TIMESTAMP_FORMAT),
                message.sender()
            );
            for (i, line) in message.wrap(line_max).iter().enumerate() {
                let prefix = if i == 0 { label.as_str() } else { "" };
                out.push_str(&format!("{prefix:<padding$}{}\n", line.trim_end()));
            }
        }
        out
    }
}

fn join_titles(a: Option<&str>, b: Option<&str>) -> Option<String> {
    let a = a.filter(|t| !t.is_empty());
    let b = b.filter(|t| !t.is_empty());
    match (a, b) {
        (None, None) => None,
        (Some(t), None) | (None, Some(t)) => Some(t.to_owned()),
        (Some(a), Some(b)) if a == b => Some(a.to_owned()),
        (Some(a), Some(b)) => Some(format!("{a} + {b}")),
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Conversation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.participants == other.inner.participants
                && self.inner.title == other.inner.title
                && self.inner.messages == other.inner.messages)
    }
}

impl Eq for Conversation {}

impl Add for &Conversation {
    type Output = Conversation;

    fn add(self, other: &Conversation) -> Conversation {
        self.combine(other)
    }
}

impl Index<usize> for Conversation {
    type Output = Message;

    fn index(&self, index: usize) -> &Message {
        &self.inner.messages[index]
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Arc<Message>;
    type IntoIter = std::slice::Iter<'a, Arc<Message>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.messages.iter()
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A {} message conversation ", self.len())?;
        match self.inner.participants.as_slice() {
            [] => write!(f, "with no one."),
            [one] => write!(f, "with {one}."),
            [a, b] => write!(f, "with {a} and {b}."),
            [rest @ .., last] => write!(
                f,
                "in {} with {} and {last}.",
                self.title().unwrap_or("an untitled chat"),
                rest.join(", ")
            ),
        }
    }
}
