//! The conversation model and everything computed from it.
//!
//! This module contains:
//! - [`conversation`] - the [`Conversation`] aggregate and its constructors
//! - [`query`] - filtering queries ([`TimeQuery`], word and substring search)
//! - [`stats`] - frequency tables, word counts and emoji counts
//! - [`counter`] - result containers ([`Counter`], [`ByParticipant`], [`DayOfWeek`])
//! - [`output`] - report tables and their CSV / JSON writers
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chatlens::core::{Conversation, TimeQuery, WordQuery};
//!
//! # fn main() -> chatlens::Result<()> {
//! let conversation = Conversation::from_archive("message_1.json")?;
//!
//! let mornings = conversation.messages_at(&TimeQuery::new().hour(8));
//! let top_words = conversation.most_common_words(&WordQuery::new().with_min_length(4));
//! let (total, personal) = conversation.all_emoji_counts();
//! # let _ = (mornings, top_words, total, personal);
//! # Ok(())
//! # }
//! ```

pub mod conversation;
pub mod counter;
pub mod output;
pub mod query;
pub mod stats;

pub use conversation::Conversation;
pub use counter::{ByParticipant, Counter, DayOfWeek, EmojiCount, WordCount};
pub use output::Table;
pub use query::TimeQuery;
pub use stats::{Frequencies, WordQuery, count_emojis, emoji_glyphs};

// Re-export Message from the crate root
pub use crate::Message;
