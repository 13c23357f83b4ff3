//! # Chatlens
//!
//! A Rust library for loading Facebook Messenger chat archives and answering
//! questions about them: who wrote what, when, and with which emoji.
//!
//! ## Overview
//!
//! Messenger's "Download your information" export stores each conversation
//! as one or more `message_N.json` files. Chatlens:
//! - repairs the export's broken text encoding ([`normalize`]),
//! - merges the files of one conversation into a single chronological
//!   [`Conversation`],
//! - offers filters that return new conversations (by sender, time,
//!   substring or whole word),
//! - computes statistics (daily/hourly/weekday frequencies, word counts,
//!   emoji counts, who messaged first each day),
//! - renders the results as semicolon-delimited CSV or JSON reports.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatlens::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let conversation = Conversation::from_archives(
//!         ["inbox/alice/message_1.json", "inbox/alice/message_2.json"],
//!         &ArchiveConfig::default(),
//!     )?;
//!     println!("{conversation}");
//!
//!     // Filters return new conversations
//!     let alice = conversation.personal_messages("Alice")?;
//!     let mornings = alice.messages_at(&TimeQuery::new().hour(8));
//!
//!     // Statistics are computed on demand and cached
//!     for (emoji, count) in conversation.total_emoji_counts().most_common(5) {
//!         println!("{emoji} {count}");
//!     }
//!
//!     // Reports
//!     let table = Table::from_frequencies("Hour", &mornings.hourly_frequencies());
//!     write_to_format(&table, "hours.csv", OutputFormat::Csv)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`core`] - the conversation model, queries, statistics and reports
//!   - [`Conversation`](core::Conversation), [`TimeQuery`](core::TimeQuery), [`WordQuery`](core::WordQuery)
//!   - [`Counter`](core::Counter), [`ByParticipant`](core::ByParticipant), [`Table`](core::Table)
//! - [`message`] - the [`Message`] record
//! - [`parsing`] - raw serde shapes of the Messenger archive
//! - [`normalize`] - Mojibake repair
//! - [`config`] - [`ArchiveConfig`](config::ArchiveConfig), [`AnalysisConfig`](config::AnalysisConfig)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) and report dispatch
//! - [`cli`] - command-line argument types (feature `cli`)
//! - [`error`] - unified error type ([`ChatlensError`], [`Result`])
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod normalize;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use crate::core::Conversation;
pub use error::{ChatlensError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatlens::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::Message;
    pub use crate::core::{
        ByParticipant, Conversation, Counter, DayOfWeek, EmojiCount, Frequencies, TimeQuery,
        WordCount, WordQuery,
    };

    // Error types
    pub use crate::error::{ChatlensError, Result};

    // Configuration
    pub use crate::config::{AnalysisConfig, ArchiveConfig};

    // Reports
    pub use crate::core::Table;
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    // Encoding repair
    pub use crate::normalize::normalize;
}
