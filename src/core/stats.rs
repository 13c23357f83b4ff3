//! Aggregations over a [`Conversation`].
//!
//! Frequency tables are computed on every call. Word and emoji counts are
//! memoized on the conversation the first time they are asked for and shared
//! with its clones.
//!
//! Emoji counting matches every glyph of the Unicode emoji table against the
//! text, which makes it by far the most expensive operation. The
//! per-participant variant runs one task per participant on a dedicated
//! rayon pool; see [`AnalysisConfig`] for the worker cap.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use chrono::{Datelike, NaiveDate, Timelike};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::conversation::Conversation;
use super::counter::{ByParticipant, DayOfWeek, EmojiCount, WordCount};
use crate::Message;
use crate::config::AnalysisConfig;

/// Per-bucket message counts.
pub type Frequencies<K> = BTreeMap<K, usize>;

// Base emoji followed by their skin tone variants.
static EMOJI_GLYPHS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut seen = HashSet::new();
    emojis::iter()
        .flat_map(|e| std::iter::once(e).chain(e.skin_tones().into_iter().flatten()))
        .map(|e| e.as_str())
        .filter(|glyph| seen.insert(*glyph))
        .collect()
});

/// Every glyph the emoji counters look for.
pub fn emoji_glyphs() -> &'static [&'static str] {
    &EMOJI_GLYPHS
}

/// Counts non-overlapping occurrences of every known emoji glyph.
///
/// Each glyph is matched on its own, so `👍🏽` also counts as one `👍`.
/// Glyphs that never occur get no entry.
pub fn count_emojis<'a, I>(texts: I) -> EmojiCount
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = EmojiCount::new();
    for text in texts {
        // every glyph has at least one non-ASCII char
        if text.is_ascii() {
            continue;
        }
        for glyph in EMOJI_GLYPHS.iter().copied() {
            counts.add(glyph, text.matches(glyph).count());
        }
    }
    counts
}

/// Parameters for [`Conversation::most_common_words`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordQuery {
    /// How many words to return (default: 10)
    pub top: usize,

    /// Shortest word length in chars to consider (default: 1)
    pub min_length: usize,

    /// Only consider words containing this text (default: none)
    ///
    /// When set, `min_length` is ignored.
    pub matching: Option<String>,
}

impl Default for WordQuery {
    fn default() -> Self {
        Self {
            top: 10,
            min_length: 1,
            matching: None,
        }
    }
}

impl WordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    #[must_use]
    pub fn with_matching(mut self, text: impl Into<String>) -> Self {
        self.matching = Some(text.into().to_lowercase());
        self
    }

    fn accepts(&self, word: &str) -> bool {
        match &self.matching {
            Some(text) => word.contains(text.as_str()),
            None => word.chars().count() >= self.min_length,
        }
    }
}

impl Conversation {
    /// Messages per calendar day, per participant.
    pub fn daily_frequencies(&self) -> ByParticipant<Frequencies<NaiveDate>> {
        self.bucket_by(|m| m.timestamp().date_naive())
    }

    /// Messages per hour of day (0-23), per participant.
    pub fn hourly_frequencies(&self) -> ByParticipant<Frequencies<u32>> {
        self.bucket_by(|m| m.timestamp().hour())
    }

    /// Messages per weekday, per participant.
    pub fn weekday_frequencies(&self) -> ByParticipant<Frequencies<DayOfWeek>> {
        self.bucket_by(|m| DayOfWeek(m.timestamp().weekday()))
    }

    fn bucket_by<K, F>(&self, key: F) -> ByParticipant<Frequencies<K>>
    where
        K: Ord,
        F: Fn(&Message) -> K,
    {
        let slots: HashMap<&str, usize> = self
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let mut tables: Vec<Frequencies<K>> =
            self.participants().iter().map(|_| Frequencies::new()).collect();
        for message in self.iter() {
            if let Some(&slot) = slots.get(message.sender()) {
                *tables[slot].entry(key(message)).or_insert(0) += 1;
            }
        }

        self.participants().iter().cloned().zip(tables).collect()
    }

    /// Occurrences of every word across all messages.
    pub fn word_count(&self) -> &WordCount {
        self.inner.word_count.get_or_init(|| {
            let started = Instant::now();
            let mut counts = WordCount::new();
            for message in self.iter() {
                counts.merge(message.word_count());
            }
            debug!(
                kind = "word_count",
                entries = counts.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cache filled"
            );
            counts
        })
    }

    /// The most frequent words accepted by `query`, most frequent first.
    pub fn most_common_words(&self, query: &WordQuery) -> Vec<(String, usize)> {
        let mut words: Vec<(&str, usize)> = self
            .word_count()
            .iter()
            .filter(|(word, _)| query.accepts(word))
            .map(|(word, n)| (word.as_str(), *n))
            .collect();
        words.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words
            .into_iter()
            .take(query.top)
            .map(|(word, n)| (word.to_owned(), n))
            .collect()
    }

    /// Emoji occurrences across all messages.
    pub fn total_emoji_counts(&self) -> &EmojiCount {
        self.inner.total_emoji_counts.get_or_init(|| {
            let started = Instant::now();
            let counts = count_emojis(self.iter().map(Message::raw_text));
            debug!(
                kind = "total_emoji_counts",
                entries = counts.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cache filled"
            );
            counts
        })
    }

    /// Emoji occurrences per participant, with the default worker cap.
    pub fn personal_emoji_counts(&self) -> &ByParticipant<EmojiCount> {
        self.personal_emoji_counts_with(&AnalysisConfig::default())
    }

    /// Emoji occurrences per participant.
    ///
    /// `config` only matters for the first call on a conversation (or any
    /// of its clones); later calls return the cached result.
    pub fn personal_emoji_counts_with(&self, config: &AnalysisConfig) -> &ByParticipant<EmojiCount> {
        self.inner
            .personal_emoji_counts
            .get_or_init(|| self.scan_personal_emojis(config))
    }

    fn scan_personal_emojis(&self, config: &AnalysisConfig) -> ByParticipant<EmojiCount> {
        let started = Instant::now();
        let jobs: Vec<(String, Conversation)> = self.all_personal_messages().into_iter().collect();
        let workers = config.worker_count(jobs.len());

        let scan = |(person, messages): (String, Conversation)| {
            let counts = count_emojis(messages.iter().map(Message::raw_text));
            (person, counts)
        };

        let results: Vec<(String, EmojiCount)> = match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("emoji-scan-{i}"))
            .build()
        {
            Ok(pool) => pool.install(|| jobs.into_par_iter().map(scan).collect()),
            Err(e) => {
                warn!(error = %e, "failed to create emoji-scan pool, counting sequentially");
                jobs.into_iter().map(scan).collect()
            }
        };

        debug!(
            kind = "personal_emoji_counts",
            participants = results.len(),
            workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cache filled"
        );
        results.into_iter().collect()
    }

    /// Both emoji aggregations: `(total, personal)`.
    pub fn all_emoji_counts(&self) -> (&EmojiCount, &ByParticipant<EmojiCount>) {
        (self.total_emoji_counts(), self.personal_emoji_counts())
    }

    /// The sender of the first message of every day.
    pub fn who_messaged_first(&self) -> BTreeMap<NaiveDate, String> {
        let mut first = BTreeMap::new();
        for message in self.iter() {
            first
                .entry(message.timestamp().date_naive())
                .or_insert_with(|| message.sender().to_owned());
        }
        first
    }
}
