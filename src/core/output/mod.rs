//! Report tables and their writers.
//!
//! Every query result the CLI can print is first flattened into a [`Table`]
//! (named columns, one row per record) and then written by one of:
//!
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of objects, one per row
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> chatlens::Result<()> {
//! use chatlens::core::output::{Table, to_csv, to_json};
//! use chatlens::{Conversation, Message};
//! use chrono::{TimeZone, Utc};
//!
//! let conversation = Conversation::from_parts(
//!     vec![Message::new("Alice", Utc.timestamp_opt(0, 0).unwrap(), "hi hi")],
//!     Vec::<String>::new(),
//!     None,
//! );
//!
//! let table = Table::from_counts("Word", conversation.word_count().most_common(5));
//! assert_eq!(to_csv(&table)?, "Word;Count\nhi;2\n");
//! assert!(to_json(&table)?.contains(r#""Count": 2"#));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::conversation::Conversation;
use super::counter::{ByParticipant, Counter};
use super::stats::Frequencies;
use crate::message::TIMESTAMP_FORMAT;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(usize),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Count(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Count(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_owned())
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Count(n)
    }
}

/// A flat report: named columns and rows of cells.
///
/// Serializes as a JSON array with one object per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing cells are left empty, extra cells dropped.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        let mut row = row;
        row.resize(self.headers.len(), Cell::Text(String::new()));
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Participant;{key_header};Count`, one row per non-empty bucket.
    pub fn from_frequencies<K: fmt::Display>(
        key_header: &str,
        frequencies: &ByParticipant<Frequencies<K>>,
    ) -> Self {
        let mut table = Self::new(["Participant", key_header, "Count"]);
        for (person, buckets) in frequencies.iter() {
            for (key, n) in buckets {
                table.push_row(vec![person.into(), key.to_string().into(), (*n).into()]);
            }
        }
        table
    }

    /// `{key_header};Count`, in the given order.
    pub fn from_counts<K, I>(key_header: &str, counts: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, usize)>,
    {
        let mut table = Self::new([key_header, "Count"]);
        for (key, n) in counts {
            table.push_row(vec![key.as_ref().into(), n.into()]);
        }
        table
    }

    /// `Participant;{key_header};Count` with each participant's `top` entries.
    pub fn from_personal_counts(key_header: &str, counts: &ByParticipant<Counter>, top: usize) -> Self {
        let mut table = Self::new(["Participant", key_header, "Count"]);
        for (person, counter) in counts.iter() {
            for (key, n) in counter.most_common(top) {
                table.push_row(vec![person.into(), key.into(), n.into()]);
            }
        }
        table
    }

    /// `Timestamp;Sender;Text`, one row per message.
    pub fn from_messages(conversation: &Conversation) -> Self {
        let mut table = Self::new(["Timestamp", "Sender", "Text"]);
        for message in conversation.iter() {
            table.push_row(vec![
                message.timestamp().format(TIMESTAMP_FORMAT).to_string().into(),
                message.sender().into(),
                message.raw_text().into(),
            ]);
        }
        table
    }

    /// `Date;Sender` from [`Conversation::who_messaged_first`].
    pub fn from_first_senders(first: &BTreeMap<NaiveDate, String>) -> Self {
        let mut table = Self::new(["Date", "Sender"]);
        for (date, sender) in first {
            table.push_row(vec![date.to_string().into(), sender.as_str().into()]);
        }
        table
    }

    /// `Participant;Messages;Words;First;Last`, one row per participant.
    pub fn summary(conversation: &Conversation) -> Self {
        let mut table = Self::new(["Participant", "Messages", "Words", "First", "Last"]);
        for (person, messages) in conversation.all_personal_messages() {
            let words: usize = messages.iter().map(|m| m.word_list().len()).sum();
            let stamp = |m: Option<&crate::Message>| {
                m.map(|m| m.timestamp().format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default()
            };
            table.push_row(vec![
                person.into(),
                messages.len().into(),
                words.into(),
                stamp(messages.first()).into(),
                stamp(messages.last()).into(),
            ]);
        }
        table
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRef {
                headers: &self.headers,
                cells: row,
            })?;
        }
        seq.end()
    }
}

struct RowRef<'a> {
    headers: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}
