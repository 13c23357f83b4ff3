//! Query operations on a [`Conversation`].
//!
//! Every query returns a new conversation sharing message storage with its
//! source. Results stay sorted and keep the source's participants and title,
//! except for [`personal_messages`](Conversation::personal_messages).

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use super::conversation::Conversation;
use super::counter::ByParticipant;
use crate::Message;
use crate::error::{ChatlensError, Result};

/// Match on calendar and clock components of a timestamp.
///
/// Unset fields match anything; set fields are combined with AND. Values
/// outside a field's valid range are ignored, as if never set.
///
/// ```
/// use chatlens::core::TimeQuery;
///
/// let query = TimeQuery::new().year(2020).month(13).hour(9);
/// assert_eq!(query.get_month(), None);
/// assert_eq!(query.get_hour(), Some(9));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeQuery {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
}

impl TimeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from integers where negative values mean "unset".
    ///
    /// Month and day are also unset at zero, since neither has a zero value.
    pub fn from_sentinels(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        let mut query = Self::new();
        if year >= 0 {
            query = query.year(year);
        }
        if let Ok(month) = u32::try_from(month) {
            query = query.month(month);
        }
        if let Ok(day) = u32::try_from(day) {
            query = query.day(day);
        }
        if let Ok(hour) = u32::try_from(hour) {
            query = query.hour(hour);
        }
        if let Ok(minute) = u32::try_from(minute) {
            query = query.minute(minute);
        }
        if let Ok(second) = u32::try_from(second) {
            query = query.second(second);
        }
        query
    }

    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn month(mut self, month: u32) -> Self {
        self.month = (1..=12).contains(&month).then_some(month);
        self
    }

    #[must_use]
    pub fn day(mut self, day: u32) -> Self {
        self.day = (1..=31).contains(&day).then_some(day);
        self
    }

    #[must_use]
    pub fn hour(mut self, hour: u32) -> Self {
        self.hour = (hour < 24).then_some(hour);
        self
    }

    #[must_use]
    pub fn minute(mut self, minute: u32) -> Self {
        self.minute = (minute < 60).then_some(minute);
        self
    }

    #[must_use]
    pub fn second(mut self, second: u32) -> Self {
        self.second = (second < 60).then_some(second);
        self
    }

    pub fn get_year(&self) -> Option<i32> {
        self.year
    }

    pub fn get_month(&self) -> Option<u32> {
        self.month
    }

    pub fn get_day(&self) -> Option<u32> {
        self.day
    }

    pub fn get_hour(&self) -> Option<u32> {
        self.hour
    }

    pub fn get_minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn get_second(&self) -> Option<u32> {
        self.second
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if every set field equals the timestamp's component.
    pub fn matches(&self, timestamp: DateTime<Utc>) -> bool {
        fn field<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
            wanted.is_none_or(|w| w == actual)
        }

        field(self.year, timestamp.year())
            && field(self.month, timestamp.month())
            && field(self.day, timestamp.day())
            && field(self.hour, timestamp.hour())
            && field(self.minute, timestamp.minute())
            && field(self.second, timestamp.second())
    }
}

impl Conversation {
    /// Messages sent by `person`, as a one-participant conversation.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::NotAParticipant`] if `person` is not listed
    /// in [`participants`](Self::participants).
    pub fn personal_messages(&self, person: &str) -> Result<Conversation> {
        self.require_participant(person)?;
        Ok(Conversation::from_shared(
            self.messages()
                .iter()
                .filter(|m| m.sender() == person)
                .cloned()
                .collect(),
            vec![person.to_owned()],
            self.title().map(str::to_owned),
        ))
    }

    /// [`personal_messages`](Self::personal_messages) for every participant.
    pub fn all_personal_messages(&self) -> ByParticipant<Conversation> {
        let slots: HashMap<&str, usize> = self
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let mut buckets: Vec<Vec<Arc<Message>>> = vec![Vec::new(); slots.len()];
        for message in self.messages() {
            if let Some(&slot) = slots.get(message.sender()) {
                buckets[slot].push(Arc::clone(message));
            }
        }

        self.participants()
            .iter()
            .zip(buckets)
            .map(|(person, messages)| {
                let conversation = Conversation::from_shared(
                    messages,
                    vec![person.clone()],
                    self.title().map(str::to_owned),
                );
                (person.clone(), conversation)
            })
            .collect()
    }

    /// Messages whose timestamp matches every set field of `query`.
    ///
    /// An empty query returns `self` without copying.
    pub fn messages_at(&self, query: &TimeQuery) -> Conversation {
        if query.is_empty() {
            return self.clone();
        }
        self.filtered(|m| query.matches(m.timestamp()))
    }

    /// Messages sent from `start` on, up to `end`.
    ///
    /// `None` leaves that side unbounded; `inclusive` decides whether a
    /// message exactly at `end` is kept.
    pub fn time_range(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        inclusive: bool,
    ) -> Conversation {
        if start.is_none() && end.is_none() {
            return self.clone();
        }
        self.filtered(|m| {
            let t = m.timestamp();
            let after_start = start.is_none_or(|s| t >= s);
            let before_end = end.is_none_or(|e| if inclusive { t <= e } else { t < e });
            after_start && before_end
        })
    }

    /// Messages whose text contains `needle`.
    pub fn find_substring(&self, needle: &str, case_sensitive: bool) -> Conversation {
        if case_sensitive {
            self.filtered(|m| m.raw_text().contains(needle))
        } else {
            let needle = needle.to_lowercase();
            self.filtered(|m| m.raw_text().to_lowercase().contains(&needle))
        }
    }

    /// Messages containing `word` as a whole word, ignoring case.
    ///
    /// Words are compared after cleaning, so `"cant"` finds `"Can't"` while
    /// `"can't"` finds nothing.
    pub fn find_word(&self, word: &str) -> Conversation {
        let word = word.to_lowercase();
        self.filtered(|m| m.word_list().iter().any(|w| *w == word))
    }

    /// Messages on the dates at `indices` of the sorted distinct date list.
    ///
    /// With `person` set, the date list is built from that person's messages
    /// only; the result still holds everyone's messages on those dates.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::IndexOutOfRange`] if any index is past the
    /// end of the date list, and [`ChatlensError::NotAParticipant`] for an
    /// unknown `person`.
    pub fn messages_from_date_indices(
        &self,
        indices: &[usize],
        person: Option<&str>,
    ) -> Result<Conversation> {
        let dates = match person {
            Some(person) => self.personal_messages(person)?.calendar_dates(),
            None => self.calendar_dates(),
        };

        let wanted = indices
            .iter()
            .map(|&index| {
                dates
                    .get(index)
                    .copied()
                    .ok_or_else(|| ChatlensError::index_out_of_range(index, dates.len()))
            })
            .collect::<Result<BTreeSet<NaiveDate>>>()?;

        Ok(self.filtered(|m| wanted.contains(&m.timestamp().date_naive())))
    }

    /// The earliest message.
    pub fn first(&self) -> Option<&Message> {
        self.messages().first().map(|m| &**m)
    }

    /// The latest message.
    pub fn last(&self) -> Option<&Message> {
        self.messages().last().map(|m| &**m)
    }

    /// Distinct message timestamps, ascending.
    pub fn dates(&self) -> Vec<DateTime<Utc>> {
        let mut dates: Vec<DateTime<Utc>> = self.iter().map(Message::timestamp).collect();
        dates.dedup();
        dates
    }

    /// Distinct calendar dates with at least one message, ascending.
    pub fn calendar_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.iter().map(|m| m.timestamp().date_naive()).collect();
        dates.dedup();
        dates
    }

    fn require_participant(&self, person: &str) -> Result<()> {
        if self.participants().iter().any(|p| p == person) {
            Ok(())
        } else {
            Err(ChatlensError::not_a_participant(person))
        }
    }
}
