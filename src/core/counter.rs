//! Result containers for aggregations.
//!
//! - [`Counter`] - occurrence counts keyed by word or emoji glyph
//! - [`ByParticipant`] - one value per participant, in participant order
//! - [`DayOfWeek`] - weekday bucket key, ordered Monday first

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::ops::Index;

use chrono::Weekday;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Occurrence counts keyed by string.
///
/// Missing keys count as zero, both through [`get`](Counter::get) and
/// indexing.
///
/// ```
/// use chatlens::core::Counter;
///
/// let counter: Counter = [("hi".to_string(), 2), ("yo".to_string(), 5)].into_iter().collect();
/// assert_eq!(counter["hi"], 2);
/// assert_eq!(counter["nope"], 0);
/// assert_eq!(counter.most_common(1), [("yo", 5)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Counter(HashMap<String, usize>);

/// Word occurrences.
pub type WordCount = Counter;

/// Emoji glyph occurrences.
pub type EmojiCount = Counter;

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `key`, zero when absent.
    pub fn get(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Adds `n` occurrences of `key`. Adding zero leaves no entry behind.
    pub fn add(&mut self, key: &str, n: usize) {
        if n == 0 {
            return;
        }
        match self.0.get_mut(key) {
            Some(count) => *count += n,
            None => {
                self.0.insert(key.to_owned(), n);
            }
        }
    }

    /// Adds every count of `other` into this counter.
    pub fn merge<'a, I>(&mut self, other: I)
    where
        I: IntoIterator<Item = (&'a String, &'a usize)>,
    {
        for (key, n) in other {
            self.add(key, *n);
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, usize> {
        self.0.iter()
    }

    /// The `n` highest counts, ties broken by key so the order is stable.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

impl Index<&str> for Counter {
    type Output = usize;

    fn index(&self, key: &str) -> &usize {
        self.0.get(key).unwrap_or(&0)
    }
}

impl FromIterator<(String, usize)> for Counter {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut counter = Counter::new();
        for (key, n) in iter {
            counter.add(&key, n);
        }
        counter
    }
}

impl<'a> IntoIterator for &'a Counter {
    type Item = (&'a String, &'a usize);
    type IntoIter = hash_map::Iter<'a, String, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Values keyed by participant name, iterated in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByParticipant<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for ByParticipant<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> ByParticipant<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `name`, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Index<&str> for ByParticipant<V> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if `name` has no entry.
    fn index(&self, name: &str) -> &V {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no entry for participant '{name}'"),
        }
    }
}

impl<V> FromIterator<(String, V)> for ByParticipant<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = ByParticipant::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<V> IntoIterator for ByParticipant<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for ByParticipant<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Weekday bucket key.
///
/// Orders Monday first and displays the full English day name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek(pub Weekday);

impl DayOfWeek {
    pub fn name(self) -> &'static str {
        match self.0 {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        Self(day)
    }
}

impl Ord for DayOfWeek {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .num_days_from_monday()
            .cmp(&other.0.num_days_from_monday())
    }
}

impl PartialOrd for DayOfWeek {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
