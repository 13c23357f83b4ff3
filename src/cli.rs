//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - one subcommand per report
//! - [`OutputFormat`] - Output format options
//!
//! Options that shape the loaded conversation (`--from`, `--after`,
//! `--before`, `--no-fix-encoding`) and the output (`--format`, `--output`)
//! are global, so they may appear before or after the subcommand.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, ArchiveConfig};
use crate::core::{TimeQuery, WordQuery};
use crate::error::{ChatlensError, Result};

/// Statistics and search over Messenger chat archives.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlens")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlens summary inbox/alice_123/message_1.json
    chatlens daily message_1.json message_2.json -o daily.csv
    chatlens words message_1.json --top 20 --min-length 5 --from Alice
    chatlens emojis message_1.json --per-person --format json
    chatlens search \"see you\" message_1.json --after 2020-01-01
    chatlens at message_1.json --year 2020 --hour 23")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (default: from --output extension, else csv)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Only analyze messages from this participant
    #[arg(long, value_name = "PERSON", global = true)]
    pub from: Option<String>,

    /// Only analyze messages sent on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", global = true)]
    pub after: Option<String>,

    /// Only analyze messages sent on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", global = true)]
    pub before: Option<String>,

    /// Take archive text verbatim instead of repairing its encoding
    #[arg(long, global = true)]
    pub no_fix_encoding: bool,

    /// Maximum number of threads for the per-person emoji scan
    #[arg(long, value_name = "N", global = true)]
    pub workers: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Input archives shared by every subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct Archives {
    /// Archive files of one conversation (message_1.json, message_2.json, ...)
    #[arg(required = true, value_name = "ARCHIVES")]
    pub paths: Vec<PathBuf>,
}

/// Available reports.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Messages, words and first/last message per participant
    Summary(Archives),

    /// Messages per day per participant
    Daily(Archives),

    /// Messages per hour of day per participant
    Hourly(Archives),

    /// Messages per weekday per participant
    Weekday(Archives),

    /// Most common words
    Words {
        #[command(flatten)]
        archives: Archives,

        /// Number of words to show
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Ignore words shorter than this
        #[arg(long, default_value_t = 1)]
        min_length: usize,

        /// Only count words containing this text (overrides --min-length)
        #[arg(long, value_name = "TEXT")]
        matching: Option<String>,
    },

    /// Most common emojis
    Emojis {
        #[command(flatten)]
        archives: Archives,

        /// Number of emojis to show (per person with --per-person)
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Break the counts down by participant
        #[arg(long)]
        per_person: bool,
    },

    /// Who sent the first message of each day
    First(Archives),

    /// Messages containing a piece of text
    Search {
        /// Text to look for
        text: String,

        #[command(flatten)]
        archives: Archives,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Messages containing a whole word
    Word {
        /// Word to look for (case-insensitive, punctuation ignored)
        word: String,

        #[command(flatten)]
        archives: Archives,
    },

    /// Messages sent at a given calendar or clock time
    At {
        #[command(flatten)]
        archives: Archives,

        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        day: Option<u32>,
        #[arg(long)]
        hour: Option<u32>,
        #[arg(long)]
        minute: Option<u32>,
        #[arg(long)]
        second: Option<u32>,
    },

    /// Plain-text transcript of the conversation
    Transcript {
        #[command(flatten)]
        archives: Archives,

        /// Wrap message text at this many characters
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
}

impl Command {
    /// The archive files this command reads.
    pub fn archives(&self) -> &[PathBuf] {
        match self {
            Command::Summary(a)
            | Command::Daily(a)
            | Command::Hourly(a)
            | Command::Weekday(a)
            | Command::First(a) => &a.paths,
            Command::Words { archives, .. }
            | Command::Emojis { archives, .. }
            | Command::Search { archives, .. }
            | Command::Word { archives, .. }
            | Command::At { archives, .. }
            | Command::Transcript { archives, .. } => &archives.paths,
        }
    }

    /// The word query of a `words` command.
    pub fn word_query(&self) -> Option<WordQuery> {
        match self {
            Command::Words {
                top,
                min_length,
                matching,
                ..
            } => {
                let query = WordQuery::new().with_top(*top).with_min_length(*min_length);
                Some(match matching {
                    Some(text) => query.with_matching(text.as_str()),
                    None => query,
                })
            }
            _ => None,
        }
    }

    /// The time query of an `at` command.
    pub fn time_query(&self) -> Option<TimeQuery> {
        match self {
            Command::At {
                year,
                month,
                day,
                hour,
                minute,
                second,
                ..
            } => {
                let mut query = TimeQuery::new();
                if let Some(v) = *year {
                    query = query.year(v);
                }
                if let Some(v) = *month {
                    query = query.month(v);
                }
                if let Some(v) = *day {
                    query = query.day(v);
                }
                if let Some(v) = *hour {
                    query = query.hour(v);
                }
                if let Some(v) = *minute {
                    query = query.minute(v);
                }
                if let Some(v) = *second {
                    query = query.second(v);
                }
                Some(query)
            }
            _ => None,
        }
    }
}

impl Args {
    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig::new().with_fix_encoding(!self.no_fix_encoding)
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        match self.workers {
            Some(n) => AnalysisConfig::new().with_max_workers(n),
            None => AnalysisConfig::new(),
        }
    }

    /// `(start, end)` instants from `--after` / `--before`.
    ///
    /// `start` is the beginning of the `--after` day (inclusive); `end` is the
    /// beginning of the day after `--before` (exclusive).
    pub fn time_bounds(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        let start = self
            .after
            .as_deref()
            .map(parse_date)
            .transpose()?
            .map(start_of_day);
        let end = self
            .before
            .as_deref()
            .map(parse_date)
            .transpose()?
            .and_then(|date| date.succ_opt())
            .map(start_of_day);
        Ok((start, end))
    }

    /// Log filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Parses a `YYYY-MM-DD` command-line date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| ChatlensError::invalid_date(input))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Output format options.
///
/// - [`Csv`](OutputFormat::Csv) - semicolon-delimited table
/// - [`Json`](OutputFormat::Json) - array of row objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with semicolon delimiter (default)
    #[default]
    Csv,

    /// JSON array of row objects
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}
