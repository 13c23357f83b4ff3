//! # chatlens CLI
//!
//! Command-line interface for the chatlens library.

use std::fs;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatlens::cli::{Args, Command};
use chatlens::core::Table;
use chatlens::format::{OutputFormat, to_format_string, write_to_format};
use chatlens::{ChatlensError, Conversation};

/// What a command produces.
enum Report {
    Table(Table),
    Text(String),
}

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatlens={}", args.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), ChatlensError> {
    let total_start = Instant::now();

    let conversation =
        Conversation::from_archives(args.command.archives(), &args.archive_config())?;
    info!(
        archives = args.command.archives().len(),
        "{conversation}"
    );

    let conversation = narrow(conversation, args)?;
    let report = build_report(&conversation, args);
    emit(&report, args)?;

    info!(
        elapsed_ms = total_start.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

/// Applies `--after`, `--before` and `--from`.
fn narrow(conversation: Conversation, args: &Args) -> Result<Conversation, ChatlensError> {
    let (start, end) = args.time_bounds()?;
    let conversation = conversation.time_range(start, end, false);

    match &args.from {
        Some(person) => conversation.personal_messages(person),
        None => Ok(conversation),
    }
}

fn build_report(conversation: &Conversation, args: &Args) -> Report {
    let table = match &args.command {
        Command::Summary(_) => Table::summary(conversation),
        Command::Daily(_) => Table::from_frequencies("Date", &conversation.daily_frequencies()),
        Command::Hourly(_) => Table::from_frequencies("Hour", &conversation.hourly_frequencies()),
        Command::Weekday(_) => {
            Table::from_frequencies("Weekday", &conversation.weekday_frequencies())
        }
        Command::Words { .. } => {
            let query = args.command.word_query().unwrap_or_default();
            Table::from_counts("Word", conversation.most_common_words(&query))
        }
        Command::Emojis {
            top, per_person, ..
        } => {
            if *per_person {
                let counts = conversation.personal_emoji_counts_with(&args.analysis_config());
                Table::from_personal_counts("Emoji", counts, *top)
            } else {
                Table::from_counts("Emoji", conversation.total_emoji_counts().most_common(*top))
            }
        }
        Command::First(_) => Table::from_first_senders(&conversation.who_messaged_first()),
        Command::Search {
            text,
            case_sensitive,
            ..
        } => Table::from_messages(&conversation.find_substring(text, *case_sensitive)),
        Command::Word { word, .. } => Table::from_messages(&conversation.find_word(word)),
        Command::At { .. } => {
            let query = args.command.time_query().unwrap_or_default();
            Table::from_messages(&conversation.messages_at(&query))
        }
        Command::Transcript { width, .. } => return Report::Text(conversation.transcript(*width)),
    };
    Report::Table(table)
}

fn emit(report: &Report, args: &Args) -> Result<(), ChatlensError> {
    match (report, &args.output) {
        (Report::Text(text), Some(path)) => fs::write(path, text)?,
        (Report::Text(text), None) => io::stdout().write_all(text.as_bytes())?,
        (Report::Table(table), Some(path)) => {
            let format: OutputFormat = match args.format {
                Some(format) => format.into(),
                None => OutputFormat::from_path(path)?,
            };
            write_to_format(table, path, format)?;
            info!(rows = table.len(), path = %path.display(), %format, "report written");
        }
        (Report::Table(table), None) => {
            let format: OutputFormat = args.format.map(Into::into).unwrap_or_default();
            let rendered = to_format_string(table, format)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
