//! Messenger archive generator for stress testing chatlens.
//!
//! Writes a single archive file in Messenger's export layout, with every
//! string Mojibake-encoded and `\u00XX`-escaped the way Meta exports are.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output] [participants]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 message_1.json 6

use rand::Rng;
use rand::seq::SliceRandom;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

const EMOJIS: &[&str] = &[
    "😀", "😂", "🤣", "😍", "🥰", "😘", "🤔", "🙄", "😱", "🤯", "💀", "👻", "🔥", "👍", "❤️", "💔",
    "🎉", "🙏", "🏳️‍🌈", "🇰🇿", "👨‍👩‍👧‍👦", "🤷‍♀️", "👍🏽",
];

const SENDERS: &[&str] = &[
    "Alice Martin",
    "Bob Stone",
    "Иван Петров",
    "Zoë Müller",
    "村上 春樹",
    "محمد علي",
    "Renée O\u{2019}Brien",
    "🔥FireUser🔥",
];

const WORDS: &[&str] = &[
    "hey", "lol", "what", "are", "you", "doing", "tonight", "can\u{2019}t", "wait", "see", "you",
    "soon", "привет", "café", "naïve", "ok", "sure", "haha", "maybe", "tomorrow", "\u{201c}quoted\u{201d}",
];

/// Two years of messages, starting 2019-01-01 UTC.
const START_MS: i64 = 1_546_300_800_000;
const SPAN_MS: i64 = 2 * 365 * 24 * 3600 * 1000;

fn main() {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("message_1.json");
    let participants: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2)
        .clamp(1, SENDERS.len());

    println!("🧪 Messenger archive generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages:     {}", count);
    println!("   Participants: {}", participants);
    println!("   Output:       {}", output);
    println!();

    generate_archive(count, &SENDERS[..participants], output);
}

fn generate_archive(count: usize, senders: &[&str], output: &str) {
    let file = File::create(output).expect("Failed to create output file");
    let mut writer = BufWriter::with_capacity(1024 * 1024, file); // 1MB buffer

    let mut rng = rand::thread_rng();

    // Messenger lists newest messages first
    let mut timestamps: Vec<i64> = (0..count)
        .map(|_| START_MS + rng.gen_range(0..SPAN_MS))
        .collect();
    timestamps.sort_unstable_by(|a, b| b.cmp(a));

    writeln!(writer, "{{").unwrap();
    writeln!(writer, "  \"participants\": [").unwrap();
    for (i, sender) in senders.iter().enumerate() {
        let comma = if i + 1 < senders.len() { "," } else { "" };
        writeln!(writer, "    {{\"name\": \"{}\"}}{}", escape_mojibake(sender), comma).unwrap();
    }
    writeln!(writer, "  ],").unwrap();
    writeln!(writer, "  \"messages\": [").unwrap();

    let start = std::time::Instant::now();
    let mut bytes_written: usize = 0;

    for (i, timestamp_ms) in timestamps.iter().enumerate() {
        let sender = senders.choose(&mut rng).unwrap();
        let line = format!(
            "    {}{}",
            generate_message(&mut rng, sender, senders, *timestamp_ms, i),
            if i + 1 < count { "," } else { "" }
        );

        bytes_written += line.len();
        writeln!(writer, "{}", line).unwrap();

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            let mps = (i + 1) as f64 / elapsed;
            let mb = bytes_written as f64 / 1_000_000.0;
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                mb,
                mps
            );
        }
    }

    writeln!(writer, "  ],").unwrap();
    let (title, thread_type) = if senders.len() > 2 {
        ("Stress test crew", "RegularGroup")
    } else {
        (senders[0], "Regular")
    };
    writeln!(writer, "  \"title\": \"{}\",", escape_mojibake(title)).unwrap();
    writeln!(writer, "  \"thread_type\": \"{}\"", thread_type).unwrap();
    writeln!(writer, "}}").unwrap();

    writer.flush().unwrap();

    let elapsed = start.elapsed();
    let mb = bytes_written as f64 / 1_000_000.0;

    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", mb);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed: {:.0} msg/s",
        count as f64 / elapsed.as_secs_f64()
    );
}

fn generate_message(
    rng: &mut impl Rng,
    sender: &str,
    senders: &[&str],
    timestamp_ms: i64,
    index: usize,
) -> String {
    let mut fields = vec![
        format!("\"sender_name\": \"{}\"", escape_mojibake(sender)),
        format!("\"timestamp_ms\": {}", timestamp_ms),
    ];

    match index % 10 {
        // Media only, no content
        0 => fields.push(format!(
            "\"photos\": [{{\"uri\": \"messages/photos/{}.jpg\", \"creation_timestamp\": {}}}]",
            index,
            timestamp_ms / 1000
        )),
        1 => fields.push(format!(
            "\"videos\": [{{\"uri\": \"messages/videos/{0}.mp4\", \"creation_timestamp\": {1}, \"thumbnail\": {{\"uri\": \"messages/videos/thumbs/{0}.jpg\"}}}}]",
            index,
            timestamp_ms / 1000
        )),
        // Emoji spam
        2 => {
            let emojis: String = (0..rng.gen_range(1..20))
                .map(|_| *EMOJIS.choose(rng).unwrap())
                .collect();
            fields.push(format!("\"content\": \"{}\"", escape_mojibake(&emojis)));
        }
        // Multi-line text
        3 => fields.push(format!(
            "\"content\": \"{}\"",
            escape_mojibake(&format!("{}\n{}", random_sentence(rng), random_sentence(rng)))
        )),
        _ => fields.push(format!(
            "\"content\": \"{}\"",
            escape_mojibake(&random_sentence(rng))
        )),
    }

    if rng.gen_bool(0.1) {
        let reactor = senders.choose(rng).unwrap();
        let reaction = EMOJIS.choose(rng).unwrap();
        fields.push(format!(
            "\"reactions\": [{{\"reaction\": \"{}\", \"actor\": \"{}\"}}]",
            escape_mojibake(reaction),
            escape_mojibake(reactor)
        ));
    }

    format!("{{{}}}", fields.join(", "))
}

fn random_sentence(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(1..15);
    let mut words: Vec<&str> = (0..len).map(|_| *WORDS.choose(rng).unwrap()).collect();
    if rng.gen_bool(0.3) {
        words.push(EMOJIS.choose(rng).unwrap());
    }
    words.join(" ")
}

/// Encodes `s` the way Messenger does: each UTF-8 byte becomes its own
/// `\u00XX` escape, and JSON specials are escaped.
fn escape_mojibake(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 6);
    for byte in s.bytes() {
        match byte {
            b'"' => result.push_str("\\\""),
            b'\\' => result.push_str("\\\\"),
            b'\n' => result.push_str("\\n"),
            b'\r' => result.push_str("\\r"),
            b'\t' => result.push_str("\\t"),
            b if b.is_ascii_control() || !b.is_ascii() => {
                result.push_str(&format!("\\u{:04x}", b));
            }
            b => result.push(char::from(b)),
        }
    }
    result
}
