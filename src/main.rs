use std::env;
use std::fs;
use std::process;
use std::time::{Duration, Instant};

use sightread::{key_name, CursorHighlight, Feedback, History, SessionSummary, Settings, Trainer};

fn usage() -> ! {
    eprintln!("Usage: sightread <seed> [total-notes] [low] [high] [output.xml]");
    eprintln!("       sightread --replay <seed> <messages.txt>   (lines: [@ms] 90 3C 40)");
    process::exit(1);
}

fn parse_seed(arg: &str) -> u32 {
    match arg.parse() {
        Ok(seed) => seed,
        Err(_) => {
            eprintln!("Invalid seed '{}'", arg);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    if args[1] == "--replay" {
        if args.len() < 4 {
            usage();
        }
        replay(parse_seed(&args[2]), &args[3]);
        return;
    }

    let seed = parse_seed(&args[1]);
    let mut settings = Settings::load(&Settings::default_path());
    if let Some(count) = args.get(2) {
        match count.parse() {
            Ok(count) => settings.set_total_notes(count),
            Err(_) => {
                eprintln!("Invalid note count '{}'", count);
                process::exit(1);
            }
        }
    }
    if let Some(low) = args.get(3) {
        settings.range_low = low.clone();
    }
    if let Some(high) = args.get(4) {
        settings.range_high = high.clone();
    }
    let output_path = args.get(5);

    let score = match sightread::generate_from_settings(&settings, seed) {
        Ok(score) => score,
        Err(e) => {
            eprintln!("Generation error: {}", e);
            process::exit(1);
        }
    };

    let names: Vec<String> = score.expected_keys.iter().map(|k| key_name(*k)).collect();
    eprintln!("Expected: {}", names.join(" "));

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &score.document) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote MusicXML to {}", path);
        }
        None => {
            println!("{}", score.document);
        }
    }
}

/// Feed a text file of hex messages through a trainer built from the stored
/// settings. Each line is `[@<ms>] <status> <key> <velocity>`, e.g.
/// `@1500 90 3C 40`. The optional `@<ms>` offset is the time the message was
/// recorded; speed and history are only reported when every message has one.
fn replay(seed: u32, messages_path: &str) {
    let source = match fs::read_to_string(messages_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", messages_path, e);
            process::exit(1);
        }
    };

    let settings = Settings::load(&Settings::default_path());
    let config = match settings.generator_config(seed) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Settings error: {}", e);
            process::exit(1);
        }
    };
    let mut trainer = match Trainer::new(config) {
        Ok(trainer) => trainer,
        Err(e) => {
            eprintln!("Generation error: {}", e);
            process::exit(1);
        }
    };

    let start = Instant::now();
    let mut timed = true;
    for (offset_ms, bytes) in source.lines().filter_map(parse_replay_line) {
        let at = match offset_ms {
            Some(ms) => start + Duration::from_millis(ms),
            None => {
                timed = false;
                Instant::now()
            }
        };
        for feedback in trainer.handle_message_at(&bytes, at) {
            println!("{}", describe(&feedback));
        }
    }

    println!(
        "{}",
        replay_summary(trainer.summary(), trainer.score().expected_keys.len(), timed)
    );

    if timed {
        if let Some(record) = trainer.finished_record() {
            History::new(History::default_path()).append(&record);
        }
    }
}

/// Split a replay line into its optional millisecond offset and raw bytes.
/// Blank lines and `#` comments yield `None`. Unparseable bytes become an
/// empty message, which the decoder drops.
fn parse_replay_line(line: &str) -> Option<(Option<u64>, Vec<u8>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace().peekable();
    let offset_ms = fields
        .next_if(|f| f.starts_with('@'))
        .and_then(|f| f[1..].parse().ok());
    let bytes = fields
        .map(|b| u8::from_str_radix(b, 16))
        .collect::<Result<Vec<u8>, _>>()
        .unwrap_or_default();
    Some((offset_ms, bytes))
}

fn replay_summary(summary: &SessionSummary, total_notes: usize, timed: bool) -> String {
    let mut line = format!(
        "{}/{} notes, accuracy {:.1}%",
        summary.completed(),
        total_notes,
        summary.accuracy()
    );
    if timed {
        line.push_str(&format!(", {:.1} notes/min", summary.notes_per_minute()));
    }
    line
}

fn describe(feedback: &Feedback) -> String {
    let highlight = match feedback.highlight {
        Some(CursorHighlight::Correct(i)) => format!(" [note {} correct]", i + 1),
        Some(CursorHighlight::Wrong(i)) => format!(" [note {} wrong]", i + 1),
        Some(CursorHighlight::Move(i)) => format!(" [next: note {}]", i + 1),
        Some(CursorHighlight::Done) => " [done]".to_string(),
        None => String::new(),
    };
    format!("{:?} -> {:?}{}", feedback.event, feedback.outcome, highlight)
}
