//! Integration tests for the sight-reading trainer
//!
//! Tests the full path from settings to score to matched key presses.

use sightread::{
    generate, generate_from_settings, natural_pitches_in_range, Clef, DeviceEvent,
    GeneratorConfig, InputDecoder, Pitch, PressOutcome, RangeConfig, ReleaseOutcome, Session,
    Settings, Step, Trainer, TrainerError, TrainerUpdate,
};

#[test]
fn test_generate_is_reproducible() {
    let config = GeneratorConfig::new(RangeConfig::new(43, 77, Clef::Treble), 64, 2024);
    let first = generate(&config).unwrap();
    let second = generate(&config).unwrap();
    assert_eq!(first.document, second.document);
    assert_eq!(first.expected_keys, second.expected_keys);

    let other = generate(&GeneratorConfig { seed: 2025, ..config }).unwrap();
    assert_ne!(first.expected_keys, other.expected_keys);
}

#[test]
fn test_document_matches_expected_keys() {
    let config = GeneratorConfig::new(RangeConfig::new(60, 84, Clef::Treble), 10, 77);
    let score = generate(&config).unwrap();

    let steps: Vec<&str> = score
        .document
        .match_indices("<step>")
        .map(|(i, _)| &score.document[i + 6..i + 7])
        .collect();
    let expected: Vec<&str> = score
        .expected_keys
        .iter()
        .map(|k| Pitch::from_key_number(*k).unwrap().step.as_str())
        .collect();
    assert_eq!(steps, expected);
    assert_eq!(score.document.matches("<measure number=").count(), 3);
}

#[test]
fn test_black_key_range_fails_before_generation() {
    assert!(natural_pitches_in_range(61, 61).is_empty());
    let config = GeneratorConfig::new(RangeConfig::new(61, 61, Clef::Treble), 8, 0);
    assert!(matches!(generate(&config), Err(TrainerError::InvalidRange { .. })));
}

#[test]
fn test_pool_scenario() {
    assert_eq!(
        natural_pitches_in_range(60, 62),
        vec![Pitch::new(Step::C, 4), Pitch::new(Step::D, 4)]
    );
}

#[test]
fn test_settings_drive_generation() {
    let settings = Settings {
        range_low: "E2".to_string(),
        range_high: "C4".to_string(),
        total_notes: 12,
        ..Settings::default()
    };
    let score = generate_from_settings(&settings, 5).unwrap();
    assert_eq!(score.expected_keys.len(), 12);
    assert!(score.expected_keys.iter().all(|k| (40..=60).contains(k)));
    assert!(score.document.contains("<sign>G</sign>"));
}

#[test]
fn test_decoder_and_session_together() {
    let mut decoder = InputDecoder::new();
    let mut session = Session::new(vec![60, 62, 64]);
    let messages: [[u8; 3]; 9] = [
        [0x90, 60, 64],
        [0x90, 60, 64], // held repeat
        [0x90, 61, 30], // wrong key while 60 is armed
        [0x80, 61, 0],
        [0x90, 60, 0], // running-status release
        [0x90, 62, 64],
        [0x80, 62, 0],
        [0x90, 64, 64],
        [0x80, 64, 0],
    ];

    let mut presses = Vec::new();
    let mut releases = Vec::new();
    let mut all_released = 0;
    for message in messages {
        for event in decoder.decode(&message) {
            match event {
                DeviceEvent::Press { key, .. } => presses.push(session.on_press(key)),
                DeviceEvent::Release { key } => releases.push(session.on_release(key)),
                DeviceEvent::AllReleased => all_released += 1,
            }
        }
    }

    assert_eq!(
        presses,
        vec![
            PressOutcome::Correct,
            PressOutcome::Wrong,
            PressOutcome::Correct,
            PressOutcome::Correct
        ]
    );
    assert_eq!(
        releases,
        vec![
            ReleaseOutcome::Idle,
            ReleaseOutcome::Advanced,
            ReleaseOutcome::Advanced,
            ReleaseOutcome::Complete
        ]
    );
    assert_eq!(all_released, 3);
    assert!(session.is_complete());
    assert_eq!(session.on_press(64), PressOutcome::Complete);
}

#[test]
fn test_trainer_plays_through_generated_score() {
    let config = GeneratorConfig::new(RangeConfig::new(48, 72, Clef::Treble), 16, 31);
    let mut trainer = Trainer::new(config).unwrap();
    let keys = trainer.score().expected_keys.clone();
    let sender = trainer.sender();

    for key in &keys {
        sender.send_device(&[0x90, key.wrapping_add(1), 50]);
        sender.send_device(&[0x80, key.wrapping_add(1), 0]);
        sender.send_device(&[0x90, *key, 80]);
        sender.send_device(&[0x80, *key, 0]);
    }
    let updates = trainer.pump();
    assert!(updates.iter().all(|u| matches!(u, TrainerUpdate::Feedback(_))));

    assert!(trainer.session().is_complete());
    assert_eq!(trainer.summary().completed(), keys.len());
    assert_eq!(trainer.summary().correct() as usize, keys.len());
    assert_eq!(trainer.summary().wrong() as usize, keys.len());
    let record = trainer.finished_record().unwrap();
    assert_eq!(record.accuracy, 50.0);
    assert!(record.most_missed.len() <= 3);
}
