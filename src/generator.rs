//! # Score Generator
//!
//! Turns a seed and a key range into a reproducible sight-reading exercise.
//!
//! ## Pipeline
//! 1. Check preconditions (note count, group size, non-empty pitch pool)
//! 2. Seed a [`Mulberry32`] with the exercise seed
//! 3. For each measure, draw `min(notes_per_group, remaining)` pitches
//!    uniformly from the pool, in order
//! 4. Pad the final measure with quarter rests
//! 5. Serialize to MusicXML
//!
//! The same [`GeneratorConfig`] always yields the same document and key
//! sequence, so sharing a seed reproduces an exercise.
//!
//! ## Example
//! ```rust
//! use sightread::{generate, Clef, GeneratorConfig, RangeConfig};
//!
//! let config = GeneratorConfig::new(RangeConfig::new(60, 72, Clef::Treble), 8, 42);
//! let score = generate(&config)?;
//! assert_eq!(score.expected_keys.len(), 8);
//! assert!(score.document.contains("<score-partwise"));
//! # Ok::<(), sightread::TrainerError>(())
//! ```

use log::info;

use crate::error::TrainerError;
use crate::musicxml::to_musicxml;
use crate::pitch::{key_name, natural_pitches_in_range, Pitch};
use crate::rng::Mulberry32;
use crate::score::{Clef, Element, Measure, Score, TimeSignature};

/// Notes per measure when none is given
pub const DEFAULT_NOTES_PER_GROUP: usize = 4;

/// Inclusive key range and the clef to draw it in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeConfig {
    pub min_key: u8,
    pub max_key: u8,
    pub clef: Clef,
}

impl RangeConfig {
    pub fn new(min_key: u8, max_key: u8, clef: Clef) -> Self {
        Self {
            min_key,
            max_key,
            clef,
        }
    }

    /// Natural pitches eligible for generation, ascending.
    pub fn pool(&self) -> Vec<Pitch> {
        natural_pitches_in_range(self.min_key, self.max_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub range: RangeConfig,
    pub notes_per_group: usize,
    pub total_notes: usize,
    pub seed: u32,
}

impl GeneratorConfig {
    pub fn new(range: RangeConfig, total_notes: usize, seed: u32) -> Self {
        Self {
            range,
            notes_per_group: DEFAULT_NOTES_PER_GROUP,
            total_notes,
            seed,
        }
    }

    pub fn with_notes_per_group(mut self, notes_per_group: usize) -> Self {
        self.notes_per_group = notes_per_group;
        self
    }
}

/// A generated exercise. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScore {
    /// MusicXML document for the renderer
    pub document: String,
    /// Key-numbers the player must press, in order
    pub expected_keys: Vec<u8>,
    /// Number of measures in `document`
    pub measure_count: usize,
}

/// Generate an exercise.
///
/// # Errors
/// - [`TrainerError::InvalidNoteCount`] when `total_notes == 0`
/// - [`TrainerError::InvalidRange`] when the range holds no natural pitch
/// - [`TrainerError::InvalidGroupSize`] when `notes_per_group == 0`
pub fn generate(config: &GeneratorConfig) -> Result<GeneratedScore, TrainerError> {
    let range = &config.range;
    if config.total_notes == 0 {
        return Err(TrainerError::InvalidNoteCount(config.total_notes));
    }
    let pool = range.pool();
    if pool.is_empty() {
        return Err(TrainerError::InvalidRange {
            min_key: range.min_key,
            max_key: range.max_key,
        });
    }
    if config.notes_per_group == 0 {
        return Err(TrainerError::InvalidGroupSize(config.notes_per_group));
    }

    let mut rng = Mulberry32::new(config.seed);
    let mut measures = Vec::with_capacity(config.total_notes.div_ceil(config.notes_per_group));
    let mut expected_keys = Vec::with_capacity(config.total_notes);
    let mut remaining = config.total_notes;

    while remaining > 0 {
        let count = remaining.min(config.notes_per_group);
        let mut elements = Vec::with_capacity(config.notes_per_group);

        for _ in 0..count {
            let pitch = draw_pitch(&mut rng, &pool, range)?;
            expected_keys.push(pitch.key_number() as u8);
            elements.push(Element::Note(pitch));
        }
        elements.resize(config.notes_per_group, Element::Rest);

        measures.push(Measure { elements });
        remaining -= count;
    }

    let score = Score {
        title: format!("Sight Reading #{}", config.seed),
        clef: range.clef,
        time_signature: TimeSignature {
            beats: config.notes_per_group,
            beat_type: 4,
        },
        measures,
    };

    info!(
        "Generated {} notes in {} measures ({}..={}, {} clef, seed {})",
        expected_keys.len(),
        score.measures.len(),
        key_name(range.min_key),
        key_name(range.max_key),
        range.clef.as_str(),
        config.seed
    );

    Ok(GeneratedScore {
        document: to_musicxml(&score),
        expected_keys,
        measure_count: score.measures.len(),
    })
}

fn draw_pitch(
    rng: &mut Mulberry32,
    pool: &[Pitch],
    range: &RangeConfig,
) -> Result<Pitch, TrainerError> {
    rng.pick(pool).copied().ok_or(TrainerError::InvalidRange {
        min_key: range.min_key,
        max_key: range.max_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treble(min_key: u8, max_key: u8) -> RangeConfig {
        RangeConfig::new(min_key, max_key, Clef::Treble)
    }

    #[test]
    fn test_same_inputs_same_output() {
        let config = GeneratorConfig::new(treble(48, 84), 37, 1234);
        let a = generate(&config).unwrap();
        let b = generate(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pinned_sequence() {
        let config = GeneratorConfig::new(treble(60, 72), 8, 42);
        let score = generate(&config).unwrap();
        assert_eq!(score.expected_keys, vec![67, 65, 71, 69, 62, 67, 64, 67]);

        let config = GeneratorConfig::new(treble(60, 72), 4, 1);
        let score = generate(&config).unwrap();
        assert_eq!(score.expected_keys, vec![69, 60, 67, 72]);
    }

    #[test]
    fn test_group_size_does_not_change_keys() {
        let base = GeneratorConfig::new(treble(60, 72), 8, 42);
        let grouped = base.clone().with_notes_per_group(3);
        let a = generate(&base).unwrap();
        let b = generate(&grouped).unwrap();
        assert_eq!(a.expected_keys, b.expected_keys);
        assert_eq!(a.measure_count, 2);
        assert_eq!(b.measure_count, 3);
    }

    #[test]
    fn test_keys_are_natural_and_in_range() {
        for seed in 0..20 {
            let config = GeneratorConfig::new(treble(55, 79), 50, seed);
            let score = generate(&config).unwrap();
            assert_eq!(score.expected_keys.len(), 50);
            for key in score.expected_keys {
                assert!((55..=79).contains(&key));
                assert!(Pitch::from_key_number(key).is_some());
            }
        }
    }

    #[test]
    fn test_single_pitch_pool() {
        let config = GeneratorConfig::new(treble(60, 61), 5, 99);
        let score = generate(&config).unwrap();
        assert_eq!(score.expected_keys, vec![60; 5]);
    }

    #[test]
    fn test_final_measure_padded_with_rests() {
        let config = GeneratorConfig::new(treble(60, 72), 6, 5);
        let score = generate(&config).unwrap();
        assert_eq!(score.measure_count, 2);
        assert_eq!(score.document.matches("<rest/>").count(), 2);
        assert_eq!(score.document.matches("<pitch>").count(), 6);
    }

    #[test]
    fn test_clef_in_document() {
        let config = GeneratorConfig::new(RangeConfig::new(36, 55, Clef::Bass), 4, 3);
        let score = generate(&config).unwrap();
        assert!(score.document.contains("<sign>F</sign>"));
        assert!(score.document.contains("<beats>4</beats>"));
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let config = GeneratorConfig::new(treble(61, 61), 4, 0);
        assert_eq!(
            generate(&config),
            Err(TrainerError::InvalidRange {
                min_key: 61,
                max_key: 61
            })
        );

        let inverted = GeneratorConfig::new(treble(72, 60), 4, 0);
        assert!(matches!(
            generate(&inverted),
            Err(TrainerError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_zero_counts_are_rejected() {
        let config = GeneratorConfig::new(treble(60, 72), 0, 0);
        assert_eq!(generate(&config), Err(TrainerError::InvalidNoteCount(0)));

        let config = GeneratorConfig::new(treble(60, 72), 4, 0).with_notes_per_group(0);
        assert_eq!(generate(&config), Err(TrainerError::InvalidGroupSize(0)));
    }
}
