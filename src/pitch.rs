//! # Pitch Model
//!
//! Natural pitches (step + octave) and their key-numbers.
//!
//! ## Key-number system
//! - Key-numbers follow the MIDI convention: middle C (C4) = 60
//! - `key = (octave + 1) * 12 + offset(step)`
//! - Offsets: C=0, D=2, E=4, F=5, G=7, A=9, B=11
//! - Only natural pitches are representable; there is no accidental field
//!
//! ## Example
//! ```rust
//! use sightread::{natural_pitches_in_range, Pitch, Step};
//!
//! assert_eq!(Pitch::new(Step::C, 4).key_number(), 60);
//!
//! let pool = natural_pitches_in_range(60, 62);
//! assert_eq!(pool, vec![Pitch::new(Step::C, 4), Pitch::new(Step::D, 4)]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::TrainerError;

/// Lowest octave enumerated when building a pitch pool.
pub const MIN_OCTAVE: i8 = 0;
/// Highest octave enumerated when building a pitch pool.
pub const MAX_OCTAVE: i8 = 8;

/// Natural note names C through B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Step {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// All seven steps in ascending order within an octave.
    pub const ALL: [Step; 7] = [
        Step::C,
        Step::D,
        Step::E,
        Step::F,
        Step::G,
        Step::A,
        Step::B,
    ];

    /// Semitones above C within the same octave.
    pub fn offset(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => 5,
            Step::G => 7,
            Step::A => 9,
            Step::B => 11,
        }
    }

    /// MusicXML `<step>` text
    pub fn as_str(self) -> &'static str {
        match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        }
    }

    fn from_offset(offset: i32) -> Option<Step> {
        Step::ALL.into_iter().find(|step| step.offset() == offset)
    }

    fn from_char(c: char) -> Option<Step> {
        match c.to_ascii_uppercase() {
            'C' => Some(Step::C),
            'D' => Some(Step::D),
            'E' => Some(Step::E),
            'F' => Some(Step::F),
            'G' => Some(Step::G),
            'A' => Some(Step::A),
            'B' => Some(Step::B),
            _ => None,
        }
    }
}

/// A natural pitch: step plus octave (middle C = octave 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub step: Step,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, octave: i8) -> Self {
        Self { step, octave }
    }

    /// Key-number of this pitch (C4 = 60).
    pub fn key_number(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.step.offset()
    }

    /// Inverse of [`Pitch::key_number`]. Returns `None` for black keys.
    pub fn from_key_number(key: u8) -> Option<Pitch> {
        let octave = (key / 12) as i8 - 1;
        let step = Step::from_offset((key % 12) as i32)?;
        Some(Pitch::new(step, octave))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.step.as_str(), self.octave)
    }
}

impl FromStr for Pitch {
    type Err = TrainerError;

    /// Parse names like `C4`, `g2` or `B-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || TrainerError::InvalidNoteName(s.to_string());

        let mut chars = trimmed.chars();
        let step = chars.next().and_then(Step::from_char).ok_or_else(invalid)?;
        let octave: i8 = chars.as_str().parse().map_err(|_| invalid())?;
        Ok(Pitch::new(step, octave))
    }
}

/// All natural pitches whose key-number lies in `[min_key, max_key]`,
/// ascending. Octaves 0 through 8 are enumerated; anything outside that
/// band, or any range holding only black keys, simply yields fewer entries.
pub fn natural_pitches_in_range(min_key: u8, max_key: u8) -> Vec<Pitch> {
    let (min, max) = (min_key as i32, max_key as i32);
    (MIN_OCTAVE..=MAX_OCTAVE)
        .flat_map(|octave| Step::ALL.into_iter().map(move |step| Pitch::new(step, octave)))
        .filter(|pitch| (min..=max).contains(&pitch.key_number()))
        .collect()
}

/// Display name of a key-number, e.g. `C4`. Black keys are spelled with a sharp.
pub fn key_name(key: u8) -> String {
    match Pitch::from_key_number(key) {
        Some(pitch) => pitch.to_string(),
        None => match Pitch::from_key_number(key.saturating_sub(1)) {
            Some(below) => format!("{}#{}", below.step.as_str(), below.octave),
            None => key.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_numbers() {
        assert_eq!(Pitch::new(Step::C, 4).key_number(), 60);
        assert_eq!(Pitch::new(Step::A, 4).key_number(), 69);
        assert_eq!(Pitch::new(Step::B, 3).key_number(), 59);
        assert_eq!(Pitch::new(Step::C, 0).key_number(), 12);
        assert_eq!(Pitch::new(Step::B, 8).key_number(), 119);
    }

    #[test]
    fn test_from_key_number() {
        assert_eq!(Pitch::from_key_number(60), Some(Pitch::new(Step::C, 4)));
        assert_eq!(Pitch::from_key_number(65), Some(Pitch::new(Step::F, 4)));
        assert_eq!(Pitch::from_key_number(61), None);
    }

    #[test]
    fn test_range_excludes_upper_neighbour() {
        let pool = natural_pitches_in_range(60, 62);
        assert_eq!(pool, vec![Pitch::new(Step::C, 4), Pitch::new(Step::D, 4)]);
    }

    #[test]
    fn test_black_key_range_is_empty() {
        assert!(natural_pitches_in_range(61, 61).is_empty());
        assert!(natural_pitches_in_range(70, 70).is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(natural_pitches_in_range(72, 60).is_empty());
    }

    #[test]
    fn test_range_outside_enumerated_octaves() {
        // C-1 (0) and C9 (120) are never enumerated
        assert!(natural_pitches_in_range(0, 11).is_empty());
        assert!(natural_pitches_in_range(120, 127).is_empty());
        assert_eq!(natural_pitches_in_range(0, 127).len(), 63);
    }

    #[test]
    fn test_range_is_ascending_and_repeatable() {
        let first = natural_pitches_in_range(48, 72);
        let second = natural_pitches_in_range(48, 72);
        assert_eq!(first, second);
        assert_eq!(first.len(), 15);
        assert!(first.windows(2).all(|w| w[0].key_number() < w[1].key_number()));
    }

    #[test]
    fn test_parse_note_names() {
        assert_eq!("C4".parse::<Pitch>(), Ok(Pitch::new(Step::C, 4)));
        assert_eq!(" g2 ".parse::<Pitch>(), Ok(Pitch::new(Step::G, 2)));
        assert_eq!("B-1".parse::<Pitch>(), Ok(Pitch::new(Step::B, -1)));
        assert!("H2".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name(60), "C4");
        assert_eq!(key_name(61), "C#4");
        assert_eq!(key_name(70), "A#4");
    }
}
