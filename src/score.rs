//! # Score Types
//!
//! The in-memory shape of a generated exercise before it is serialized.
//!
//! ## Type Hierarchy
//! ```text
//! Score
//!   ├── title: String
//!   ├── clef: Clef (treble | bass)
//!   ├── time_signature: TimeSignature (beats / beat_type)
//!   └── Vec<Measure>
//!         └── Vec<Element> (Note(Pitch) | Rest)
//! ```
//!
//! Every element is a quarter note or quarter rest. Rests only pad the
//! final measure when the note count does not divide evenly into groups.

use crate::pitch::Pitch;

/// Clef declared in the first measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clef {
    #[default]
    Treble,
    Bass,
}

impl Clef {
    /// MusicXML `(sign, line)` pair
    pub fn sign_and_line(self) -> (&'static str, u8) {
        match self {
            Clef::Treble => ("G", 2),
            Clef::Bass => ("F", 4),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        }
    }

    /// Parse "treble" or "bass", ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "treble" => Some(Clef::Treble),
            "bass" => Some(Clef::Bass),
            _ => None,
        }
    }
}

/// Time signature (e.g., 4/4, 3/4)
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignature {
    pub beats: usize,
    pub beat_type: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_type: 4,
        }
    }
}

/// A quarter-note slot in a measure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    Note(Pitch),
    Rest,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measure {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Score {
    pub title: String,
    pub clef: Clef,
    pub time_signature: TimeSignature,
    pub measures: Vec<Measure>,
}
