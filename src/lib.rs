pub mod decoder;
pub mod error;
pub mod generator;
pub mod history;
pub mod musicxml;
pub mod pitch;
pub mod rng;
pub mod score;
pub mod session;
pub mod settings;
pub mod summary;
pub mod trainer;

pub use decoder::{DeviceEvent, InputDecoder, RawMessage};
pub use error::*;
pub use generator::{generate, GeneratedScore, GeneratorConfig, RangeConfig};
pub use history::{History, MissedNote, SessionRecord};
pub use musicxml::to_musicxml;
pub use pitch::{key_name, natural_pitches_in_range, Pitch, Step};
pub use rng::Mulberry32;
pub use score::Clef;
pub use session::{PressOutcome, ReleaseOutcome, Session, SessionState};
pub use settings::Settings;
pub use summary::SessionSummary;
pub use trainer::{CursorHighlight, EventSender, Feedback, Outcome, Trainer, TrainerEvent, TrainerUpdate};

/// Generate the exercise described by `settings` for `seed`.
/// This is the main entry point for the library.
pub fn generate_from_settings(settings: &Settings, seed: u32) -> Result<GeneratedScore, TrainerError> {
    generate(&settings.generator_config(seed)?)
}
