//! # Error Types
//!
//! This module defines the error type shared by the trainer library.
//!
//! Only precondition violations and explicit storage calls produce errors.
//! Malformed device messages and stale events are dropped silently by the
//! decoder and the trainer, since physical keyboards emit that kind of noise
//! all the time.
//!
//! ## Error Types
//! - `InvalidRange` - The configured key range holds no natural pitch
//! - `InvalidNoteCount` / `InvalidGroupSize` - Zero-sized requests
//! - `InvalidNoteName` - A settings bound that is not a note name like `C4`
//! - `Settings` / `History` - Storage failures from the `try_*` calls
//!
//! ## Usage
//! ```rust
//! use sightread::{generate, Clef, GeneratorConfig, RangeConfig, TrainerError};
//!
//! let config = GeneratorConfig::new(RangeConfig::new(61, 61, Clef::Treble), 8, 1);
//! match generate(&config) {
//!     Ok(score) => println!("{} notes", score.expected_keys.len()),
//!     Err(TrainerError::InvalidRange { min_key, max_key }) => {
//!         eprintln!("No natural pitch between {} and {}", min_key, max_key);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainerError {
    /// The pitch pool for a range is empty.
    ///
    /// Occurs when `min_key > max_key` or when the range falls entirely
    /// between two natural pitches (e.g. 61..=61).
    ///
    /// # Example
    /// ```
    /// # use sightread::TrainerError;
    /// let err = TrainerError::InvalidRange { min_key: 61, max_key: 61 };
    /// assert_eq!(err.to_string(), "Invalid range 61..=61: no natural pitches");
    /// ```
    #[error("Invalid range {min_key}..={max_key}: no natural pitches")]
    InvalidRange { min_key: u8, max_key: u8 },

    /// A score was requested with zero notes.
    #[error("Invalid note count: {0} (must be at least 1)")]
    InvalidNoteCount(usize),

    /// A score was requested with zero notes per measure.
    #[error("Invalid group size: {0} (must be at least 1)")]
    InvalidGroupSize(usize),

    /// A note name that does not parse as a natural pitch.
    ///
    /// # Example
    /// ```
    /// # use sightread::TrainerError;
    /// let err = TrainerError::InvalidNoteName("H2".to_string());
    /// assert_eq!(err.to_string(), "Invalid note name: H2");
    /// ```
    #[error("Invalid note name: {0}")]
    InvalidNoteName(String),

    /// Reading or writing the settings file failed.
    #[error("Settings storage error: {0}")]
    Settings(String),

    /// Reading or appending the session history failed.
    #[error("History storage error: {0}")]
    History(String),
}
