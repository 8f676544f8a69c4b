//! # Settings
//!
//! The persisted settings record, stored as YAML with kebab-case keys:
//!
//! ```yaml
//! range-low: C4
//! range-high: C5
//! total-notes: 20
//! device-id: ""
//! theme: light
//! clef: auto
//! updated-at: 1760000000
//! ```
//!
//! Storage is best-effort. [`Settings::load`] falls back to defaults and
//! [`Settings::save`] only logs on failure, so a missing or unwritable file
//! never changes what gets generated. The `try_*` variants surface the error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::generator::{GeneratorConfig, RangeConfig};
use crate::pitch::Pitch;
use crate::score::Clef;

pub const MIN_TOTAL_NOTES: usize = 4;
pub const MAX_TOTAL_NOTES: usize = 200;

/// With an automatic clef, ranges topping out below this key use the bass clef
const MIDDLE_C: u8 = 60;

const AUTO_CLEF: &str = "auto";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    pub range_low: String,
    pub range_high: String,
    pub total_notes: usize,
    pub device_id: String,
    pub theme: String,
    /// `treble`, `bass`, or `auto` to pick from the range
    pub clef: String,
    /// Unix seconds of the last save
    pub updated_at: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            range_low: "C4".to_string(),
            range_high: "C5".to_string(),
            total_notes: 20,
            device_id: String::new(),
            theme: "light".to_string(),
            clef: AUTO_CLEF.to_string(),
            updated_at: 0,
        }
    }
}

pub fn clamp_total_notes(total_notes: usize) -> usize {
    total_notes.clamp(MIN_TOTAL_NOTES, MAX_TOTAL_NOTES)
}

impl Settings {
    pub fn set_total_notes(&mut self, total_notes: usize) {
        self.total_notes = clamp_total_notes(total_notes);
    }

    /// Parse the range bounds. Bounds given high-to-low are swapped.
    pub fn range_config(&self) -> Result<RangeConfig, TrainerError> {
        let low = parse_key(&self.range_low)?;
        let high = parse_key(&self.range_high)?;
        let (min_key, max_key) = if low <= high { (low, high) } else { (high, low) };
        let clef = match self.clef.trim() {
            "" | AUTO_CLEF if max_key < MIDDLE_C => Clef::Bass,
            "" | AUTO_CLEF => Clef::Treble,
            name => Clef::from_name(name)
                .ok_or_else(|| TrainerError::Settings(format!("Unknown clef: {}", name)))?,
        };
        Ok(RangeConfig::new(min_key, max_key, clef))
    }

    pub fn generator_config(&self, seed: u32) -> Result<GeneratorConfig, TrainerError> {
        Ok(GeneratorConfig::new(
            self.range_config()?,
            clamp_total_notes(self.total_notes),
            seed,
        ))
    }

    pub fn from_yaml(content: &str) -> Result<Self, TrainerError> {
        let mut settings: Settings =
            serde_yaml::from_str(content).map_err(|e| TrainerError::Settings(e.to_string()))?;
        settings.total_notes = clamp_total_notes(settings.total_notes);
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String, TrainerError> {
        serde_yaml::to_string(self).map_err(|e| TrainerError::Settings(e.to_string()))
    }

    pub fn try_load(path: &Path) -> Result<Self, TrainerError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TrainerError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Load settings, falling back to defaults when the file is missing or broken.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    warn!("Ignoring unreadable settings: {}", e);
                }
                Self::default()
            }
        }
    }

    /// Stamp `updated_at` and write the file, creating parent directories.
    pub fn try_save(&mut self, path: &Path) -> Result<(), TrainerError> {
        self.updated_at = unix_now();
        let yaml = self.to_yaml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TrainerError::Settings(e.to_string()))?;
        }
        fs::write(path, yaml)
            .map_err(|e| TrainerError::Settings(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&mut self, path: &Path) {
        if let Err(e) = self.try_save(path) {
            warn!("Settings not saved: {}", e);
        }
    }

    pub fn default_path() -> PathBuf {
        config_dir().join("settings.yaml")
    }
}

fn parse_key(name: &str) -> Result<u8, TrainerError> {
    let pitch: Pitch = name.parse()?;
    u8::try_from(pitch.key_number())
        .ok()
        .filter(|key| *key <= 127)
        .ok_or_else(|| TrainerError::InvalidNoteName(name.to_string()))
}

pub(crate) fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("sightread"))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
