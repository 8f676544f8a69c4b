//! Append-only log of finished sessions, one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::generator::RangeConfig;
use crate::pitch::key_name;
use crate::settings::{config_dir, unix_now};
use crate::summary::SessionSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedNote {
    pub note: String,
    pub count: u32,
}

/// One finished session. Written once, never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub label: String,
    /// Unix seconds when the record was created
    pub timestamp: u64,
    pub duration_ms: u64,
    pub accuracy: f64,
    pub notes_per_minute: f64,
    pub most_missed: Vec<MissedNote>,
    pub range_low: String,
    pub range_high: String,
    pub total_notes: usize,
    pub seed: u32,
}

impl SessionRecord {
    pub fn from_summary(
        summary: &SessionSummary,
        range: &RangeConfig,
        total_notes: usize,
        seed: u32,
    ) -> Self {
        let timestamp = unix_now();
        let range_low = key_name(range.min_key);
        let range_high = key_name(range.max_key);

        Self {
            id: format!("{}-{:08x}", timestamp, seed),
            label: format!("{}-{}, {} notes", range_low, range_high, total_notes),
            timestamp,
            duration_ms: summary.duration().as_millis() as u64,
            accuracy: summary.accuracy(),
            notes_per_minute: summary.notes_per_minute(),
            most_missed: summary
                .most_missed()
                .into_iter()
                .map(|(key, count)| MissedNote {
                    note: key_name(key),
                    count,
                })
                .collect(),
            range_low,
            range_high,
            total_notes,
            seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        config_dir().join("history.jsonl")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_append(&self, record: &SessionRecord) -> Result<(), TrainerError> {
        let to_err = |e: std::io::Error| {
            TrainerError::History(format!("{}: {}", self.path.display(), e))
        };
        let line = serde_json::to_string(record)
            .map_err(|e| TrainerError::History(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(to_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_err)?;
        writeln!(file, "{}", line).map_err(to_err)
    }

    /// Append a record, logging instead of failing.
    pub fn append(&self, record: &SessionRecord) {
        if let Err(e) = self.try_append(record) {
            warn!("Session not recorded: {}", e);
        }
    }

    /// All readable records, oldest first. Unparseable lines are skipped.
    pub fn load(&self) -> Vec<SessionRecord> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping history entry: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Clef;
    use crate::session::PressOutcome;
    use std::time::Instant;

    fn record(seed: u32) -> SessionRecord {
        let mut summary = SessionSummary::new();
        let now = Instant::now();
        summary.record_press(PressOutcome::Wrong, Some(64), now);
        summary.record_press(PressOutcome::Correct, Some(64), now);
        SessionRecord::from_summary(&summary, &RangeConfig::new(60, 72, Clef::Treble), 20, seed)
    }

    #[test]
    fn test_record_fields() {
        let record = record(7);
        assert_eq!(record.label, "C4-C5, 20 notes");
        assert_eq!(record.accuracy, 50.0);
        assert_eq!(
            record.most_missed,
            vec![MissedNote {
                note: "E4".to_string(),
                count: 1
            }]
        );
        assert!(record.id.ends_with("-00000007"));
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("history.jsonl"));
        assert!(history.load().is_empty());

        history.try_append(&record(1)).unwrap();
        history.try_append(&record(2)).unwrap();

        let loaded = history.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].seed, 1);
        assert_eq!(loaded[1].seed, 2);
    }

    #[test]
    fn test_load_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("history.jsonl"));
        history.try_append(&record(3)).unwrap();
        let mut file = OpenOptions::new().append(true).open(history.path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        history.try_append(&record(4)).unwrap();

        let seeds: Vec<u32> = history.load().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![3, 4]);
    }
}
