//! Per-session statistics fed by the trainer: accuracy, speed and the keys
//! the player missed most.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::session::{PressOutcome, ReleaseOutcome};

/// Entries kept in a session record's most-missed list
pub const MOST_MISSED_LIMIT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    correct: u32,
    wrong: u32,
    completed: usize,
    finished: bool,
    started_at: Option<Instant>,
    last_at: Option<Instant>,
    // Misses keyed by the key that was expected when the wrong press happened
    misses: BTreeMap<u8, u32>,
}

impl SessionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press outcome. `expected` is the key the session wanted at
    /// the moment of the press.
    pub fn record_press(&mut self, outcome: PressOutcome, expected: Option<u8>, at: Instant) {
        match outcome {
            PressOutcome::Correct => self.correct += 1,
            PressOutcome::Wrong => {
                self.wrong += 1;
                if let Some(key) = expected {
                    *self.misses.entry(key).or_insert(0) += 1;
                }
            }
            PressOutcome::Complete => return,
        }
        self.started_at.get_or_insert(at);
        self.last_at = Some(at);
    }

    pub fn record_release(&mut self, outcome: ReleaseOutcome, at: Instant) {
        match outcome {
            ReleaseOutcome::Advanced => self.completed += 1,
            ReleaseOutcome::Complete => {
                self.completed += 1;
                self.finished = true;
            }
            ReleaseOutcome::Idle => return,
        }
        self.last_at = Some(at);
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Share of correct presses, 0 to 100. A session with no presses is 100.
    pub fn accuracy(&self) -> f64 {
        let total = self.correct + self.wrong;
        if total == 0 {
            return 100.0;
        }
        self.correct as f64 / total as f64 * 100.0
    }

    /// Time from the first counted press to the latest counted event.
    pub fn duration(&self) -> Duration {
        match (self.started_at, self.last_at) {
            (Some(start), Some(last)) => last.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// Completed notes per minute.
    pub fn notes_per_minute(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.completed as f64 * 60.0 / secs
    }

    /// Up to [`MOST_MISSED_LIMIT`] `(key, misses)` pairs, most missed first,
    /// lower key first on ties.
    pub fn most_missed(&self) -> Vec<(u8, u32)> {
        let mut entries: Vec<(u8, u32)> = self.misses.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(MOST_MISSED_LIMIT);
        entries
    }
}
