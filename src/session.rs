//! # Session State Machine
//!
//! Matches press/release events against the expected key sequence.
//!
//! ## States
//! ```text
//!                 press(expected)              release(armed)
//! AwaitingInput ─────────────────▶ Armed ─────────────────▶ AwaitingInput (cursor + 1)
//!      │  ▲                          │                        or Complete (at the end)
//!      └──┘ press(other): Wrong      └──┐ press(any): Correct/Wrong, no change
//!                                    ▲──┘ release(other): Idle
//! ```
//!
//! The cursor only moves on the release of an armed key, so a correct note
//! takes a press and its matching release. Wrong presses are reported but
//! never move the cursor or displace the armed key.
//!
//! ## Epochs
//! Every [`Session::reset`] starts a new epoch. Callers that queue events
//! across a reset tag them with [`Session::epoch`] and drop the stale ones.

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Correct,
    Wrong,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Advanced,
    Complete,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput { cursor: usize },
    Armed { cursor: usize, key: u8 },
    Complete,
}

#[derive(Debug, Clone)]
pub struct Session {
    expected_keys: Vec<u8>,
    state: SessionState,
    epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Session {
    pub fn new(expected_keys: Vec<u8>) -> Self {
        let state = Self::initial_state(&expected_keys);
        Self {
            expected_keys,
            state,
            epoch: 0,
        }
    }

    /// Replace the expected sequence and start a new epoch. Any armed key
    /// from the previous sequence is discarded.
    pub fn reset(&mut self, expected_keys: Vec<u8>) {
        self.state = Self::initial_state(&expected_keys);
        self.expected_keys = expected_keys;
        self.epoch += 1;
    }

    fn initial_state(expected_keys: &[u8]) -> SessionState {
        if expected_keys.is_empty() {
            SessionState::Complete
        } else {
            SessionState::AwaitingInput { cursor: 0 }
        }
    }

    pub fn on_press(&mut self, key: u8) -> PressOutcome {
        match self.state {
            SessionState::Complete => PressOutcome::Complete,
            SessionState::Armed { key: armed, .. } => {
                if key == armed {
                    PressOutcome::Correct
                } else {
                    PressOutcome::Wrong
                }
            }
            SessionState::AwaitingInput { cursor } => {
                if self.expected_keys.get(cursor) == Some(&key) {
                    self.state = SessionState::Armed { cursor, key };
                    PressOutcome::Correct
                } else {
                    PressOutcome::Wrong
                }
            }
        }
    }

    pub fn on_release(&mut self, key: u8) -> ReleaseOutcome {
        match self.state {
            SessionState::Armed { cursor, key: armed } if key == armed => {
                let next = cursor + 1;
                if next >= self.expected_keys.len() {
                    self.state = SessionState::Complete;
                    info!("Session complete after {} notes", self.expected_keys.len());
                    ReleaseOutcome::Complete
                } else {
                    self.state = SessionState::AwaitingInput { cursor: next };
                    ReleaseOutcome::Advanced
                }
            }
            _ => ReleaseOutcome::Idle,
        }
    }

    /// Index of the next note to play; equals the sequence length once complete.
    pub fn cursor(&self) -> usize {
        match self.state {
            SessionState::AwaitingInput { cursor } | SessionState::Armed { cursor, .. } => cursor,
            SessionState::Complete => self.expected_keys.len(),
        }
    }

    pub fn armed_key(&self) -> Option<u8> {
        match self.state {
            SessionState::Armed { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The key the player should play next, if any.
    pub fn expected_key(&self) -> Option<u8> {
        match self.state {
            SessionState::Complete => None,
            _ => self.expected_keys.get(self.cursor()).copied(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn expected_keys(&self) -> &[u8] {
        &self.expected_keys
    }
}
