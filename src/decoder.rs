//! # Input Decoder
//!
//! Turns raw 3-byte device messages into discrete key events.
//!
//! ## Message classes
//! - Status `0x9n` with velocity > 0: press
//! - Status `0x9n` with velocity 0: release (running-status convention)
//! - Status `0x8n`: release
//! - Anything else, or fewer than 3 bytes: dropped without error
//!
//! ## Held keys
//! The decoder tracks which keys are down. A repeated press for a key that
//! is already held is swallowed, and the release that empties the held set
//! is followed by a single [`DeviceEvent::AllReleased`].
//!
//! ## Example
//! ```rust
//! use sightread::{DeviceEvent, InputDecoder};
//!
//! let mut decoder = InputDecoder::new();
//! assert_eq!(decoder.decode(&[0x90, 60, 64]), vec![DeviceEvent::Press { key: 60, velocity: 64 }]);
//! assert!(decoder.decode(&[0x90, 60, 64]).is_empty());
//! assert_eq!(
//!     decoder.decode(&[0x90, 60, 0]),
//!     vec![DeviceEvent::Release { key: 60 }, DeviceEvent::AllReleased]
//! );
//! ```

use std::collections::BTreeSet;

use log::debug;

const NOTE_OFF: u8 = 0x8;
const NOTE_ON: u8 = 0x9;

/// A decoded key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    Press { key: u8, velocity: u8 },
    Release { key: u8 },
    /// The last held key went up
    AllReleased,
}

/// Classification of one raw message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMessage {
    Press { key: u8, velocity: u8 },
    Release { key: u8 },
}

impl RawMessage {
    /// Classify raw bytes. Returns `None` for short or unrecognized messages.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let [status, key, velocity] = match bytes {
            [status, key, velocity, ..] => [*status, *key, *velocity],
            _ => return None,
        };

        match status >> 4 {
            NOTE_ON if velocity > 0 => Some(RawMessage::Press { key, velocity }),
            NOTE_ON | NOTE_OFF => Some(RawMessage::Release { key }),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputDecoder {
    held: BTreeSet<u8>,
    closed: bool,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one raw message into zero, one or two events.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<DeviceEvent> {
        if self.closed {
            return Vec::new();
        }

        let Some(message) = RawMessage::parse(bytes) else {
            debug!("Dropping device message {:02X?}", bytes);
            return Vec::new();
        };

        match message {
            RawMessage::Press { key, velocity } => {
                if self.held.insert(key) {
                    vec![DeviceEvent::Press { key, velocity }]
                } else {
                    Vec::new()
                }
            }
            RawMessage::Release { key } => {
                let was_held = !self.held.is_empty();
                self.held.remove(&key);
                let mut events = vec![DeviceEvent::Release { key }];
                if was_held && self.held.is_empty() {
                    events.push(DeviceEvent::AllReleased);
                }
                events
            }
        }
    }

    /// Keys currently down, ascending.
    pub fn held_keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.held.iter().copied()
    }

    pub fn is_held(&self, key: u8) -> bool {
        self.held.contains(&key)
    }

    /// Forget held keys and stop emitting. No release events are synthesized.
    pub fn teardown(&mut self) {
        self.held.clear();
        self.closed = true;
    }

    /// Resume decoding after a teardown with an empty held set.
    pub fn reopen(&mut self) {
        self.held.clear();
        self.closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
