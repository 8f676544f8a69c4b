//! # Trainer
//!
//! Ties the generator, decoder, session and summary together behind one
//! ordered event queue.
//!
//! ## Event flow
//! ```text
//! device callback ──EventSender──┐
//!                                ├──▶ mpsc queue ──▶ Trainer::pump ──▶ Vec<TrainerUpdate>
//! settings change ──EventSender──┘
//! ```
//!
//! Device messages are stamped with the session epoch current when they were
//! sent. A regeneration resets the session and bumps the epoch, so messages
//! still queued from the previous exercise are dropped instead of being
//! matched against the new one.
//!
//! ## Example
//! ```rust
//! use sightread::{Clef, GeneratorConfig, RangeConfig, Trainer, TrainerUpdate};
//!
//! let config = GeneratorConfig::new(RangeConfig::new(60, 60, Clef::Treble), 4, 0);
//! let mut trainer = Trainer::new(config)?;
//! let sender = trainer.sender();
//! sender.send_device(&[0x90, 60, 80]);
//! sender.send_device(&[0x80, 60, 0]);
//!
//! let updates = trainer.pump();
//! assert!(matches!(updates[0], TrainerUpdate::Feedback(_)));
//! assert_eq!(trainer.session().cursor(), 1);
//! # Ok::<(), sightread::TrainerError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::decoder::{DeviceEvent, InputDecoder};
use crate::error::TrainerError;
use crate::generator::{generate, GeneratedScore, GeneratorConfig};
use crate::history::SessionRecord;
use crate::session::{PressOutcome, ReleaseOutcome, Session};
use crate::summary::SessionSummary;

/// Queued input for the trainer
#[derive(Debug, Clone)]
pub enum TrainerEvent {
    /// Raw device bytes, tagged with the epoch they were sent in
    Device { epoch: u64, bytes: Vec<u8> },
    Regenerate(GeneratorConfig),
}

/// Cheap, cloneable handle for feeding the queue from callbacks
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<TrainerEvent>,
    epoch: Arc<AtomicU64>,
}

impl EventSender {
    /// Queue a raw device message. Returns `false` once the trainer is gone.
    pub fn send_device(&self, bytes: &[u8]) -> bool {
        let epoch = self.epoch.load(Ordering::Acquire);
        self.tx
            .send(TrainerEvent::Device {
                epoch,
                bytes: bytes.to_vec(),
            })
            .is_ok()
    }

    pub fn send_regenerate(&self, config: GeneratorConfig) -> bool {
        self.tx.send(TrainerEvent::Regenerate(config)).is_ok()
    }
}

/// Instruction for the score renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHighlight {
    /// Note at this index was pressed correctly
    Correct(usize),
    /// A wrong key was pressed while this index was current
    Wrong(usize),
    /// Cursor moved to this index
    Move(usize),
    /// Last note finished
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Press(PressOutcome),
    Release(ReleaseOutcome),
    AllReleased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub event: DeviceEvent,
    pub outcome: Outcome,
    pub highlight: Option<CursorHighlight>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainerUpdate {
    Feedback(Feedback),
    Regenerated { epoch: u64, total_notes: usize },
    RegenerateFailed(TrainerError),
}

pub struct Trainer {
    config: GeneratorConfig,
    score: GeneratedScore,
    decoder: InputDecoder,
    session: Session,
    summary: SessionSummary,
    epoch: Arc<AtomicU64>,
    tx: Sender<TrainerEvent>,
    rx: Receiver<TrainerEvent>,
}

impl Trainer {
    /// Generate the first exercise and start a session on it.
    pub fn new(config: GeneratorConfig) -> Result<Self, TrainerError> {
        let score = generate(&config)?;
        let session = Session::new(score.expected_keys.clone());
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            config,
            score,
            decoder: InputDecoder::new(),
            epoch: Arc::new(AtomicU64::new(session.epoch())),
            session,
            summary: SessionSummary::new(),
            tx,
            rx,
        })
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
            epoch: Arc::clone(&self.epoch),
        }
    }

    /// Replace the exercise. On failure the current one stays in place.
    pub fn regenerate(&mut self, config: GeneratorConfig) -> Result<&GeneratedScore, TrainerError> {
        let score = generate(&config)?;
        self.session.reset(score.expected_keys.clone());
        self.epoch.store(self.session.epoch(), Ordering::Release);
        self.summary = SessionSummary::new();
        self.score = score;
        self.config = config;
        info!("Started epoch {}", self.session.epoch());
        Ok(&self.score)
    }

    /// Drain and process every queued event, in order.
    pub fn pump(&mut self) -> Vec<TrainerUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            self.process(event, Instant::now(), &mut updates);
        }
        updates
    }

    fn process(&mut self, event: TrainerEvent, at: Instant, updates: &mut Vec<TrainerUpdate>) {
        match event {
            TrainerEvent::Device { epoch, bytes } => {
                if epoch < self.session.epoch() {
                    // Still decoded so the held set tracks the keyboard
                    let dropped = self.decoder.decode(&bytes);
                    debug!("Dropping {} stale events from epoch {}", dropped.len(), epoch);
                    return;
                }
                updates.extend(
                    self.handle_message_at(&bytes, at)
                        .into_iter()
                        .map(TrainerUpdate::Feedback),
                );
            }
            TrainerEvent::Regenerate(config) => {
                let update = match self.regenerate(config) {
                    Ok(score) => {
                        let total_notes = score.expected_keys.len();
                        TrainerUpdate::Regenerated {
                            epoch: self.session.epoch(),
                            total_notes,
                        }
                    }
                    Err(e) => TrainerUpdate::RegenerateFailed(e),
                };
                updates.push(update);
            }
        }
    }

    /// Decode and match one raw message immediately, bypassing the queue.
    pub fn handle_message(&mut self, bytes: &[u8]) -> Vec<Feedback> {
        self.handle_message_at(bytes, Instant::now())
    }

    pub fn handle_message_at(&mut self, bytes: &[u8], at: Instant) -> Vec<Feedback> {
        self.decoder
            .decode(bytes)
            .into_iter()
            .map(|event| self.apply(event, at))
            .collect()
    }

    fn apply(&mut self, event: DeviceEvent, at: Instant) -> Feedback {
        let (outcome, highlight) = match event {
            DeviceEvent::Press { key, .. } => {
                let cursor = self.session.cursor();
                let expected = self.session.expected_key();
                let outcome = self.session.on_press(key);
                self.summary.record_press(outcome, expected, at);
                let highlight = match outcome {
                    PressOutcome::Correct => Some(CursorHighlight::Correct(cursor)),
                    PressOutcome::Wrong => Some(CursorHighlight::Wrong(cursor)),
                    PressOutcome::Complete => None,
                };
                (Outcome::Press(outcome), highlight)
            }
            DeviceEvent::Release { key } => {
                let outcome = self.session.on_release(key);
                self.summary.record_release(outcome, at);
                let highlight = match outcome {
                    ReleaseOutcome::Advanced => Some(CursorHighlight::Move(self.session.cursor())),
                    ReleaseOutcome::Complete => Some(CursorHighlight::Done),
                    ReleaseOutcome::Idle => None,
                };
                (Outcome::Release(outcome), highlight)
            }
            DeviceEvent::AllReleased => (Outcome::AllReleased, None),
        };
        Feedback {
            event,
            outcome,
            highlight,
        }
    }

    /// Stop decoding device input. Held keys are forgotten silently.
    pub fn disconnect(&mut self) {
        self.decoder.teardown();
    }

    pub fn reconnect(&mut self) {
        self.decoder.reopen();
    }

    /// History record for the current exercise, once it is finished.
    pub fn finished_record(&self) -> Option<SessionRecord> {
        if !self.summary.is_finished() {
            return None;
        }
        Some(SessionRecord::from_summary(
            &self.summary,
            &self.config.range,
            self.config.total_notes,
            self.config.seed,
        ))
    }

    pub fn score(&self) -> &GeneratedScore {
        &self.score
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn decoder(&self) -> &InputDecoder {
        &self.decoder
    }
}
