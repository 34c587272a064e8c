//! Host-side simulation harness
//!
//! Recording collaborators plus a [`Bench`] that plays the tick handler
//! and the main loop by hand: every simulated millisecond is one
//! `SharedState::tick` followed by one `Rig::poll`. Line levels are staged
//! the way the edge interrupts would stage them.

use std::string::String;
use std::vec::Vec;

use crate::config::{RigOptions, BUTTON_DEBOUNCE_TICKS, EEPROM_SIZE};
use crate::display::{Display, DisplayLines};
use crate::inputs::Line;
use crate::radio::{Synthesizer, Transmitter};
use crate::rig::{Rig, RigMode};
use crate::storage::{RamStorage, Storage, StorageError};
use crate::tick::SharedState;
use crate::types::Frequency;

/// Display that keeps everything it was asked to show
#[derive(Clone, Debug, Default)]
pub struct RecordingDisplay {
    /// Feedback messages, oldest first
    pub feedback: Vec<String>,
    /// Questions, oldest first
    pub questions: Vec<String>,
    /// Progress bar on screen, as `(value, min, max)`
    pub progress: Option<(i16, i16, i16)>,
    /// Last rendered lines
    pub lines: Option<DisplayLines>,
    /// Number of renders
    pub renders: usize,
}

impl RecordingDisplay {
    /// Most recent feedback message
    #[must_use]
    pub fn last_feedback(&self) -> Option<&str> {
        self.feedback.last().map(String::as_str)
    }

    /// Top line of the last render
    #[must_use]
    pub fn line_1(&self) -> &str {
        self.lines.as_ref().map_or("", |l| l.line_1.as_str())
    }

    /// Bottom line of the last render
    #[must_use]
    pub fn line_2(&self) -> &str {
        self.lines.as_ref().map_or("", |l| l.line_2.as_str())
    }
}

impl Display for RecordingDisplay {
    fn feedback(&mut self, text: &str) {
        self.feedback.push(text.into());
    }

    fn question(&mut self, text: &str) {
        self.questions.push(text.into());
    }

    fn progress(&mut self, value: i16, min: i16, max: i16) {
        self.progress = Some((value, min, max));
    }

    fn clear_progress(&mut self) {
        self.progress = None;
    }

    fn render(&mut self, lines: &DisplayLines, _blink_on: bool) {
        self.lines = Some(lines.clone());
        self.renders += 1;
    }
}

/// One call made on a [`RecordingTransmitter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxCall {
    /// `enable_sidetone`
    SidetoneOn,
    /// `disable_sidetone`
    SidetoneOff,
    /// `enable_tx`
    TxOn,
    /// `disable_tx`
    TxOff,
    /// `set_mute`
    Mute(bool),
}

/// Transmitter that logs its calls and tracks its outputs
#[derive(Clone, Debug, Default)]
pub struct RecordingTransmitter {
    /// Sidetone running
    pub sidetone: bool,
    /// Transmitter keyed
    pub tx: bool,
    /// Receiver muted
    pub muted: bool,
    /// Every call, oldest first
    pub calls: Vec<TxCall>,
}

impl RecordingTransmitter {
    /// How many times the transmitter was keyed
    #[must_use]
    pub fn tx_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == TxCall::TxOn).count()
    }

    /// How many times the sidetone was started
    #[must_use]
    pub fn sidetone_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == TxCall::SidetoneOn).count()
    }
}

impl Transmitter for RecordingTransmitter {
    fn enable_sidetone(&mut self) {
        self.sidetone = true;
        self.calls.push(TxCall::SidetoneOn);
    }

    fn disable_sidetone(&mut self) {
        self.sidetone = false;
        self.calls.push(TxCall::SidetoneOff);
    }

    fn enable_tx(&mut self) {
        self.tx = true;
        self.calls.push(TxCall::TxOn);
    }

    fn disable_tx(&mut self) {
        self.tx = false;
        self.calls.push(TxCall::TxOff);
    }

    fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
        self.calls.push(TxCall::Mute(muted));
    }
}

/// Synthesizer that remembers what it was programmed with
#[derive(Clone, Debug, Default)]
pub struct RecordingSynthesizer {
    /// Last frequency and whether it was for transmit
    pub tuned: Option<(Frequency, bool)>,
    /// Last calibration
    pub calibration: Option<(i32, Frequency)>,
    /// Every frequency set, oldest first
    pub history: Vec<(Frequency, bool)>,
}

impl Synthesizer for RecordingSynthesizer {
    fn set_frequency(&mut self, freq: Frequency, transmit: bool) {
        self.tuned = Some((freq, transmit));
        self.history.push((freq, transmit));
    }

    fn set_calibration(&mut self, correction: i32, if_freq: Frequency) {
        self.calibration = Some((correction, if_freq));
    }
}

/// Store whose every access fails
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingStorage;

impl Storage for FailingStorage {
    fn read(&mut self, _offset: usize, _buf: &mut [u8]) -> Result<(), StorageError> {
        Err(StorageError::Device)
    }

    fn write(&mut self, _offset: usize, _data: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Device)
    }

    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }
}

/// Rig wired to recording collaborators
pub type SimRig<S = RamStorage<EEPROM_SIZE>> =
    Rig<'static, RecordingDisplay, S, RecordingTransmitter, RecordingSynthesizer>;

/// Discrete-time test bench
pub struct Bench<S: Storage = RamStorage<EEPROM_SIZE>> {
    /// Shared tick context
    pub shared: &'static SharedState,
    /// The rig under test
    pub rig: SimRig<S>,
}

impl Bench {
    /// Started rig on an erased store with default options
    #[must_use]
    pub fn new() -> Self {
        Self::with(RamStorage::new(), RigOptions::default())
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> Bench<S> {
    /// Started rig on `storage` with `options`
    #[must_use]
    pub fn with(storage: S, options: RigOptions) -> Self {
        let shared: &'static SharedState = Box::leak(Box::new(SharedState::new()));
        let mut rig = Rig::new(
            shared,
            RecordingDisplay::default(),
            storage,
            RecordingTransmitter::default(),
            RecordingSynthesizer::default(),
            options,
        );
        rig.start();
        rig.poll();
        Self { shared, rig }
    }

    /// Active mode
    #[must_use]
    pub fn mode(&self) -> RigMode {
        self.rig.mode()
    }

    /// Advance `ticks` milliseconds
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.shared.tick();
            self.rig.poll();
        }
    }

    /// Run until `done` holds or `limit` ticks pass; returns ticks run
    pub fn run_until(&mut self, limit: u32, mut done: impl FnMut(&Self) -> bool) -> Option<u32> {
        for n in 0..limit {
            if done(self) {
                return Some(n);
            }
            self.run(1);
        }
        done(self).then_some(limit)
    }

    /// Stage a raw line level
    pub fn set(&mut self, line: Line, pressed: bool) {
        self.shared.stage_line(line, pressed);
    }

    /// Hold a button for `ticks`, then release it and let it settle
    pub fn hold(&mut self, line: Line, ticks: u32) {
        self.set(line, true);
        self.run(ticks);
        self.set(line, false);
        self.run(u32::from(BUTTON_DEBOUNCE_TICKS) + 2);
    }

    /// Short press of a button
    pub fn tap(&mut self, line: Line) {
        self.hold(line, u32::from(BUTTON_DEBOUNCE_TICKS) + 30);
    }

    /// Keyer button held long enough to select menu entry `index`
    pub fn menu(&mut self, index: u32) {
        let held = index * crate::config::MENU_STEP_TICKS + 100;
        self.hold(Line::Keyer, held);
    }

    /// Turn the encoder by `detents`, positive clockwise
    pub fn turn(&mut self, detents: i8) {
        for _ in 0..detents.unsigned_abs() {
            self.set(Line::EncoderData, detents > 0);
            self.set(Line::EncoderClock, true);
            self.run(2);
            self.set(Line::EncoderClock, false);
            self.run(2);
        }
        self.set(Line::EncoderData, false);
    }

    /// Stage both paddles
    pub fn paddles(&mut self, dot: bool, dash: bool) {
        self.set(Line::Dot, dot);
        self.set(Line::Dash, dash);
    }
}
