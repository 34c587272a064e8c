//! Main-loop rig state

use heapless::Vec;

use crate::config::{DEFAULT_IF_FREQ, DFE_DIGITS, MEMORY_SLOTS};
use crate::display::DisplayLines;
use crate::error::Fault;
use crate::key::KeyMode;
use crate::memory::{CharRecorder, MemoryBuffer};
use crate::radio::Vfo;
use crate::types::{Band, Frequency, TuningStep};

use super::RigMode;

/// Direct frequency entry in progress
///
/// The frequency is entered in kHz, most significant digit first, so
/// `14060` is 14.060 MHz.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DfeEntry {
    digits: Vec<u8, DFE_DIGITS>,
    current: u8,
}

impl DfeEntry {
    /// Nothing entered
    #[must_use]
    pub const fn new() -> Self {
        Self {
            digits: Vec::new(),
            current: 0,
        }
    }

    /// Start over
    pub fn clear(&mut self) {
        self.digits.clear();
        self.current = 0;
    }

    /// Roll the current digit by `detents`, wrapping 9 to 0
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn turn(&mut self, detents: i8) {
        self.current = (i16::from(self.current) + i16::from(detents)).rem_euclid(10) as u8;
    }

    /// Accept the current digit; returns `true` once every digit is in
    pub fn accept(&mut self) -> bool {
        if self.digits.push(self.current).is_ok() {
            self.current = 0;
        }
        self.is_complete()
    }

    /// Every digit has been entered
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.digits.is_full()
    }

    /// Digits accepted so far
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Digit under the cursor
    #[must_use]
    pub const fn current(&self) -> u8 {
        self.current
    }

    /// Entered frequency, once complete
    #[must_use]
    pub fn frequency(&self) -> Option<Frequency> {
        if !self.is_complete() {
            return None;
        }
        let khz = self
            .digits
            .iter()
            .fold(0u32, |acc, &d| acc * 10 + u32::from(d));
        Frequency::from_khz(khz)
    }
}

/// Values the calibration sequence may change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalSnapshot {
    /// Reference correction
    pub correction: i32,
    /// IF
    pub if_freq: Frequency,
    /// VFO, including band
    pub vfo: Vfo,
}

/// Everything the main loop owns
#[derive(Clone, Debug)]
pub struct RigState {
    pub(crate) mode: RigMode,
    pub(crate) vfo: Vfo,
    pub(crate) key_mode: KeyMode,
    pub(crate) tune_mode_on: bool,
    pub(crate) beacon: bool,
    pub(crate) beacon_mark: u32,
    pub(crate) mem_tx_index: u8,
    pub(crate) mem_enter_index: u8,
    pub(crate) if_freq: Frequency,
    pub(crate) correction: i32,
    pub(crate) buffer: MemoryBuffer,
    pub(crate) recorder: CharRecorder,
    pub(crate) word_mark: Option<u32>,
    pub(crate) dfe: DfeEntry,
    pub(crate) pending_band: Band,
    pub(crate) saved_speed: u8,
    pub(crate) saved_cal: Option<CalSnapshot>,
    pub(crate) fault: Option<Fault>,
    pub(crate) display: DisplayLines,
}

impl RigState {
    /// State before settings are loaded
    #[must_use]
    pub fn new() -> Self {
        let vfo = Vfo::default();
        Self {
            mode: RigMode::Startup,
            vfo,
            key_mode: KeyMode::Iambic,
            tune_mode_on: false,
            beacon: false,
            beacon_mark: 0,
            mem_tx_index: 0,
            mem_enter_index: 0,
            if_freq: DEFAULT_IF_FREQ,
            correction: 0,
            buffer: MemoryBuffer::new(),
            recorder: CharRecorder::new(),
            word_mark: None,
            dfe: DfeEntry::new(),
            pending_band: vfo.band(),
            saved_speed: 0,
            saved_cal: None,
            fault: None,
            display: DisplayLines::default(),
        }
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> RigMode {
        self.mode
    }

    /// VFO
    #[must_use]
    pub const fn vfo(&self) -> &Vfo {
        &self.vfo
    }

    /// Current band
    #[must_use]
    pub const fn band(&self) -> Band {
        self.vfo.band()
    }

    /// Operating frequency
    #[must_use]
    pub const fn op_freq(&self) -> Frequency {
        self.vfo.op_freq()
    }

    /// Transmit frequency held while RIT is on
    #[must_use]
    pub const fn rit_tx_freq(&self) -> Frequency {
        self.vfo.rit_tx_freq()
    }

    /// RIT is on
    #[must_use]
    pub const fn rit(&self) -> bool {
        self.vfo.rit()
    }

    /// Frequency the transmitter uses
    #[must_use]
    pub const fn tx_freq(&self) -> Frequency {
        self.vfo.tx_freq()
    }

    /// Tuning step
    #[must_use]
    pub const fn tuning_step(&self) -> TuningStep {
        self.vfo.tuning_step()
    }

    /// Operator's keying mode, used in DEFAULT and KEYING
    #[must_use]
    pub const fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    /// Tune carrier is on
    #[must_use]
    pub const fn tune_mode_on(&self) -> bool {
        self.tune_mode_on
    }

    /// Beacon is on
    #[must_use]
    pub const fn beacon(&self) -> bool {
        self.beacon
    }

    /// Memory the beacon and memory send use
    #[must_use]
    pub const fn mem_tx_index(&self) -> u8 {
        self.mem_tx_index
    }

    /// Memory a recording goes into
    #[must_use]
    pub const fn mem_enter_index(&self) -> u8 {
        self.mem_enter_index
    }

    /// IF of the crystal filter
    #[must_use]
    pub const fn if_freq(&self) -> Frequency {
        self.if_freq
    }

    /// Reference correction
    #[must_use]
    pub const fn correction(&self) -> i32 {
        self.correction
    }

    /// Composition buffer
    #[must_use]
    pub const fn buffer(&self) -> &MemoryBuffer {
        &self.buffer
    }

    /// Band under the cursor while selecting
    #[must_use]
    pub const fn pending_band(&self) -> Band {
        self.pending_band
    }

    /// Direct frequency entry
    #[must_use]
    pub const fn dfe(&self) -> &DfeEntry {
        &self.dfe
    }

    /// Fault that put the rig into ERROR
    #[must_use]
    pub const fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Last composed screen
    #[must_use]
    pub const fn display(&self) -> &DisplayLines {
        &self.display
    }
}

impl Default for RigState {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot `index` moved by `detents`, wrapping over the slot count
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn step_slot(index: u8, detents: i8) -> u8 {
    (i16::from(index) + i16::from(detents)).rem_euclid(i16::from(MEMORY_SLOTS)) as u8
}
