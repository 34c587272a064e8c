//! System configuration and hardware constants
//!
//! Compile-time constants for the rig: tick rate, keying speed limits,
//! memory geometry, the EEPROM layout and user-interface timings. Runtime
//! options that the operator may change live in [`RigOptions`].

use crate::key::SqueezeStart;
use crate::morse::Unrecognized;
use crate::types::{Band, Frequency};

/// Tick rate of the scheduler; one tick is one millisecond
pub const TICK_HZ: u32 = 1000;

/// Length of one dot at 1 WPM in ticks (PARIS timing)
pub const DOT_TICKS_AT_1WPM: u32 = 1200 * TICK_HZ / 1000;

/// Keying speed after an EEPROM erase
pub const WPM_DEFAULT: u8 = 20;

/// Slowest accepted keying speed
pub const KEY_MIN_SPEED: u8 = 5;

/// Fastest accepted keying speed
pub const KEY_MAX_SPEED: u8 = 30;

/// Bytes per message memory, including the terminator
pub const MEMORY_LENGTH: usize = 64;

/// Number of message memories
pub const MEMORY_SLOTS: u8 = 4;

/// Total size of the settings EEPROM in bytes
pub const EEPROM_SIZE: usize = 512;

/// Beacon repeat interval in dot times
pub const BEACON_INTERVAL: u32 = 15;

/// Tuning step sizes in frequency units (10 Hz, 100 Hz, 1 kHz, 10 kHz)
pub const TUNING_STEPS: [u32; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Default band after an EEPROM erase
pub const DEFAULT_BAND: Band = Band::M20;

/// Default intermediate frequency of the crystal filter (4.9152 MHz)
pub const DEFAULT_IF_FREQ: Frequency = Frequency::from_units(491_520_000);

/// Lowest IF accepted from storage or calibration
pub const IF_FREQ_MIN: Frequency = Frequency::from_units(100_000_000);

/// Highest IF accepted from storage or calibration
pub const IF_FREQ_MAX: Frequency = Frequency::from_units(2_000_000_000);

/// Largest calibration correction accepted, in synthesizer units
pub const CAL_CORRECTION_LIMIT: i32 = 1_000_000;

/// Calibration correction step per encoder detent
pub const CAL_CORRECTION_STEP: i32 = 100;

/// IF adjustment step per encoder detent (10 Hz)
pub const CAL_IF_STEP: u32 = 1_000;

/// Number of kHz digits entered in direct frequency entry
pub const DFE_DIGITS: usize = 5;

/// Consecutive identical samples before a paddle change is accepted
pub const PADDLE_DEBOUNCE_TICKS: u8 = 3;

/// Consecutive identical samples before a button change is accepted
pub const BUTTON_DEBOUNCE_TICKS: u8 = 20;

/// RIT hold time that erases the EEPROM
pub const ERASE_HOLD_TICKS: u32 = 8 * TICK_HZ;

/// RIT hold time before the erase progress bar appears
pub const ERASE_PROGRESS_TICKS: u32 = TICK_HZ;

/// Keyer-button hold time per menu entry
pub const MENU_STEP_TICKS: u32 = 750;

/// Silence after a character, in dot times, that records a word space
pub const WORD_SPACE_DOTS: u32 = 4;

/// Blink period mask for the display; the visible half is the lower one
pub const BLINK_PERIOD_MASK: u32 = 0x1FF;

/// Capacity of the tick-to-main-loop key event queue
pub const KEY_EVENT_QUEUE: usize = 16;

/// Capacity of the button event queue
pub const BUTTON_EVENT_QUEUE: usize = 8;

/// Follow-up events the state machine may raise while handling one event
pub const RIG_EVENT_QUEUE: usize = 8;

/// How long a feedback message stays before the screen is redrawn
pub const FEEDBACK_TICKS: u32 = 1500;

/// I2C bus frequency for the EEPROM, synthesizer and display
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// `Si5351A` I2C address
pub const SI5351_I2C_ADDR: u8 = 0x60;

/// `Si5351A` crystal frequency (25 MHz standard)
pub const SI5351_XTAL_FREQ: u32 = 25_000_000;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// 24LC04-style EEPROM I2C address
pub const EEPROM_I2C_ADDR: u8 = 0x50;

/// EEPROM page size for writes
pub const EEPROM_PAGE_SIZE: usize = 16;

/// Byte offsets of the persisted settings
pub mod eeprom {
    //! EEPROM layout

    /// IF frequency, 4 bytes little endian
    pub const IF_FREQ: usize = 0;

    /// Band index, 1 byte
    pub const BAND: usize = 6;

    /// Keying speed in WPM, 1 byte
    pub const CW_SPEED: usize = 7;

    /// Calibration correction, 4 bytes little endian
    pub const CAL_VALUE: usize = 8;

    /// First message memory
    pub const MEMORY_START: usize = 16;
}

/// Runtime options
///
/// Defaults follow the cargo features the firmware was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RigOptions {
    /// Holding RIT for [`ERASE_HOLD_TICKS`] erases the EEPROM
    pub erase_eeprom: bool,
    /// Send cut numbers for digits during playback
    pub obscure_abbreviations: bool,
    /// Which element a simultaneous squeeze starts with
    pub squeeze_start: SqueezeStart,
    /// What playback does with characters that have no Morse pattern
    pub unrecognized: Unrecognized,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            erase_eeprom: cfg!(feature = "erase-eeprom"),
            obscure_abbreviations: cfg!(feature = "obscure-abbreviations"),
            squeeze_start: SqueezeStart::default(),
            unrecognized: Unrecognized::default(),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RigOptions {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RigOptions(erase={}, cut={}, {}, {})",
            self.erase_eeprom,
            self.obscure_abbreviations,
            self.squeeze_start,
            self.unrecognized
        );
    }
}

