//! Shared types used across the rig firmware
//!
//! Domain types that carry units and ranges so the rest of the code
//! cannot mix them up.

use core::fmt;

use crate::config::TUNING_STEPS;
use crate::tick::BlinkClass;

/// Frequency in hundredths of a hertz
///
/// The synthesizer is programmed in these units, which keeps sub-hertz
/// calibration exact while a full HF frequency still fits in a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Frequency(u32);

impl Frequency {
    /// Units per hertz
    pub const UNITS_PER_HZ: u32 = 100;

    /// Wrap a raw unit value
    #[must_use]
    pub const fn from_units(units: u32) -> Self {
        Self(units)
    }

    /// Create from Hz, `None` if the value does not fit
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        match hz.checked_mul(Self::UNITS_PER_HZ) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Create from kHz, `None` if the value does not fit
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        match khz.checked_mul(1000) {
            Some(hz) => Self::from_hz(hz),
            None => None,
        }
    }

    /// Raw units
    #[must_use]
    pub const fn as_units(self) -> u32 {
        self.0
    }

    /// Whole hertz (truncated)
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        self.0 / Self::UNITS_PER_HZ
    }

    /// Whole kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.as_hz() / 1000
    }

    /// Shift by a signed number of units, `None` on under- or overflow
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn checked_offset(self, delta: i64) -> Option<Self> {
        let shifted = self.0 as i64 + delta;
        if shifted < 0 || shifted > u32::MAX as i64 {
            None
        } else {
            Some(Self(shifted as u32))
        }
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} Hz)", self.as_hz())
    }
}

/// Renders as `MM.kkk.hh`, the last group in tens of hertz
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mhz = self.0 / 100_000_000;
        let khz = (self.0 / 100_000) % 1000;
        let tens = (self.0 / 1000) % 100;
        write!(f, "{mhz}.{khz:03}.{tens:02}")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.as_hz());
    }
}

/// Index into [`TUNING_STEPS`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TuningStep(u8);

impl TuningStep {
    /// Create from an index; indices past the table select the largest step
    #[must_use]
    pub const fn new(index: u8) -> Self {
        let last = (TUNING_STEPS.len() - 1) as u8;
        if index > last {
            Self(last)
        } else {
            Self(index)
        }
    }

    /// Table index
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Step size in frequency units
    #[must_use]
    pub const fn as_units(self) -> u32 {
        TUNING_STEPS[self.0 as usize]
    }

    /// Next step, wrapping back to the finest one
    #[must_use]
    pub const fn next(self) -> Self {
        if (self.0 as usize) + 1 >= TUNING_STEPS.len() {
            Self(0)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Display digit that blinks while this step is active
    #[must_use]
    pub const fn blink(self) -> BlinkClass {
        match self.0 {
            0 => BlinkClass::Hz10,
            1 => BlinkClass::Hz100,
            2 => BlinkClass::KHz1,
            _ => BlinkClass::None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuningStep {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.as_units() / Frequency::UNITS_PER_HZ);
    }
}

/// Amateur band covered by the rig
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Band {
    /// 160 meters (1.8 - 2.0 MHz)
    M160,
    /// 80 meters (3.5 - 4.0 MHz)
    M80,
    /// 40 meters (7.0 - 7.3 MHz)
    M40,
    /// 30 meters (10.1 - 10.15 MHz)
    M30,
    /// 20 meters (14.0 - 14.35 MHz)
    #[default]
    M20,
    /// 17 meters (18.068 - 18.168 MHz)
    M17,
    /// 15 meters (21.0 - 21.45 MHz)
    M15,
    /// 12 meters (24.89 - 24.99 MHz)
    M12,
    /// 10 meters (28.0 - 29.7 MHz)
    M10,
}

impl Band {
    /// Every band, lowest first
    pub const ALL: [Self; 9] = [
        Self::M160,
        Self::M80,
        Self::M40,
        Self::M30,
        Self::M20,
        Self::M17,
        Self::M15,
        Self::M12,
        Self::M10,
    ];

    /// Number of bands
    pub const COUNT: usize = Self::ALL.len();

    /// Band from its stored index
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Stored index of this band
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Band containing `freq`, if any
    #[must_use]
    pub fn from_frequency(freq: Frequency) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.contains(freq))
    }

    /// Lower band edge in Hz
    #[must_use]
    pub const fn start_hz(self) -> u32 {
        match self {
            Self::M160 => 1_800_000,
            Self::M80 => 3_500_000,
            Self::M40 => 7_000_000,
            Self::M30 => 10_100_000,
            Self::M20 => 14_000_000,
            Self::M17 => 18_068_000,
            Self::M15 => 21_000_000,
            Self::M12 => 24_890_000,
            Self::M10 => 28_000_000,
        }
    }

    /// Upper band edge in Hz
    #[must_use]
    pub const fn end_hz(self) -> u32 {
        match self {
            Self::M160 => 2_000_000,
            Self::M80 => 4_000_000,
            Self::M40 => 7_300_000,
            Self::M30 => 10_150_000,
            Self::M20 => 14_350_000,
            Self::M17 => 18_168_000,
            Self::M15 => 21_450_000,
            Self::M12 => 24_990_000,
            Self::M10 => 29_700_000,
        }
    }

    /// QRP CW calling frequency used when the band has no stored frequency
    #[must_use]
    pub const fn default_frequency(self) -> Frequency {
        let hz = match self {
            Self::M160 => 1_836_000,
            Self::M80 => 3_560_000,
            Self::M40 => 7_030_000,
            Self::M30 => 10_106_000,
            Self::M20 => 14_060_000,
            Self::M17 => 18_086_000,
            Self::M15 => 21_060_000,
            Self::M12 => 24_906_000,
            Self::M10 => 28_060_000,
        };
        Frequency::from_units(hz * Frequency::UNITS_PER_HZ)
    }

    /// Whether `freq` lies inside the band edges
    #[must_use]
    pub const fn contains(self, freq: Frequency) -> bool {
        let hz = freq.as_hz();
        hz >= self.start_hz() && hz <= self.end_hz()
    }

    /// Clamp `freq` to the band edges
    #[must_use]
    pub fn clamp(self, freq: Frequency) -> Frequency {
        let lo = self.start_hz() * Frequency::UNITS_PER_HZ;
        let hi = self.end_hz() * Frequency::UNITS_PER_HZ;
        Frequency::from_units(freq.as_units().clamp(lo, hi))
    }

    /// Band `delta` positions away, wrapping around the band list
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cycle(self, delta: i8) -> Self {
        let count = Self::COUNT as i16;
        let index = (i16::from(self.index()) + i16::from(delta)).rem_euclid(count);
        Self::ALL[index as usize]
    }

    /// Short name for the display
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::M160 => "160m",
            Self::M80 => "80m",
            Self::M40 => "40m",
            Self::M30 => "30m",
            Self::M20 => "20m",
            Self::M17 => "17m",
            Self::M15 => "15m",
            Self::M12 => "12m",
            Self::M10 => "10m",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.name());
    }
}
