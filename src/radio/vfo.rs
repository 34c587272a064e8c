//! VFO Management
//!
//! Operating frequency, RIT and per-band frequency memory.
//!
//! With RIT on, the encoder moves the receive frequency (`op_freq`) while
//! the transmitter stays on `rit_tx_freq`, the frequency at the moment RIT
//! was switched on. Switching RIT off returns to that frequency.

use crate::error::{Result, RigError};
use crate::types::{Band, Frequency, TuningStep};

/// Frequency synthesizer
pub trait Synthesizer {
    /// Program the local oscillator for `freq`, for transmit or receive
    fn set_frequency(&mut self, freq: Frequency, transmit: bool);

    /// Apply the reference correction and the IF the receive mix uses
    fn set_calibration(&mut self, correction: i32, if_freq: Frequency);
}

impl<Y: Synthesizer + ?Sized> Synthesizer for &mut Y {
    fn set_frequency(&mut self, freq: Frequency, transmit: bool) {
        (**self).set_frequency(freq, transmit);
    }

    fn set_calibration(&mut self, correction: i32, if_freq: Frequency) {
        (**self).set_calibration(correction, if_freq);
    }
}

/// VFO state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vfo {
    band: Band,
    op_freq: Frequency,
    rit_tx_freq: Frequency,
    rit: bool,
    tuning_step: TuningStep,
    band_freqs: [Option<Frequency>; Band::COUNT],
}

impl Vfo {
    /// VFO on `band`'s default frequency
    #[must_use]
    pub const fn new(band: Band) -> Self {
        let freq = band.default_frequency();
        Self {
            band,
            op_freq: freq,
            rit_tx_freq: freq,
            rit: false,
            tuning_step: TuningStep::new(1),
            band_freqs: [None; Band::COUNT],
        }
    }

    /// Current band
    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    /// Operating (receive) frequency
    #[must_use]
    pub const fn op_freq(&self) -> Frequency {
        self.op_freq
    }

    /// Transmit frequency held while RIT is on
    #[must_use]
    pub const fn rit_tx_freq(&self) -> Frequency {
        self.rit_tx_freq
    }

    /// RIT is on
    #[must_use]
    pub const fn rit(&self) -> bool {
        self.rit
    }

    /// Tuning step
    #[must_use]
    pub const fn tuning_step(&self) -> TuningStep {
        self.tuning_step
    }

    /// Transmit frequency: `rit_tx_freq` with RIT on, else `op_freq`
    #[must_use]
    pub const fn tx_freq(&self) -> Frequency {
        if self.rit {
            self.rit_tx_freq
        } else {
            self.op_freq
        }
    }

    /// Receive frequency
    #[must_use]
    pub const fn rx_freq(&self) -> Frequency {
        self.op_freq
    }

    /// Move `op_freq` by `detents` tuning steps, held inside the band
    pub fn tune(&mut self, detents: i8) {
        let delta = i64::from(detents) * i64::from(self.tuning_step.as_units());
        let target = self.op_freq.checked_offset(delta).unwrap_or(self.op_freq);
        self.op_freq = self.band.clamp(target);
    }

    /// Cycle to the next tuning step
    pub fn next_step(&mut self) {
        self.tuning_step = self.tuning_step.next();
    }

    /// Toggle RIT
    pub fn toggle_rit(&mut self) {
        if self.rit {
            self.op_freq = self.rit_tx_freq;
            self.rit = false;
        } else {
            self.rit_tx_freq = self.op_freq;
            self.rit = true;
        }
    }

    /// Switch RIT off, returning to the transmit frequency
    pub fn clear_rit(&mut self) {
        if self.rit {
            self.toggle_rit();
        }
    }

    /// Frequency last used on `band`, or its default
    #[must_use]
    pub fn band_frequency(&self, band: Band) -> Frequency {
        self.band_freqs[usize::from(band.index())].unwrap_or_else(|| band.default_frequency())
    }

    /// Change band, remembering where the old one was left
    pub fn select_band(&mut self, band: Band) {
        self.clear_rit();
        self.band_freqs[usize::from(self.band.index())] = Some(self.op_freq);
        self.band = band;
        self.op_freq = self.band_frequency(band);
        self.rit_tx_freq = self.op_freq;
    }

    /// Jump to `freq`, changing band as needed
    ///
    /// # Errors
    ///
    /// `OutOfBand` if no band contains `freq`; nothing changes.
    pub fn set_frequency(&mut self, freq: Frequency) -> Result<()> {
        let band = Band::from_frequency(freq).ok_or(RigError::OutOfBand)?;
        self.select_band(band);
        self.op_freq = freq;
        self.rit_tx_freq = freq;
        Ok(())
    }
}

impl Default for Vfo {
    fn default() -> Self {
        Self::new(Band::default())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Vfo {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Vfo({}, rx={}, tx={}, rit={})",
            self.band,
            self.op_freq,
            self.tx_freq(),
            self.rit
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rit_keeps_tx_frequency() {
        let mut vfo = Vfo::new(Band::M40);
        let tx = vfo.tx_freq();
        vfo.toggle_rit();
        vfo.tune(5);
        assert_eq!(vfo.tx_freq(), tx);
        assert_ne!(vfo.rx_freq(), tx);
        vfo.toggle_rit();
        assert_eq!(vfo.rx_freq(), tx);
        assert_eq!(vfo.tx_freq(), tx);
    }

    #[test]
    fn tuning_stops_at_band_edge() {
        let mut vfo = Vfo::new(Band::M30);
        vfo.next_step();
        assert_eq!(vfo.tuning_step().as_units(), 1_000 * Frequency::UNITS_PER_HZ);
        for _ in 0..100 {
            vfo.tune(1);
        }
        assert_eq!(vfo.op_freq().as_hz(), Band::M30.end_hz());
    }

    #[test]
    fn band_memory() {
        let mut vfo = Vfo::new(Band::M20);
        vfo.tune(3);
        let left = vfo.op_freq();
        vfo.select_band(Band::M40);
        assert_eq!(vfo.op_freq(), Band::M40.default_frequency());
        vfo.select_band(Band::M20);
        assert_eq!(vfo.op_freq(), left);
    }

    #[test]
    fn out_of_band_is_rejected() {
        let mut vfo = Vfo::new(Band::M20);
        let before = vfo;
        assert_eq!(
            vfo.set_frequency(Frequency::from_khz(5_000).unwrap()),
            Err(RigError::OutOfBand)
        );
        assert_eq!(vfo, before);
    }
}
