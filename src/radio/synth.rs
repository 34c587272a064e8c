//! `Si5351A` divider planning
//!
//! The synthesizer multiplies the crystal up to a VCO with a fractional
//! PLL, then divides it down with a multisynth. Keeping the multisynth
//! an even integer and moving all the fine tuning into the PLL gives the
//! cleanest output, so that is the only plan made here.
//!
//! All arithmetic is integer and in frequency units, so it runs on the
//! host as well as the target.

use crate::types::Frequency;

/// Lowest VCO frequency in frequency units (600 MHz)
pub const VCO_MIN: u64 = 600_000_000 * Frequency::UNITS_PER_HZ as u64;

/// Highest VCO frequency in frequency units (900 MHz)
pub const VCO_MAX: u64 = 900_000_000 * Frequency::UNITS_PER_HZ as u64;

/// Fixed PLL denominator (20 bits)
pub const PLL_DENOMINATOR: u32 = 1_048_575;

/// Feedback divider `a + b/c`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divider {
    /// Integer part
    pub a: u32,
    /// Numerator
    pub b: u32,
    /// Denominator
    pub c: u32,
}

impl Divider {
    /// Integer divider
    #[must_use]
    pub const fn integer(a: u32) -> Self {
        Self { a, b: 0, c: 1 }
    }

    /// Eight parameter registers as laid out from the block's base address
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn registers(&self, r_div: u8) -> [u8; 8] {
        let floor_128b_c = (128 * self.b) / self.c;
        let p1 = 128 * self.a + floor_128b_c - 512;
        let p2 = 128 * self.b - self.c * floor_128b_c;
        let p3 = self.c;
        [
            (p3 >> 8) as u8,
            p3 as u8,
            (r_div << 4) | ((p1 >> 16) as u8 & 0x03),
            (p1 >> 8) as u8,
            p1 as u8,
            (((p3 >> 12) & 0xF0) | ((p2 >> 16) & 0x0F)) as u8,
            (p2 >> 8) as u8,
            p2 as u8,
        ]
    }
}

/// PLL and multisynth settings for one output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthPlan {
    /// PLL feedback divider
    pub pll: Divider,
    /// Even integer multisynth divider
    pub ms: u32,
}

impl SynthPlan {
    /// VCO frequency in units for a crystal of `xtal` units
    #[must_use]
    pub const fn vco(&self, xtal: u64) -> u64 {
        let c = self.pll.c as u64;
        xtal * (self.pll.a as u64 * c + self.pll.b as u64) / c
    }

    /// Output frequency in units for a crystal of `xtal` units
    #[must_use]
    pub const fn output(&self, xtal: u64) -> u64 {
        self.vco(xtal) / self.ms as u64
    }
}

/// Crystal frequency in units after applying `correction`
///
/// The correction is a signed offset of the reference, in frequency units.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn corrected_xtal(xtal_hz: u32, correction: i32) -> u64 {
    let nominal = xtal_hz as i64 * Frequency::UNITS_PER_HZ as i64;
    (nominal + correction as i64) as u64
}

/// Plan an output at `freq` from a crystal of `xtal` units
///
/// `None` when the frequency needs a divider outside the multisynth's
/// integer range (below about 500 kHz or above 150 MHz).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn plan(freq: Frequency, xtal: u64) -> Option<SynthPlan> {
    let f = freq.as_units() as u64;
    if f == 0 || xtal == 0 {
        return None;
    }
    let ms = (VCO_MAX / f) & !1;
    if ms < 6 || ms > 1800 {
        return None;
    }
    let vco = f * ms;
    if vco < VCO_MIN {
        return None;
    }
    let a = vco / xtal;
    if a < 15 || a > 90 {
        return None;
    }
    let rem = vco % xtal;
    let b = rem * PLL_DENOMINATOR as u64 / xtal;
    Some(SynthPlan {
        pll: Divider {
            a: a as u32,
            b: b as u32,
            c: PLL_DENOMINATOR,
        },
        ms: ms as u32,
    })
}
