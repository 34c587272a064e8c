//! Tick counter and wrap-safe time arithmetic
//!
//! `tcount` wraps silently. Durations are always differences of two
//! counts, never absolute comparisons.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::BLINK_PERIOD_MASK;

/// Monotonic wrapping tick counter
#[derive(Debug, Default)]
pub struct TickCounter {
    count: AtomicU32,
}

impl TickCounter {
    /// Counter starting at zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Counter starting at `start`, used to test wrap-around
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self {
            count: AtomicU32::new(start),
        }
    }

    /// Advance by one tick and return the new count
    pub fn advance(&self) -> u32 {
        self.count.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Current count
    #[must_use]
    pub fn now(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Ticks elapsed from `then` to `now`, correct across one wrap
#[must_use]
pub const fn ticks_since(now: u32, then: u32) -> u32 {
    now.wrapping_sub(then)
}

/// Whether `deadline` has been reached at `now`
///
/// Valid while the two are less than half the counter range apart.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn deadline_passed(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Display digit blink class
///
/// Names the frequency digit that blinks to show the tuning step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlinkClass {
    /// Nothing blinks
    #[default]
    None,
    /// Tens of hertz digit
    Hz10,
    /// Hundreds of hertz digit
    Hz100,
    /// kHz units digit
    KHz1,
}

impl BlinkClass {
    /// Column of the blinking digit counted from the right of `MM.kkk.hh`
    #[must_use]
    pub const fn column_from_right(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Hz10 => Some(0),
            Self::Hz100 => Some(1),
            Self::KHz1 => Some(3),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BlinkClass {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "none"),
            Self::Hz10 => defmt::write!(f, "10Hz"),
            Self::Hz100 => defmt::write!(f, "100Hz"),
            Self::KHz1 => defmt::write!(f, "1kHz"),
        }
    }
}

/// Blink phase derived from the tick counter
///
/// Visible during the lower half of a `BLINK_PERIOD_MASK + 1` period.
#[must_use]
pub const fn blink_visible(tcount: u32) -> bool {
    (tcount & BLINK_PERIOD_MASK) <= BLINK_PERIOD_MASK / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_since_across_wrap() {
        assert_eq!(ticks_since(5, u32::MAX - 4), 10);
        assert!(deadline_passed(3, u32::MAX));
        assert!(!deadline_passed(u32::MAX, 3));
    }

    #[test]
    fn counter_wraps() {
        let counter = TickCounter::starting_at(u32::MAX);
        assert_eq!(counter.advance(), 0);
        assert_eq!(counter.now(), 0);
    }

    #[test]
    fn blink_half_period() {
        assert!(blink_visible(0));
        assert!(blink_visible(BLINK_PERIOD_MASK / 2));
        assert!(!blink_visible(BLINK_PERIOD_MASK / 2 + 1));
        assert!(blink_visible(BLINK_PERIOD_MASK + 1));
    }
}
