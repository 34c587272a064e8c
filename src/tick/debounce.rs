//! Debouncing and button hold timing
//!
//! Both run inside the tick handler, one sample per tick.

use super::clock::ticks_since;

/// Accepts a level change after `threshold` identical samples in a row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    stable: bool,
    count: u8,
    threshold: u8,
}

impl Debouncer {
    /// Debouncer starting released
    #[must_use]
    pub const fn new(threshold: u8) -> Self {
        Self {
            stable: false,
            count: 0,
            threshold,
        }
    }

    /// Feed one raw sample; returns the new level when a change is accepted
    pub fn sample(&mut self, raw: bool) -> Option<bool> {
        if raw == self.stable {
            self.count = 0;
            return None;
        }
        self.count = self.count.saturating_add(1);
        if self.count < self.threshold {
            return None;
        }
        self.stable = raw;
        self.count = 0;
        Some(raw)
    }

    /// Accepted level
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.stable
    }
}

/// Front-panel push button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Encoder push button
    Encoder,
    /// RIT button
    Rit,
    /// Keyer (menu) button
    Keyer,
}

impl Button {
    /// Every button, in hold-timer order
    pub const ALL: [Self; 3] = [Self::Encoder, Self::Rit, Self::Keyer];

    /// Index into per-button tables
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Button {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Encoder => defmt::write!(f, "ENC"),
            Self::Rit => defmt::write!(f, "RIT"),
            Self::Keyer => defmt::write!(f, "KEYER"),
        }
    }
}

/// Latched button event for the main loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Held past the long-press threshold; fires once per press
    LongPress(Button),
    /// Released after `held` ticks; `long` if a long press already fired
    Released {
        /// Which button
        button: Button,
        /// Hold duration in ticks
        held: u32,
        /// A long press fired during this hold
        long: bool,
    },
}

#[cfg(feature = "embedded")]
impl defmt::Format for ButtonEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::LongPress(b) => defmt::write!(f, "LongPress({})", b),
            Self::Released { button, held, long } => {
                defmt::write!(f, "Released({}, {=u32}, long={})", button, held, long);
            }
        }
    }
}

/// Times how long a debounced button is held
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldTimer {
    button: Button,
    pressed_at: Option<u32>,
    long_threshold: Option<u32>,
    long_fired: bool,
}

impl HoldTimer {
    /// Timer for `button`; `long_threshold` of `None` disables long presses
    #[must_use]
    pub const fn new(button: Button, long_threshold: Option<u32>) -> Self {
        Self {
            button,
            pressed_at: None,
            long_threshold,
            long_fired: false,
        }
    }

    /// Feed the debounced level at tick `now`
    pub fn update(&mut self, pressed: bool, now: u32) -> Option<ButtonEvent> {
        match (self.pressed_at, pressed) {
            (None, true) => {
                self.pressed_at = Some(now);
                self.long_fired = false;
                None
            }
            (Some(start), true) => {
                let threshold = self.long_threshold?;
                if !self.long_fired && ticks_since(now, start) >= threshold {
                    self.long_fired = true;
                    return Some(ButtonEvent::LongPress(self.button));
                }
                None
            }
            (Some(start), false) => {
                self.pressed_at = None;
                Some(ButtonEvent::Released {
                    button: self.button,
                    held: ticks_since(now, start),
                    long: self.long_fired,
                })
            }
            (None, false) => None,
        }
    }

    /// Ticks held so far, `None` when released
    #[must_use]
    pub const fn held(&self, now: u32) -> Option<u32> {
        match self.pressed_at {
            Some(start) => Some(ticks_since(now, start)),
            None => None,
        }
    }
}
