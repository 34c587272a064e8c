//! Key Engine state and timing
//!
//! [`KeyState`] is owned by the tick handler's shared context. The timing
//! rules, counted in `step` calls from the one that starts an element:
//!
//! ```text
//!  dot          gap          decision
//!  |<- dot_time ->|<- dot_time ->|
//!  0             60            120     (20 WPM)
//! ```
//!
//! With nothing to send at the decision the engine waits a further
//! `dash_time`, then sets `timeout` and emits [`KeyEvent::End`].

use crate::config::{DOT_TICKS_AT_1WPM, KEY_MAX_SPEED, KEY_MIN_SPEED, WPM_DEFAULT};
use crate::error::{Result, RigError};

/// Keying mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// Squeeze paddles with one-element memory
    #[default]
    Iambic,
    /// Single contact, output follows the key
    Straight,
}

impl KeyMode {
    /// The other mode
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Iambic => Self::Straight,
            Self::Straight => Self::Iambic,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Iambic => defmt::write!(f, "IAMBIC"),
            Self::Straight => defmt::write!(f, "STRAIGHT"),
        }
    }
}

/// Morse element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    /// Short element, one unit
    Dot,
    /// Long element, three units
    Dash,
}

impl Element {
    /// The other element
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Dot => Self::Dash,
            Self::Dash => Self::Dot,
        }
    }

    /// Event emitted when this element starts
    #[must_use]
    pub const fn event(self) -> KeyEvent {
        match self {
            Self::Dot => KeyEvent::Dot,
            Self::Dash => KeyEvent::Dash,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Element {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Dot => defmt::write!(f, "."),
            Self::Dash => defmt::write!(f, "-"),
        }
    }
}

/// Event emitted by one engine step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// Straight key closed
    Start,
    /// Dot started
    Dot,
    /// Dash started
    Dash,
    /// Element finished, key up
    ElementEnd,
    /// Character finished, or straight key opened
    End,
}

impl KeyEvent {
    /// Whether this event puts the key down
    #[must_use]
    pub const fn is_key_down(self) -> bool {
        matches!(self, Self::Start | Self::Dot | Self::Dash)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Start => defmt::write!(f, "Start"),
            Self::Dot => defmt::write!(f, "Dot"),
            Self::Dash => defmt::write!(f, "Dash"),
            Self::ElementEnd => defmt::write!(f, "ElementEnd"),
            Self::End => defmt::write!(f, "End"),
        }
    }
}

/// Where the engine is in the element cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyPhase {
    /// Nothing sent since the last character ended
    #[default]
    Idle,
    /// Element in flight, key down
    Element(Element),
    /// Inter-element gap after an element
    Gap(Element),
    /// Gap expired with nothing to send; counting toward `End`
    Wait,
}

/// Dot length in ticks at `wpm`
#[must_use]
pub const fn dot_time(wpm: u8) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let ticks = (DOT_TICKS_AT_1WPM / wpm as u32) as u16;
    ticks
}

/// Dash length in ticks at `wpm`
#[must_use]
pub const fn dash_time(wpm: u8) -> u16 {
    dot_time(wpm) * 3
}

/// Key Engine state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyState {
    /// Keying mode
    pub mode: KeyMode,
    /// The gap after the last element has expired
    pub timeout: bool,
    /// Dot paddle memory
    pub dot: bool,
    /// Dash paddle memory
    pub dash: bool,
    speed: u8,
    dot_time: u16,
    dash_time: u16,
    /// Ticks left in the current element, gap or wait
    pub timer: u16,
    pub(crate) phase: KeyPhase,
    pub(crate) contact: bool,
}

impl KeyState {
    /// Create at `WPM_DEFAULT`, iambic, idle
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: KeyMode::Iambic,
            timeout: true,
            dot: false,
            dash: false,
            speed: WPM_DEFAULT,
            dot_time: dot_time(WPM_DEFAULT),
            dash_time: dash_time(WPM_DEFAULT),
            timer: 0,
            phase: KeyPhase::Idle,
            contact: false,
        }
    }

    /// Keying speed in WPM
    #[must_use]
    pub const fn speed(&self) -> u8 {
        self.speed
    }

    /// Dot length in ticks
    #[must_use]
    pub const fn dot_time(&self) -> u16 {
        self.dot_time
    }

    /// Dash length in ticks
    #[must_use]
    pub const fn dash_time(&self) -> u16 {
        self.dash_time
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> KeyPhase {
        self.phase
    }

    /// Change speed; an element already in flight keeps its length
    ///
    /// # Errors
    ///
    /// `SpeedOutOfRange` outside `[KEY_MIN_SPEED, KEY_MAX_SPEED]`; the
    /// current speed is kept.
    pub fn set_speed(&mut self, wpm: u8) -> Result<()> {
        if !(KEY_MIN_SPEED..=KEY_MAX_SPEED).contains(&wpm) {
            return Err(RigError::SpeedOutOfRange);
        }
        self.speed = wpm;
        self.dot_time = dot_time(wpm);
        self.dash_time = dash_time(wpm);
        Ok(())
    }

    /// Switch between paddles and straight key; a real change abandons
    /// whatever the old mode had in progress
    pub fn set_mode(&mut self, mode: KeyMode) {
        if self.mode != mode {
            self.mode = mode;
            self.reset();
        }
    }

    /// Length of an element at the current speed
    #[must_use]
    pub const fn duration(&self, element: Element) -> u16 {
        match element {
            Element::Dot => self.dot_time,
            Element::Dash => self.dash_time,
        }
    }

    /// Whether `element` is held in paddle memory
    #[must_use]
    pub const fn latched(&self, element: Element) -> bool {
        match element {
            Element::Dot => self.dot,
            Element::Dash => self.dash,
        }
    }

    /// Put `element` into paddle memory
    pub fn latch(&mut self, element: Element) {
        match element {
            Element::Dot => self.dot = true,
            Element::Dash => self.dash = true,
        }
    }

    /// No element, gap or character wait in progress
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, KeyPhase::Idle) && !self.contact
    }

    /// Key is down
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        matches!(self.phase, KeyPhase::Element(_)) || self.contact
    }

    /// Abandon any character in progress; speed and mode are kept
    pub fn reset(&mut self) {
        self.timeout = true;
        self.dot = false;
        self.dash = false;
        self.timer = 0;
        self.phase = KeyPhase::Idle;
        self.contact = false;
    }

    /// Begin sending `element`
    pub(crate) fn begin(&mut self, element: Element) -> KeyEvent {
        self.dot = false;
        self.dash = false;
        self.timeout = false;
        self.timer = self.duration(element);
        self.phase = KeyPhase::Element(element);
        element.event()
    }
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "KeyState({}, {=u8} wpm, timer={=u16})",
            self.mode,
            self.speed,
            self.timer
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_wpm_is_sixty_ticks() {
        assert_eq!(dot_time(20), 60);
        assert_eq!(dash_time(20), 180);
    }

    #[test]
    fn dash_is_three_dots_at_every_speed() {
        let mut last = u16::MAX;
        for wpm in KEY_MIN_SPEED..=KEY_MAX_SPEED {
            assert_eq!(dot_time(wpm), dash_time(wpm) / 3);
            assert!(dot_time(wpm) < last);
            last = dot_time(wpm);
        }
    }

    #[test]
    fn set_speed_rejects_out_of_range() {
        let mut key = KeyState::new();
        assert_eq!(key.set_speed(KEY_MAX_SPEED + 1), Err(RigError::SpeedOutOfRange));
        assert_eq!(key.set_speed(KEY_MIN_SPEED - 1), Err(RigError::SpeedOutOfRange));
        assert_eq!(key.speed(), WPM_DEFAULT);
        assert!(key.set_speed(25).is_ok());
        assert_eq!(key.dot_time(), 48);
        assert_eq!(key.dash_time(), 144);
    }

    #[test]
    fn reset_keeps_speed_and_mode() {
        let mut key = KeyState::new();
        key.mode = KeyMode::Straight;
        key.set_speed(12).unwrap();
        key.begin(Element::Dash);
        key.reset();
        assert!(key.is_idle());
        assert_eq!(key.speed(), 12);
        assert_eq!(key.mode, KeyMode::Straight);
    }

    #[test]
    fn mode_change_drops_the_character_in_progress() {
        let mut key = KeyState::new();
        key.begin(Element::Dot);
        key.set_mode(KeyMode::Iambic);
        assert!(!key.is_idle());

        key.set_mode(KeyMode::Straight);
        assert!(key.is_idle());
        assert!(!key.is_keyed());
        assert_eq!(key.mode, KeyMode::Straight);
    }
}
