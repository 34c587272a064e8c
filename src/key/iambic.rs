//! Iambic element timing
//!
//! [`KeyState::step`] owns the timing; an [`ElementSource`] only decides
//! what to send next. Paddles and memory playback are both sources, so a
//! played-back message has exactly the timing of the same code sent by
//! hand.

use super::state::{Element, KeyEvent, KeyPhase, KeyState};

/// Which element a squeeze starts with when both paddles close together
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SqueezeStart {
    /// Start with a dot
    #[default]
    DotFirst,
    /// Start with a dash
    DashFirst,
}

impl SqueezeStart {
    /// First element of a simultaneous squeeze
    #[must_use]
    pub const fn first(self) -> Element {
        match self {
            Self::DotFirst => Element::Dot,
            Self::DashFirst => Element::Dash,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SqueezeStart {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::DotFirst => defmt::write!(f, "DotFirst"),
            Self::DashFirst => defmt::write!(f, "DashFirst"),
        }
    }
}

/// Supplier of elements for the Key Engine
pub trait ElementSource {
    /// Called on every tick of an element or gap in flight
    fn observe(&mut self, key: &mut KeyState);

    /// Element to start now, or `None` to stay silent
    ///
    /// `after` is the element whose gap just expired, or `None` when the
    /// engine is idle or waiting out a character gap.
    fn next_element(&mut self, key: &mut KeyState, after: Option<Element>) -> Option<Element>;
}

/// Debounced paddle contacts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Paddles {
    /// Dot paddle closed
    pub dot: bool,
    /// Dash paddle closed
    pub dash: bool,
    /// Squeeze tie-break
    pub squeeze: SqueezeStart,
}

impl Paddles {
    /// Paddle state with the default squeeze policy
    #[must_use]
    pub const fn new(dot: bool, dash: bool) -> Self {
        Self {
            dot,
            dash,
            squeeze: SqueezeStart::DotFirst,
        }
    }

    /// Both paddles closed
    #[must_use]
    pub const fn is_squeeze(&self) -> bool {
        self.dot && self.dash
    }

    /// Either paddle closed
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.dot || self.dash
    }

    /// Whether the paddle for `element` is closed
    #[must_use]
    pub const fn holds(&self, element: Element) -> bool {
        match element {
            Element::Dot => self.dot,
            Element::Dash => self.dash,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Paddles {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Paddles(dot={}, dash={})", self.dot, self.dash);
    }
}

impl ElementSource for Paddles {
    fn observe(&mut self, key: &mut KeyState) {
        match key.phase() {
            // Only the opposite paddle is remembered while sending
            KeyPhase::Element(sending) => {
                if self.holds(sending.opposite()) {
                    key.latch(sending.opposite());
                }
            }
            KeyPhase::Gap(_) => {
                if self.dot {
                    key.latch(Element::Dot);
                }
                if self.dash {
                    key.latch(Element::Dash);
                }
            }
            KeyPhase::Idle | KeyPhase::Wait => {}
        }
    }

    fn next_element(&mut self, key: &mut KeyState, after: Option<Element>) -> Option<Element> {
        match after {
            Some(last) => {
                let opposite = last.opposite();
                if key.latched(opposite) || self.holds(opposite) {
                    Some(opposite)
                } else if key.latched(last) || self.holds(last) {
                    Some(last)
                } else {
                    None
                }
            }
            None => match (self.dot, self.dash) {
                (true, true) => Some(self.squeeze.first()),
                (true, false) => Some(Element::Dot),
                (false, true) => Some(Element::Dash),
                (false, false) => None,
            },
        }
    }
}

impl KeyState {
    /// Advance the iambic engine by one tick
    ///
    /// Emits at most one event. Released paddles never shorten an element.
    pub fn step<S: ElementSource + ?Sized>(&mut self, source: &mut S) -> Option<KeyEvent> {
        match self.phase {
            KeyPhase::Element(element) => {
                source.observe(self);
                self.timer = self.timer.saturating_sub(1);
                if self.timer > 0 {
                    return None;
                }
                self.phase = KeyPhase::Gap(element);
                self.timer = self.dot_time();
                Some(KeyEvent::ElementEnd)
            }
            KeyPhase::Gap(last) => {
                source.observe(self);
                self.timer = self.timer.saturating_sub(1);
                if self.timer > 0 {
                    return None;
                }
                if let Some(next) = source.next_element(self, Some(last)) {
                    return Some(self.begin(next));
                }
                self.phase = KeyPhase::Wait;
                self.timer = self.dash_time();
                None
            }
            KeyPhase::Wait => {
                if let Some(next) = source.next_element(self, None) {
                    return Some(self.begin(next));
                }
                self.timer = self.timer.saturating_sub(1);
                if self.timer > 0 {
                    return None;
                }
                self.phase = KeyPhase::Idle;
                self.timeout = true;
                Some(KeyEvent::End)
            }
            KeyPhase::Idle => source
                .next_element(self, None)
                .map(|next| self.begin(next)),
        }
    }
}
