//! Classifies keyed characters while a memory is being entered

use crate::key::{Element, KeyEvent};
use crate::morse::{self, Pattern};

/// Outcome of a completed character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// A known character
    Char(char),
    /// The keyed pattern is not a character
    Unknown,
}

/// Builds a pattern from Key Engine events and decodes it on `End`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharRecorder {
    pattern: Option<Pattern>,
}

impl CharRecorder {
    /// Recorder with nothing keyed
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pattern: Some(Pattern::EMPTY),
        }
    }

    /// Feed one event
    ///
    /// Returns a [`Recorded`] when a character completes.
    pub fn record(&mut self, event: KeyEvent) -> Option<Recorded> {
        match event {
            KeyEvent::Dot => self.push(Element::Dot),
            KeyEvent::Dash => self.push(Element::Dash),
            KeyEvent::End => {
                let pattern = core::mem::replace(&mut self.pattern, Some(Pattern::EMPTY));
                return match pattern {
                    Some(p) if p.is_empty() => None,
                    Some(p) => Some(morse::decode(p).map_or(Recorded::Unknown, Recorded::Char)),
                    None => Some(Recorded::Unknown),
                };
            }
            KeyEvent::Start | KeyEvent::ElementEnd => {}
        }
        None
    }

    /// Something has been keyed since the last character
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.pattern != Some(Pattern::EMPTY)
    }

    /// Forget a partly keyed character
    pub fn clear(&mut self) {
        self.pattern = Some(Pattern::EMPTY);
    }

    fn push(&mut self, element: Element) {
        // Overlong patterns stay `None` until End
        self.pattern = self.pattern.and_then(|p| p.push(element));
    }
}

impl Default for CharRecorder {
    fn default() -> Self {
        Self::new()
    }
}
