//! Straight-key handling
//!
//! The output follows the contact; there is no timing beyond debounce.

use super::state::{KeyEvent, KeyMode, KeyState};

impl KeyState {
    /// Advance the straight-key path by one tick
    ///
    /// Emits `Start` when the contact closes and `End` when it opens.
    pub fn step_straight(&mut self, closed: bool) -> Option<KeyEvent> {
        if closed == self.contact {
            return None;
        }
        self.contact = closed;
        self.timeout = !closed;
        Some(if closed { KeyEvent::Start } else { KeyEvent::End })
    }

    /// Step whichever path `mode` selects
    ///
    /// In straight mode the dot line is the key contact.
    pub fn step_paddles(&mut self, paddles: &mut super::Paddles) -> Option<KeyEvent> {
        match self.mode {
            KeyMode::Iambic => self.step(paddles),
            KeyMode::Straight => self.step_straight(paddles.dot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Paddles;

    #[test]
    fn follows_contact() {
        let mut key = KeyState::new();
        key.mode = KeyMode::Straight;
        assert_eq!(key.step_straight(true), Some(KeyEvent::Start));
        assert!(key.is_keyed());
        assert_eq!(key.step_straight(true), None);
        assert_eq!(key.step_straight(false), Some(KeyEvent::End));
        assert!(key.timeout);
        assert_eq!(key.step_straight(false), None);
    }

    #[test]
    fn mode_selects_path() {
        let mut key = KeyState::new();
        key.mode = KeyMode::Straight;
        let mut paddles = Paddles::new(false, true);
        // Dash paddle is not the straight-key contact
        assert_eq!(key.step_paddles(&mut paddles), None);
        key.mode = KeyMode::Iambic;
        assert_eq!(key.step_paddles(&mut paddles), Some(KeyEvent::Dash));
    }
}
