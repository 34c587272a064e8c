//! Memory playback through the Key Engine
//!
//! The player only decides *what* to send. Element, gap and character
//! timing come from [`KeyState::step`], the same path the paddles use.
//! Characters are separated by the engine's end-of-character wait; a
//! space adds one more `dash_time` of silence before the next character.

use heapless::Vec;

use crate::config::MEMORY_LENGTH;
use crate::key::{Element, ElementSource, KeyPhase, KeyState};
use crate::morse::{self, CodecOptions, Elements, Symbol};

use super::MemoryBuffer;

/// Sends a message as an [`ElementSource`]
#[derive(Clone, Debug)]
pub struct MemoryPlayer {
    text: Vec<u8, MEMORY_LENGTH>,
    position: usize,
    current: Option<Elements>,
    word_gap: u16,
    options: CodecOptions,
}

impl MemoryPlayer {
    /// Player for `buffer`
    #[must_use]
    pub fn new(buffer: &MemoryBuffer, options: CodecOptions) -> Self {
        let mut text = Vec::new();
        // Same capacity on both sides
        let _ = text.extend_from_slice(buffer.as_bytes());
        Self {
            text,
            position: 0,
            current: None,
            word_gap: 0,
            options,
        }
    }

    /// Every character has been handed to the engine
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.text.len()
            && self.word_gap == 0
            && self.current.map_or(true, |mut e| e.next().is_none())
    }

    /// Characters not yet started
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.text.len().saturating_sub(self.position)
    }

    /// Load the next sendable character, counting word gaps on the way
    fn advance(&mut self, key: &KeyState) -> Option<Element> {
        while let Some(&byte) = self.text.get(self.position) {
            self.position += 1;
            match morse::encode(char::from(byte), self.options) {
                Some(Symbol::WordGap) => {
                    // This tick is the first of the gap
                    self.word_gap = key.dash_time().saturating_sub(1);
                    return None;
                }
                Some(Symbol::Char(pattern)) => {
                    let mut elements = pattern.elements();
                    let first = elements.next();
                    self.current = Some(elements);
                    return first;
                }
                None => {}
            }
        }
        None
    }
}

impl ElementSource for MemoryPlayer {
    fn observe(&mut self, _key: &mut KeyState) {}

    fn next_element(&mut self, key: &mut KeyState, after: Option<Element>) -> Option<Element> {
        if after.is_some() {
            // Inside a character; an exhausted pattern lets the engine end it
            return self.current.as_mut().and_then(Iterator::next);
        }
        if key.phase() == KeyPhase::Wait {
            return None;
        }
        if self.word_gap > 0 {
            self.word_gap -= 1;
            return None;
        }
        self.current = None;
        self.advance(key)
    }
}
