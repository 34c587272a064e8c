//! Composition buffer

use heapless::Vec;

use crate::config::MEMORY_LENGTH;
use crate::error::{Result, RigError};

/// Append-only message buffer
///
/// Holds at most `MEMORY_LENGTH - 1` characters; the last byte of a slot
/// is reserved for the terminator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryBuffer {
    text: Vec<u8, MEMORY_LENGTH>,
}

impl MemoryBuffer {
    /// Characters a buffer accepts
    pub const CAPACITY: usize = MEMORY_LENGTH - 1;

    /// Empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self { text: Vec::new() }
    }

    /// Buffer holding `text`, truncated to capacity; non-ASCII is dropped
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        for c in text.chars() {
            if buffer.push(c).is_err() {
                break;
            }
        }
        buffer
    }

    /// Append one character
    ///
    /// Non-ASCII characters are ignored. Letters are stored upper case.
    ///
    /// # Errors
    ///
    /// `MemoryFull` once `CAPACITY` characters are held; the buffer is
    /// left unchanged.
    pub fn push(&mut self, c: char) -> Result<()> {
        if self.text.len() >= Self::CAPACITY {
            return Err(RigError::MemoryFull);
        }
        if c.is_ascii() {
            #[allow(clippy::cast_possible_truncation)]
            let byte = c.to_ascii_uppercase() as u8;
            self.text.push(byte).map_err(|_| RigError::MemoryFull)?;
        }
        Ok(())
    }

    /// Remove the last character
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop().map(char::from)
    }

    /// Drop everything; persisted slots are untouched
    pub fn empty_buffer(&mut self) {
        self.text.clear();
    }

    /// Trim trailing spaces before the message is stored or sent
    pub fn prepare_buffer_for_tx(&mut self) {
        while self.text.last() == Some(&b' ') {
            self.text.pop();
        }
    }

    /// Number of characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// No characters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// No room for another character
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.text.len() >= Self::CAPACITY
    }

    /// Last character
    #[must_use]
    pub fn last(&self) -> Option<char> {
        self.text.last().map(|&b| char::from(b))
    }

    /// Contents as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever pushed
        core::str::from_utf8(&self.text).unwrap_or_default()
    }

    /// Contents as bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for MemoryBuffer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "MemoryBuffer({=str})", self.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_buffer_rejects_without_change() {
        let mut buffer = MemoryBuffer::new();
        for _ in 0..MemoryBuffer::CAPACITY {
            buffer.push('E').unwrap();
        }
        let before = buffer.clone();
        assert_eq!(buffer.push('T'), Err(RigError::MemoryFull));
        assert_eq!(buffer, before);
    }

    #[test]
    fn prepare_trims_trailing_spaces() {
        let mut buffer = MemoryBuffer::from_text("cq de  ");
        buffer.prepare_buffer_for_tx();
        assert_eq!(buffer.as_str(), "CQ DE");
    }
}
