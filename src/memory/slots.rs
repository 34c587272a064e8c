//! Persistent message slots
//!
//! Slot `n` occupies `MEMORY_LENGTH` bytes at
//! `MEMORY_START + n * MEMORY_LENGTH`, zero-terminated. An erased slot
//! (first byte `0xFF`) reads back as empty.

use crate::config::{eeprom, MEMORY_LENGTH, MEMORY_SLOTS};
use crate::error::{Result, RigError};
use crate::morse::CodecOptions;
use crate::storage::Storage;

use super::{MemoryBuffer, MemoryPlayer};

/// Byte offset of slot `slot`
///
/// # Errors
///
/// `InvalidSlot` for slots past `MEMORY_SLOTS`.
pub fn slot_offset(slot: u8) -> Result<usize> {
    if slot >= MEMORY_SLOTS {
        return Err(RigError::InvalidSlot);
    }
    Ok(eeprom::MEMORY_START + usize::from(slot) * MEMORY_LENGTH)
}

/// Copy `buffer` into slot `slot`, zero-padded
///
/// # Errors
///
/// `InvalidSlot`, or `Storage` when the write fails.
pub fn store_memory<S: Storage + ?Sized>(
    storage: &mut S,
    slot: u8,
    buffer: &MemoryBuffer,
) -> Result<()> {
    let offset = slot_offset(slot)?;
    let mut record = [0u8; MEMORY_LENGTH];
    record[..buffer.len()].copy_from_slice(buffer.as_bytes());
    storage.write(offset, &record)?;
    info!("stored {=usize} chars in slot {=u8}", buffer.len(), slot);
    Ok(())
}

/// Read slot `slot` into a buffer
///
/// # Errors
///
/// `InvalidSlot`, or `Storage` when the read fails.
pub fn load_memory<S: Storage + ?Sized>(storage: &mut S, slot: u8) -> Result<MemoryBuffer> {
    let offset = slot_offset(slot)?;
    let mut record = [0u8; MEMORY_LENGTH];
    storage.read(offset, &mut record)?;
    let mut buffer = MemoryBuffer::new();
    for &byte in record.iter().take_while(|&&b| b != 0 && b != 0xFF) {
        if buffer.push(char::from(byte)).is_err() {
            break;
        }
    }
    Ok(buffer)
}

/// Player for slot `slot`, `None` when the slot is empty
///
/// # Errors
///
/// As [`load_memory`].
pub fn transmit_memory<S: Storage + ?Sized>(
    storage: &mut S,
    slot: u8,
    options: CodecOptions,
) -> Result<Option<MemoryPlayer>> {
    let mut buffer = load_memory(storage, slot)?;
    buffer.prepare_buffer_for_tx();
    if buffer.is_empty() {
        return Ok(None);
    }
    debug!("transmit slot {=u8}: {=str}", slot, buffer.as_str());
    Ok(Some(MemoryPlayer::new(&buffer, options)))
}

/// Player for the composition buffer, used for review on the sidetone
#[must_use]
pub fn playback_buffer(buffer: &MemoryBuffer, options: CodecOptions) -> MemoryPlayer {
    MemoryPlayer::new(buffer, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EEPROM_SIZE;
    use crate::storage::RamStorage;

    #[test]
    fn slots_do_not_overlap() {
        let a = slot_offset(0).unwrap();
        let b = slot_offset(1).unwrap();
        assert_eq!(b - a, MEMORY_LENGTH);
        assert_eq!(slot_offset(MEMORY_SLOTS), Err(RigError::InvalidSlot));
        let last = slot_offset(MEMORY_SLOTS - 1).unwrap();
        assert!(last + MEMORY_LENGTH <= EEPROM_SIZE);
    }

    #[test]
    fn erased_slot_is_empty() {
        let mut storage = RamStorage::<EEPROM_SIZE>::new();
        assert!(load_memory(&mut storage, 2).unwrap().is_empty());
        assert!(transmit_memory(&mut storage, 2, CodecOptions::default())
            .unwrap()
            .is_none());
    }
}
