//! I2C EEPROM Mirror
//!
//! The whole 24LC04 is read into RAM at startup. The rig reads and
//! writes the mirror synchronously; [`Eeprom::flush`] writes the dirty
//! range back page by page. A device that fails to load stays offline
//! and every access reports [`StorageError::Device`], which the rig
//! turns into a startup fault.

use embedded_hal_async::i2c::I2c;

use crate::config::{EEPROM_PAGE_SIZE, EEPROM_SIZE};
use crate::hal::i2c::{I2cAddress, I2cBus};
use crate::hal::timer::write_cycle;
use crate::storage::{RamStorage, Storage, StorageError};

/// RAM mirror of the settings EEPROM
pub struct Eeprom {
    mirror: RamStorage<EEPROM_SIZE>,
    online: bool,
}

impl Eeprom {
    /// Read the device into a fresh mirror
    pub async fn load<I: I2c>(bus: &mut I2cBus<I>) -> Self {
        let mut bytes = [0xFF; EEPROM_SIZE];
        for (block, chunk) in bytes.chunks_mut(256).enumerate() {
            let offset = block * 256;
            if bus
                .write_read(I2cAddress::eeprom_block(offset), &[0], chunk)
                .await
                .is_err()
            {
                error!("EEPROM block {=usize} unreadable", block);
                return Self::offline();
            }
        }
        info!("EEPROM loaded ({=usize} bytes)", EEPROM_SIZE);
        Self {
            mirror: RamStorage::from_bytes(bytes),
            online: true,
        }
    }

    /// Mirror for a missing device
    #[must_use]
    pub const fn offline() -> Self {
        Self {
            mirror: RamStorage::new(),
            online: false,
        }
    }

    /// The device answered at startup and every flush since
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.online
    }

    /// Write everything changed since the last flush
    ///
    /// # Errors
    ///
    /// Bus error; the device is taken offline.
    pub async fn flush<I: I2c>(&mut self, bus: &mut I2cBus<I>) -> Result<(), I::Error> {
        let Some(range) = self.mirror.take_dirty() else {
            return Ok(());
        };
        debug!("EEPROM flush {=usize}..{=usize}", range.start, range.end);

        let mut offset = range.start;
        while offset < range.end {
            // Writes may not cross a page boundary
            let page_end = (offset / EEPROM_PAGE_SIZE + 1) * EEPROM_PAGE_SIZE;
            let end = page_end.min(range.end);
            let data = &self.mirror.as_bytes()[offset..end];
            #[allow(clippy::cast_possible_truncation)]
            let word = offset as u8;
            if let Err(e) = bus
                .write_prefixed(I2cAddress::eeprom_block(offset), word, data)
                .await
            {
                self.online = false;
                return Err(e);
            }
            write_cycle().await;
            offset = end;
        }
        Ok(())
    }
}

impl Storage for Eeprom {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        if !self.online {
            return Err(StorageError::Device);
        }
        self.mirror.read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        if !self.online {
            return Err(StorageError::Device);
        }
        self.mirror.write(offset, data)
    }

    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }
}
