//! I2C Bus Abstractions
//!
//! One bus carries the EEPROM, the `Si5351A` and the display. Drivers
//! never own it; the main loop lends it to each flush in turn.

use embedded_hal_async::i2c::I2c;

use crate::config::{DISPLAY_I2C_ADDR, EEPROM_I2C_ADDR, SI5351_I2C_ADDR};

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// `Si5351A` clock synthesizer
    pub const SI5351: Self = Self(SI5351_I2C_ADDR);

    /// SSD1306 OLED display
    pub const SSD1306: Self = Self(DISPLAY_I2C_ADDR);

    /// Address from its low seven bits
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// EEPROM block holding byte `offset`; the block number rides in the
    /// low address bits
    #[must_use]
    pub const fn eeprom_block(offset: usize) -> Self {
        Self::new(EEPROM_I2C_ADDR | ((offset >> 8) as u8 & 0x07))
    }

    /// Raw 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{=u8:02X}", self.0);
    }
}

/// Register-oriented helpers over any async I2C bus
pub struct I2cBus<I: I2c> {
    i2c: I,
}

impl<I: I2c> I2cBus<I> {
    /// Wrap a bus
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Plain write transaction
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn write(&mut self, addr: I2cAddress, data: &[u8]) -> Result<(), I::Error> {
        self.i2c.write(addr.addr(), data).await
    }

    /// Write, repeated start, read
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn write_read(
        &mut self,
        addr: I2cAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I::Error> {
        self.i2c.write_read(addr.addr(), write, read).await
    }

    /// Set one register
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn write_reg(&mut self, addr: I2cAddress, reg: u8, value: u8) -> Result<(), I::Error> {
        self.i2c.write(addr.addr(), &[reg, value]).await
    }

    /// Fetch one register
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn read_reg(&mut self, addr: I2cAddress, reg: u8) -> Result<u8, I::Error> {
        let mut buf = [0u8];
        self.i2c.write_read(addr.addr(), &[reg], &mut buf).await?;
        Ok(buf[0])
    }

    /// Write up to 32 bytes behind a one-byte prefix (register or word address)
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn write_prefixed(
        &mut self,
        addr: I2cAddress,
        prefix: u8,
        data: &[u8],
    ) -> Result<(), I::Error> {
        let mut buf = [0u8; 33];
        let len = data.len().min(32);
        buf[0] = prefix;
        buf[1..=len].copy_from_slice(&data[..len]);
        self.i2c.write(addr.addr(), &buf[..=len]).await
    }

    /// Addresses that acknowledge a one-byte read
    pub async fn scan(&mut self) -> heapless::Vec<I2cAddress, 16> {
        let mut devices = heapless::Vec::new();
        for addr in 0x08..0x78 {
            let mut buf = [0u8; 1];
            if self.i2c.read(addr, &mut buf).await.is_ok() {
                let _ = devices.push(I2cAddress::new(addr));
            }
        }
        devices
    }
}

/// Shadow copy of a device's registers with per-register dirty bits
pub struct RegisterMap<const N: usize> {
    values: [u8; N],
    dirty: [bool; N],
}

impl<const N: usize> RegisterMap<N> {
    /// All registers zero and clean
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; N],
            dirty: [false; N],
        }
    }

    /// Set a register; marks it dirty when the value changes
    pub fn set(&mut self, reg: usize, value: u8) {
        if reg < N && self.values[reg] != value {
            self.values[reg] = value;
            self.dirty[reg] = true;
        }
    }

    /// Set consecutive registers from `base`
    pub fn set_all(&mut self, base: usize, values: &[u8]) {
        for (i, &value) in values.iter().enumerate() {
            self.set(base + i, value);
        }
    }

    /// Shadow value of `reg`, zero past the end
    #[must_use]
    pub fn get(&self, reg: usize) -> u8 {
        self.values.get(reg).copied().unwrap_or(0)
    }

    /// Something is waiting to be written
    #[must_use]
    pub fn any_dirty(&self) -> bool {
        self.dirty.contains(&true)
    }

    /// Forget pending writes, e.g. after they went out
    pub fn mark_all_clean(&mut self) {
        self.dirty = [false; N];
    }

    /// Dirty registers as `(register, value)`, lowest first
    pub fn dirty_regs(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.dirty
            .iter()
            .enumerate()
            .filter(|(_, &d)| d)
            .map(|(i, _)| (i, self.values[i]))
    }
}

impl<const N: usize> Default for RegisterMap<N> {
    fn default() -> Self {
        Self::new()
    }
}
