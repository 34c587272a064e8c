//! Persistent settings over a byte-addressable store
//!
//! The store has no transactional guarantees. Values are sanity-checked
//! when they are loaded and replaced by compiled-in defaults when they
//! are out of range; only an I/O failure is reported as an error.

use core::fmt;

use crate::config::{
    eeprom, CAL_CORRECTION_LIMIT, DEFAULT_BAND, DEFAULT_IF_FREQ, IF_FREQ_MAX, IF_FREQ_MIN,
    KEY_MAX_SPEED, KEY_MIN_SPEED, WPM_DEFAULT,
};
use crate::types::{Band, Frequency};

/// Storage I/O failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// Access past the end of the device
    OutOfBounds,
    /// The device did not respond or reported an error
    Device,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("out of bounds"),
            Self::Device => f.write_str("device error"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for StorageError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::OutOfBounds => defmt::write!(f, "OutOfBounds"),
            Self::Device => defmt::write!(f, "Device"),
        }
    }
}

/// Byte-addressable persistent store
pub trait Storage {
    /// Fill `buf` from `offset`
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the range leaves the device, `Device` on I/O failure.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` at `offset`
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the range leaves the device, `Device` on I/O failure.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    /// Device size in bytes
    fn capacity(&self) -> usize;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        (**self).write(offset, data)
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}

/// In-memory store with dirty-range tracking
///
/// Used directly by host tests and as the RAM mirror of the EEPROM on
/// the target, where the dirty range tells the writer what to flush.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RamStorage<const N: usize> {
    bytes: [u8; N],
    dirty: Option<(usize, usize)>,
}

impl<const N: usize> RamStorage<N> {
    /// Erased store, every byte `0xFF`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; N],
            dirty: None,
        }
    }

    /// Store preloaded from a device image
    #[must_use]
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes, dirty: None }
    }

    /// Full contents
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Byte range written since the last call, as `start..end`
    pub fn take_dirty(&mut self) -> Option<core::ops::Range<usize>> {
        self.dirty.take().map(|(start, end)| start..end)
    }

    fn check(offset: usize, len: usize) -> Result<(), StorageError> {
        match offset.checked_add(len) {
            Some(end) if end <= N => Ok(()),
            _ => Err(StorageError::OutOfBounds),
        }
    }
}

impl<const N: usize> Default for RamStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Storage for RamStorage<N> {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        Self::check(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        Self::check(offset, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        let end = offset + data.len();
        self.bytes[offset..end].copy_from_slice(data);
        self.dirty = Some(match self.dirty {
            Some((start, old_end)) => (start.min(offset), old_end.max(end)),
            None => (offset, end),
        });
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

/// Which stored values were replaced by defaults on load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Recovered {
    /// IF frequency was out of range
    pub if_freq: bool,
    /// Band index was unknown
    pub band: bool,
    /// Speed was out of range
    pub speed: bool,
    /// Calibration correction was out of range
    pub correction: bool,
}

impl Recovered {
    /// Any value was replaced
    #[must_use]
    pub const fn any(&self) -> bool {
        self.if_freq || self.band || self.speed || self.correction
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Recovered {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Recovered(if={}, band={}, speed={}, cal={})",
            self.if_freq,
            self.band,
            self.speed,
            self.correction
        );
    }
}

/// Persisted rig settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// IF frequency of the crystal filter
    pub if_freq: Frequency,
    /// Selected band
    pub band: Band,
    /// Keying speed in WPM
    pub speed: u8,
    /// Synthesizer calibration correction
    pub correction: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            if_freq: DEFAULT_IF_FREQ,
            band: DEFAULT_BAND,
            speed: WPM_DEFAULT,
            correction: 0,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Settings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Settings(if={}, {}, {=u8} wpm, cal={=i32})",
            self.if_freq,
            self.band,
            self.speed,
            self.correction
        );
    }
}

fn read_u32<S: Storage + ?Sized>(storage: &mut S, offset: usize) -> Result<u32, StorageError> {
    let mut buf = [0u8; 4];
    storage.read(offset, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u8<S: Storage + ?Sized>(storage: &mut S, offset: usize) -> Result<u8, StorageError> {
    let mut buf = [0u8; 1];
    storage.read(offset, &mut buf)?;
    Ok(buf[0])
}

impl Settings {
    /// Load and sanity-check the stored settings
    ///
    /// # Errors
    ///
    /// Only I/O failures; out-of-range values come back as defaults with
    /// the matching [`Recovered`] flag set.
    pub fn load<S: Storage + ?Sized>(storage: &mut S) -> Result<(Self, Recovered), StorageError> {
        let defaults = Self::default();
        let mut recovered = Recovered::default();

        let raw_if = Frequency::from_units(read_u32(storage, eeprom::IF_FREQ)?);
        let if_freq = if (IF_FREQ_MIN..=IF_FREQ_MAX).contains(&raw_if) {
            raw_if
        } else {
            recovered.if_freq = true;
            defaults.if_freq
        };

        let band = Band::from_index(read_u8(storage, eeprom::BAND)?).unwrap_or_else(|| {
            recovered.band = true;
            defaults.band
        });

        let raw_speed = read_u8(storage, eeprom::CW_SPEED)?;
        let speed = if (KEY_MIN_SPEED..=KEY_MAX_SPEED).contains(&raw_speed) {
            raw_speed
        } else {
            recovered.speed = true;
            defaults.speed
        };

        let raw_cal = read_u32(storage, eeprom::CAL_VALUE)?;
        // An erased cell reads as all ones, which is not a stored value
        #[allow(clippy::cast_possible_wrap)]
        let correction = match raw_cal as i32 {
            _ if raw_cal == u32::MAX => {
                recovered.correction = true;
                defaults.correction
            }
            c if (-CAL_CORRECTION_LIMIT..=CAL_CORRECTION_LIMIT).contains(&c) => c,
            _ => {
                recovered.correction = true;
                defaults.correction
            }
        };

        if recovered.any() {
            warn!("settings replaced by defaults");
        }

        Ok((
            Self {
                if_freq,
                band,
                speed,
                correction,
            },
            recovered,
        ))
    }

    /// Write every field
    ///
    /// # Errors
    ///
    /// Propagates the first I/O failure.
    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        save_if_freq(storage, self.if_freq)?;
        save_band(storage, self.band)?;
        save_speed(storage, self.speed)?;
        save_correction(storage, self.correction)
    }
}

/// Persist the IF frequency
///
/// # Errors
///
/// Propagates the I/O failure.
pub fn save_if_freq<S: Storage + ?Sized>(storage: &mut S, f: Frequency) -> Result<(), StorageError> {
    storage.write(eeprom::IF_FREQ, &f.as_units().to_le_bytes())
}

/// Persist the band
///
/// # Errors
///
/// Propagates the I/O failure.
pub fn save_band<S: Storage + ?Sized>(storage: &mut S, band: Band) -> Result<(), StorageError> {
    storage.write(eeprom::BAND, &[band.index()])
}

/// Persist the keying speed
///
/// # Errors
///
/// Propagates the I/O failure.
pub fn save_speed<S: Storage + ?Sized>(storage: &mut S, wpm: u8) -> Result<(), StorageError> {
    storage.write(eeprom::CW_SPEED, &[wpm])
}

/// Persist the calibration correction
///
/// # Errors
///
/// Propagates the I/O failure.
pub fn save_correction<S: Storage + ?Sized>(
    storage: &mut S,
    correction: i32,
) -> Result<(), StorageError> {
    storage.write(eeprom::CAL_VALUE, &correction.to_le_bytes())
}

/// Erase the whole store to `0xFF`
///
/// # Errors
///
/// Propagates the first I/O failure.
pub fn erase<S: Storage + ?Sized>(storage: &mut S) -> Result<(), StorageError> {
    const CHUNK: [u8; 16] = [0xFF; 16];
    let capacity = storage.capacity();
    let mut offset = 0;
    while offset < capacity {
        let len = CHUNK.len().min(capacity - offset);
        storage.write(offset, &CHUNK[..len])?;
        offset += len;
    }
    info!("storage erased ({=usize} bytes)", capacity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_storage_bounds() {
        let mut s = RamStorage::<8>::new();
        assert_eq!(s.write(6, &[1, 2, 3]), Err(StorageError::OutOfBounds));
        assert_eq!(s.write(usize::MAX, &[1]), Err(StorageError::OutOfBounds));
        assert!(s.write(6, &[1, 2]).is_ok());
        let mut buf = [0u8; 2];
        s.read(6, &mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
    }

    #[test]
    fn dirty_range_merges() {
        let mut s = RamStorage::<32>::new();
        s.write(4, &[0]).unwrap();
        s.write(10, &[0, 0]).unwrap();
        assert_eq!(s.take_dirty(), Some(4..12));
        assert_eq!(s.take_dirty(), None);
    }

    #[test]
    fn erased_store_loads_defaults() {
        let mut s = RamStorage::<64>::new();
        let (settings, recovered) = Settings::load(&mut s).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(recovered.if_freq && recovered.band && recovered.speed && recovered.correction);
    }
}
