//! Error types
//!
//! Recoverable errors are [`RigError`]; conditions the rig cannot continue
//! from are a [`Fault`], which only the state machine acts on by entering
//! the ERROR state.

use core::fmt;

use crate::storage::StorageError;

/// Recoverable rig error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigError {
    /// The settings store failed a read or write
    Storage(StorageError),
    /// The composition buffer has no room for another character
    MemoryFull,
    /// Requested keying speed lies outside the supported range
    SpeedOutOfRange,
    /// Memory slot index does not exist
    InvalidSlot,
    /// Frequency lies outside every band
    OutOfBand,
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::MemoryFull => f.write_str("memory full"),
            Self::SpeedOutOfRange => f.write_str("speed out of range"),
            Self::InvalidSlot => f.write_str("invalid memory slot"),
            Self::OutOfBand => f.write_str("frequency out of band"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RigError {}

#[cfg(feature = "embedded")]
impl defmt::Format for RigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Storage(e) => defmt::write!(f, "Storage({})", e),
            Self::MemoryFull => defmt::write!(f, "MemoryFull"),
            Self::SpeedOutOfRange => defmt::write!(f, "SpeedOutOfRange"),
            Self::InvalidSlot => defmt::write!(f, "InvalidSlot"),
            Self::OutOfBand => defmt::write!(f, "OutOfBand"),
        }
    }
}

impl From<StorageError> for RigError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Result type for rig operations
pub type Result<T> = core::result::Result<T, RigError>;

/// Condition that puts the rig into the ERROR state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Settings could not be read at startup
    StorageFailure,
    /// Mode and keyer or transmitter state disagree
    ImpossibleState,
    /// A driver reported a hardware failure
    Hardware,
}

impl Fault {
    /// Code shown on the display
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::StorageFailure => 1,
            Self::ImpossibleState => 2,
            Self::Hardware => 3,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERR {:02}", self.code())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Fault {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Fault({=u8})", self.code());
    }
}
