//! Keyer-button menu
//!
//! The menu has no screen of its own. Holding the keyer button walks
//! through the entries, one per `MENU_STEP_TICKS`, and the display asks
//! for the current one. Releasing selects it.

use crate::config::MENU_STEP_TICKS;

use super::RigMode;

/// Menu entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    /// Keying speed
    Speed,
    /// Band selection
    Band,
    /// Tune carrier
    Tune,
    /// Direct frequency entry
    Freq,
    /// Send a memory
    Send,
    /// Record a memory
    Enter,
    /// Beacon on or off
    Beacon,
    /// Iambic or straight key
    KeyMode,
    /// Calibration sequence
    Calibrate,
}

impl MenuItem {
    /// Every entry in hold order
    pub const ALL: [Self; 9] = [
        Self::Speed,
        Self::Band,
        Self::Tune,
        Self::Freq,
        Self::Send,
        Self::Enter,
        Self::Beacon,
        Self::KeyMode,
        Self::Calibrate,
    ];

    /// Number of entries
    pub const COUNT: usize = Self::ALL.len();

    /// Entry selected by holding the button for `held` ticks
    ///
    /// Holding past the last entry keeps selecting it.
    #[must_use]
    pub fn from_hold(held: u32) -> Self {
        let index = usize::try_from(held / MENU_STEP_TICKS).unwrap_or(usize::MAX);
        Self::ALL[index.min(Self::COUNT - 1)]
    }

    /// Display prompt
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Speed => "SPEED?",
            Self::Band => "BAND?",
            Self::Tune => "TUNE?",
            Self::Freq => "FREQ?",
            Self::Send => "SEND MEM?",
            Self::Enter => "ENTER MEM?",
            Self::Beacon => "BEACON?",
            Self::KeyMode => "KEY MODE?",
            Self::Calibrate => "CALIBRATE?",
        }
    }

    /// Mode the entry opens; `None` for toggles
    #[must_use]
    pub const fn target(self) -> Option<RigMode> {
        match self {
            Self::Speed => Some(RigMode::AdjustCs),
            Self::Band => Some(RigMode::ChangeBand),
            Self::Tune => Some(RigMode::Tune),
            Self::Freq => Some(RigMode::Dfe),
            Self::Send => Some(RigMode::MemSendWait),
            Self::Enter => Some(RigMode::MemEnterWait),
            Self::Calibrate => Some(RigMode::CalibrationCorrection),
            Self::Beacon | Self::KeyMode => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for MenuItem {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label());
    }
}
