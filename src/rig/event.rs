//! Inputs to the state machine

use crate::error::Fault;
use crate::key::KeyEvent;
use crate::tick::{Button, ButtonEvent};

/// Something the state machine reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigEvent {
    /// Power-on
    Boot,
    /// Settings have been loaded
    Loaded,
    /// Encoder moved by this many detents
    EncoderTurn(i8),
    /// Encoder button released
    EncoderPress,
    /// RIT button released before the long-press threshold
    RitPress,
    /// RIT button held past the long-press threshold
    RitHold,
    /// Keyer button released after `held` ticks
    KeyerRelease {
        /// Hold duration in ticks
        held: u32,
    },
    /// Key Engine output
    Key(KeyEvent),
    /// Playback has sent its last character
    PlaybackDone,
    /// A paddle was touched during playback
    PlaybackAborted,
    /// The beacon interval has elapsed
    BeaconDue,
    /// Enough silence after a recorded character for a word space
    WordSpace,
    /// The last frequency digit has been entered
    EntryComplete,
    /// The selected memory is empty
    SlotEmpty,
    /// The composition buffer is full
    MemoryFull,
    /// Unrecoverable condition
    Fault(Fault),
    /// Explicit reset input
    Reset,
}

impl RigEvent {
    /// Translate a latched button event
    #[must_use]
    pub const fn from_button(event: ButtonEvent) -> Option<Self> {
        match event {
            ButtonEvent::Released {
                button: Button::Encoder,
                ..
            } => Some(Self::EncoderPress),
            ButtonEvent::Released {
                button: Button::Rit,
                long: false,
                ..
            } => Some(Self::RitPress),
            ButtonEvent::LongPress(Button::Rit) => Some(Self::RitHold),
            ButtonEvent::Released {
                button: Button::Keyer,
                held,
                ..
            } => Some(Self::KeyerRelease { held }),
            ButtonEvent::Released {
                button: Button::Rit,
                long: true,
                ..
            }
            | ButtonEvent::LongPress(_) => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RigEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Boot => defmt::write!(f, "Boot"),
            Self::Loaded => defmt::write!(f, "Loaded"),
            Self::EncoderTurn(d) => defmt::write!(f, "EncoderTurn({=i8})", d),
            Self::EncoderPress => defmt::write!(f, "EncoderPress"),
            Self::RitPress => defmt::write!(f, "RitPress"),
            Self::RitHold => defmt::write!(f, "RitHold"),
            Self::KeyerRelease { held } => defmt::write!(f, "KeyerRelease({=u32})", held),
            Self::Key(e) => defmt::write!(f, "Key({})", e),
            Self::PlaybackDone => defmt::write!(f, "PlaybackDone"),
            Self::PlaybackAborted => defmt::write!(f, "PlaybackAborted"),
            Self::BeaconDue => defmt::write!(f, "BeaconDue"),
            Self::WordSpace => defmt::write!(f, "WordSpace"),
            Self::EntryComplete => defmt::write!(f, "EntryComplete"),
            Self::SlotEmpty => defmt::write!(f, "SlotEmpty"),
            Self::MemoryFull => defmt::write!(f, "MemoryFull"),
            Self::Fault(fault) => defmt::write!(f, "Fault({})", fault),
            Self::Reset => defmt::write!(f, "Reset"),
        }
    }
}
