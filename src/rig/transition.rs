//! Pure transition function
//!
//! `transition(mode, event)` names the next mode, if any, and one action
//! for the controller to perform. It never touches hardware, so every
//! path through the state machine can be checked directly.

use crate::error::Fault;
use crate::key::KeyEvent;

use super::{MenuItem, RigEvent, RigMode};

/// Work the controller performs for a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Action {
    /// Nothing
    #[default]
    None,
    /// Read settings from storage
    LoadSettings,
    /// Move the VFO by encoder detents
    Tune(i8),
    /// Next tuning step
    NextStep,
    /// RIT on or off
    ToggleRit,
    /// Erase the settings store
    EraseStorage,
    /// Key the transmitter and sidetone
    Transmit(KeyEvent),
    /// Key the sidetone only
    Sidetone(KeyEvent),
    /// Key the sidetone and record the character
    Record(KeyEvent),
    /// Append a word space to the recording
    AppendSpace,
    /// Beacon on or off
    ToggleBeacon,
    /// Iambic or straight key
    ToggleKeyMode,
    /// Change keying speed by detents
    AdjustSpeed(i8),
    /// Persist the keying speed
    SaveSpeed,
    /// Return to the speed captured on entry
    RestoreSpeed,
    /// Move the band selection
    CycleBand(i8),
    /// Switch to the selected band and persist it
    ConfirmBand,
    /// Change the frequency digit being entered
    DfeDigit(i8),
    /// Accept the current digit
    DfeNext,
    /// Jump to the entered frequency
    ApplyDfe,
    /// Move the slot selection for sending
    SelectSendSlot(i8),
    /// Move the slot selection for recording
    SelectEnterSlot(i8),
    /// Hand the Key Engine back to the paddles
    StopPlayback,
    /// Beacon transmission finished; restart the interval
    MarkBeacon,
    /// Playback cancelled; the beacon stops too
    StopBeacon,
    /// Nothing in the selected memory
    ReportEmpty,
    /// Recording ran out of room
    ReportFull,
    /// Write the recording to the selected slot
    StoreBuffer,
    /// Throw the recording away
    DiscardBuffer,
    /// Change the reference correction by detents
    AdjustCorrection(i8),
    /// Change the IF by detents
    AdjustIf(i8),
    /// Persist the calibration
    FinishCalibration,
    /// Return to the calibration captured on entry
    RestoreCalibration,
}

/// Result of [`transition`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Transition {
    /// Mode to enter; `None` stays
    pub next: Option<RigMode>,
    /// Work to perform after any mode change
    pub action: Action,
}

const fn stay(action: Action) -> Transition {
    Transition { next: None, action }
}

const fn go(mode: RigMode, action: Action) -> Transition {
    Transition {
        next: Some(mode),
        action,
    }
}

const IGNORE: Transition = stay(Action::None);

/// Next mode and action for `event` in `mode`
#[must_use]
pub fn transition(mode: RigMode, event: &RigEvent) -> Transition {
    use RigEvent as E;
    use RigMode as M;

    match (mode, *event) {
        // ERROR is left only through a reset
        (M::Error, E::Reset) => go(M::Startup, Action::LoadSettings),
        (M::Error, _) => IGNORE,
        (_, E::Fault(_)) => go(M::Error, Action::None),
        (_, E::Reset) => go(M::Startup, Action::LoadSettings),

        (M::Startup, E::Boot) => stay(Action::LoadSettings),
        (M::Startup, E::Loaded) => go(M::Default, Action::None),
        (M::Startup, _) => IGNORE,

        (M::Default, event) => default_mode(event),

        (M::Keying, E::Key(KeyEvent::End)) => go(M::Default, Action::None),
        (M::Keying, E::Key(key)) => stay(Action::Transmit(key)),
        (M::Keying, _) => IGNORE,

        (M::AdjustCs, E::EncoderTurn(d)) => stay(Action::AdjustSpeed(d)),
        (M::AdjustCs, E::EncoderPress) => go(M::Default, Action::SaveSpeed),
        (M::AdjustCs, E::RitPress | E::KeyerRelease { .. }) => {
            go(M::Default, Action::RestoreSpeed)
        }
        (M::AdjustCs, E::Key(key)) => stay(Action::Sidetone(key)),
        (M::AdjustCs, _) => IGNORE,

        (M::Tune, E::EncoderPress | E::RitPress | E::KeyerRelease { .. }) => {
            go(M::Default, Action::None)
        }
        (M::Tune, _) => IGNORE,

        (M::ChangeBand, E::EncoderTurn(d)) => stay(Action::CycleBand(d)),
        (M::ChangeBand, E::EncoderPress) => go(M::Default, Action::ConfirmBand),
        (M::ChangeBand, E::RitPress | E::KeyerRelease { .. }) => go(M::Default, Action::None),
        (M::ChangeBand, _) => IGNORE,

        (M::Dfe, E::EncoderTurn(d)) => stay(Action::DfeDigit(d)),
        (M::Dfe, E::EncoderPress) => stay(Action::DfeNext),
        (M::Dfe, E::EntryComplete) => go(M::Default, Action::ApplyDfe),
        (M::Dfe, E::RitPress | E::KeyerRelease { .. }) => go(M::Default, Action::None),
        (M::Dfe, _) => IGNORE,

        (M::MemSendWait, E::EncoderTurn(d)) => stay(Action::SelectSendSlot(d)),
        (M::MemSendWait, E::EncoderPress) => go(M::MemSendTx, Action::None),
        (M::MemSendWait, E::RitPress | E::KeyerRelease { .. }) => go(M::Default, Action::None),
        (M::MemSendWait, _) => IGNORE,

        (M::MemSendTx, E::Key(key)) => stay(Action::Transmit(key)),
        (M::MemSendTx, E::PlaybackDone) => go(M::Default, Action::MarkBeacon),
        (M::MemSendTx, E::SlotEmpty) => go(M::Default, Action::ReportEmpty),
        (
            M::MemSendTx,
            E::PlaybackAborted | E::EncoderPress | E::RitPress | E::KeyerRelease { .. },
        ) => go(M::Default, Action::StopBeacon),
        (M::MemSendTx, _) => IGNORE,

        (M::MemEnterWait, E::EncoderTurn(d)) => stay(Action::SelectEnterSlot(d)),
        (M::MemEnterWait, E::EncoderPress) => go(M::MemEnter, Action::None),
        (M::MemEnterWait, E::RitPress | E::KeyerRelease { .. }) => go(M::Default, Action::None),
        (M::MemEnterWait, _) => IGNORE,

        (M::MemEnter, E::Key(key)) => stay(Action::Record(key)),
        (M::MemEnter, E::WordSpace) => stay(Action::AppendSpace),
        (M::MemEnter, E::MemoryFull) => go(M::MemEnterReview, Action::ReportFull),
        (M::MemEnter, E::EncoderPress) => go(M::MemEnterReview, Action::None),
        (M::MemEnter, E::RitPress | E::KeyerRelease { .. }) => {
            go(M::Default, Action::DiscardBuffer)
        }
        (M::MemEnter, _) => IGNORE,

        (M::MemEnterReview, E::Key(key)) => stay(Action::Sidetone(key)),
        (M::MemEnterReview, E::PlaybackDone | E::PlaybackAborted) => {
            stay(Action::StopPlayback)
        }
        (M::MemEnterReview, E::EncoderPress) => go(M::Default, Action::StoreBuffer),
        (M::MemEnterReview, E::RitPress | E::KeyerRelease { .. }) => {
            go(M::Default, Action::DiscardBuffer)
        }
        (M::MemEnterReview, _) => IGNORE,

        (M::CalibrationCorrection, E::EncoderTurn(d)) => stay(Action::AdjustCorrection(d)),
        (M::CalibrationCorrection, E::EncoderPress) => go(M::CalibrationPeakIf, Action::None),
        (M::CalibrationPeakIf, E::EncoderTurn(d)) => stay(Action::AdjustIf(d)),
        (M::CalibrationPeakIf, E::EncoderPress) => go(M::CalibrationChangeBand, Action::None),
        (M::CalibrationChangeBand, E::EncoderTurn(d)) => stay(Action::CycleBand(d)),
        (M::CalibrationChangeBand, E::EncoderPress) => {
            go(M::CalibrationPeakRx, Action::ConfirmBand)
        }
        (M::CalibrationPeakRx, E::EncoderTurn(d)) => stay(Action::Tune(d)),
        (M::CalibrationPeakRx, E::EncoderPress) => go(M::Default, Action::FinishCalibration),
        (
            M::CalibrationCorrection
            | M::CalibrationPeakIf
            | M::CalibrationChangeBand
            | M::CalibrationPeakRx,
            E::RitPress | E::KeyerRelease { .. },
        ) => go(M::Default, Action::RestoreCalibration),
        (
            M::CalibrationCorrection
            | M::CalibrationPeakIf
            | M::CalibrationChangeBand
            | M::CalibrationPeakRx,
            _,
        ) => IGNORE,
    }
}

fn default_mode(event: RigEvent) -> Transition {
    use RigEvent as E;

    match event {
        E::EncoderTurn(d) => stay(Action::Tune(d)),
        E::EncoderPress => stay(Action::NextStep),
        E::RitPress => stay(Action::ToggleRit),
        E::RitHold => stay(Action::EraseStorage),
        E::KeyerRelease { held } => {
            let item = MenuItem::from_hold(held);
            match item.target() {
                Some(mode) => go(mode, Action::None),
                None if item == MenuItem::Beacon => stay(Action::ToggleBeacon),
                None => stay(Action::ToggleKeyMode),
            }
        }
        E::Key(key) if key.is_key_down() => go(RigMode::Keying, Action::Transmit(key)),
        E::BeaconDue => go(RigMode::MemSendTx, Action::None),
        _ => IGNORE,
    }
}

/// The fault an event carries, if any
#[must_use]
pub const fn fault_of(event: &RigEvent) -> Option<Fault> {
    match event {
        RigEvent::Fault(fault) => Some(*fault),
        _ => None,
    }
}
