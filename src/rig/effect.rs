//! Entry and exit effects per mode
//!
//! The controller runs the old mode's exit effects, then the new mode's
//! entry effects, then the transition's action.

use super::RigMode;

/// Side effect tied to entering or leaving a mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Drive transmitter and sidetone off unconditionally
    AllOff,
    /// Unkey whatever is keyed
    KeyUp,
    /// Receiver mute
    Mute(bool),
    /// Program the synthesizer for the transmit frequency
    RetuneTx,
    /// Program the synthesizer for the receive frequency
    RetuneRx,
    /// Key a continuous carrier
    Carrier,
    /// Track the tune carrier in the rig state
    TuneFlag(bool),
    /// Key Engine uses the operator's keying mode
    KeyerPreferred,
    /// Key Engine forced to iambic
    ForceIambic,
    /// Key Engine listens to the paddles
    PaddleKeying,
    /// Key Engine stopped
    DisableKeyer,
    /// Start sending the selected memory
    StartPlayback,
    /// Play the recording on the sidetone
    ReviewPlayback,
    /// Remember the speed for a cancel
    CaptureSpeed,
    /// Band selection starts at the current band
    CaptureBand,
    /// Forget entered digits
    ClearDfe,
    /// Empty the composition buffer
    ClearRecording,
    /// Remember the calibration for an abort
    CaptureCalibration,
    /// Redraw on the next idle poll
    Invalidate,
}

use Effect::{
    AllOff, CaptureBand, CaptureCalibration, CaptureSpeed, Carrier, ClearDfe, ClearRecording,
    DisableKeyer, ForceIambic, Invalidate, KeyUp, KeyerPreferred, Mute, PaddleKeying, RetuneRx,
    RetuneTx, ReviewPlayback, StartPlayback, TuneFlag,
};

/// Effects run when `mode` becomes active
#[must_use]
pub const fn on_entry(mode: RigMode) -> &'static [Effect] {
    match mode {
        RigMode::Startup => &[AllOff, ForceIambic, Invalidate],
        RigMode::Default => &[KeyerPreferred, RetuneRx, Invalidate],
        RigMode::Keying => &[Mute(true), RetuneTx, Invalidate],
        RigMode::AdjustCs => &[ForceIambic, CaptureSpeed, Invalidate],
        RigMode::Tune => &[ForceIambic, Mute(true), RetuneTx, Carrier, TuneFlag(true), Invalidate],
        RigMode::ChangeBand | RigMode::CalibrationChangeBand => {
            &[ForceIambic, CaptureBand, Invalidate]
        }
        RigMode::Dfe => &[ForceIambic, ClearDfe, Invalidate],
        RigMode::MemSendTx => &[ForceIambic, Mute(true), RetuneTx, StartPlayback, Invalidate],
        RigMode::MemEnter => &[ForceIambic, ClearRecording, Invalidate],
        RigMode::MemEnterReview => &[ForceIambic, ReviewPlayback, Invalidate],
        RigMode::CalibrationCorrection => &[ForceIambic, CaptureCalibration, Invalidate],
        RigMode::MemSendWait
        | RigMode::MemEnterWait
        | RigMode::CalibrationPeakIf
        | RigMode::CalibrationPeakRx => &[ForceIambic, Invalidate],
        RigMode::Error => &[AllOff, Mute(false), ForceIambic, DisableKeyer, Invalidate],
    }
}

/// Effects run when `mode` is left
#[must_use]
pub const fn on_exit(mode: RigMode) -> &'static [Effect] {
    match mode {
        RigMode::Keying => &[KeyUp, Mute(false), RetuneRx],
        RigMode::Tune => &[KeyUp, TuneFlag(false), Mute(false), RetuneRx],
        RigMode::MemSendTx => &[PaddleKeying, KeyUp, Mute(false), RetuneRx],
        RigMode::MemEnterReview => &[PaddleKeying, KeyUp],
        RigMode::AdjustCs | RigMode::MemEnter => &[KeyUp],
        RigMode::Error => &[PaddleKeying],
        RigMode::Startup
        | RigMode::Default
        | RigMode::ChangeBand
        | RigMode::Dfe
        | RigMode::MemSendWait
        | RigMode::MemEnterWait
        | RigMode::CalibrationCorrection
        | RigMode::CalibrationPeakIf
        | RigMode::CalibrationChangeBand
        | RigMode::CalibrationPeakRx => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [RigMode; 17] = [
        RigMode::Startup,
        RigMode::Default,
        RigMode::Keying,
        RigMode::AdjustCs,
        RigMode::Tune,
        RigMode::ChangeBand,
        RigMode::Dfe,
        RigMode::MemSendWait,
        RigMode::MemSendTx,
        RigMode::MemEnterWait,
        RigMode::MemEnter,
        RigMode::MemEnterReview,
        RigMode::CalibrationCorrection,
        RigMode::CalibrationPeakIf,
        RigMode::CalibrationChangeBand,
        RigMode::CalibrationPeakRx,
        RigMode::Error,
    ];

    #[test]
    fn only_default_and_keying_keep_straight_key() {
        for mode in ALL_MODES {
            let forces = on_entry(mode).contains(&ForceIambic);
            assert_eq!(forces, !mode.allows_straight(), "{mode:?}");
        }
    }

    #[test]
    fn transmitting_modes_unkey_on_exit() {
        for mode in ALL_MODES.into_iter().filter(|m| m.transmits()) {
            assert!(on_exit(mode).contains(&KeyUp), "{mode:?}");
            assert!(on_exit(mode).contains(&Mute(false)), "{mode:?}");
        }
    }

    #[test]
    fn error_silences_everything() {
        let entry = on_entry(RigMode::Error);
        assert!(entry.contains(&AllOff));
        assert!(entry.contains(&DisableKeyer));
    }
}
