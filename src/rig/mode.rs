//! Rig operating modes

/// Top-level rig state; exactly one is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RigMode {
    /// Loading settings
    #[default]
    Startup,
    /// Receiving, waiting for input
    Default,
    /// Operator is sending, transmitter keyed per element
    Keying,
    /// Keying speed adjustment
    AdjustCs,
    /// Continuous carrier for tune-up
    Tune,
    /// Band selection
    ChangeBand,
    /// Direct frequency entry
    Dfe,
    /// Choosing a memory to send
    MemSendWait,
    /// Sending a memory on air
    MemSendTx,
    /// Choosing a memory to record into
    MemEnterWait,
    /// Recording keyed characters
    MemEnter,
    /// Playing back a recording before it is stored
    MemEnterReview,
    /// Calibration: reference correction
    CalibrationCorrection,
    /// Calibration: IF peak
    CalibrationPeakIf,
    /// Calibration: band for the receive peak
    CalibrationChangeBand,
    /// Calibration: receive peak
    CalibrationPeakRx,
    /// Fault; only a reset leaves
    Error,
}

impl RigMode {
    /// The transmitter may be keyed in this mode
    #[must_use]
    pub const fn transmits(self) -> bool {
        matches!(self, Self::Keying | Self::Tune | Self::MemSendTx)
    }

    /// The straight-key mode may be active
    #[must_use]
    pub const fn allows_straight(self) -> bool {
        matches!(self, Self::Default | Self::Keying)
    }

    /// Part of the calibration sequence
    #[must_use]
    pub const fn is_calibration(self) -> bool {
        matches!(
            self,
            Self::CalibrationCorrection
                | Self::CalibrationPeakIf
                | Self::CalibrationChangeBand
                | Self::CalibrationPeakRx
        )
    }

    /// Name for logging and the display title
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Startup => "STARTUP",
            Self::Default => "DEFAULT",
            Self::Keying => "KEYING",
            Self::AdjustCs => "SPEED",
            Self::Tune => "TUNE",
            Self::ChangeBand => "BAND",
            Self::Dfe => "FREQ",
            Self::MemSendWait => "SEND MEM",
            Self::MemSendTx => "SENDING",
            Self::MemEnterWait => "ENTER MEM",
            Self::MemEnter => "RECORD",
            Self::MemEnterReview => "REVIEW",
            Self::CalibrationCorrection => "CAL REF",
            Self::CalibrationPeakIf => "CAL IF",
            Self::CalibrationChangeBand => "CAL BAND",
            Self::CalibrationPeakRx => "CAL RX",
            Self::Error => "ERROR",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RigMode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.name());
    }
}
