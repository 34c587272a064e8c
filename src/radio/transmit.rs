//! Transmit Control
//!
//! Keys the transmitter and sidetone from Key Engine events and keeps
//! track of what is keyed, so the state machine can check that the
//! transmitter is only ever on in a transmitting mode.

use crate::key::KeyEvent;

/// Keying outputs
///
/// Discrete side-effecting calls; nothing is acknowledged or awaited.
pub trait Transmitter {
    /// Start the sidetone oscillator
    fn enable_sidetone(&mut self);

    /// Stop the sidetone oscillator
    fn disable_sidetone(&mut self);

    /// Key the transmitter
    fn enable_tx(&mut self);

    /// Unkey the transmitter
    fn disable_tx(&mut self);

    /// Mute the receiver audio while transmitting
    fn set_mute(&mut self, muted: bool);
}

/// Output state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TxState {
    /// Nothing keyed
    #[default]
    Rx,
    /// Sidetone only, transmitter off
    Sidetone,
    /// Transmitter and sidetone keyed
    Tx,
    /// Transmitter keyed without sidetone (tune carrier)
    Carrier,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Rx => defmt::write!(f, "RX"),
            Self::Sidetone => defmt::write!(f, "SIDETONE"),
            Self::Tx => defmt::write!(f, "TX"),
            Self::Carrier => defmt::write!(f, "CARRIER"),
        }
    }
}

/// [`Transmitter`] wrapper that tracks what is keyed
#[derive(Debug)]
pub struct TxSwitch<T: Transmitter> {
    tx: T,
    state: TxState,
    muted: bool,
}

impl<T: Transmitter> TxSwitch<T> {
    /// Wrap `tx`, assumed to be all off
    #[must_use]
    pub const fn new(tx: T) -> Self {
        Self {
            tx,
            state: TxState::Rx,
            muted: false,
        }
    }

    /// Output state
    #[must_use]
    pub const fn state(&self) -> TxState {
        self.state
    }

    /// The transmitter is keyed
    #[must_use]
    pub const fn is_transmitting(&self) -> bool {
        matches!(self.state, TxState::Tx | TxState::Carrier)
    }

    /// Receiver is muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Wrapped transmitter
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.tx
    }

    /// Wrapped transmitter, mutably
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    /// Follow a Key Engine event; `transmit` false keys the sidetone only
    pub fn key(&mut self, event: KeyEvent, transmit: bool) {
        if event.is_key_down() {
            self.tx.enable_sidetone();
            if transmit {
                self.tx.enable_tx();
                self.state = TxState::Tx;
            } else {
                self.state = TxState::Sidetone;
            }
        } else {
            self.key_up();
        }
    }

    /// Continuous carrier for tuning
    pub fn carrier(&mut self) {
        self.tx.enable_tx();
        self.state = TxState::Carrier;
    }

    /// Unkey everything
    pub fn key_up(&mut self) {
        match self.state {
            TxState::Rx => {}
            TxState::Sidetone => self.tx.disable_sidetone(),
            TxState::Tx => {
                self.tx.disable_tx();
                self.tx.disable_sidetone();
            }
            TxState::Carrier => self.tx.disable_tx(),
        }
        self.state = TxState::Rx;
    }

    /// Unconditionally drive every output off
    pub fn all_off(&mut self) {
        self.tx.disable_tx();
        self.tx.disable_sidetone();
        self.state = TxState::Rx;
    }

    /// Mute or unmute the receiver
    pub fn set_mute(&mut self, muted: bool) {
        if self.muted != muted {
            self.tx.set_mute(muted);
            self.muted = muted;
        }
    }
}
