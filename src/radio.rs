//! Radio Control
//!
//! Contracts for the keying outputs and the frequency synthesizer, the
//! VFO bookkeeping the rig state machine tunes through, and the divider
//! planning the synthesizer driver programs.

pub mod synth;
pub mod transmit;
pub mod vfo;

pub use transmit::{Transmitter, TxSwitch};
pub use vfo::{Synthesizer, Vfo};
