//! CW Rig Firmware Library
//!
//! Control firmware for a single-operator Morse-code (CW) transceiver.
//! The library holds everything that can run without hardware: the tick
//! scheduler, the iambic/straight keying engine, the Morse codec, the
//! message memories and the rig-wide state machine. The embedded binary
//! wires these to GPIO, an I2C EEPROM, the Si5351 synthesizer and a small
//! OLED display.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RIG STATE MACHINE                        │
//! │  transition(mode, event)  │  entry/exit effects  │  Rig      │
//! ├─────────────────────────────────────────────────────────────┤
//! │        KEY ENGINE        │   MORSE CODEC   │    MEMORY       │
//! │  iambic / straight step  │  bit-sentinel   │  buffer, slots  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      TICK SCHEDULER                          │
//! │  tcount  │  debounce  │  hold timers  │  quadrature decode   │
//! ├─────────────────────────────────────────────────────────────┤
//! │        COLLABORATORS (Display, Storage, Transmitter,         │
//! │        Synthesizer) implemented by drivers or the sim        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: `rig::transition` is pure, the
//!   controller applies its effects
//! - **One shared context**: tick handler and main loop meet in
//!   [`tick::SharedState`], always behind a critical section
//! - **Wrap-safe time**: every duration is a difference of tick counts
//! - **No allocation**: all buffers are `heapless`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Paddle, button and encoder lines plus the keying outputs.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// OLED display, I2C EEPROM mirror and Si5351 synthesizer.
#[cfg(feature = "embedded")]
pub mod drivers;

/// Tick Scheduler
///
/// Tick counter, debouncing, hold timers and the shared interrupt context.
pub mod tick;

/// Key Engine
///
/// Iambic and straight-key element timing.
pub mod key;

/// Morse Codec
pub mod morse;

/// Message Memories
///
/// Composition buffer, persistent slots and playback.
pub mod memory;

/// Rig State Machine
pub mod rig;

/// Transmitter and synthesizer contracts, VFO bookkeeping
pub mod radio;

/// Display contract and two-line screen composition
pub mod display;

/// Persistent settings over a byte-addressable store
pub mod storage;

/// Paddle, button and encoder line snapshot
pub mod inputs;

/// Error types
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Host-side simulation harness
#[cfg(feature = "std")]
pub mod sim;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::display::Display;
    pub use crate::radio::{Synthesizer, Transmitter};
    pub use crate::storage::Storage;

    // Embassy
    pub use embassy_time::{Duration, Instant, Ticker, Timer};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
