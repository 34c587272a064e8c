//! Peripheral Drivers
//!
//! The rig talks to its collaborators synchronously. Each driver here
//! buffers what the rig asked for and the main loop flushes it over the
//! async I2C bus after every poll.

pub mod display;
pub mod eeprom;
pub mod si5351;
