//! Hardware Abstraction Layer
//!
//! Front-panel lines, keying outputs, the I2C bus and the tick source.
//! Everything here is generic over the `embedded-hal` traits so the
//! board wiring lives in `main.rs` only.

pub mod gpio;
pub mod i2c;
pub mod timer;
