//! Message Memories
//!
//! A composition buffer in RAM, fixed-size persistent slots, and a
//! player that feeds a message through the Key Engine so it is sent with
//! exactly the timing of hand keying.

pub mod buffer;
pub mod player;
pub mod recorder;
pub mod slots;

pub use buffer::MemoryBuffer;
pub use player::MemoryPlayer;
pub use recorder::{CharRecorder, Recorded};
pub use slots::{load_memory, playback_buffer, slot_offset, store_memory, transmit_memory};
