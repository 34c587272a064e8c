//! Tick Scheduler
//!
//! One fixed-rate tick drives everything time based. The tick handler
//! advances `tcount`, debounces the front-panel lines, times button
//! holds, completes quadrature decoding and steps the Key Engine. It does
//! a fixed amount of work and never blocks.

pub mod clock;
pub mod debounce;
pub mod shared;

pub use clock::{blink_visible, deadline_passed, ticks_since, BlinkClass, TickCounter};
pub use debounce::{Button, ButtonEvent, Debouncer, HoldTimer};
pub use shared::{KeySource, SharedState};
