//! Key Engine
//!
//! Turns debounced paddle or straight-key contact state into a timed
//! sequence of [`KeyEvent`]s. The engine is stepped once per tick and does
//! a fixed amount of work per step.
//!
//! # Iambic Keying
//!
//! Squeeze keying with one-element memory (Curtis mode B): closing the
//! opposite paddle while an element or its gap is running queues that
//! element, even if the paddle is released again before the decision.
//! Memory playback drives the same timing path through [`ElementSource`].

pub mod iambic;
pub mod state;
pub mod straight;

pub use iambic::{ElementSource, Paddles, SqueezeStart};
pub use state::{dash_time, dot_time, Element, KeyEvent, KeyMode, KeyPhase, KeyState};
