//! Rig State Machine
//!
//! [`transition()`] is a pure function of mode and event. [`on_entry`] and
//! [`on_exit`] list the side effects tied to each mode. [`Rig`] owns the
//! collaborators and applies both: exit effects of the old mode, entry
//! effects of the new one, then the transition's action.
//!
//! ```text
//!            Loaded                key down             End
//! STARTUP ──────────▶ DEFAULT ───────────────▶ KEYING ──────▶ DEFAULT
//!                       │ keyer button held N × MENU_STEP_TICKS
//!                       ▼
//!   ADJUST_CS │ CHANGE_BAND │ TUNE │ DFE │ MEM_SEND_WAIT │ MEM_ENTER_WAIT
//!   │ CALIBRATION_CORRECTION ▶ PEAK_IF ▶ CHANGE_BAND ▶ PEAK_RX ▶ DEFAULT
//!
//! any ── Fault ──▶ ERROR ── Reset ──▶ STARTUP
//! ```

pub mod controller;
pub mod effect;
pub mod event;
pub mod menu;
pub mod mode;
pub mod screen;
pub mod state;
pub mod transition;

pub use controller::Rig;
pub use effect::{on_entry, on_exit, Effect};
pub use event::RigEvent;
pub use menu::MenuItem;
pub use mode::RigMode;
pub use screen::compose;
pub use state::{DfeEntry, RigState};
pub use transition::{transition, Action, Transition};
