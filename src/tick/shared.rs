//! Context shared between the tick handler and the main loop
//!
//! Everything lives behind one `critical_section::Mutex`. The tick
//! handler runs its whole debounce-and-step sequence inside a single
//! critical section, so the main loop never sees a half-updated
//! [`KeyState`]. Line interrupts only stage raw levels.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::config::{
    BUTTON_DEBOUNCE_TICKS, BUTTON_EVENT_QUEUE, ERASE_HOLD_TICKS, KEY_EVENT_QUEUE,
    PADDLE_DEBOUNCE_TICKS,
};
use crate::inputs::{InputPort, Inputs, Line};
use crate::key::{KeyEvent, KeyState, Paddles, SqueezeStart};
use crate::memory::MemoryPlayer;

use super::clock::TickCounter;
use super::debounce::{Button, ButtonEvent, Debouncer, HoldTimer};

/// What the Key Engine listens to
#[derive(Clone, Debug, Default)]
pub enum KeySource {
    /// Debounced paddles or straight key
    #[default]
    Paddles,
    /// A message memory; touching a paddle requests an abort
    Playback(MemoryPlayer),
    /// Nothing; the engine is not stepped
    Disabled,
}

impl KeySource {
    /// Short name for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Paddles => "paddles",
            Self::Playback(_) => "playback",
            Self::Disabled => "disabled",
        }
    }
}

const fn button_line(button: Button) -> Line {
    match button {
        Button::Encoder => Line::EncoderButton,
        Button::Rit => Line::Rit,
        Button::Keyer => Line::Keyer,
    }
}

#[derive(Debug)]
struct Shared {
    staged: InputPort,
    inputs: Inputs,
    paddle_debounce: [Debouncer; 2],
    button_debounce: [Debouncer; 3],
    holds: [HoldTimer; 3],
    key: KeyState,
    source: KeySource,
    squeeze: SqueezeStart,
    key_events: Deque<KeyEvent, KEY_EVENT_QUEUE>,
    button_events: Deque<ButtonEvent, BUTTON_EVENT_QUEUE>,
    abort_requested: bool,
    overflow: bool,
}

impl Shared {
    const fn new() -> Self {
        Self {
            staged: InputPort::from_bits(0),
            inputs: Inputs::new(),
            paddle_debounce: [Debouncer::new(PADDLE_DEBOUNCE_TICKS); 2],
            button_debounce: [Debouncer::new(BUTTON_DEBOUNCE_TICKS); 3],
            holds: [
                HoldTimer::new(Button::Encoder, None),
                HoldTimer::new(Button::Rit, Some(ERASE_HOLD_TICKS)),
                HoldTimer::new(Button::Keyer, None),
            ],
            key: KeyState::new(),
            source: KeySource::Paddles,
            squeeze: SqueezeStart::DotFirst,
            key_events: Deque::new(),
            button_events: Deque::new(),
            abort_requested: false,
            overflow: false,
        }
    }

    fn tick(&mut self, now: u32) {
        let raw = self.staged;
        self.inputs.decode_encoder(raw.encoder_clock(), raw.encoder_data());

        for (debouncer, line) in self.paddle_debounce.iter_mut().zip([Line::Dot, Line::Dash]) {
            if let Some(level) = debouncer.sample(raw.get(line)) {
                self.inputs.port = self.inputs.port.with(line, level);
            }
        }

        for button in Button::ALL {
            let line = button_line(button);
            let i = button.index();
            if let Some(level) = self.button_debounce[i].sample(raw.get(line)) {
                self.inputs.port = self.inputs.port.with(line, level);
            }
            if let Some(event) = self.holds[i].update(self.inputs.port.get(line), now) {
                if self.button_events.push_back(event).is_err() {
                    self.overflow = true;
                }
            }
        }

        let port = self.inputs.port;
        let event = match &mut self.source {
            KeySource::Paddles => {
                let mut paddles = Paddles {
                    dot: port.dot(),
                    dash: port.dash(),
                    squeeze: self.squeeze,
                };
                self.key.step_paddles(&mut paddles)
            }
            KeySource::Playback(player) => {
                if port.dot() || port.dash() {
                    self.abort_requested = true;
                }
                self.key.step(player)
            }
            KeySource::Disabled => None,
        };
        if let Some(event) = event {
            if self.key_events.push_back(event).is_err() {
                self.overflow = true;
            }
        }
    }
}

/// Tick counter plus the interrupt-shared rig context
#[derive(Debug)]
pub struct SharedState {
    tcount: TickCounter,
    inner: Mutex<RefCell<Shared>>,
}

impl SharedState {
    /// Fresh context, suitable for a `static`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tcount: TickCounter::new(),
            inner: Mutex::new(RefCell::new(Shared::new())),
        }
    }

    /// Context whose counter starts at `start`
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self {
            tcount: TickCounter::starting_at(start),
            inner: Mutex::new(RefCell::new(Shared::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Tick handler body; returns the new tick count
    pub fn tick(&self) -> u32 {
        let now = self.tcount.advance();
        self.with(|s| s.tick(now));
        now
    }

    /// Current tick count
    #[must_use]
    pub fn now(&self) -> u32 {
        self.tcount.now()
    }

    /// Stage every raw line level at once
    pub fn stage_port(&self, port: InputPort) {
        self.with(|s| s.staged = port);
    }

    /// Stage one raw line level
    pub fn stage_line(&self, line: Line, pressed: bool) {
        self.with(|s| s.staged = s.staged.with(line, pressed));
    }

    /// Debounced line levels
    #[must_use]
    pub fn port(&self) -> InputPort {
        self.with(|s| s.inputs.port)
    }

    /// Drain the encoder accumulator
    pub fn take_encoder(&self) -> i8 {
        self.with(|s| s.inputs.take_encoder())
    }

    /// Oldest unread Key Engine event
    pub fn take_key_event(&self) -> Option<KeyEvent> {
        self.with(|s| s.key_events.pop_front())
    }

    /// Oldest unread button event
    pub fn take_button_event(&self) -> Option<ButtonEvent> {
        self.with(|s| s.button_events.pop_front())
    }

    /// How long `button` has been held, `None` when released
    #[must_use]
    pub fn held(&self, button: Button) -> Option<u32> {
        let now = self.now();
        self.with(|s| s.holds[button.index()].held(now))
    }

    /// Run `f` on the Key Engine state
    pub fn with_key<R>(&self, f: impl FnOnce(&mut KeyState) -> R) -> R {
        self.with(|s| f(&mut s.key))
    }

    /// Copy of the Key Engine state
    #[must_use]
    pub fn key(&self) -> KeyState {
        self.with(|s| s.key)
    }

    /// Squeeze tie-break for the paddles
    pub fn set_squeeze(&self, squeeze: SqueezeStart) {
        self.with(|s| s.squeeze = squeeze);
    }

    /// Switch the Key Engine input; resets the engine and drops queued events
    pub fn set_source(&self, source: KeySource) {
        debug!("key source: {=str}", source.name());
        self.with(|s| {
            s.source = source;
            s.key.reset();
            s.key_events.clear();
            s.abort_requested = false;
        });
    }

    /// Playback source has sent everything and the engine is idle
    #[must_use]
    pub fn playback_done(&self) -> bool {
        self.with(|s| match &s.source {
            KeySource::Playback(player) => player.is_exhausted() && s.key.is_idle(),
            _ => false,
        })
    }

    /// A paddle was touched during playback; clears the flag
    pub fn take_abort(&self) -> bool {
        self.with(|s| core::mem::take(&mut s.abort_requested))
    }

    /// An event queue overflowed since the last call; clears the flag
    pub fn take_overflow(&self) -> bool {
        self.with(|s| core::mem::take(&mut s.overflow))
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
