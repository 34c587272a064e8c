//! GPIO Abstractions
//!
//! Front-panel inputs and the keying outputs, wrapped so each pin has a
//! meaning in the type system. All front-panel lines are active low with
//! pull-ups; [`FrontPanel::sample`] turns them into *pressed = 1*.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::inputs::{InputPort, Line};
use crate::radio::Transmitter;

/// Output level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PinState {
    /// Driven low
    #[default]
    Low,
    /// Driven high
    High,
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl defmt::Format for PinState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(f, "LOW"),
            Self::High => defmt::write!(f, "HIGH"),
        }
    }
}

/// Push-pull output that remembers its level
pub struct DrivenPin<P: OutputPin> {
    pin: P,
    state: PinState,
}

impl<P: OutputPin> DrivenPin<P> {
    /// Wrap `pin` and drive it low
    pub fn new(mut pin: P) -> Self {
        // GPIO writes on this target cannot fail
        let _ = pin.set_low();
        Self {
            pin,
            state: PinState::Low,
        }
    }

    /// Drive the pin
    pub fn set(&mut self, state: PinState) {
        let _ = match state {
            PinState::Low => self.pin.set_low(),
            PinState::High => self.pin.set_high(),
        };
        self.state = state;
    }

    /// Last driven level
    #[must_use]
    pub const fn state(&self) -> PinState {
        self.state
    }
}

/// Paddles, buttons and encoder
pub struct FrontPanel<I: InputPin> {
    lines: [(Line, I); 7],
}

impl<I: InputPin> FrontPanel<I> {
    /// Group the seven front-panel inputs
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        encoder_clock: I,
        encoder_data: I,
        encoder_button: I,
        rit: I,
        keyer: I,
        dot: I,
        dash: I,
    ) -> Self {
        Self {
            lines: [
                (Line::EncoderClock, encoder_clock),
                (Line::EncoderData, encoder_data),
                (Line::EncoderButton, encoder_button),
                (Line::Rit, rit),
                (Line::Keyer, keyer),
                (Line::Dot, dot),
                (Line::Dash, dash),
            ],
        }
    }

    /// Raw levels of every line, pressed = 1
    pub fn sample(&mut self) -> InputPort {
        self.lines
            .iter_mut()
            .fold(InputPort::default(), |port, (line, pin)| {
                // A failed read counts as released
                port.with(*line, pin.is_low().unwrap_or(false))
            })
    }
}

/// Transmitter key line, sidetone gate and receiver mute
pub struct KeyingOutputs<P: OutputPin> {
    tx: DrivenPin<P>,
    sidetone: DrivenPin<P>,
    mute: DrivenPin<P>,
}

impl<P: OutputPin> KeyingOutputs<P> {
    /// Wrap the three outputs, all released
    pub fn new(tx: P, sidetone: P, mute: P) -> Self {
        Self {
            tx: DrivenPin::new(tx),
            sidetone: DrivenPin::new(sidetone),
            mute: DrivenPin::new(mute),
        }
    }
}

impl<P: OutputPin> Transmitter for KeyingOutputs<P> {
    fn enable_sidetone(&mut self) {
        self.sidetone.set(PinState::High);
    }

    fn disable_sidetone(&mut self) {
        self.sidetone.set(PinState::Low);
    }

    fn enable_tx(&mut self) {
        self.tx.set(PinState::High);
    }

    fn disable_tx(&mut self) {
        self.tx.set(PinState::Low);
    }

    fn set_mute(&mut self, muted: bool) {
        self.mute.set(PinState::from(muted));
    }
}
