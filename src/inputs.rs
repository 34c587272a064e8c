//! Paddle, button and encoder line snapshot
//!
//! All front-panel lines share one byte so the interrupt handlers can
//! stage them with a single read-modify-write. Levels are stored as
//! *pressed = 1* regardless of the electrical polarity on the wire.

/// One line of the front-panel port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Line {
    /// Encoder B
    EncoderData = 0,
    /// Encoder A
    EncoderClock = 1,
    /// Encoder push button
    EncoderButton = 3,
    /// RIT button
    Rit = 4,
    /// Keyer (menu) button
    Keyer = 5,
    /// Dot paddle, or the straight key contact
    Dot = 6,
    /// Dash paddle
    Dash = 7,
}

impl Line {
    /// Bit mask of this line in the port byte
    #[must_use]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Line {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::EncoderData => defmt::write!(f, "ENC_B"),
            Self::EncoderClock => defmt::write!(f, "ENC_A"),
            Self::EncoderButton => defmt::write!(f, "ENC_SW"),
            Self::Rit => defmt::write!(f, "RIT"),
            Self::Keyer => defmt::write!(f, "KEYER"),
            Self::Dot => defmt::write!(f, "DOT"),
            Self::Dash => defmt::write!(f, "DASH"),
        }
    }
}

/// Bit-packed line levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InputPort(u8);

impl InputPort {
    /// Wrap a raw port byte
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw port byte
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level of one line
    #[must_use]
    pub const fn get(self, line: Line) -> bool {
        self.0 & line.mask() != 0
    }

    /// Copy with one line changed
    #[must_use]
    pub const fn with(self, line: Line, pressed: bool) -> Self {
        if pressed {
            Self(self.0 | line.mask())
        } else {
            Self(self.0 & !line.mask())
        }
    }

    /// Encoder B level
    #[must_use]
    pub const fn encoder_data(self) -> bool {
        self.get(Line::EncoderData)
    }

    /// Encoder A level
    #[must_use]
    pub const fn encoder_clock(self) -> bool {
        self.get(Line::EncoderClock)
    }

    /// Encoder button pressed
    #[must_use]
    pub const fn encoder_button(self) -> bool {
        self.get(Line::EncoderButton)
    }

    /// RIT button pressed
    #[must_use]
    pub const fn rit(self) -> bool {
        self.get(Line::Rit)
    }

    /// Keyer button pressed
    #[must_use]
    pub const fn keyer(self) -> bool {
        self.get(Line::Keyer)
    }

    /// Dot paddle closed
    #[must_use]
    pub const fn dot(self) -> bool {
        self.get(Line::Dot)
    }

    /// Dash paddle closed
    #[must_use]
    pub const fn dash(self) -> bool {
        self.get(Line::Dash)
    }
}

/// Debounced port plus quadrature decode scratch
#[derive(Clone, Copy, Debug, Default)]
pub struct Inputs {
    /// Debounced line levels
    pub port: InputPort,
    encoder_value: i8,
    encoder_last_clock: bool,
}

impl Inputs {
    /// Smallest value the 2-bit encoder accumulator holds
    pub const ENCODER_MIN: i8 = -2;
    /// Largest value the 2-bit encoder accumulator holds
    pub const ENCODER_MAX: i8 = 1;

    /// Create with all lines released
    #[must_use]
    pub const fn new() -> Self {
        Self {
            port: InputPort(0),
            encoder_value: 0,
            encoder_last_clock: false,
        }
    }

    /// Feed raw encoder levels; a falling clock edge counts one detent
    ///
    /// Data high on the edge is clockwise (+1), low is counter-clockwise.
    pub fn decode_encoder(&mut self, clock: bool, data: bool) {
        if self.encoder_last_clock && !clock {
            let delta = if data { 1 } else { -1 };
            self.encoder_value =
                (self.encoder_value + delta).clamp(Self::ENCODER_MIN, Self::ENCODER_MAX);
        }
        self.encoder_last_clock = clock;
    }

    /// Pending encoder movement, without draining it
    #[must_use]
    pub const fn encoder_value(&self) -> i8 {
        self.encoder_value
    }

    /// Drain the encoder accumulator
    pub fn take_encoder(&mut self) -> i8 {
        core::mem::take(&mut self.encoder_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_bit_layout() {
        let port = InputPort::default()
            .with(Line::Dot, true)
            .with(Line::Rit, true);
        assert_eq!(port.bits(), 0b0101_0000);
        assert!(port.dot());
        assert!(port.rit());
        assert!(!port.dash());
        assert_eq!(port.with(Line::Dot, false).bits(), 0b0001_0000);
    }

    #[test]
    fn encoder_counts_falling_edges_only() {
        let mut inputs = Inputs::new();
        inputs.decode_encoder(true, true);
        assert_eq!(inputs.encoder_value(), 0);
        inputs.decode_encoder(false, true);
        assert_eq!(inputs.encoder_value(), 1);
        inputs.decode_encoder(false, true);
        assert_eq!(inputs.encoder_value(), 1);
    }

    #[test]
    fn encoder_accumulator_saturates() {
        let mut inputs = Inputs::new();
        for _ in 0..5 {
            inputs.decode_encoder(true, false);
            inputs.decode_encoder(false, false);
        }
        assert_eq!(inputs.take_encoder(), Inputs::ENCODER_MIN);
        assert_eq!(inputs.take_encoder(), 0);
    }
}
