//! Morse Codec
//!
//! Characters are stored as bit-sentinel patterns: the highest set bit
//! marks the length, the bits below it read from most to least
//! significant, 0 = dot and 1 = dash. `A` is `0b101`: sentinel, dot, dash.

use crate::key::Element;

/// Patterns for `A` to `Z`
pub const LETTERS: [u8; 26] = [
    0b101,     // A
    0b11000,   // B
    0b11010,   // C
    0b1100,    // D
    0b10,      // E
    0b10010,   // F
    0b1110,    // G
    0b10000,   // H
    0b100,     // I
    0b10111,   // J
    0b1101,    // K
    0b10100,   // L
    0b111,     // M
    0b110,     // N
    0b1111,    // O
    0b10110,   // P
    0b11101,   // Q
    0b1010,    // R
    0b1000,    // S
    0b11,      // T
    0b1001,    // U
    0b10001,   // V
    0b1011,    // W
    0b11001,   // X
    0b11011,   // Y
    0b11100,   // Z
];

/// Patterns for `0` to `9`
pub const DIGITS: [u8; 10] = [
    0b111111, // 0
    0b101111, // 1
    0b100111, // 2
    0b100011, // 3
    0b100001, // 4
    0b100000, // 5
    0b110000, // 6
    0b111000, // 7
    0b111100, // 8
    0b111110, // 9
];

/// Cut numbers for `0` to `9`: T A U V 4 E 6 B D N
pub const CUT_DIGITS: [u8; 10] = [
    0b11,     // T
    0b101,    // A
    0b1001,   // U
    0b10001,  // V
    0b100001, // 4
    0b10,     // E
    0b110000, // 6
    0b11000,  // B
    0b1100,   // D
    0b110,    // N
];

/// Pattern for `?`
pub const QUESTION: u8 = 0b100_1100;

/// What encoding does with a character that has no pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Unrecognized {
    /// Leave it out
    #[default]
    Skip,
    /// Send `?` in its place
    Question,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Unrecognized {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Skip => defmt::write!(f, "Skip"),
            Self::Question => defmt::write!(f, "Question"),
        }
    }
}

/// Encoder options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CodecOptions {
    /// Send cut numbers for digits
    pub cut_numbers: bool,
    /// Handling of characters without a pattern
    pub unrecognized: Unrecognized,
}

/// A sentinel-encoded element sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern(u8);

impl Pattern {
    /// Empty pattern, the bare sentinel
    pub const EMPTY: Self = Self(1);

    /// Wrap a raw table value; `None` for zero, which has no sentinel
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits == 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    /// Raw table value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Number of elements
    #[must_use]
    pub const fn len(self) -> u32 {
        7 - self.0.leading_zeros()
    }

    /// No elements
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Pattern with `element` appended, `None` when no bit is left
    #[must_use]
    pub const fn push(self, element: Element) -> Option<Self> {
        if self.0 & 0x80 != 0 {
            return None;
        }
        let bit = match element {
            Element::Dot => 0,
            Element::Dash => 1,
        };
        Some(Self((self.0 << 1) | bit))
    }

    /// Elements in sending order
    #[must_use]
    pub const fn elements(self) -> Elements {
        Elements {
            bits: self.0,
            remaining: self.len(),
        }
    }
}

/// Iterator over the elements of a [`Pattern`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elements {
    bits: u8,
    remaining: u32,
}

impl Iterator for Elements {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if (self.bits >> self.remaining) & 1 == 1 {
            Some(Element::Dash)
        } else {
            Some(Element::Dot)
        }
    }
}

/// Result of encoding one character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// Elements of a character
    Char(Pattern),
    /// Space between words
    WordGap,
}

/// Pattern for `c` from the plain table, case-insensitive
#[must_use]
pub const fn pattern(c: char) -> Option<Pattern> {
    let bits = match c.to_ascii_uppercase() {
        c @ 'A'..='Z' => LETTERS[c as usize - 'A' as usize],
        c @ '0'..='9' => DIGITS[c as usize - '0' as usize],
        '?' => QUESTION,
        _ => return None,
    };
    Pattern::from_bits(bits)
}

/// Encode one character for playback
///
/// `None` means the character is skipped.
#[must_use]
pub fn encode(c: char, options: CodecOptions) -> Option<Symbol> {
    if c == ' ' {
        return Some(Symbol::WordGap);
    }
    if options.cut_numbers && c.is_ascii_digit() {
        return Pattern::from_bits(CUT_DIGITS[c as usize - '0' as usize]).map(Symbol::Char);
    }
    match (pattern(c), options.unrecognized) {
        (Some(p), _) => Some(Symbol::Char(p)),
        (None, Unrecognized::Question) => Pattern::from_bits(QUESTION).map(Symbol::Char),
        (None, Unrecognized::Skip) => None,
    }
}

/// Character for a received pattern
///
/// Only used to classify characters keyed into a memory; cut numbers
/// decode to their letters.
#[must_use]
pub fn decode(p: Pattern) -> Option<char> {
    let bits = p.bits();
    if let Some(i) = LETTERS.iter().position(|&b| b == bits) {
        return char::from_u32('A' as u32 + i as u32);
    }
    if let Some(i) = DIGITS.iter().position(|&b| b == bits) {
        return char::from_u32('0' as u32 + i as u32);
    }
    (bits == QUESTION).then_some('?')
}
