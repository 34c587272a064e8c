//! Display contract and two-line screen composition
//!
//! The rig only composes text. Pixel output, fonts and controller timing
//! belong to the [`Display`] implementation.

use core::fmt::Write;

use heapless::String;

use crate::tick::BlinkClass;
use crate::types::Frequency;

/// Characters per display line
pub const LINE_WIDTH: usize = 16;

/// One display line
pub type Line = String<LINE_WIDTH>;

/// Two-line display driver
pub trait Display {
    /// Show a short status message on the bottom line
    fn feedback(&mut self, text: &str);

    /// Ask the operator something on the bottom line
    fn question(&mut self, text: &str);

    /// Draw a progress bar for `value` in `[min, max]`
    fn progress(&mut self, value: i16, min: i16, max: i16);

    /// Remove the progress bar
    fn clear_progress(&mut self);

    /// Draw both lines; blinking digits are hidden when `blink_on` is false
    fn render(&mut self, lines: &DisplayLines, blink_on: bool);
}

impl<D: Display + ?Sized> Display for &mut D {
    fn feedback(&mut self, text: &str) {
        (**self).feedback(text);
    }

    fn question(&mut self, text: &str) {
        (**self).question(text);
    }

    fn progress(&mut self, value: i16, min: i16, max: i16) {
        (**self).progress(value, min, max);
    }

    fn clear_progress(&mut self) {
        (**self).clear_progress();
    }

    fn render(&mut self, lines: &DisplayLines, blink_on: bool) {
        (**self).render(lines, blink_on);
    }
}

/// Text of both lines plus a blink mask for line one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayLines {
    /// Top line
    pub line_1: Line,
    /// Bottom line
    pub line_2: Line,
    /// Bit `n` set: column `n` of line one blinks
    pub blinking_1: u16,
}

/// Copy `text` into a line, truncating at the line width
#[must_use]
pub fn line(text: &str) -> Line {
    let mut out = Line::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Write formatted text into a line, truncating at the line width
#[must_use]
pub fn line_fmt(args: core::fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    // Overflow only truncates
    let _ = out.write_fmt(args);
    out
}

impl DisplayLines {
    /// Lines with the given text and nothing blinking
    #[must_use]
    pub fn new(line_1: &str, line_2: &str) -> Self {
        Self {
            line_1: line(line_1),
            line_2: line(line_2),
            blinking_1: 0,
        }
    }

    /// Title on line one above a composed line two
    #[must_use]
    pub fn with_line_2(line_1: &str, line_2: Line) -> Self {
        Self {
            line_1: line(line_1),
            line_2,
            blinking_1: 0,
        }
    }

    /// Frequency on line one with the tuning-step digit blinking
    ///
    /// `suffix` is appended after the frequency, e.g. an RIT marker.
    #[must_use]
    pub fn frequency(freq: Frequency, blink: BlinkClass, suffix: &str, line_2: Line) -> Self {
        let mut line_1 = line_fmt(format_args!("{freq}"));
        let digits_end = line_1.len();
        let _ = line_1.push_str(suffix);
        let blinking_1 = blink
            .column_from_right()
            .and_then(|from_right| digits_end.checked_sub(1 + usize::from(from_right)))
            .map_or(0, |col| 1u16 << col);
        Self {
            line_1,
            line_2,
            blinking_1,
        }
    }

    /// Line one with blinking columns replaced by spaces
    #[must_use]
    pub fn visible_line_1(&self, blink_on: bool) -> Line {
        if blink_on || self.blinking_1 == 0 {
            return self.line_1.clone();
        }
        let mut out = Line::new();
        for (col, c) in self.line_1.chars().enumerate() {
            let hidden = col < 16 && self.blinking_1 & (1 << col) != 0;
            let _ = out.push(if hidden { ' ' } else { c });
        }
        out
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DisplayLines {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[{=str}|{=str}]", self.line_1.as_str(), self.line_2.as_str());
    }
}
