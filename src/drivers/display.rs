//! OLED Display Driver
//!
//! SSD1306 128x64 over I2C, drawn with `embedded-graphics` into a local
//! frame buffer. Two 16-column text lines fill the top and middle of the
//! panel; the bottom strip holds the progress bar.
//!
//! A full frame takes about 25 ms on a 400 kHz bus, far longer than a
//! tick, so [`OledDisplay::flush_step`] sends one 32-byte chunk per call
//! and the main loop keeps polling the rig between chunks.

use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal_async::i2c::I2c;

use crate::display::{line, Display, DisplayLines, Line};
use crate::hal::i2c::{I2cAddress, I2cBus};

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

const FRAME_BYTES: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;
const CHUNK: usize = 32;

const LINE_1_Y: i32 = 6;
const LINE_2_Y: i32 = 30;
const BAR_Y: i32 = 54;

/// SSD1306 commands
mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte: the rest of the transfer is commands
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: the rest of the transfer is pixel data
const CONTROL_DATA: u8 = 0x40;

/// Display buffer (1 bit per pixel, SSD1306 page layout)
pub struct DisplayBuffer {
    buffer: [u8; FRAME_BYTES],
}

impl DisplayBuffer {
    /// Create a new empty display buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; FRAME_BYTES],
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Set a pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }
        let byte_idx = (y / 8 * DISPLAY_WIDTH + x) as usize;
        let bit = 1 << (y % 8);
        if on {
            self.buffer[byte_idx] |= bit;
        } else {
            self.buffer[byte_idx] &= !bit;
        }
    }

    /// Get the raw buffer
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// What the bottom text line shows instead of the composed one
#[derive(Clone, Debug, PartialEq, Eq)]
enum Overlay {
    Feedback(Line),
    Question(Line),
}

/// Two-line rig display on an SSD1306
pub struct OledDisplay {
    buffer: DisplayBuffer,
    lines: DisplayLines,
    blink_on: bool,
    overlay: Option<Overlay>,
    progress: Option<(i16, i16, i16)>,
    /// Next chunk to send, `None` when the panel is up to date
    cursor: Option<usize>,
}

impl OledDisplay {
    /// Blank display; call [`OledDisplay::init`] before the first flush
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: DisplayBuffer::new(),
            lines: DisplayLines {
                line_1: Line::new(),
                line_2: Line::new(),
                blinking_1: 0,
            },
            blink_on: true,
            overlay: None,
            progress: None,
            cursor: None,
        }
    }

    /// Run the controller's power-up sequence
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn init<I: I2c>(&mut self, bus: &mut I2cBus<I>) -> Result<(), I::Error> {
        let init_cmds = [
            cmd::DISPLAY_OFF,
            cmd::SET_DISPLAY_CLOCK_DIV,
            0x80,
            cmd::SET_MULTIPLEX,
            0x3F,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            0x14,
            cmd::MEMORY_MODE,
            0x00,
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::DISPLAY_ON,
        ];
        for &c in &init_cmds {
            bus.write(I2cAddress::SSD1306, &[CONTROL_COMMAND, c]).await?;
        }
        self.redraw();
        Ok(())
    }

    /// Panel is showing the latest frame
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.cursor.is_none()
    }

    /// Send the next piece of a pending frame
    ///
    /// # Errors
    ///
    /// Bus error; the frame restarts from the top on the next call.
    pub async fn flush_step<I: I2c>(&mut self, bus: &mut I2cBus<I>) -> Result<(), I::Error> {
        let Some(offset) = self.cursor else {
            return Ok(());
        };
        if offset == 0 {
            let window = [
                CONTROL_COMMAND,
                cmd::COLUMN_ADDR,
                0,
                127,
                cmd::PAGE_ADDR,
                0,
                7,
            ];
            bus.write(I2cAddress::SSD1306, &window).await?;
        }
        let end = (offset + CHUNK).min(FRAME_BYTES);
        let chunk = &self.buffer.as_bytes()[offset..end];
        if let Err(e) = bus.write_prefixed(I2cAddress::SSD1306, CONTROL_DATA, chunk).await {
            self.cursor = Some(0);
            return Err(e);
        }
        self.cursor = (end < FRAME_BYTES).then_some(end);
        Ok(())
    }

    fn redraw(&mut self) {
        let normal = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
        let inverted = MonoTextStyle::new(&FONT_8X13, BinaryColor::Off);
        let buffer = &mut self.buffer;
        buffer.clear();

        let line_1 = self.lines.visible_line_1(self.blink_on);
        let _ = Text::with_baseline(&line_1, Point::new(0, LINE_1_Y), normal, Baseline::Top)
            .draw(buffer);

        match &self.overlay {
            None => {
                let _ = Text::with_baseline(
                    &self.lines.line_2,
                    Point::new(0, LINE_2_Y),
                    normal,
                    Baseline::Top,
                )
                .draw(buffer);
            }
            Some(Overlay::Feedback(text)) => {
                let _ = Text::with_baseline(text, Point::new(0, LINE_2_Y), normal, Baseline::Top)
                    .draw(buffer);
            }
            Some(Overlay::Question(text)) => {
                let _ = Rectangle::new(Point::new(0, LINE_2_Y - 1), Size::new(DISPLAY_WIDTH, 15))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(buffer);
                let _ = Text::with_baseline(text, Point::new(0, LINE_2_Y), inverted, Baseline::Top)
                    .draw(buffer);
            }
        }

        if let Some((value, min, max)) = self.progress {
            let span = i32::from(max) - i32::from(min);
            let filled = if span > 0 {
                let clamped = i32::from(value).clamp(i32::from(min), i32::from(max));
                (clamped - i32::from(min)) * DISPLAY_WIDTH as i32 / span
            } else {
                0
            };
            let _ = Rectangle::new(Point::new(0, BAR_Y), Size::new(DISPLAY_WIDTH, 8))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(buffer);
            if let Ok(width) = u32::try_from(filled) {
                let _ = Rectangle::new(Point::new(0, BAR_Y), Size::new(width, 8))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(buffer);
            }
        }

        self.cursor = Some(0);
    }
}

impl Default for OledDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OledDisplay {
    fn feedback(&mut self, text: &str) {
        self.overlay = Some(Overlay::Feedback(line(text)));
        self.redraw();
    }

    fn question(&mut self, text: &str) {
        self.overlay = Some(Overlay::Question(line(text)));
        self.redraw();
    }

    fn progress(&mut self, value: i16, min: i16, max: i16) {
        self.progress = Some((value, min, max));
        self.redraw();
    }

    fn clear_progress(&mut self) {
        if self.progress.take().is_some() {
            self.redraw();
        }
    }

    fn render(&mut self, lines: &DisplayLines, blink_on: bool) {
        self.lines.clone_from(lines);
        self.blink_on = blink_on;
        self.overlay = None;
        self.redraw();
    }
}
