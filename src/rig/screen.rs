//! Screen composition per mode

use crate::display::{line, line_fmt, DisplayLines, Line, LINE_WIDTH};
use crate::key::{KeyMode, KeyState};
use crate::tick::BlinkClass;

use super::{RigMode, RigState};

/// Both display lines for the rig's current mode
#[must_use]
pub fn compose(state: &RigState, key: &KeyState) -> DisplayLines {
    let title = state.mode.name();
    match state.mode {
        RigMode::Startup => DisplayLines::new("CW RIG", env!("CARGO_PKG_VERSION")),
        RigMode::Default => {
            let blink = state.tuning_step().blink();
            DisplayLines::frequency(state.op_freq(), blink, rit_marker(state), status(state, key))
        }
        RigMode::Keying => DisplayLines::frequency(
            state.tx_freq(),
            BlinkClass::None,
            rit_marker(state),
            status(state, key),
        ),
        RigMode::Tune => {
            DisplayLines::frequency(state.tx_freq(), BlinkClass::None, "", line("TUNE"))
        }
        RigMode::AdjustCs => {
            DisplayLines::with_line_2(title, line_fmt(format_args!("{} WPM", key.speed())))
        }
        RigMode::ChangeBand | RigMode::CalibrationChangeBand => {
            DisplayLines::new(title, state.pending_band.name())
        }
        RigMode::Dfe => DisplayLines::with_line_2(title, dfe_line(state)),
        RigMode::MemSendWait | RigMode::MemSendTx => DisplayLines::with_line_2(
            title,
            line_fmt(format_args!("MEM {}", state.mem_tx_index + 1)),
        ),
        RigMode::MemEnterWait => DisplayLines::with_line_2(
            title,
            line_fmt(format_args!("MEM {}", state.mem_enter_index + 1)),
        ),
        RigMode::MemEnter | RigMode::MemEnterReview => {
            DisplayLines::new(title, tail(state.buffer.as_str()))
        }
        RigMode::CalibrationCorrection => {
            DisplayLines::with_line_2(title, line_fmt(format_args!("{:+}", state.correction)))
        }
        RigMode::CalibrationPeakIf => {
            DisplayLines::with_line_2(title, line_fmt(format_args!("{}", state.if_freq)))
        }
        RigMode::CalibrationPeakRx => {
            DisplayLines::frequency(state.op_freq(), BlinkClass::None, "", line(title))
        }
        RigMode::Error => match state.fault {
            Some(fault) => DisplayLines::with_line_2(title, line_fmt(format_args!("{fault}"))),
            None => DisplayLines::new(title, ""),
        },
    }
}

const fn rit_marker(state: &RigState) -> &'static str {
    if state.rit() {
        " R"
    } else {
        ""
    }
}

fn status(state: &RigState, key: &KeyState) -> Line {
    let key_mode = match key.mode {
        KeyMode::Iambic => "",
        KeyMode::Straight => " SK",
    };
    let beacon = if state.beacon { " B" } else { "" };
    line_fmt(format_args!(
        "{} {}WPM{key_mode}{beacon}",
        state.band().name(),
        key.speed()
    ))
}

fn dfe_line(state: &RigState) -> Line {
    let mut out = Line::new();
    for &digit in state.dfe.digits() {
        let _ = out.push(char::from(b'0' + digit));
    }
    if !state.dfe.is_complete() {
        let _ = out.push(char::from(b'0' + state.dfe.current()));
    }
    let _ = out.push_str(" kHz");
    out
}

/// The last `LINE_WIDTH` characters of `text`
fn tail(text: &str) -> &str {
    let start = text.len().saturating_sub(LINE_WIDTH);
    text.get(start..).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBuffer;

    #[test]
    fn default_screen_shows_band_and_speed() {
        let mut state = RigState::new();
        state.mode = RigMode::Default;
        let lines = compose(&state, &KeyState::new());
        assert_eq!(lines.line_1.as_str(), "14.060.00");
        assert_eq!(lines.line_2.as_str(), "20m 20WPM");
        assert_ne!(lines.blinking_1, 0);
    }

    #[test]
    fn recording_shows_tail() {
        let mut state = RigState::new();
        state.mode = RigMode::MemEnter;
        state.buffer = MemoryBuffer::from_text("CQ CQ CQ DE TEST TEST K");
        let lines = compose(&state, &KeyState::new());
        assert_eq!(lines.line_2.as_str(), "Q DE TEST TEST K");
    }
}
