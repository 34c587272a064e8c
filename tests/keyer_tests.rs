//! Tests for the Key Engine
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test keyer_tests

use cw_rig_firmware::config::{KEY_MAX_SPEED, KEY_MIN_SPEED};
use cw_rig_firmware::key::{
    dash_time, dot_time, ElementSource, KeyEvent, KeyMode, KeyState, Paddles, SqueezeStart,
};
use cw_rig_firmware::memory::{MemoryBuffer, MemoryPlayer};
use cw_rig_firmware::morse::CodecOptions;

/// Step the engine with paddle levels given per step number
fn key_script(
    key: &mut KeyState,
    steps: u32,
    script: impl Fn(u32) -> (bool, bool),
) -> Vec<(u32, KeyEvent)> {
    let mut out = Vec::new();
    for t in 0..steps {
        let (dot, dash) = script(t);
        let mut paddles = Paddles::new(dot, dash);
        if let Some(event) = key.step(&mut paddles) {
            out.push((t, event));
        }
    }
    out
}

fn drive<S: ElementSource>(key: &mut KeyState, source: &mut S, steps: u32) -> Vec<(u32, KeyEvent)> {
    (0..steps)
        .filter_map(|t| key.step(source).map(|event| (t, event)))
        .collect()
}

fn elements(events: &[(u32, KeyEvent)]) -> Vec<KeyEvent> {
    events
        .iter()
        .map(|&(_, e)| e)
        .filter(|e| matches!(e, KeyEvent::Dot | KeyEvent::Dash))
        .collect()
}

// =============================================================================
// Timing Tests
// =============================================================================

#[test]
fn dash_is_three_dots_and_faster_is_shorter() {
    for wpm in KEY_MIN_SPEED..=KEY_MAX_SPEED {
        assert_eq!(dot_time(wpm), dash_time(wpm) / 3);
        if wpm > KEY_MIN_SPEED {
            assert!(dot_time(wpm) < dot_time(wpm - 1));
        }
    }
}

#[test]
fn twenty_wpm_dot_is_sixty_ticks() {
    assert_eq!(dot_time(20), 60);
}

#[test]
fn single_dot_at_every_speed() {
    for wpm in [KEY_MIN_SPEED, 13, 20, KEY_MAX_SPEED] {
        let mut key = KeyState::new();
        key.set_speed(wpm).unwrap();
        let dot = u32::from(dot_time(wpm));
        let dash = u32::from(dash_time(wpm));

        let events = key_script(&mut key, 4 * dash, |t| (t == 0, false));
        assert_eq!(
            events,
            [
                (0, KeyEvent::Dot),
                (dot, KeyEvent::ElementEnd),
                (2 * dot + dash, KeyEvent::End),
            ],
            "{wpm} WPM"
        );
        assert!(key.timeout);
    }
}

#[test]
fn letter_a_timeline() {
    let mut key = KeyState::new();
    // Dot tapped, dash touched and released while the dot is still sounding
    let events = key_script(&mut key, 600, |t| (t == 0, (10..20).contains(&t)));
    assert_eq!(
        events,
        [
            (0, KeyEvent::Dot),
            (60, KeyEvent::ElementEnd),
            (120, KeyEvent::Dash),
            (300, KeyEvent::ElementEnd),
            (540, KeyEvent::End),
        ]
    );
}

#[test]
fn released_paddle_never_shortens_element() {
    let mut key = KeyState::new();
    let events = key_script(&mut key, 200, |t| (false, t == 0));
    assert_eq!(events[0], (0, KeyEvent::Dash));
    assert_eq!(events[1], (180, KeyEvent::ElementEnd));
}

#[test]
fn speed_change_waits_for_element_boundary() {
    let mut key = KeyState::new();
    let mut events = Vec::new();
    for t in 0..400 {
        if t == 10 {
            key.set_speed(10).unwrap();
        }
        if let Some(event) = key.step(&mut Paddles::new(true, false)) {
            events.push((t, event));
        }
    }
    // Dot already in flight keeps its 20 WPM length; the gap uses 10 WPM
    assert_eq!(events[1], (60, KeyEvent::ElementEnd));
    assert_eq!(events[2], (180, KeyEvent::Dot));
    assert_eq!(events[3], (300, KeyEvent::ElementEnd));
}

#[test]
fn rejected_speed_keeps_timing() {
    let mut key = KeyState::new();
    assert!(key.set_speed(KEY_MAX_SPEED + 1).is_err());
    assert_eq!(key.dot_time(), dot_time(20));
}

// =============================================================================
// Iambic Tests
// =============================================================================

#[test]
fn squeeze_strictly_alternates() {
    let mut key = KeyState::new();
    let events = key_script(&mut key, 4 * 240 + 200, |_| (true, true));
    let sent = elements(&events);
    assert!(sent.len() >= 4);
    assert_eq!(sent[0], KeyEvent::Dot);
    for pair in sent.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn squeeze_dash_first_policy() {
    let mut key = KeyState::new();
    let mut out = Vec::new();
    for t in 0..800 {
        let mut paddles = Paddles {
            squeeze: SqueezeStart::DashFirst,
            ..Paddles::new(true, true)
        };
        if let Some(event) = key.step(&mut paddles) {
            out.push((t, event));
        }
    }
    let sent = elements(&out);
    assert_eq!(&sent[..3], [KeyEvent::Dash, KeyEvent::Dot, KeyEvent::Dash]);
}

#[test]
fn dot_memory_during_dash() {
    let mut key = KeyState::new();
    let events = key_script(&mut key, 600, |t| ((50..60).contains(&t), t == 0));
    assert_eq!(
        elements(&events),
        [KeyEvent::Dash, KeyEvent::Dot],
        "dot touched mid-dash is sent after it"
    );
    assert!(events.contains(&(240, KeyEvent::Dot)));
}

#[test]
fn held_paddle_repeats() {
    let mut key = KeyState::new();
    let events = key_script(&mut key, 1000, |t| (t < 500, false));
    let sent = elements(&events);
    assert!(sent.len() >= 4);
    assert!(sent.iter().all(|e| *e == KeyEvent::Dot));
}

// =============================================================================
// Straight Key Tests
// =============================================================================

#[test]
fn straight_key_follows_contact() {
    let mut key = KeyState::new();
    key.mode = KeyMode::Straight;
    let mut out = Vec::new();
    for t in 0..300u32 {
        let mut paddles = Paddles::new((20..250).contains(&t), false);
        if let Some(event) = key.step_paddles(&mut paddles) {
            out.push((t, event));
        }
    }
    assert_eq!(out, [(20, KeyEvent::Start), (250, KeyEvent::End)]);
}

// =============================================================================
// Playback Equivalence Tests
// =============================================================================

#[test]
fn memory_playback_matches_hand_keying() {
    let mut hand = KeyState::new();
    let keyed = key_script(&mut hand, 700, |t| (t == 0, (10..20).contains(&t)));

    let mut played = KeyState::new();
    let mut player = MemoryPlayer::new(&MemoryBuffer::from_text("A"), CodecOptions::default());
    let sent = drive(&mut played, &mut player, 700);

    assert_eq!(keyed, sent);
    assert!(player.is_exhausted());
}

#[test]
fn memory_playback_matches_hand_keying_at_other_speed() {
    let mut hand = KeyState::new();
    hand.set_speed(12).unwrap();
    // N: dash then dot, dot touched during the dash
    let keyed = key_script(&mut hand, 1500, |t| ((30..40).contains(&t), t == 0));

    let mut played = KeyState::new();
    played.set_speed(12).unwrap();
    let mut player = MemoryPlayer::new(&MemoryBuffer::from_text("N"), CodecOptions::default());
    let sent = drive(&mut played, &mut player, 1500);

    assert_eq!(keyed, sent);
}
