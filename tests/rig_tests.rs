//! Tests for the rig state machine, driven tick by tick on the bench
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test rig_tests

use cw_rig_firmware::config::{
    eeprom, RigOptions, BEACON_INTERVAL, DEFAULT_IF_FREQ, EEPROM_SIZE, ERASE_HOLD_TICKS,
    KEY_MIN_SPEED, MENU_STEP_TICKS, WPM_DEFAULT,
};
use cw_rig_firmware::error::Fault;
use cw_rig_firmware::inputs::Line;
use cw_rig_firmware::key::{dot_time, KeyMode};
use cw_rig_firmware::memory::{load_memory, store_memory, MemoryBuffer};
use cw_rig_firmware::rig::RigMode;
use cw_rig_firmware::sim::{Bench, FailingStorage, RecordingTransmitter, TxCall};
use cw_rig_firmware::storage::{RamStorage, Settings};
use cw_rig_firmware::types::{Band, Frequency};

fn tx(b: &Bench) -> &RecordingTransmitter {
    b.rig.transmitter().inner()
}

fn hz(hz: u32) -> Frequency {
    Frequency::from_hz(hz).unwrap()
}

/// Short touch of the dot paddle: one dot
fn dot(b: &mut Bench) {
    b.paddles(true, false);
    b.run(10);
    b.paddles(false, false);
}

/// Short touch of the dash paddle: one dash
fn dash(b: &mut Bench) {
    b.paddles(false, true);
    b.run(10);
    b.paddles(false, false);
}

fn press(b: &mut Bench) {
    b.tap(Line::EncoderButton);
}

fn enter_digits(b: &mut Bench, digits: &[i8]) {
    for &digit in digits {
        b.turn(digit);
        press(b);
    }
}

fn settle(b: &mut Bench) {
    b.run_until(5000, |b| b.mode() == RigMode::Default)
        .expect("rig returns to DEFAULT");
}

fn erase_options(erase_eeprom: bool) -> RigOptions {
    RigOptions {
        erase_eeprom,
        ..RigOptions::default()
    }
}

// =============================================================================
// Startup Tests
// =============================================================================

#[test]
fn startup_on_erased_store_uses_defaults() {
    let b = Bench::new();
    assert_eq!(b.mode(), RigMode::Default);

    let state = b.rig.state();
    assert_eq!(state.band(), Band::M20);
    assert_eq!(state.op_freq(), Band::M20.default_frequency());
    assert_eq!(state.if_freq(), DEFAULT_IF_FREQ);
    assert_eq!(state.correction(), 0);
    assert!(!state.rit());
    assert!(!state.beacon());
    assert_eq!(b.shared.key().speed(), WPM_DEFAULT);

    let synth = b.rig.synthesizer();
    assert_eq!(synth.tuned, Some((state.op_freq(), false)));
    assert_eq!(synth.calibration, Some((0, DEFAULT_IF_FREQ)));

    assert_eq!(b.rig.display().line_1(), "14.060.00");
    assert_eq!(b.rig.display().line_2(), "20m 20WPM");

    let tx = tx(&b);
    assert!(!tx.tx && !tx.sidetone && !tx.muted);
}

#[test]
fn startup_applies_stored_settings() {
    let mut storage = RamStorage::<EEPROM_SIZE>::new();
    Settings {
        band: Band::M40,
        speed: 25,
        correction: -300,
        ..Settings::default()
    }
    .save(&mut storage)
    .unwrap();

    let b = Bench::with(storage, RigOptions::default());
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.state().band(), Band::M40);
    assert_eq!(b.rig.state().op_freq(), hz(7_030_000));
    assert_eq!(b.shared.key().speed(), 25);
    assert_eq!(
        b.rig.synthesizer().calibration,
        Some((-300, DEFAULT_IF_FREQ))
    );
    assert_eq!(b.rig.display().line_2(), "40m 25WPM");
}

#[test]
fn corrupt_settings_fall_back_without_fault() {
    let mut bytes = [0xFFu8; EEPROM_SIZE];
    bytes[eeprom::CW_SPEED] = 99;
    bytes[eeprom::BAND] = 42;
    let b = Bench::with(RamStorage::from_bytes(bytes), RigOptions::default());
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.state().band(), Band::M20);
    assert_eq!(b.shared.key().speed(), WPM_DEFAULT);
}

#[test]
fn unreadable_store_enters_error() {
    let b = Bench::with(FailingStorage, RigOptions::default());
    assert_eq!(b.mode(), RigMode::Error);
    assert_eq!(b.rig.state().fault(), Some(Fault::StorageFailure));
    assert_eq!(b.rig.display().line_1(), "ERROR");
    assert_eq!(b.rig.display().line_2(), "ERR 01");
    assert!(!b.rig.transmitter().inner().tx);
}

// =============================================================================
// Error State Tests
// =============================================================================

#[test]
fn error_ignores_every_input() {
    let mut b = Bench::new();
    b.rig.fault(Fault::Hardware);
    assert_eq!(b.mode(), RigMode::Error);

    press(&mut b);
    b.turn(3);
    b.menu(0);
    b.tap(Line::Rit);
    b.paddles(true, true);
    b.run(500);
    b.paddles(false, false);
    b.run(100);

    assert_eq!(b.mode(), RigMode::Error);
    assert_eq!(tx(&b).tx_count(), 0);
    assert_eq!(tx(&b).sidetone_count(), 0);
    assert_eq!(b.rig.state().op_freq(), Band::M20.default_frequency());
}

#[test]
fn reset_leaves_error_and_restores_paddles() {
    let mut b = Bench::new();
    b.rig.fault(Fault::Hardware);
    b.rig.reset();
    assert_eq!(b.mode(), RigMode::Default);

    dot(&mut b);
    assert_eq!(b.mode(), RigMode::Keying);
}

#[test]
fn rit_hold_does_not_leave_error() {
    let mut b = Bench::new();
    b.rig.fault(Fault::Hardware);
    b.hold(Line::Rit, ERASE_HOLD_TICKS + 100);
    assert_eq!(b.mode(), RigMode::Error);
    assert_eq!(b.rig.state().fault(), Some(Fault::Hardware));
}

#[test]
fn fault_while_transmitting_drops_everything() {
    let mut b = Bench::new();
    dot(&mut b);
    assert!(tx(&b).tx);
    b.rig.fault(Fault::Hardware);
    let tx = tx(&b);
    assert!(!tx.tx && !tx.sidetone && !tx.muted);
}

#[test]
fn straight_key_outside_default_is_impossible() {
    let mut b = Bench::new();
    b.menu(1);
    assert_eq!(b.mode(), RigMode::ChangeBand);

    b.shared.with_key(|key| key.mode = KeyMode::Straight);
    b.run(1);
    assert_eq!(b.mode(), RigMode::Error);
    assert_eq!(b.rig.state().fault(), Some(Fault::ImpossibleState));
    assert_eq!(b.rig.display().line_2(), "ERR 02");
}

// =============================================================================
// Tuning and RIT Tests
// =============================================================================

#[test]
fn encoder_tunes_by_step() {
    let mut b = Bench::new();
    b.turn(3);
    assert_eq!(b.rig.state().op_freq(), hz(14_060_300));
    b.turn(-1);
    assert_eq!(b.rig.state().op_freq(), hz(14_060_200));
    assert_eq!(
        b.rig.synthesizer().tuned,
        Some((hz(14_060_200), false))
    );

    press(&mut b);
    b.turn(1);
    assert_eq!(b.rig.state().op_freq(), hz(14_061_200));
    assert_eq!(b.rig.display().line_1(), "14.061.20");
}

#[test]
fn rit_moves_receive_only() {
    let mut b = Bench::new();
    b.tap(Line::Rit);
    assert!(b.rig.state().rit());

    b.turn(5);
    assert_eq!(b.rig.state().op_freq(), hz(14_060_500));
    assert_eq!(b.rig.state().tx_freq(), hz(14_060_000));
    assert_eq!(b.rig.display().line_1(), "14.060.50 R");

    dot(&mut b);
    assert!(b
        .rig
        .synthesizer()
        .history
        .contains(&(hz(14_060_000), true)));
    settle(&mut b);
    assert_eq!(b.rig.synthesizer().tuned, Some((hz(14_060_500), false)));

    b.tap(Line::Rit);
    assert!(!b.rig.state().rit());
    assert_eq!(b.rig.state().op_freq(), hz(14_060_000));
}

// =============================================================================
// Keying Tests
// =============================================================================

#[test]
fn paddle_keys_transmitter_and_returns() {
    let mut b = Bench::new();
    dot(&mut b);
    assert_eq!(b.mode(), RigMode::Keying);
    {
        let tx = tx(&b);
        assert!(tx.tx && tx.sidetone && tx.muted);
        // Receiver muted before the carrier comes up
        let mute = tx.calls.iter().position(|c| *c == TxCall::Mute(true));
        let key = tx.calls.iter().position(|c| *c == TxCall::TxOn);
        assert!(mute < key);
    }

    settle(&mut b);
    let tx = tx(&b);
    assert!(!tx.tx && !tx.sidetone && !tx.muted);
    assert_eq!(tx.tx_count(), 1);
}

#[test]
fn straight_key_mode_toggles_from_menu() {
    let mut b = Bench::new();
    b.menu(7);
    assert_eq!(b.rig.state().key_mode(), KeyMode::Straight);
    assert_eq!(b.shared.key().mode, KeyMode::Straight);
    assert_eq!(b.rig.display().last_feedback(), Some("STRAIGHT KEY"));

    b.set(Line::Dot, true);
    b.run(200);
    assert_eq!(b.mode(), RigMode::Keying);
    assert!(tx(&b).tx);
    b.set(Line::Dot, false);
    b.run(10);
    assert_eq!(b.mode(), RigMode::Default);
    assert!(!tx(&b).tx);

    // Other modes key iambic; the preference comes back with DEFAULT
    b.menu(0);
    assert_eq!(b.shared.key().mode, KeyMode::Iambic);
    b.tap(Line::Rit);
    assert_eq!(b.shared.key().mode, KeyMode::Straight);
}

// =============================================================================
// Menu Tests
// =============================================================================

#[test]
fn held_keyer_walks_the_menu() {
    let mut b = Bench::new();
    b.set(Line::Keyer, true);
    b.run(MENU_STEP_TICKS + 100);
    assert_eq!(
        b.rig.display().questions,
        ["SPEED?".to_string(), "BAND?".to_string()]
    );
    b.set(Line::Keyer, false);
    b.run(30);
    assert_eq!(b.mode(), RigMode::ChangeBand);
}

#[test]
fn every_waiting_state_can_be_left() {
    for (index, mode) in [
        (0, RigMode::AdjustCs),
        (1, RigMode::ChangeBand),
        (2, RigMode::Tune),
        (3, RigMode::Dfe),
        (4, RigMode::MemSendWait),
        (5, RigMode::MemEnterWait),
        (8, RigMode::CalibrationCorrection),
    ] {
        for escape in [Line::Rit, Line::Keyer] {
            let mut b = Bench::new();
            b.menu(index);
            assert_eq!(b.mode(), mode);
            b.tap(escape);
            assert_eq!(b.mode(), RigMode::Default, "{mode:?} via {escape:?}");
            assert!(!tx(&b).tx);
        }
    }
}

// =============================================================================
// Speed Tests
// =============================================================================

#[test]
fn speed_adjust_saves_on_confirm() {
    let mut b = Bench::new();
    b.menu(0);
    assert_eq!(b.mode(), RigMode::AdjustCs);
    b.turn(5);
    assert_eq!(b.shared.key().speed(), 25);
    assert_eq!(b.rig.display().line_2(), "25 WPM");

    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.storage().as_bytes()[eeprom::CW_SPEED], 25);
}

#[test]
fn speed_adjust_stops_at_limit_and_cancel_restores() {
    let mut b = Bench::new();
    b.menu(0);
    b.turn(-20);
    assert_eq!(b.shared.key().speed(), KEY_MIN_SPEED);
    assert_eq!(b.rig.display().last_feedback(), Some("SPEED LIMIT"));

    b.tap(Line::Rit);
    assert_eq!(b.shared.key().speed(), WPM_DEFAULT);
    assert_eq!(b.rig.storage().as_bytes()[eeprom::CW_SPEED], 0xFF);
}

#[test]
fn speed_adjust_keys_sidetone_only() {
    let mut b = Bench::new();
    b.menu(0);
    dot(&mut b);
    b.run(400);
    assert_eq!(b.mode(), RigMode::AdjustCs);
    assert_eq!(tx(&b).sidetone_count(), 1);
    assert_eq!(tx(&b).tx_count(), 0);
}

// =============================================================================
// Band and Frequency Entry Tests
// =============================================================================

#[test]
fn band_change_remembers_frequency() {
    let mut b = Bench::new();
    b.turn(3);
    b.menu(1);
    assert_eq!(b.rig.display().line_2(), "20m");
    b.turn(-1);
    assert_eq!(b.rig.display().line_2(), "30m");

    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.state().band(), Band::M30);
    assert_eq!(b.rig.state().op_freq(), Band::M30.default_frequency());
    assert_eq!(
        b.rig.storage().as_bytes()[eeprom::BAND],
        Band::M30.index()
    );

    b.menu(1);
    b.turn(1);
    press(&mut b);
    assert_eq!(b.rig.state().band(), Band::M20);
    assert_eq!(b.rig.state().op_freq(), hz(14_060_300));
}

#[test]
fn band_change_cancel_keeps_band() {
    let mut b = Bench::new();
    b.menu(1);
    b.turn(2);
    b.tap(Line::Rit);
    assert_eq!(b.rig.state().band(), Band::M20);
    assert_eq!(b.rig.storage().as_bytes()[eeprom::BAND], 0xFF);
}

#[test]
fn direct_entry_jumps_across_bands() {
    let mut b = Bench::new();
    b.menu(3);
    assert_eq!(b.mode(), RigMode::Dfe);
    enter_digits(&mut b, &[0, 7]);
    assert_eq!(b.rig.display().line_2(), "070 kHz");

    enter_digits(&mut b, &[0, 3, 5]);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.state().band(), Band::M40);
    assert_eq!(b.rig.state().op_freq(), hz(7_035_000));
    assert_eq!(
        b.rig.storage().as_bytes()[eeprom::BAND],
        Band::M40.index()
    );
}

#[test]
fn direct_entry_out_of_band_is_refused() {
    let mut b = Bench::new();
    b.menu(3);
    enter_digits(&mut b, &[0, 9, 0, 0, 0]);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.display().last_feedback(), Some("OUT OF BAND"));
    assert_eq!(b.rig.state().op_freq(), Band::M20.default_frequency());
}

#[test]
fn tune_carrier_runs_until_press() {
    let mut b = Bench::new();
    b.menu(2);
    assert_eq!(b.mode(), RigMode::Tune);
    assert!(b.rig.state().tune_mode_on());
    {
        let tx = tx(&b);
        assert!(tx.tx && tx.muted);
        assert!(!tx.sidetone);
    }
    assert_eq!(
        b.rig.synthesizer().tuned,
        Some((Band::M20.default_frequency(), true))
    );
    assert_eq!(b.rig.display().line_2(), "TUNE");

    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert!(!b.rig.state().tune_mode_on());
    let tx = tx(&b);
    assert!(!tx.tx && !tx.muted);
}

// =============================================================================
// Memory Tests
// =============================================================================

#[test]
fn record_review_store_and_send() {
    let mut b = Bench::new();
    b.menu(5);
    assert_eq!(b.mode(), RigMode::MemEnterWait);
    assert_eq!(b.rig.display().line_2(), "MEM 1");
    b.turn(1);
    assert_eq!(b.rig.display().line_2(), "MEM 2");
    press(&mut b);
    assert_eq!(b.mode(), RigMode::MemEnter);

    dot(&mut b);
    b.run(700);
    dash(&mut b);
    b.run(700);
    assert_eq!(b.rig.state().buffer().as_str(), "E T ");
    assert_eq!(tx(&b).tx_count(), 0);
    assert_eq!(tx(&b).sidetone_count(), 2);

    press(&mut b);
    assert_eq!(b.mode(), RigMode::MemEnterReview);
    b.run_until(5000, |b| {
        let tx = b.rig.transmitter().inner();
        tx.sidetone_count() == 4 && !tx.sidetone
    })
    .expect("review plays the buffer");
    b.run(1000);
    assert_eq!(b.mode(), RigMode::MemEnterReview);
    assert_eq!(tx(&b).tx_count(), 0);

    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.display().last_feedback(), Some("STORED"));
    let stored = load_memory(b.rig.storage_mut(), 1).unwrap();
    assert_eq!(stored.as_str(), "E T");

    b.menu(4);
    b.turn(1);
    assert_eq!(b.rig.state().mem_tx_index(), 1);
    press(&mut b);
    assert_eq!(b.mode(), RigMode::MemSendTx);
    settle(&mut b);
    let tx = tx(&b);
    assert_eq!(tx.tx_count(), 2);
    assert!(!tx.tx && !tx.muted);
}

#[test]
fn cancelled_recording_is_discarded() {
    let mut b = Bench::new();
    b.menu(5);
    press(&mut b);
    dot(&mut b);
    b.run(400);
    assert_eq!(b.rig.state().buffer().as_str(), "E");

    b.tap(Line::Rit);
    assert_eq!(b.mode(), RigMode::Default);
    assert!(b.rig.state().buffer().is_empty());
    assert_eq!(b.rig.display().last_feedback(), Some("DISCARDED"));
    assert!(load_memory(b.rig.storage_mut(), 0).unwrap().is_empty());
}

#[test]
fn full_buffer_moves_to_review() {
    let mut storage = RamStorage::<EEPROM_SIZE>::new();
    Settings {
        speed: 30,
        ..Settings::default()
    }
    .save(&mut storage)
    .unwrap();
    let mut b = Bench::with(storage, RigOptions::default());
    b.menu(5);
    press(&mut b);

    for _ in 0..MemoryBuffer::CAPACITY {
        dot(&mut b);
        b.run(240);
    }
    assert_eq!(b.mode(), RigMode::MemEnterReview);
    assert_eq!(b.rig.state().buffer().len(), MemoryBuffer::CAPACITY);
    assert!(b.rig.state().buffer().as_str().chars().all(|c| c == 'E'));
    assert_eq!(b.rig.display().last_feedback(), Some("MEMORY FULL"));
}

#[test]
fn sending_empty_slot_reports() {
    let mut b = Bench::new();
    b.menu(4);
    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.display().last_feedback(), Some("MEMORY EMPTY"));
    assert_eq!(tx(&b).tx_count(), 0);
}

#[test]
fn paddle_aborts_playback() {
    let mut b = Bench::new();
    store_memory(b.rig.storage_mut(), 0, &MemoryBuffer::from_text("PARIS")).unwrap();
    b.menu(4);
    press(&mut b);
    assert_eq!(b.mode(), RigMode::MemSendTx);
    b.run(100);

    dot(&mut b);
    b.run(1000);
    assert_eq!(b.mode(), RigMode::Default);
    let tx = tx(&b);
    assert!(!tx.tx && !tx.muted);
    assert!(tx.tx_count() < 14);
}

// =============================================================================
// Beacon Tests
// =============================================================================

#[test]
fn beacon_repeats_after_interval() {
    let mut b = Bench::new();
    store_memory(b.rig.storage_mut(), 0, &MemoryBuffer::from_text("E")).unwrap();

    b.menu(6);
    assert!(b.rig.state().beacon());
    assert_eq!(b.mode(), RigMode::MemSendTx);
    settle(&mut b);
    assert_eq!(tx(&b).tx_count(), 1);

    let gap = b
        .run_until(5000, |b| b.mode() == RigMode::MemSendTx)
        .expect("beacon repeats");
    assert_eq!(gap, BEACON_INTERVAL * u32::from(dot_time(WPM_DEFAULT)));

    // Any button stops the beacon
    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert!(!b.rig.state().beacon());
    assert_eq!(b.rig.display().last_feedback(), Some("BEACON OFF"));
    b.run(3000);
    assert_eq!(tx(&b).tx_count(), 2);
}

#[test]
fn beacon_fires_after_leaving_a_forced_iambic_state_mid_character() {
    let mut b = Bench::new();
    store_memory(b.rig.storage_mut(), 0, &MemoryBuffer::from_text("E")).unwrap();

    b.menu(7);
    assert_eq!(b.shared.key().mode, KeyMode::Straight);

    // Sidetone dot in ADJUST_CS, confirmed before its gap is over
    b.menu(0);
    assert_eq!(b.mode(), RigMode::AdjustCs);
    dot(&mut b);
    press(&mut b);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.shared.key().mode, KeyMode::Straight);
    assert!(b.shared.key().is_idle());

    b.menu(6);
    assert!(b.rig.state().beacon());
    let sent = b.run_until(20_000, |b| tx(b).tx_count() >= 2);
    assert!(sent.is_some(), "beacon stayed silent");
}

#[test]
fn beacon_on_empty_slot_switches_off() {
    let mut b = Bench::new();
    b.menu(6);
    assert_eq!(b.mode(), RigMode::Default);
    assert!(!b.rig.state().beacon());
    assert_eq!(b.rig.display().last_feedback(), Some("MEMORY EMPTY"));
}

// =============================================================================
// Calibration Tests
// =============================================================================

#[test]
fn calibration_runs_in_order_and_saves() {
    let mut b = Bench::new();
    let mut visited = Vec::new();

    b.menu(8);
    visited.push(b.mode());
    b.turn(2);
    assert_eq!(b.rig.state().correction(), 200);
    assert_eq!(b.rig.synthesizer().calibration, Some((200, DEFAULT_IF_FREQ)));

    press(&mut b);
    visited.push(b.mode());
    b.turn(1);
    let if_freq = DEFAULT_IF_FREQ.checked_offset(1000).unwrap();
    assert_eq!(b.rig.state().if_freq(), if_freq);

    press(&mut b);
    visited.push(b.mode());
    b.turn(1);

    press(&mut b);
    visited.push(b.mode());
    assert_eq!(b.rig.state().band(), Band::M17);
    b.turn(2);
    assert_eq!(b.rig.state().op_freq(), hz(18_086_200));

    press(&mut b);
    visited.push(b.mode());

    assert_eq!(
        visited,
        [
            RigMode::CalibrationCorrection,
            RigMode::CalibrationPeakIf,
            RigMode::CalibrationChangeBand,
            RigMode::CalibrationPeakRx,
            RigMode::Default,
        ]
    );
    assert_eq!(b.rig.display().last_feedback(), Some("CAL SAVED"));

    let (settings, recovered) = Settings::load(b.rig.storage_mut()).unwrap();
    assert_eq!(settings.correction, 200);
    assert_eq!(settings.if_freq, if_freq);
    assert_eq!(settings.band, Band::M17);
    assert!(!recovered.correction && !recovered.if_freq);
}

#[test]
fn calibration_abort_restores_everything() {
    let mut b = Bench::new();
    b.menu(8);
    b.turn(3);
    press(&mut b);
    b.turn(-2);
    press(&mut b);
    b.turn(1);
    press(&mut b);
    assert_eq!(b.mode(), RigMode::CalibrationPeakRx);
    assert_eq!(b.rig.state().band(), Band::M17);

    b.tap(Line::Rit);
    assert_eq!(b.mode(), RigMode::Default);
    assert_eq!(b.rig.display().last_feedback(), Some("CAL ABORTED"));
    let state = b.rig.state();
    assert_eq!(state.correction(), 0);
    assert_eq!(state.if_freq(), DEFAULT_IF_FREQ);
    assert_eq!(state.band(), Band::M20);
    assert_eq!(state.op_freq(), Band::M20.default_frequency());
    assert_eq!(b.rig.synthesizer().calibration, Some((0, DEFAULT_IF_FREQ)));

    let (settings, _) = Settings::load(b.rig.storage_mut()).unwrap();
    assert_eq!(settings.band, Band::M20);
}

// =============================================================================
// EEPROM Erase Tests
// =============================================================================

#[test]
fn rit_hold_erases_with_progress() {
    let mut storage = RamStorage::<EEPROM_SIZE>::new();
    Settings {
        band: Band::M40,
        speed: 25,
        ..Settings::default()
    }
    .save(&mut storage)
    .unwrap();
    let mut b = Bench::with(storage, erase_options(true));
    assert_eq!(b.rig.state().band(), Band::M40);

    b.set(Line::Rit, true);
    b.run(2500);
    let (value, min, max) = b.rig.display().progress.expect("progress shown");
    assert_eq!((min, max), (0, 100));
    assert!((20..=35).contains(&value));

    b.run(ERASE_HOLD_TICKS);
    assert_eq!(b.rig.display().last_feedback(), Some("ERASED"));
    assert_eq!(b.rig.display().progress, None);
    assert_eq!(b.rig.state().band(), Band::M20);
    assert_eq!(b.shared.key().speed(), WPM_DEFAULT);
    assert!(b.rig.storage().as_bytes().iter().all(|&byte| byte == 0xFF));

    b.set(Line::Rit, false);
    b.run(30);
    assert_eq!(b.mode(), RigMode::Default);
    assert!(!b.rig.state().rit());
}

#[test]
fn rit_hold_without_erase_option_is_harmless() {
    let mut storage = RamStorage::<EEPROM_SIZE>::new();
    Settings {
        band: Band::M40,
        ..Settings::default()
    }
    .save(&mut storage)
    .unwrap();
    let mut b = Bench::with(storage, erase_options(false));

    b.hold(Line::Rit, ERASE_HOLD_TICKS + 100);
    assert_eq!(b.rig.state().band(), Band::M40);
    assert!(b.rig.display().feedback.is_empty());
    assert_eq!(b.rig.display().progress, None);
    assert!(!b.rig.state().rit());
}
