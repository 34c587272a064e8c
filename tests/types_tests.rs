//! Types Module Tests
//!
//! Tests for domain types (Frequency, Band, TuningStep)
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test types_tests

use cw_rig_firmware::config::TUNING_STEPS;
use cw_rig_firmware::tick::BlinkClass;
use cw_rig_firmware::types::{Band, Frequency, TuningStep};

// =============================================================================
// Frequency Tests
// =============================================================================

#[test]
fn test_frequency_from_hz_overflow() {
    assert!(Frequency::from_hz(29_700_000).is_some());
    assert!(Frequency::from_hz(u32::MAX / 100 + 1).is_none());
    assert!(Frequency::from_khz(u32::MAX / 1000 + 1).is_none());
}

#[test]
fn test_frequency_units() {
    let f = Frequency::from_khz(7_030).unwrap();
    assert_eq!(f.as_hz(), 7_030_000);
    assert_eq!(f.as_khz(), 7_030);
    assert_eq!(f.as_units(), 7_030_000 * Frequency::UNITS_PER_HZ);
}

#[test]
fn test_frequency_display() {
    let show = |hz: u32| Frequency::from_hz(hz).unwrap().to_string();
    assert_eq!(show(1_836_000), "1.836.00");
    assert_eq!(show(28_060_000), "28.060.00");
    assert_eq!(show(10_106_090), "10.106.09");
    // Below 10 Hz is not shown
    assert_eq!(show(14_060_007), "14.060.00");
}

#[test]
fn test_frequency_checked_offset() {
    let f = Frequency::from_hz(7_000_000).unwrap();
    assert_eq!(f.checked_offset(-100), Frequency::from_units(f.as_units() - 100).into());
    assert_eq!(Frequency::from_units(5).checked_offset(-6), None);
    assert_eq!(Frequency::from_units(u32::MAX).checked_offset(1), None);
}

#[test]
fn test_frequency_ordering() {
    let low = Frequency::from_hz(3_500_000).unwrap();
    let high = Frequency::from_hz(3_500_010).unwrap();
    assert!(low < high);
    assert_eq!(high.clamp(low, low), low);
}

// =============================================================================
// Tuning Step Tests
// =============================================================================

#[test]
fn test_tuning_step_sizes() {
    let hz: Vec<u32> = (0..4)
        .map(|i| TuningStep::new(i).as_units() / Frequency::UNITS_PER_HZ)
        .collect();
    assert_eq!(hz, [10, 100, 1_000, 10_000]);
    assert_eq!(TuningStep::new(2).as_units(), TUNING_STEPS[2]);
}

#[test]
fn test_tuning_step_cycle() {
    let mut step = TuningStep::new(0);
    let mut seen = Vec::new();
    for _ in 0..5 {
        seen.push(step.index());
        step = step.next();
    }
    assert_eq!(seen, [0, 1, 2, 3, 0]);
}

#[test]
fn test_tuning_step_blink_digit() {
    assert_eq!(TuningStep::new(0).blink(), BlinkClass::Hz10);
    assert_eq!(TuningStep::new(1).blink(), BlinkClass::Hz100);
    assert_eq!(TuningStep::new(2).blink(), BlinkClass::KHz1);
    assert_eq!(TuningStep::new(3).blink(), BlinkClass::None);
}

// =============================================================================
// Band Tests
// =============================================================================

#[test]
fn test_band_index_round_trip() {
    for band in Band::ALL {
        assert_eq!(Band::from_index(band.index()), Some(band));
    }
    assert_eq!(Band::from_index(Band::COUNT as u8), None);
    assert_eq!(Band::from_index(0xFF), None);
}

#[test]
fn test_band_from_frequency() {
    let band = |hz: u32| Band::from_frequency(Frequency::from_hz(hz).unwrap());
    assert_eq!(band(1_836_000), Some(Band::M160));
    assert_eq!(band(10_125_000), Some(Band::M30));
    assert_eq!(band(24_906_000), Some(Band::M12));
    assert_eq!(band(9_000_000), None);
    assert_eq!(band(30_000_000), None);
}

#[test]
fn test_band_edges_inclusive() {
    for band in Band::ALL {
        let start = Frequency::from_hz(band.start_hz()).unwrap();
        let end = Frequency::from_hz(band.end_hz()).unwrap();
        assert!(band.contains(start) && band.contains(end), "{}", band.name());
        assert!(!band.contains(Frequency::from_hz(band.start_hz() - 1).unwrap()));
        assert!(!band.contains(Frequency::from_hz(band.end_hz() + 1).unwrap()));
    }
}

#[test]
fn test_band_default_frequency_inside() {
    for band in Band::ALL {
        assert!(band.contains(band.default_frequency()), "{}", band.name());
    }
}

#[test]
fn test_band_clamp() {
    let above = Frequency::from_hz(7_500_000).unwrap();
    let below = Frequency::from_hz(6_000_000).unwrap();
    assert_eq!(Band::M40.clamp(above).as_hz(), Band::M40.end_hz());
    assert_eq!(Band::M40.clamp(below).as_hz(), Band::M40.start_hz());
    let inside = Band::M40.default_frequency();
    assert_eq!(Band::M40.clamp(inside), inside);
}

#[test]
fn test_band_cycle_full_circle() {
    let mut band = Band::M160;
    for _ in 0..Band::COUNT {
        band = band.cycle(1);
    }
    assert_eq!(band, Band::M160);
    assert_eq!(Band::M20.cycle(-3), Band::M80);
}

#[test]
fn test_band_default_is_twenty_meters() {
    assert_eq!(Band::default(), Band::M20);
    assert_eq!(Band::default().name(), "20m");
}
