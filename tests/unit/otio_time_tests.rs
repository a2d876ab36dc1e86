/*!
 * Tests for rational time and time range math
 */

use otio_conform::otio_time::{RationalTime, TimeRange};

#[test]
fn test_rationalTime_toSeconds_shouldDivideByRate() {
    let time = RationalTime::new(48.0, 24.0);
    assert!((time.to_seconds() - 2.0).abs() < 1e-9);
}

#[test]
fn test_rationalTime_rescaledTo_withSameRate_shouldBeIdentity() {
    let time = RationalTime::new(10.0, 30.0);
    assert_eq!(time.rescaled_to(30.0), time);
}

#[test]
fn test_rationalTime_rescaledTo_withDifferentRate_shouldPreserveSeconds() {
    let time = RationalTime::new(24.0, 24.0);
    let rescaled = time.rescaled_to(48.0);
    assert_eq!(rescaled.rate, 48.0);
    assert!((rescaled.value - 48.0).abs() < 1e-9);
}

#[test]
fn test_rationalTime_adding_withMixedRates_shouldUseLeftRate() {
    let a = RationalTime::new(24.0, 24.0);
    let b = RationalTime::new(60.0, 30.0);
    let sum = a.adding(&b);
    assert_eq!(sum.rate, 24.0);
    assert!((sum.value - 72.0).abs() < 1e-9);
}

#[test]
fn test_rationalTime_isValidDuration_shouldRejectDegenerateValues() {
    assert!(RationalTime::new(0.0, 24.0).is_valid_duration());
    assert!(RationalTime::new(10.0, 24.0).is_valid_duration());
    assert!(!RationalTime::new(-1.0, 24.0).is_valid_duration());
    assert!(!RationalTime::new(10.0, 0.0).is_valid_duration());
    assert!(!RationalTime::new(f64::NAN, 24.0).is_valid_duration());
    assert!(!RationalTime::new(10.0, f64::INFINITY).is_valid_duration());
}

#[test]
fn test_timeRange_endTimeExclusive_shouldAddDuration() {
    let range = TimeRange::new(RationalTime::new(10.0, 24.0), RationalTime::new(5.0, 24.0));
    assert_eq!(range.end_time_exclusive(), RationalTime::new(15.0, 24.0));
}

#[test]
fn test_timeRange_fromDuration_shouldStartAtZero() {
    let range = TimeRange::from_duration(RationalTime::new(12.0, 25.0));
    assert_eq!(range.start_time, RationalTime::zero(25.0));
    assert_eq!(range.duration.value, 12.0);
}

#[test]
fn test_rationalTime_deserialization_withMissingRate_shouldDefaultTo24() {
    let time: RationalTime = serde_json::from_str(r#"{"value": 6.0}"#).unwrap();
    assert_eq!(time.rate, 24.0);
}
