//! Tests for decode parameter construction and normalization.

use alert_common::{AlertError, DayWindow, DecodeParameters, FlagValue, RawDecodeParameters};

// ============================================================================
// JSON surface tests
// ============================================================================

#[test]
fn test_from_json_full() {
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": 2785, "endDayIndex": 3334, "numberOfDays": 3334, "confirmedOnly": 0}"#,
    )
    .unwrap();

    assert_eq!(params, DecodeParameters::new(2785, 3334, 3334, false).unwrap());
}

#[test]
fn test_from_json_confirmed_only_as_number() {
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": 0, "endDayIndex": 10, "numberOfDays": 10, "confirmedOnly": 1}"#,
    )
    .unwrap();
    assert!(params.confirmed_only());
}

#[test]
fn test_from_json_confirmed_only_as_bool() {
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": 0, "endDayIndex": 10, "numberOfDays": 10, "confirmedOnly": true}"#,
    )
    .unwrap();
    assert!(params.confirmed_only());
}

#[test]
fn test_from_json_rejects_non_object() {
    let err = DecodeParameters::from_json("42").unwrap_err();
    assert!(matches!(err, AlertError::Config(_)));
}

#[test]
fn test_from_json_rejects_wrong_field_type() {
    assert!(DecodeParameters::from_json(r#"{"startDayIndex": "soon"}"#).is_err());
}

#[test]
fn test_raw_roundtrip_field_names() {
    let raw = RawDecodeParameters {
        start_day_index: Some(1.0),
        end_day_index: Some(2.0),
        number_of_days: Some(3.0),
        confirmed_only: Some(FlagValue::Bool(false)),
    };
    let json = serde_json::to_value(&raw).unwrap();
    assert_eq!(json["startDayIndex"], 1.0);
    assert_eq!(json["endDayIndex"], 2.0);
    assert_eq!(json["numberOfDays"], 3.0);
    assert_eq!(json["confirmedOnly"], false);
}

// ============================================================================
// Normalization tests
// ============================================================================

#[test]
fn test_normalize_empty_object_shows_nothing() {
    let params = DecodeParameters::from_json("{}").unwrap();
    assert!(params.is_empty());
    assert!(!params.confirmed_only());
}

#[test]
fn test_normalize_inverted_window_is_empty() {
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": 3334, "endDayIndex": 2785, "numberOfDays": 3334}"#,
    )
    .unwrap();
    assert_eq!(params.window(), DayWindow::Empty);
    assert_eq!(params.number_of_days(), 3334);
    assert!(!params.contains_day(3000));
}

#[test]
fn test_normalize_missing_start_defaults_to_zero() {
    let params = DecodeParameters::from_json(r#"{"endDayIndex": 50, "numberOfDays": 60}"#).unwrap();
    assert_eq!(params.window(), DayWindow::Range { start: 0, end: 50 });
}

#[test]
fn test_normalize_negative_start_raised_to_zero() {
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": -5, "endDayIndex": 50, "numberOfDays": 60}"#,
    )
    .unwrap();
    assert_eq!(params.start_day_index(), Some(0));
}

#[test]
fn test_normalize_missing_number_of_days_uses_end() {
    let params = DecodeParameters::from_json(r#"{"startDayIndex": 5, "endDayIndex": 50}"#).unwrap();
    assert_eq!(params.number_of_days(), 50);
    assert_eq!(params.end_day_index(), Some(50));
}

#[test]
fn test_normalize_missing_end_uses_number_of_days() {
    let params = DecodeParameters::from_json(r#"{"startDayIndex": 5, "numberOfDays": 70}"#).unwrap();
    assert_eq!(params.window(), DayWindow::Range { start: 5, end: 70 });
}

#[test]
fn test_normalize_end_clamped_to_number_of_days() {
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": 5, "endDayIndex": 500, "numberOfDays": 70}"#,
    )
    .unwrap();
    assert_eq!(params.end_day_index(), Some(70));
}

#[test]
fn test_normalize_fractional_bounds_keep_integer_semantics() {
    // day >= 10.5 admits 11 onwards; day <= 20.5 admits up to 20
    let params = DecodeParameters::from_json(
        r#"{"startDayIndex": 10.5, "endDayIndex": 20.5, "numberOfDays": 30}"#,
    )
    .unwrap();
    assert_eq!(params.window(), DayWindow::Range { start: 11, end: 20 });
}

#[test]
fn test_normalize_matches_strict_for_valid_input() {
    let raw = RawDecodeParameters {
        start_day_index: Some(100.0),
        end_day_index: Some(200.0),
        number_of_days: Some(300.0),
        confirmed_only: Some(FlagValue::Number(1.0)),
    };
    let strict = DecodeParameters::new(100, 200, 300, true).unwrap();
    assert_eq!(DecodeParameters::from(raw), strict);
}

#[test]
fn test_display() {
    let params = DecodeParameters::new(1, 2, 3, true).unwrap();
    assert_eq!(params.to_string(), "days 1..=2 of 3, confirmed_only=true");
    assert_eq!(
        DecodeParameters::empty(3, false).to_string(),
        "empty window of 3, confirmed_only=false"
    );
}
