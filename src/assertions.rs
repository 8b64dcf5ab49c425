//! Assertions over response envelopes
//!
//! Pure checks that panic on the first mismatch, printing expected vs.
//! actual plus the raw envelope fragment. Success and failure are a
//! structural AND of the two envelope fields; neither is ever inferred
//! from the other, and an inconsistent pairing fails as a protocol
//! violation rather than being coerced either way.

use crate::envelope::{ResponseEnvelope, BUSINESS_FAIL, BUSINESS_OK};
use serde_json::Value;

/// Requires `code == 200` and `businessCode == 0`; optionally requires
/// `message` to contain the given substring.
#[track_caller]
pub fn assert_success(envelope: &ResponseEnvelope, expected_message: Option<&str>) {
    check_consistency(envelope);
    assert_eq!(
        envelope.code,
        200,
        "expected success code 200, got {}: {}",
        envelope.code,
        envelope.fragment()
    );
    assert_eq!(
        envelope.business_code,
        BUSINESS_OK,
        "expected business success (0), got {}: {}",
        envelope.business_code,
        envelope.fragment()
    );
    if let Some(expected) = expected_message {
        assert_message_contains(envelope, expected);
    }
}

/// Requires `code == expected_code` and `businessCode == 1`; optionally
/// requires `message` to contain the given substring.
#[track_caller]
pub fn assert_error(
    envelope: &ResponseEnvelope,
    expected_code: u16,
    expected_message: Option<&str>,
) {
    check_consistency(envelope);
    assert_eq!(
        envelope.code,
        expected_code,
        "expected error code {}, got {}: {}",
        expected_code,
        envelope.code,
        envelope.fragment()
    );
    assert_eq!(
        envelope.business_code,
        BUSINESS_FAIL,
        "expected business failure (1), got {}: {}",
        envelope.business_code,
        envelope.fragment()
    );
    if let Some(expected) = expected_message {
        assert_message_contains(envelope, expected);
    }
}

/// Requires every named field to be present in the payload mapping.
#[track_caller]
pub fn assert_has_fields(data: &Value, fields: &[&str]) {
    let map = data
        .as_object()
        .unwrap_or_else(|| panic!("expected an object payload, got: {}", data));
    for field in fields {
        assert!(
            map.contains_key(*field),
            "payload is missing field {:?}: {}",
            field,
            data
        );
    }
}

/// Requires the pagination shape: integer `total` and array `rows`.
#[track_caller]
pub fn assert_pagination_shape(data: &Value) {
    assert_has_fields(data, &["total", "rows"]);
    assert!(
        data["total"].is_i64() || data["total"].is_u64(),
        "pagination `total` should be an integer: {}",
        data
    );
    assert!(
        data["rows"].is_array(),
        "pagination `rows` should be an array: {}",
        data
    );
}

#[track_caller]
fn assert_message_contains(envelope: &ResponseEnvelope, expected: &str) {
    assert!(
        envelope.message.contains(expected),
        "expected message to contain {:?}, got {:?}: {}",
        expected,
        envelope.message,
        envelope.fragment()
    );
}

#[track_caller]
fn check_consistency(envelope: &ResponseEnvelope) {
    assert!(
        envelope.is_consistent(),
        "protocol violation: code {} paired with businessCode {}: {}",
        envelope.code,
        envelope.business_code,
        envelope.fragment()
    );
}
