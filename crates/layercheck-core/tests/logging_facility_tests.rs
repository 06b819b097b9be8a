#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{doc, layer, rect};
use layercheck_core::errors::LayerCheckError;
use layercheck_core::logging_facility::test_capture::init_test_capture;
use layercheck_core::model::RuleSet;
use layercheck_core::{compare, extract, log_op_end, log_op_error, log_op_start, validate};
use layercheck_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_LAYER_COUNT, FIELD_RULE_COUNT,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = LayerCheckError::VersionNotFound {
        version_id: "v1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(events[0].field(FIELD_ERR_KIND), Some("NotFound"));
}

// The operations below share fixed op names, so assertions only check that
// at least one start/end pair exists rather than exact counts.

#[test]
fn test_validate_emits_start_and_end() {
    let capture = init_test_capture();
    let d = doc(vec![layer("BLK_1_STAIR", 4)], vec![]);

    validate(&d, &RuleSet::default());

    capture.assert_event_exists("validate", EVENT_START);
    capture.assert_event_exists("validate", EVENT_END);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("validate") && e.event.as_deref() == Some(EVENT_END) && e.field(FIELD_DURATION_MS).is_some()
    });
    assert!(ends >= 1);
    assert!(capture.events_for_op("validate").iter().any(|e| {
        e.event.as_deref() == Some(EVENT_START)
            && e.field(FIELD_LAYER_COUNT) == Some("1")
            && e.field(FIELD_RULE_COUNT) == Some("0")
    }));
}

#[test]
fn test_extract_and_compare_emit_start_and_end() {
    let capture = init_test_capture();
    let d = doc(
        vec![layer("BLK_1_FLR_0_BLT_UP_AREA", 1)],
        vec![rect("BLK_1_FLR_0_BLT_UP_AREA", 0.0, 0.0, 2.0, 2.0)],
    );

    let snaps = extract(&d);
    compare(&snaps, &snaps);

    for op in ["extract", "compare"] {
        capture.assert_event_exists(op, EVENT_START);
        capture.assert_event_exists(op, EVENT_END);
    }
    assert!(capture
        .events_for_op("compare")
        .iter()
        .any(|e| e.field("modified_count") == Some("0")));
}
