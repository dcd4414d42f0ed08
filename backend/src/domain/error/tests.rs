//! Regression coverage for the domain error payload.

use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn blank_messages_fall_back_to_placeholder() {
    let error = Error::conflict("   ");
    assert_eq!(error.message(), "unspecified error");
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let error = Error::conflict("slot already booked");
    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({ "code": "conflict", "message": "slot already booked" })
    );
}

#[rstest]
fn details_and_trace_id_are_serialised_when_present() {
    let error = Error::conflict("slot already booked")
        .with_details(json!({ "code": "slot_already_booked" }))
        .with_trace_id("abc");
    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(value["traceId"], json!("abc"));
    assert_eq!(value["details"]["code"], json!("slot_already_booked"));
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(
        error.trace_id(),
        Some("00000000-0000-0000-0000-000000000000")
    );
}

#[rstest]
fn new_leaves_trace_id_empty_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}
