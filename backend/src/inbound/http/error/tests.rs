//! Tests for rendering domain errors as HTTP responses.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("who"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("no"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_follows_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = error.error_response();
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("db password rejected")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body.message(), "Internal server error");
    assert!(body.details().is_none());
    assert_eq!(body.trace_id(), Some(TRACE_ID));
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_details() {
    let error =
        Error::conflict("username already taken").with_details(json!({ "field": "username" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(header.is_none());
    assert_eq!(body.message(), "username already taken");
    assert_eq!(body.details(), Some(&json!({ "field": "username" })));
}

#[given("a conflict error code")]
fn a_conflict_error_code() -> ErrorCode {
    ErrorCode::Conflict
}

#[when("the adapter maps the code to an HTTP status")]
fn the_adapter_maps_the_code(code: ErrorCode) -> StatusCode {
    status_for(code)
}

#[then("the status is 409 Conflict")]
fn the_status_is_409(status: StatusCode) {
    assert_eq!(status, StatusCode::CONFLICT);
}

#[rstest]
fn conflict_codes_render_as_409() {
    the_status_is_409(the_adapter_maps_the_code(a_conflict_error_code()));
}

#[given("an unavailable store")]
fn an_unavailable_store() -> Error {
    Error::service_unavailable("account store is unavailable")
}

#[when("the adapter prepares the client payload")]
fn the_adapter_prepares_the_payload(error: Error) -> Error {
    redact_if_internal(&error)
}

#[then("clients see why the request failed")]
fn clients_see_why(payload: Error) {
    assert_eq!(payload.message(), "account store is unavailable");
}

#[rstest]
fn unavailable_messages_are_not_redacted() {
    clients_see_why(the_adapter_prepares_the_payload(an_unavailable_store()));
}
