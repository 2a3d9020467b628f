//! Request-body validation shared by HTTP handlers.

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// JSON extractor configuration rendering body errors as domain errors.
///
/// Malformed JSON, missing fields and wrong content types all become
/// `400 invalid_request` with `details.code = "malformed_body"`, so clients
/// see one error schema across every failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request(format!("request body is invalid: {err}"))
            .with_details(json!({ "code": "malformed_body" }))
            .into()
    })
}
