//! OpenAPI document for the REST API.
//!
//! Served through Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{AccountResponse, CreateAccountRequest, ProfileResponse};

/// OpenAPI document covering account creation and health probes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accounts API",
        description = "Finalises pending external-login registrations into user accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateAccountRequest,
        AccountResponse,
        ProfileResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Account creation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::{OpenApi as OpenApiDocument, RefOr};

    #[fixture]
    fn doc() -> OpenApiDocument {
        ApiDoc::openapi()
    }

    fn object_fields(doc: &OpenApiDocument, name: &str) -> Vec<String> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            other => panic!("expected object schema for {name}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn paths_are_documented(doc: OpenApiDocument, #[case] path: &str) {
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn create_account_documents_conflict_and_created(doc: OpenApiDocument) {
        let item = doc.paths.paths.get("/api/v1/users").expect("users path");
        let op = item.post.as_ref().expect("post operation");
        for status in ["201", "400", "409", "500", "503"] {
            assert!(op.responses.responses.contains_key(status), "missing {status}");
        }
    }

    #[rstest]
    #[case("CreateAccountRequest", &["registrationCode", "email", "username", "bio"])]
    #[case("AccountResponse", &["id", "email", "profile"])]
    #[case("ProfileResponse", &["username", "bio", "socialLinks"])]
    #[case("Error", &["code", "message", "traceId", "details"])]
    fn schemas_use_wire_field_names(
        doc: OpenApiDocument,
        #[case] name: &str,
        #[case] expected: &[&str],
    ) {
        let fields = object_fields(&doc, name);
        for field in expected {
            assert!(fields.iter().any(|f| f == field), "{name} lacks {field}: {fields:?}");
        }
    }

    #[rstest]
    fn account_response_hides_provider_details(doc: OpenApiDocument) {
        let fields = object_fields(&doc, "AccountResponse");
        assert!(!fields.iter().any(|f| f == "provider" || f == "socialId"));
    }
}
