//! Account creation endpoint.
//!
//! ```text
//! POST /api/v1/users
//! {"registrationCode":"abc123","email":"john@doe.com","username":"johnny","bio":"hi there"}
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AccountValidationError, Error, FinalizeRegistration, FinalizeRegistrationValidationError,
    RegistrationCodeValidationError, UserAccount,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Code issued when the external login was verified.
    #[schema(example = "abc123")]
    pub registration_code: String,
    /// Must match the email recorded with the code.
    #[schema(example = "john@doe.com")]
    pub email: String,
    #[schema(example = "johnny")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "hi there")]
    pub bio: String,
}

impl TryFrom<CreateAccountRequest> for FinalizeRegistration {
    type Error = FinalizeRegistrationValidationError;

    fn try_from(value: CreateAccountRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.registration_code, value.email, value.username, value.bio)
    }
}

/// Public profile returned to the client.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = "johnny")]
    pub username: String,
    #[schema(example = "hi there")]
    pub bio: String,
    /// Contact links keyed by kind; always includes `email`.
    pub social_links: BTreeMap<String, String>,
}

/// Public view of a newly created account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "john@doe.com")]
    pub email: String,
    pub profile: ProfileResponse,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        let profile = account.profile();
        Self {
            id: account.id().to_string(),
            email: account.email().to_string(),
            profile: ProfileResponse {
                username: profile.username.to_string(),
                bio: profile.bio.as_str().to_owned(),
                social_links: profile.social_links.as_map().clone(),
            },
        }
    }
}

fn validation_code(err: &FinalizeRegistrationValidationError) -> &'static str {
    use AccountValidationError as Account;
    use FinalizeRegistrationValidationError as Field;
    use RegistrationCodeValidationError as Code;

    match err {
        Field::Code(Code::Empty) => "empty_registration_code",
        Field::Code(Code::ContainsWhitespace) => "registration_code_whitespace",
        Field::Code(Code::TooLong { .. }) => "registration_code_too_long",
        Field::Email(Account::EmptyEmail) => "empty_email",
        Field::Email(Account::EmailTooLong { .. }) => "email_too_long",
        Field::Username(Account::EmptyUsername) => "empty_username",
        Field::Username(Account::UsernameTooLong { .. }) => "username_too_long",
        Field::Username(Account::UsernameSurroundingWhitespace) => "username_whitespace",
        Field::Bio(Account::BioTooLong { .. }) => "bio_too_long",
        Field::Email(_) => "malformed_email",
        Field::Username(_) | Field::Bio(_) => "invalid_value",
    }
}

fn map_validation_error(err: FinalizeRegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": validation_code(&err),
    }))
}

/// Finalise a pending registration into an account.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use accounts::inbound::http::accounts::create_account;
///
/// let app = App::new().service(create_account);
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid input or unknown registration", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Account store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createAccount"
)]
#[post("/users")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: web::Json<CreateAccountRequest>,
) -> ApiResult<HttpResponse> {
    let request =
        FinalizeRegistration::try_from(payload.into_inner()).map_err(map_validation_error)?;
    let account = state.registration.finalize(request).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
