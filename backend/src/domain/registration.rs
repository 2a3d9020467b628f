//! Pending registrations and the request that finalises them.
//!
//! A pending registration is created by the identity-provider callback once
//! an external login has been verified. It links a one-time code to that
//! login until the user picks a username and the account is materialised.

use std::fmt;

use chrono::{DateTime, Utc};

use super::account::{AccountValidationError, Bio, Email, Provider, SocialId, Username};

/// Maximum allowed length for a registration code.
pub const REGISTRATION_CODE_MAX: usize = 128;

/// Validation errors returned by [`RegistrationCode::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationCodeValidationError {
    Empty,
    ContainsWhitespace,
    TooLong { max: usize },
}

impl fmt::Display for RegistrationCodeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "registration code must not be empty"),
            Self::ContainsWhitespace => {
                write!(f, "registration code must not contain surrounding whitespace")
            }
            Self::TooLong { max } => {
                write!(f, "registration code must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationCodeValidationError {}

/// Opaque single-use token identifying a pending registration.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RegistrationCode(String);

impl RegistrationCode {
    /// Validate and construct a [`RegistrationCode`].
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::RegistrationCode;
    ///
    /// let code = RegistrationCode::new("abc123").expect("valid code");
    /// assert_eq!(code.as_str(), "abc123");
    /// ```
    pub fn new(code: impl Into<String>) -> Result<Self, RegistrationCodeValidationError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(RegistrationCodeValidationError::Empty);
        }
        if code.trim() != code {
            return Err(RegistrationCodeValidationError::ContainsWhitespace);
        }
        if code.chars().count() > REGISTRATION_CODE_MAX {
            return Err(RegistrationCodeValidationError::TooLong {
                max: REGISTRATION_CODE_MAX,
            });
        }
        Ok(Self(code))
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Short prefix safe to include in logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}…")
    }
}

// Codes are bearer secrets; keep them out of debug output.
impl fmt::Debug for RegistrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegistrationCode")
            .field(&self.redacted())
            .finish()
    }
}

impl AsRef<str> for RegistrationCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Short-lived record linking a code to a verified external login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    pub code: RegistrationCode,
    pub email: Email,
    pub provider: Provider,
    pub social_id: SocialId,
    pub created_at: DateTime<Utc>,
}

/// Validated input for [`crate::domain::RegistrationFinalizer::finalize`].
#[derive(Debug, Clone)]
pub struct FinalizeRegistration {
    pub code: RegistrationCode,
    pub email: Email,
    pub username: Username,
    pub bio: Bio,
}

/// Field-level failures raised while building a [`FinalizeRegistration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeRegistrationValidationError {
    Code(RegistrationCodeValidationError),
    Email(AccountValidationError),
    Username(AccountValidationError),
    Bio(AccountValidationError),
}

impl FinalizeRegistrationValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Code(_) => "registrationCode",
            Self::Email(_) => "email",
            Self::Username(_) => "username",
            Self::Bio(_) => "bio",
        }
    }
}

impl fmt::Display for FinalizeRegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(err) => write!(f, "{err}"),
            Self::Email(err) | Self::Username(err) | Self::Bio(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FinalizeRegistrationValidationError {}

impl FinalizeRegistration {
    /// Validate raw request fields in declaration order.
    pub fn try_from_parts(
        code: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        bio: impl Into<String>,
    ) -> Result<Self, FinalizeRegistrationValidationError> {
        Ok(Self {
            code: RegistrationCode::new(code).map_err(FinalizeRegistrationValidationError::Code)?,
            email: Email::new(email).map_err(FinalizeRegistrationValidationError::Email)?,
            username: Username::new(username)
                .map_err(FinalizeRegistrationValidationError::Username)?,
            bio: Bio::new(bio).map_err(FinalizeRegistrationValidationError::Bio)?,
        })
    }
}
