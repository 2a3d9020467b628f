//! User account data model.
//!
//! Accounts are materialised exactly once from a consumed pending
//! registration. Every field is a validated newtype so adapters cannot
//! smuggle malformed values past the domain.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    InvalidAccountId,
    EmptyEmail,
    EmailTooLong { max: usize },
    MalformedEmail,
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameSurroundingWhitespace,
    BioTooLong { max: usize },
    EmptyProvider,
    EmptySocialId,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAccountId => write!(f, "account id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::MalformedEmail => write!(f, "email must look like local@domain"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameSurroundingWhitespace => {
                write!(f, "username must not start or end with whitespace")
            }
            Self::BioTooLong { max } => write!(f, "bio must be at most {max} characters"),
            Self::EmptyProvider => write!(f, "identity provider must not be empty"),
            Self::EmptySocialId => write!(f, "social id must not be empty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserAccountId(Uuid);

impl UserAccountId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(AccountValidationError::InvalidAccountId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidAccountId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserAccountId> for String {
    fn from(value: UserAccountId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserAccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

/// Email address as supplied by the caller.
///
/// ## Invariants
/// - non-empty and free of surrounding whitespace
/// - exactly one `@` separating non-empty local and domain parts
///
/// Comparison is byte-for-byte; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, AccountValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, AccountValidationError> {
        if email.trim().is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(AccountValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if email.trim() != email || email.chars().any(char::is_whitespace) {
            return Err(AccountValidationError::MalformedEmail);
        }

        let mut parts = email.split('@');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );
        if !well_formed {
            return Err(AccountValidationError::MalformedEmail);
        }

        Ok(Self(email))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a username, in characters.
pub const USERNAME_MAX: usize = 32;

/// Globally unique public handle shown on the profile.
///
/// Any script is accepted; uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, AccountValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, AccountValidationError> {
        if username.trim().is_empty() {
            return Err(AccountValidationError::EmptyUsername);
        }
        if username.trim() != username {
            return Err(AccountValidationError::UsernameSurroundingWhitespace);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(AccountValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(username))
    }

    /// Borrow the username as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a profile bio.
pub const BIO_MAX: usize = 500;

/// Free-text profile biography. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bio(String);

impl Bio {
    /// Validate and construct a [`Bio`].
    pub fn new(bio: impl Into<String>) -> Result<Self, AccountValidationError> {
        Self::from_owned(bio.into())
    }

    fn from_owned(bio: String) -> Result<Self, AccountValidationError> {
        if bio.chars().count() > BIO_MAX {
            return Err(AccountValidationError::BioTooLong { max: BIO_MAX });
        }
        Ok(Self(bio))
    }

    /// Borrow the bio as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Bio> for String {
    fn from(value: Bio) -> Self {
        value.0
    }
}

impl TryFrom<String> for Bio {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Name of the identity provider that vouched for the registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Provider(String);

impl Provider {
    /// Validate and construct a [`Provider`].
    pub fn new(provider: impl Into<String>) -> Result<Self, AccountValidationError> {
        let provider = provider.into();
        if provider.trim().is_empty() {
            return Err(AccountValidationError::EmptyProvider);
        }
        Ok(Self(provider))
    }

    /// Borrow the provider name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        value.0
    }
}

impl TryFrom<String> for Provider {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Provider-scoped subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SocialId(String);

impl SocialId {
    /// Validate and construct a [`SocialId`].
    pub fn new(social_id: impl Into<String>) -> Result<Self, AccountValidationError> {
        let social_id = social_id.into();
        if social_id.trim().is_empty() {
            return Err(AccountValidationError::EmptySocialId);
        }
        Ok(Self(social_id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SocialId> for String {
    fn from(value: SocialId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SocialId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Named links shown on a profile, keyed by link kind (`email`, `github`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocialLinks(BTreeMap<String, String>);

impl SocialLinks {
    /// Link kind under which the account email is recorded.
    pub const EMAIL: &'static str = "email";

    /// Seed the links with the account email.
    pub fn with_email(email: &Email) -> Self {
        let mut links = BTreeMap::new();
        links.insert(Self::EMAIL.to_owned(), email.as_str().to_owned());
        Self(links)
    }

    /// Look up a link by kind.
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0.get(kind).map(String::as_str)
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Public profile attached to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: Username,
    pub bio: Bio,
    pub social_links: SocialLinks,
}

/// Persisted user account.
///
/// ## Invariants
/// - `provider` and `social_id` are copied from the consumed registration.
/// - `email` and `profile.username` are unique across accounts; the storage
///   layer enforces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserAccountId,
    provider: Provider,
    social_id: SocialId,
    email: Email,
    is_verified: bool,
    created_at: DateTime<Utc>,
    profile: UserProfile,
}

/// Field bundle used to assemble a [`UserAccount`].
#[derive(Debug, Clone)]
pub struct UserAccountParts {
    pub id: UserAccountId,
    pub provider: Provider,
    pub social_id: SocialId,
    pub email: Email,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub profile: UserProfile,
}

impl UserAccount {
    /// Assemble an account from already validated parts.
    pub fn from_parts(parts: UserAccountParts) -> Self {
        let UserAccountParts {
            id,
            provider,
            social_id,
            email,
            is_verified,
            created_at,
            profile,
        } = parts;
        Self {
            id,
            provider,
            social_id,
            email,
            is_verified,
            created_at,
            profile,
        }
    }

    pub fn id(&self) -> &UserAccountId {
        &self.id
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn social_id(&self) -> &SocialId {
        &self.social_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}

#[cfg(test)]
mod tests;
