//! Domain primitives, services and ports.
//!
//! Purpose: hold the account-creation rules independently of HTTP and
//! PostgreSQL. Adapters depend on this module; it depends on neither.
//!
//! Public surface:
//! - [`UserAccount`] and its validated value types.
//! - [`PendingRegistration`] and the [`FinalizeRegistration`] request.
//! - [`RegistrationFinalizer`], the transactional account-creation service.
//! - [`Error`] / [`ErrorCode`], the transport-agnostic error payload.
//! - [`ports`], the driving and driven port traits.

pub mod account;
pub mod error;
pub mod ports;
pub mod registration;
pub mod registration_finalizer;
pub mod trace_id;

pub use self::account::{
    AccountValidationError, Bio, Email, Provider, SocialId, SocialLinks, UserAccount,
    UserAccountId, UserAccountParts, UserProfile, Username,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::registration::{
    FinalizeRegistration, FinalizeRegistrationValidationError, PendingRegistration,
    RegistrationCode, RegistrationCodeValidationError,
};
pub use self::registration_finalizer::{RegistrationError, RegistrationFinalizer};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
