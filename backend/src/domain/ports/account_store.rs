//! Driven port for transactional account storage.
//!
//! The store never exposes an ambient transaction. Callers obtain an explicit
//! [`AccountTransaction`] handle from [`AccountStore::begin`], route every
//! read and write through it, and end it with `commit` or `rollback`.
//! Dropping a handle without committing must discard all of its writes.
//!
//! Uniqueness failures are reported as
//! [`AccountStoreError::UniqueViolation`] tagged with the logical
//! [`UniqueConstraint`], so callers never inspect engine error codes.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{PendingRegistration, RegistrationCode, UserAccount};

use super::define_port_error;

/// Logical uniqueness rule that a write violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueConstraint {
    /// Another account already owns the profile username.
    Username,
    /// Another account already owns the email address.
    Email,
    /// A constraint this port does not classify, by storage name.
    Other(String),
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Email => f.write_str("email"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

define_port_error! {
    /// Failures reported by account store adapters.
    pub enum AccountStoreError {
        /// The store could not be reached or the connection dropped.
        Connection { message: String } => "account store connection failed: {message}",
        /// A statement failed for a reason other than a uniqueness rule.
        Query { message: String } => "account store query failed: {message}",
        /// A write collided with a uniqueness rule.
        UniqueViolation { constraint: UniqueConstraint } =>
            "account store unique constraint violated: {constraint}",
    }
}

/// Entry point for opening account transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Open a new transaction.
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, AccountStoreError>;
}

/// Explicit transactional handle.
///
/// Implementations must:
/// - make `find_pending_registration` hold the row until the transaction
///   ends, so a concurrent transaction using the same code waits and then
///   observes the outcome;
/// - keep every write invisible to other transactions until `commit`;
/// - discard every write on `rollback` or on drop.
#[async_trait]
pub trait AccountTransaction: Send {
    /// Look up and lock the pending registration for `code`.
    async fn find_pending_registration(
        &mut self,
        code: &RegistrationCode,
    ) -> Result<Option<PendingRegistration>, AccountStoreError>;

    /// Stage a new account together with its profile.
    async fn insert_account(&mut self, account: &UserAccount) -> Result<(), AccountStoreError>;

    /// Stage deletion of the pending registration.
    ///
    /// Returns `false` when no record with `code` exists.
    async fn delete_pending_registration(
        &mut self,
        code: &RegistrationCode,
    ) -> Result<bool, AccountStoreError>;

    /// Make every staged write durable and visible.
    async fn commit(self: Box<Self>) -> Result<(), AccountStoreError>;

    /// Discard every staged write.
    async fn rollback(self: Box<Self>) -> Result<(), AccountStoreError>;
}
