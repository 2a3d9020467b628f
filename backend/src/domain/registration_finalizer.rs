//! Registration finalizer.
//!
//! Converts a pending registration into a verified user account inside one
//! explicit store transaction. The sequence is:
//!
//! 1. open a transaction through [`AccountStore::begin`];
//! 2. load and lock the pending registration by code, rejecting unknown codes
//!    and email mismatches;
//! 3. stage the new account with a profile seeded from the request;
//! 4. stage deletion of the pending registration;
//! 5. commit, or roll back on any failure so the registration survives for a
//!    retry.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use super::account::{SocialLinks, UserAccount, UserAccountId, UserAccountParts, UserProfile};
use super::ports::{
    AccountStore, AccountStoreError, AccountTransaction, RegistrationCommand, UniqueConstraint,
};
use super::registration::FinalizeRegistration;
use super::{Error, Username};

/// Reasons a registration could not be finalised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The code is unknown, already consumed, or belongs to another email.
    #[error("registration code is unknown or does not match the email")]
    InvalidRegistration,
    /// Another account already uses the requested username.
    #[error("username `{username}` is already taken")]
    UsernameConflict { username: Username },
    /// Another account already uses the email address.
    #[error("email address is already registered")]
    EmailConflict,
    /// Any other storage failure. Nothing was written.
    #[error("account storage failed: {0}")]
    Storage(AccountStoreError),
}

impl RegistrationError {
    fn from_store(error: AccountStoreError, username: &Username) -> Self {
        match error {
            AccountStoreError::UniqueViolation {
                constraint: UniqueConstraint::Username,
            } => Self::UsernameConflict {
                username: username.clone(),
            },
            AccountStoreError::UniqueViolation {
                constraint: UniqueConstraint::Email,
            } => Self::EmailConflict,
            other => Self::Storage(other),
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        match value {
            RegistrationError::InvalidRegistration => {
                Error::invalid_request("registration code or email is invalid")
                    .with_details(json!({ "code": "invalid_registration" }))
            }
            RegistrationError::UsernameConflict { username } => {
                Error::conflict(format!("username `{username}` is already taken"))
                    .with_details(json!({ "field": "username", "code": "username_taken" }))
            }
            RegistrationError::EmailConflict => Error::conflict("email is already registered")
                .with_details(json!({ "field": "email", "code": "email_taken" })),
            RegistrationError::Storage(AccountStoreError::Connection { .. }) => {
                Error::service_unavailable("account store is unavailable")
            }
            RegistrationError::Storage(other) => {
                Error::internal(format!("account store error: {other}"))
            }
        }
    }
}

/// Finalises pending registrations against an [`AccountStore`].
#[derive(Clone)]
pub struct RegistrationFinalizer {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl RegistrationFinalizer {
    /// Create a finalizer over `store`, stamping accounts with `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::RegistrationFinalizer;
    /// use accounts::outbound::memory::InMemoryAccountStore;
    /// use mockable::DefaultClock;
    ///
    /// let finalizer = RegistrationFinalizer::new(
    ///     Arc::new(InMemoryAccountStore::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = finalizer;
    /// ```
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Consume the pending registration and create the account atomically.
    ///
    /// On success exactly one account exists and the pending registration is
    /// gone. On any error the transaction is rolled back and the pending
    /// registration is left as it was.
    pub async fn finalize(
        &self,
        request: FinalizeRegistration,
    ) -> Result<UserAccount, RegistrationError> {
        let code = request.code.redacted();
        let username = request.username.clone();
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|err| RegistrationError::from_store(err, &username))?;

        match self.stage(tx.as_mut(), request).await {
            Ok(account) => {
                tx.commit()
                    .await
                    .map_err(|err| RegistrationError::from_store(err, &username))?;
                info!(
                    account_id = %account.id(),
                    provider = %account.provider(),
                    code = %code,
                    "registration finalised"
                );
                debug!(?account, "account created");
                Ok(account)
            }
            Err(err) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(
                        error = %rollback_error,
                        code = %code,
                        "rollback after failed registration did not complete"
                    );
                }
                debug!(error = %err, code = %code, "registration not finalised");
                Err(err)
            }
        }
    }

    async fn stage(
        &self,
        tx: &mut dyn AccountTransaction,
        request: FinalizeRegistration,
    ) -> Result<UserAccount, RegistrationError> {
        let FinalizeRegistration {
            code,
            email,
            username,
            bio,
        } = request;

        let pending = tx
            .find_pending_registration(&code)
            .await
            .map_err(|err| RegistrationError::from_store(err, &username))?;
        let Some(pending) = pending.filter(|pending| pending.email == email) else {
            return Err(RegistrationError::InvalidRegistration);
        };

        let account = UserAccount::from_parts(UserAccountParts {
            id: UserAccountId::random(),
            provider: pending.provider,
            social_id: pending.social_id,
            is_verified: true,
            created_at: self.clock.utc(),
            profile: UserProfile {
                username: username.clone(),
                bio,
                social_links: SocialLinks::with_email(&email),
            },
            email,
        });

        tx.insert_account(&account)
            .await
            .map_err(|err| RegistrationError::from_store(err, &username))?;

        let deleted = tx
            .delete_pending_registration(&code)
            .await
            .map_err(|err| RegistrationError::from_store(err, &username))?;
        if !deleted {
            return Err(RegistrationError::InvalidRegistration);
        }

        Ok(account)
    }
}

#[async_trait]
impl RegistrationCommand for RegistrationFinalizer {
    async fn finalize(&self, request: FinalizeRegistration) -> Result<UserAccount, Error> {
        Self::finalize(self, request).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "registration_finalizer_tests.rs"]
mod tests;
