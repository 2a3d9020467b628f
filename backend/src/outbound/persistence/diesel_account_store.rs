//! PostgreSQL-backed account store.
//!
//! Each [`AccountStore::begin`] checks an owned connection out of the pool and
//! opens a transaction on it. The returned handle keeps the connection until
//! `commit` or `rollback`. A handle dropped without either returns its
//! connection to the pool mid-transaction; the pool treats that connection as
//! broken and closes it, so PostgreSQL discards the uncommitted work.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::debug;

use crate::domain::ports::{AccountStore, AccountStoreError, AccountTransaction, UniqueConstraint};
use crate::domain::{Email, PendingRegistration, Provider, RegistrationCode, SocialId, UserAccount};

use super::models::{NewUserProfileRow, NewUserRow, PendingRegistrationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{pending_registrations, user_profiles, users};

const USERNAME_CONSTRAINT: &str = "user_profiles_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel implementation of [`AccountStore`].
#[derive(Clone)]
pub struct DieselAccountStore {
    pool: DbPool,
}

impl DieselAccountStore {
    /// Create a store over the given pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use accounts::outbound::persistence::{DbPool, DieselAccountStore, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
    /// let store = DieselAccountStore::new(pool);
    /// # let _ = store;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountStoreError::connection(message)
        }
    }
}

/// Name the unique constraint behind a violation.
fn classify_unique_violation(constraint_name: Option<&str>) -> UniqueConstraint {
    match constraint_name {
        Some(USERNAME_CONSTRAINT) => UniqueConstraint::Username,
        Some(EMAIL_CONSTRAINT) => UniqueConstraint::Email,
        Some(other) => UniqueConstraint::Other(other.to_owned()),
        None => UniqueConstraint::Other("unknown".to_owned()),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> AccountStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            AccountStoreError::unique_violation(classify_unique_violation(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            AccountStoreError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => AccountStoreError::query(info.message().to_owned()),
        DieselError::BrokenTransactionManager => {
            AccountStoreError::connection("transaction manager is broken")
        }
        other => AccountStoreError::query(other.to_string()),
    }
}

/// Convert a stored row, treating one that fails domain validation as absent.
///
/// No valid request can match such a row, so it reads as an unknown code.
fn row_to_pending(row: PendingRegistrationRow) -> Option<PendingRegistration> {
    let parsed = RegistrationCode::new(row.code.as_str())
        .map_err(|err| ("code", err.to_string()))
        .and_then(|code| {
            let email = Email::new(row.email).map_err(|err| ("email", err.to_string()))?;
            let provider =
                Provider::new(row.provider).map_err(|err| ("provider", err.to_string()))?;
            let social_id =
                SocialId::new(row.social_id).map_err(|err| ("social id", err.to_string()))?;
            Ok(PendingRegistration {
                code,
                email,
                provider,
                social_id,
                created_at: row.created_at,
            })
        });

    match parsed {
        Ok(pending) => Some(pending),
        Err((field, error)) => {
            debug!(
                field,
                %error,
                code_prefix = row.code.chars().take(4).collect::<String>(),
                "ignoring pending registration that fails validation"
            );
            None
        }
    }
}

#[async_trait]
impl AccountStore for DieselAccountStore {
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, AccountStoreError> {
        let mut conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Box::new(DieselAccountTransaction { conn }))
    }
}

/// Open transaction on a pooled connection.
struct DieselAccountTransaction {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

#[async_trait]
impl AccountTransaction for DieselAccountTransaction {
    async fn find_pending_registration(
        &mut self,
        code: &RegistrationCode,
    ) -> Result<Option<PendingRegistration>, AccountStoreError> {
        // Row lock: a concurrent finalisation of the same code waits here and
        // then sees the row gone.
        let row = pending_registrations::table
            .find(code.as_str())
            .select(PendingRegistrationRow::as_select())
            .for_update()
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.and_then(row_to_pending))
    }

    async fn insert_account(&mut self, account: &UserAccount) -> Result<(), AccountStoreError> {
        let profile = account.profile();
        let social_links = serde_json::to_value(&profile.social_links)
            .map_err(|err| AccountStoreError::query(format!("encode social links: {err}")))?;

        let user_row = NewUserRow {
            id: *account.id().as_uuid(),
            provider: account.provider().as_str(),
            social_id: account.social_id().as_str(),
            email: account.email().as_str(),
            is_verified: account.is_verified(),
            created_at: account.created_at(),
        };
        let profile_row = NewUserProfileRow {
            user_id: *account.id().as_uuid(),
            username: profile.username.as_str(),
            bio: profile.bio.as_str(),
            social_links,
        };

        diesel::insert_into(users::table)
            .values(&user_row)
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        diesel::insert_into(user_profiles::table)
            .values(&profile_row)
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete_pending_registration(
        &mut self,
        code: &RegistrationCode,
    ) -> Result<bool, AccountStoreError> {
        let deleted = diesel::delete(pending_registrations::table.find(code.as_str()))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), AccountStoreError> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), AccountStoreError> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }
}
