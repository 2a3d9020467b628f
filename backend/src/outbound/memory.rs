//! In-process account store.
//!
//! Used when no database is configured and by behaviour tests. A transaction
//! holds the store's async mutex for its whole lifetime, so transactions are
//! serialised: a second transaction using the same code waits for the first
//! and then observes its outcome. A transaction stages only its own inserted
//! accounts and deleted codes, applying them to the shared state on `commit`;
//! dropping the handle discards them.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ports::{AccountStore, AccountStoreError, AccountTransaction, UniqueConstraint};
use crate::domain::{PendingRegistration, RegistrationCode, UserAccount, Username};

#[derive(Debug, Default)]
struct MemoryState {
    pending: BTreeMap<String, PendingRegistration>,
    accounts: Vec<UserAccount>,
}

fn check_unique<'a>(
    existing: impl IntoIterator<Item = &'a UserAccount>,
    account: &UserAccount,
) -> Result<(), AccountStoreError> {
    for other in existing {
        if other.profile().username == account.profile().username {
            return Err(AccountStoreError::unique_violation(UniqueConstraint::Username));
        }
        if other.email() == account.email() {
            return Err(AccountStoreError::unique_violation(UniqueConstraint::Email));
        }
        if other.id() == account.id() {
            return Err(AccountStoreError::unique_violation(UniqueConstraint::Other(
                "users_pkey".to_owned(),
            )));
        }
    }
    Ok(())
}

/// Account store backed by process memory.
///
/// # Examples
/// ```
/// use accounts::outbound::memory::InMemoryAccountStore;
///
/// let store = InMemoryAccountStore::default();
/// # let _ = store;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryAccountStore {
    /// Record a pending registration, as the identity-provider callback would.
    ///
    /// # Errors
    ///
    /// Returns a unique violation when the code is already pending.
    pub async fn insert_pending(
        &self,
        pending: PendingRegistration,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.lock().await;
        let key = pending.code.as_str().to_owned();
        if state.pending.contains_key(&key) {
            return Err(AccountStoreError::unique_violation(UniqueConstraint::Other(
                "pending_registrations_pkey".to_owned(),
            )));
        }
        state.pending.insert(key, pending);
        Ok(())
    }

    /// Committed pending registration for `code`, if any.
    pub async fn pending_registration(&self, code: &RegistrationCode) -> Option<PendingRegistration> {
        self.state.lock().await.pending.get(code.as_str()).cloned()
    }

    /// Every committed account, in creation order.
    pub async fn accounts(&self) -> Vec<UserAccount> {
        self.state.lock().await.accounts.clone()
    }

    /// Committed account owning `username`, if any.
    pub async fn account_by_username(&self, username: &Username) -> Option<UserAccount> {
        self.state
            .lock()
            .await
            .accounts
            .iter()
            .find(|account| &account.profile().username == username)
            .cloned()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, AccountStoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(InMemoryTransaction {
            guard,
            inserted: Vec::new(),
            deleted: BTreeSet::new(),
        }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    inserted: Vec<UserAccount>,
    deleted: BTreeSet<String>,
}

#[async_trait]
impl AccountTransaction for InMemoryTransaction {
    async fn find_pending_registration(
        &mut self,
        code: &RegistrationCode,
    ) -> Result<Option<PendingRegistration>, AccountStoreError> {
        if self.deleted.contains(code.as_str()) {
            return Ok(None);
        }
        Ok(self.guard.pending.get(code.as_str()).cloned())
    }

    async fn insert_account(&mut self, account: &UserAccount) -> Result<(), AccountStoreError> {
        check_unique(self.guard.accounts.iter().chain(&self.inserted), account)?;
        self.inserted.push(account.clone());
        Ok(())
    }

    async fn delete_pending_registration(
        &mut self,
        code: &RegistrationCode,
    ) -> Result<bool, AccountStoreError> {
        if !self.guard.pending.contains_key(code.as_str()) {
            return Ok(false);
        }
        Ok(self.deleted.insert(code.as_str().to_owned()))
    }

    async fn commit(self: Box<Self>) -> Result<(), AccountStoreError> {
        let Self {
            mut guard,
            inserted,
            deleted,
        } = *self;
        guard.pending.retain(|code, _| !deleted.contains(code));
        guard.accounts.extend(inserted);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AccountStoreError> {
        Ok(())
    }
}
