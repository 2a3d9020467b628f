//! Startup wiring for the account store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::AccountStore;
use crate::outbound::memory::InMemoryAccountStore;
use crate::outbound::persistence::{
    DbPool, DieselAccountStore, MigrationError, PoolError, run_pending_migrations,
};
use crate::settings::AccountsSettings;

/// Errors raised while preparing the account store.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database migrations failed: {0}")]
    Migrations(#[from] MigrationError),
    #[error("migration task did not complete: {0}")]
    MigrationTask(#[from] tokio::task::JoinError),
    #[error("database pool could not be created: {0}")]
    Pool(#[from] PoolError),
}

/// Build the account store the settings ask for.
///
/// With a database URL this applies migrations when `run_migrations` is set
/// and returns a PostgreSQL-backed store. Without one it returns an empty
/// in-memory store, which loses every account on restart.
///
/// # Errors
///
/// Returns [`StartupError`] when migrations fail or the pool cannot be built.
///
/// # Examples
///
/// ```rust,no_run
/// use accounts::settings::AccountsSettings;
/// use accounts::startup::prepare_account_store;
/// use ortho_config::OrthoConfig;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = AccountsSettings::load()?;
/// let store = prepare_account_store(&settings).await?;
/// # let _ = store;
/// # Ok(())
/// # }
/// ```
pub async fn prepare_account_store(
    settings: &AccountsSettings,
) -> Result<Arc<dyn AccountStore>, StartupError> {
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database configured; accounts are kept in memory");
        return Ok(Arc::new(InMemoryAccountStore::default()));
    };

    if settings.run_migrations {
        let url = pool_config.database_url().to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url)).await??;
        info!(applied, "database migrations complete");
    } else {
        info!(reason = "disabled", "database migrations skipped");
    }

    let pool = DbPool::new(pool_config).await?;
    Ok(Arc::new(DieselAccountStore::new(pool)))
}
