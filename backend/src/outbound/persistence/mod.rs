//! PostgreSQL persistence using Diesel.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module. Connections come from a `bb8` pool through `diesel-async`;
//! migrations run over a short-lived synchronous connection.
//!
//! # Example
//!
//! ```ignore
//! use accounts::outbound::persistence::{DbPool, DieselAccountStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let store = DieselAccountStore::new(pool);
//! ```

mod diesel_account_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_store::DieselAccountStore;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
