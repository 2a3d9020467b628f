//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL via Diesel, the production store.
//! - **memory**: process-local store for development and behaviour tests.
//!
//! Adapters translate between domain types and storage representations and
//! hold no registration rules of their own.

pub mod memory;
pub mod persistence;
