//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_store;
mod registration_command;

#[cfg(test)]
pub use account_store::MockAccountStore;
pub use account_store::{AccountStore, AccountStoreError, AccountTransaction, UniqueConstraint};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
