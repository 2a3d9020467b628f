//! Driving port for finalising registrations.
//!
//! Inbound adapters call this port to turn a pending registration into an
//! account without knowing which store backs it.

use async_trait::async_trait;

use crate::domain::{Error, FinalizeRegistration, UserAccount};

/// Use-case port for account creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Consume the pending registration named in `request` and create the
    /// account atomically.
    async fn finalize(&self, request: FinalizeRegistration) -> Result<UserAccount, Error>;
}
