//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::RegistrationCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationCommand>,
}

impl HttpState {
    /// Construct state from the registration use-case.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::RegistrationFinalizer;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::outbound::memory::InMemoryAccountStore;
    /// use mockable::DefaultClock;
    ///
    /// let finalizer = RegistrationFinalizer::new(
    ///     Arc::new(InMemoryAccountStore::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(Arc::new(finalizer));
    /// let _registration = state.registration.clone();
    /// ```
    pub fn new(registration: Arc<dyn RegistrationCommand>) -> Self {
        Self { registration }
    }
}
