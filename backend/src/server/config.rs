//! HTTP server configuration.

use std::net::SocketAddr;
use std::sync::Arc;

use accounts::domain::ports::AccountStore;

/// Everything `create_server` needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn AccountStore>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: Arc<dyn AccountStore>) -> Self {
        Self { bind_addr, store }
    }
}
