//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::ports::MenRepository;

/// Everything [`create_server`](super::create_server) needs to start
/// listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) service_name: Arc<str>,
    pub(crate) men: Arc<dyn MenRepository>,
}

impl ServerConfig {
    /// Configuration serving `men` on `bind_addr`, tagging spans with
    /// `service_name`.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        service_name: impl Into<Arc<str>>,
        men: Arc<dyn MenRepository>,
    ) -> Self {
        Self {
            bind_addr,
            service_name: service_name.into(),
            men,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
