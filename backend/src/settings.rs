//! Service settings loaded via OrthoConfig.
//!
//! Values come from `MEN_*` environment variables, CLI flags or a
//! configuration file. The database location is read separately from
//! `DATABASE_URL`.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SERVICE_NAME: &str = "men-service";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the Postgres connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Failures while assembling settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Configuration sources could not be merged.
    #[error("failed to load settings: {message}")]
    Load {
        /// Loader error description.
        message: String,
    },
    /// The pool was configured to hold no connections.
    #[error("MEN_DB_MAX_CONNECTIONS must be greater than zero")]
    ZeroPoolSize,
    /// `DATABASE_URL` is unset or not unicode.
    #[error("{DATABASE_URL_ENV} must be set")]
    MissingDatabaseUrl,
}

/// Runtime options for the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEN")]
pub struct ServiceSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Name reported on spans and in logs.
    pub service_name: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a database connection before giving up.
    pub db_connect_timeout_secs: Option<u64>,
    /// Export spans over OTLP.
    #[ortho_config(default = true)]
    pub otlp_enabled: bool,
}

impl ServiceSettings {
    /// Load settings from the process environment and arguments.
    ///
    /// # Errors
    /// Returns [`SettingsError::Load`] when a source is malformed.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::load().map_err(|err| SettingsError::Load {
            message: err.to_string(),
        })
    }

    /// Return the socket address to bind.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Return the configured service name, falling back to the default.
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME)
    }

    /// Return the pool size, falling back to the default.
    ///
    /// # Errors
    /// Returns [`SettingsError::ZeroPoolSize`] when configured as zero.
    pub fn db_max_connections(&self) -> Result<NonZeroU32, SettingsError> {
        let size = self
            .db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        NonZeroU32::new(size).ok_or(SettingsError::ZeroPoolSize)
    }

    /// Return how long a connection checkout may wait.
    #[must_use]
    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_connect_timeout_secs
                .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Whether OTLP export is enabled; on unless switched off.
    #[must_use]
    pub const fn otlp_enabled(&self) -> bool {
        self.otlp_enabled
    }
}

/// Read the Postgres connection string from `DATABASE_URL`.
///
/// # Errors
/// Returns [`SettingsError::MissingDatabaseUrl`] when it is unset or empty.
pub fn database_url() -> Result<String, SettingsError> {
    env::var(DATABASE_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .ok_or(SettingsError::MissingDatabaseUrl)
}
