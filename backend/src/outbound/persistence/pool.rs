//! Shared `bb8` pool of async Diesel PostgreSQL connections.
//!
//! The pool is the only cross-request state in the service. Handles are cheap
//! to clone and safe to use from every worker concurrently.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use bb8::ErrorSink;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::warn;

const DEFAULT_MAX_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Underlying `bb8` failure.
        message: String,
    },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Underlying `bb8` failure.
        message: String,
    },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Underlying failure text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Connection settings for [`DbPool`].
///
/// Defaults: 10 connections, 30 second checkout timeout.
///
/// ```
/// use std::num::NonZeroU32;
/// use std::time::Duration;
/// use men_service::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/men")
///     .with_max_size(NonZeroU32::new(4).expect("non-zero"))
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.database_url(), "postgres://localhost/men");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: NonZeroU32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Configuration for `database_url` with default limits.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    #[must_use]
    pub const fn with_max_size(mut self, max_size: NonZeroU32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection string the pool dials.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Logs connection failures that `bb8` would otherwise swallow.
#[derive(Debug, Clone, Copy)]
struct TracingErrorSink;

impl<E: fmt::Display + 'static> ErrorSink<E> for TracingErrorSink {
    fn sink(&self, error: E) {
        warn!(%error, "database connection attempt failed");
    }

    fn boxed_clone(&self) -> Box<dyn ErrorSink<E>> {
        Box::new(*self)
    }
}

/// Cloneable handle onto the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open its first connection.
    ///
    /// The eager connection makes a bad `DATABASE_URL` fail at startup rather
    /// than on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be constructed or the
    /// database refuses the first connection.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size.get())
            .connection_timeout(config.connection_timeout)
            .retry_connection(false)
            .error_sink(Box::new(TracingErrorSink))
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        let this = Self { inner: pool };
        drop(this.get().await.map_err(|err| PoolError::build(err.message()))?);
        Ok(this)
    }

    /// Check a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] if no connection becomes available
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_defaults() {
        let config = PoolConfig::new("postgres://localhost/men");

        assert_eq!(config.database_url(), "postgres://localhost/men");
        assert_eq!(config.max_size.get(), 10);
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn config_builders_override_defaults() {
        let config = PoolConfig::new("postgres://localhost/men")
            .with_max_size(NonZeroU32::new(3).expect("non-zero"))
            .with_connection_timeout(Duration::from_secs(2));

        assert_eq!(config.max_size.get(), 3);
        assert_eq!(config.connection_timeout, Duration::from_secs(2));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_database_fails_to_connect() {
        let config = PoolConfig::new("postgres://men@127.0.0.1:1/men")
            .with_connection_timeout(Duration::from_secs(2));

        let result = DbPool::connect(config).await;
        assert!(matches!(result, Err(PoolError::Build { .. })));
    }

    #[rstest]
    fn error_sink_clones_into_a_box() {
        let sink = TracingErrorSink;
        let boxed: Box<dyn ErrorSink<String>> = sink.boxed_clone();
        boxed.sink("connection refused".to_owned());
    }

    #[rstest]
    #[case(PoolError::checkout("timed out"), "timed out")]
    #[case(PoolError::build("invalid URL"), "invalid URL")]
    fn error_exposes_message(#[case] error: PoolError, #[case] expected: &str) {
        assert_eq!(error.message(), expected);
        assert!(error.to_string().contains(expected));
    }
}
