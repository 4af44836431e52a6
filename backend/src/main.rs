//! Service entry-point: loads settings, installs tracing, prepares the
//! `men` table and serves the CRUD API.

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::{error, info};

use men_service::inbound::http::health::HealthState;
use men_service::outbound::persistence::{DbPool, DieselMenRepository, PoolConfig};
use men_service::server::{ServerConfig, create_server};
use men_service::settings::{ServiceSettings, database_url};
use men_service::telemetry::{TelemetryConfig, init_telemetry};

/// Log `err` and convert it into an [`io::Error`] that aborts start-up.
fn fatal(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!(error = %err, "{context}");
    io::Error::other(format!("{context}: {err}"))
}

async fn run(settings: ServiceSettings) -> io::Result<()> {
    let url = database_url().map_err(|err| fatal("database configuration missing", err))?;
    let max_size = settings
        .db_max_connections()
        .map_err(|err| fatal("invalid pool configuration", err))?;
    let pool_config = PoolConfig::new(url)
        .with_max_size(max_size)
        .with_connection_timeout(settings.db_connect_timeout());
    let pool = DbPool::connect(pool_config)
        .await
        .map_err(|err| fatal("failed to connect to database", err))?;

    let repository = DieselMenRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(|err| fatal("failed to prepare men table", err))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        settings.bind_addr(),
        settings.service_name(),
        Arc::new(repository),
    );
    let server = create_server(health_state, config)?;
    server.await?;
    info!("server stopped");
    Ok(())
}

/// Application bootstrap.
///
/// Telemetry is installed before the actix runtime starts because the
/// OTLP/HTTP exporter drives a blocking client.
fn main() -> io::Result<()> {
    let settings = ServiceSettings::from_env().map_err(io::Error::other)?;
    let mut telemetry = init_telemetry(&TelemetryConfig::new(
        settings.service_name(),
        settings.otlp_enabled(),
    ))
    .map_err(io::Error::other)?;
    info!(
        service = settings.service_name(),
        exporting = telemetry.is_exporting(),
        "telemetry initialised"
    );

    let result = actix_web::rt::System::new().block_on(run(settings));
    telemetry.shutdown();
    result
}
