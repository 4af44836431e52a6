//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;

use crate::doc::ApiDoc;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::routes::{configure, not_found};
use crate::inbound::http::state::HttpState;
use crate::middleware::{JsonContentType, Trace};

async fn openapi_document() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Assemble the application: state, middleware chain and routes.
///
/// [`Trace`] is registered last so it runs outermost, ahead of
/// [`JsonContentType`].
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    service_name: Arc<str>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(JsonContentType)
        .wrap(Trace::new(service_name))
        .configure(configure)
        .route("/api-docs/openapi.json", web::get().to(openapi_document))
        .default_service(web::to(not_found))
}

/// Construct the HTTP server for `config`.
///
/// Readiness is signalled on `health_state` once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        service_name,
        men,
    } = config;
    let http_state = web::Data::new(HttpState::new(men));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(
            http_state.clone(),
            server_health_state.clone(),
            Arc::clone(&service_name),
        )
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
