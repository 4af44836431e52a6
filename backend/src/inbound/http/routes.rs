//! Route table for the HTTP surface.
//!
//! Paths match exactly. An unknown path answers 404 and a known path with an
//! unsupported verb answers 405, both as JSON error envelopes.

use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::Error;
use crate::inbound::http::error::json_payload_error;
use crate::inbound::http::{ApiResult, health, men};

/// Fallback for requests that match no path.
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!("no route for {}", req.path())))
}

/// Fallback for a known path requested with an unsupported verb.
pub async fn method_not_allowed(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed(format!(
        "{} is not supported on {}",
        req.method(),
        req.path()
    )))
}

/// JSON body extraction settings.
///
/// Bodies are decoded whatever their declared content type, and decode
/// failures become `invalid_request` errors.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(json_payload_error)
}

/// Register the `/men` resource and the health probes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use men_service::inbound::http::routes::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource("/men")
                .route(web::get().to(men::list_men))
                .route(web::post().to(men::create_man))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/men/{id}")
                .route(web::get().to(men::get_man))
                .route(web::put().to(men::update_man))
                .route(web::delete().to(men::delete_man))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/health/ready")
                .route(web::get().to(health::ready))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/health/live")
                .route(web::get().to(health::live))
                .default_service(web::to(method_not_allowed)),
        );
}
