//! Liveness and readiness probes.
//!
//! Readiness flips once the listener is bound; liveness answers whenever the
//! process can serve a request at all.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, HttpResponseBuilder, web};
use serde_json::json;

/// Probe flags shared between the bootstrap code and the probe handlers.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Not yet ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report ready to accept traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether readiness has been signalled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn probe(mut builder: HttpResponseBuilder, status: &str) -> HttpResponse {
    builder
        .insert_header((CACHE_CONTROL, "no-store"))
        .json(json!({ "status": status }))
}

/// Readiness probe: 200 once the listener is bound, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready for traffic"),
        (status = 503, description = "Still starting")
    ),
    tags = ["health"]
)]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        probe(HttpResponse::Ok(), "ready")
    } else {
        probe(HttpResponse::ServiceUnavailable(), "starting")
    }
}

/// Liveness probe: 200 whenever the process answers.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Alive")
    ),
    tags = ["health"]
)]
pub async fn live() -> HttpResponse {
    probe(HttpResponse::Ok(), "alive")
}
