//! Tracing middleware opening one server span per request.
//!
//! Each request gets:
//! - a `tracing` span whose OpenTelemetry parent comes from the inbound
//!   `traceparent`/`baggage` headers, via the global text-map propagator;
//! - a UUID [`TraceId`] held in task-local storage for the lifetime of the
//!   request and echoed in the `trace-id` response header.
//!
//! The span is closed when the inner service completes, including when it
//! fails.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use opentelemetry::propagation::Extractor;
use tracing::field::Empty;
use tracing::{Instrument, Span, debug, error, info_span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Reads propagation headers out of an actix header map.
pub(crate) struct HeaderExtractor<'a>(pub(crate) &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

fn parent_context(headers: &HeaderMap) -> opentelemetry::Context {
    opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(headers))
    })
}

/// Tracing middleware; wrap it outermost so the span covers everything else.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use men_service::middleware::Trace;
///
/// let app = App::new().wrap(Trace::new("men-service"));
/// ```
#[derive(Clone)]
pub struct Trace {
    service_name: Arc<str>,
}

impl Trace {
    /// Middleware tagging spans with `service_name`.
    #[must_use]
    pub fn new(service_name: impl Into<Arc<str>>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service,
            service_name: Arc::clone(&self.service_name),
        }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
    service_name: Arc<str>,
}

impl<S> TraceMiddleware<S> {
    fn request_span(&self, req: &ServiceRequest, trace_id: TraceId) -> Span {
        let method = req.method().as_str().to_owned();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| req.path().to_owned());
        let span = info_span!(
            "http.request",
            otel.name = %format!("{method} {route}"),
            otel.kind = "server",
            otel.status_code = Empty,
            service.name = %self.service_name,
            http.request.method = %method,
            http.route = %route,
            url.path = %req.path(),
            http.response.status_code = Empty,
            trace_id = %trace_id,
        );
        if let Err(error) = span.set_parent(parent_context(req.headers())) {
            debug!(?error, "inbound trace context not attached");
        }
        span
    }
}

fn record_status(span: &Span, status: actix_web::http::StatusCode) {
    span.record("http.response.status_code", status.as_u16());
    if status.is_server_error() {
        span.record("otel.status_code", "ERROR");
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = self.request_span(&req, trace_id);
        let fut = TraceId::sync_scope(trace_id, || span.in_scope(|| self.service.call(req)));
        let header_value = trace_id.to_string();

        let traced = async move {
            let span = Span::current();
            let result = fut.await;
            match &result {
                Ok(res) => record_status(&span, res.status()),
                Err(err) => record_status(&span, err.as_response_error().status_code()),
            }
            let mut res = result?;
            match HeaderValue::from_str(&header_value) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(%error, %trace_id, "failed to encode trace identifier header");
                }
            }
            Ok(res)
        }
        .instrument(span);

        Box::pin(TraceId::scope(trace_id, traced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::ApiResult;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use opentelemetry::propagation::TextMapPropagator;
    use opentelemetry::trace::TraceContextExt;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use opentelemetry_sdk::trace::SdkTracerProvider;
    use tracing_subscriber::layer::SubscriberExt;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    async fn call_traced<F, Fut, Res>(handler: F) -> ServiceResponse
    where
        F: Fn() -> Fut + Clone + 'static,
        Fut: std::future::Future<Output = Res> + 'static,
        Res: actix_web::Responder + 'static,
    {
        let app = actix_test::init_service(
            App::new()
                .wrap(Trace::new("men-service-test"))
                .route("/", web::get().to(handler)),
        )
        .await;
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await
    }

    fn trace_header(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[actix_web::test]
    async fn adds_trace_id_header() {
        let res = call_traced(|| async { HttpResponse::Ok().finish() }).await;
        let header = trace_header(&res);
        assert!(header.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn exposes_trace_id_in_handler() {
        let res = call_traced(|| async {
            let id = TraceId::current().expect("trace id in scope");
            HttpResponse::Ok().body(id.to_string())
        })
        .await;
        let header = trace_header(&res);
        let body = actix_test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), header);
    }

    #[actix_web::test]
    async fn error_payload_carries_request_trace_id() {
        let res = call_traced(|| async {
            // Error::internal captures the scoped TraceId automatically.
            ApiResult::<HttpResponse>::Err(crate::domain::Error::internal("boom"))
        })
        .await;
        let header = trace_header(&res);
        let body: crate::domain::Error = actix_test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(header.as_str()));
    }

    #[test]
    fn extractor_reads_traceparent_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("traceparent"),
            HeaderValue::from_static(TRACEPARENT),
        );
        let cx = TraceContextPropagator::new().extract(&HeaderExtractor(&headers));
        let span_context = cx.span().span_context().clone();
        assert!(span_context.is_remote());
        assert_eq!(
            span_context.trace_id().to_string(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
    }

    #[test]
    fn extractor_lists_header_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("baggage"),
            HeaderValue::from_static("tenant=acme"),
        );
        assert_eq!(HeaderExtractor(&headers).keys(), vec!["baggage"]);
    }

    #[actix_web::test]
    async fn handler_span_continues_inbound_trace() {
        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());
        let provider = SdkTracerProvider::builder().build();
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("trace-tests")));
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = actix_test::init_service(App::new().wrap(Trace::new("men-service-test")).route(
            "/",
            web::get().to(|| async {
                let trace_id = Span::current().context().span().span_context().trace_id();
                HttpResponse::Ok().body(trace_id.to_string())
            }),
        ))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/")
                .insert_header(("traceparent", TRACEPARENT))
                .to_request(),
        )
        .await;
        assert!(res.headers().contains_key(TRACE_ID_HEADER));

        let body = actix_test::read_body(res).await;
        assert_eq!(body, "4bf92f3577b34da6a3ce929d0e0e4736");
    }
}
