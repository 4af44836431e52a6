//! Middleware forcing `Content-Type: application/json` on every response.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};

/// Overwrites the response content type with JSON, whatever the handler set.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use men_service::middleware::JsonContentType;
///
/// let app = App::new().wrap(JsonContentType);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonContentType;

impl<S, B> Transform<S, ServiceRequest> for JsonContentType
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JsonContentTypeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JsonContentTypeMiddleware { service }))
    }
}

/// Service wrapper produced by [`JsonContentType`].
pub struct JsonContentTypeMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JsonContentTypeMiddleware<S>
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
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            res.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Ok(res)
        })
    }
}
