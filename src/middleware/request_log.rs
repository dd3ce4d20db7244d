//! Structured request/response logging.

use std::rc::Rc;
use std::time::Instant;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use tracing::{info, warn};

/// Logs one event per completed request: method, path, status, elapsed time.
/// Responses at 4xx/5xx log at warn so they stand out at default filtering.
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLogService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLogService {
            service: Rc::new(service),
        })
    }
}

pub struct RequestLogService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let method = req.method().to_string();
        let path = req.path().to_string();
        let started = Instant::now();

        Box::pin(async move {
            let response = service.call(req).await?;

            let status = response.status().as_u16();
            let elapsed_ms = started.elapsed().as_millis() as u64;
            if response.status().is_client_error() || response.status().is_server_error() {
                warn!(%method, %path, status, elapsed_ms, "request failed");
            } else {
                info!(%method, %path, status, elapsed_ms, "request handled");
            }

            Ok(response)
        })
    }
}
