//! Request completion logging.
//!
//! One line per request: method, path, status, elapsed time, and the trace
//! id placed in extensions by `RequestTrace` (register this logger outside
//! it so the id exists by the time the line is emitted). Severity follows
//! the status class; successful health probes drop to debug so uptime
//! checks don't drown the signal.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

pub struct StructuredLogger;

/// Paths polled by infrastructure rather than users.
fn quiet_path(path: &str) -> bool {
    path == "/health"
}

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // Errors still produce a response downstream; log the status
            // their ResponseError mapping will carry.
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let status = status.as_u16();

            if status >= 500 {
                error!(%method, %path, status, elapsed_ms, %trace_id, "request completed");
            } else if status >= 400 {
                warn!(%method, %path, status, elapsed_ms, %trace_id, "request completed");
            } else if quiet_path(&path) {
                debug!(%method, %path, status, elapsed_ms, %trace_id, "request completed");
            } else {
                info!(%method, %path, status, elapsed_ms, %trace_id, "request completed");
            }

            result
        })
    }
}
