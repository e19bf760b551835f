//! Failure boundary middleware.
//!
//! Outermost custom layer: every failure raised by the layers and handlers
//! registered after it passes through here exactly once, where it is logged
//! and recorded on the active trace span. Errors arrive either as `Err`
//! from a downstream service or already rendered into a response with the
//! source error attached (`HttpResponse::from_error`); both are observed.

use crate::telemetry;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

#[derive(Clone, Default)]
pub struct FailureBoundary;

impl<S, B> Transform<S, ServiceRequest> for FailureBoundary
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = FailureBoundaryMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FailureBoundaryMiddleware { service }))
    }
}

pub struct FailureBoundaryMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FailureBoundaryMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_string();
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    if let Some(err) = res.response().error() {
                        log::error!("Request failed: {} {}: {}", method, path, err);
                        telemetry::record_error(err);
                    }
                    Ok(res)
                }
                Err(err) => {
                    log::error!("Request failed: {} {}: {}", method, path, err);
                    telemetry::record_error(&err);
                    Err(err)
                }
            }
        })
    }
}
