//! Bearer token authentication middleware.
//!
//! `GET` requests and `/health` are always unauthenticated: discovery
//! endpoints stay reachable for probes and tooling while every state- or
//! data-touching `POST` requires the service token.

use crate::error::ConnectorError;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, Method};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// Authentication middleware factory.
///
/// When a service token secret is configured the expected credential is
/// `Bearer <secret>`; with no secret configured the expected credential is
/// the absence of an `Authorization` header, so any presented credential is
/// rejected.
#[derive(Clone)]
pub struct BearerAuth {
    expected: Option<String>,
}

impl BearerAuth {
    pub fn new(service_token_secret: Option<String>) -> Self {
        Self {
            expected: service_token_secret.map(|secret| format!("Bearer {}", secret)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service,
            expected: self.expected.clone(),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: S,
    expected: Option<String>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() != Method::GET && req.path() != "/health" {
            let presented = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(normalize_bearer_scheme);

            if presented != self.expected {
                log::debug!("[AUTH] Rejected request to {}", req.path());
                // from_error keeps the error attached to the response so the
                // failure boundary still observes it.
                let response =
                    HttpResponse::from_error(ConnectorError::authentication_failure());
                return Box::pin(ready(Ok(
                    req.into_response(response).map_into_right_body()
                )));
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Normalize a leading case-insensitive `bearer` scheme to `Bearer` so the
/// credential comparison is exact on the token itself.
fn normalize_bearer_scheme(header: &str) -> String {
    match header.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {
            format!("Bearer{}", &header[6..])
        }
        _ => header.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_normalized_case_insensitively() {
        assert_eq!(normalize_bearer_scheme("bearer s3cret"), "Bearer s3cret");
        assert_eq!(normalize_bearer_scheme("BEARER s3cret"), "Bearer s3cret");
        assert_eq!(normalize_bearer_scheme("Bearer s3cret"), "Bearer s3cret");
    }

    #[test]
    fn non_bearer_schemes_pass_through_unchanged() {
        assert_eq!(normalize_bearer_scheme("Basic dXNlcg=="), "Basic dXNlcg==");
        assert_eq!(normalize_bearer_scheme("tok"), "tok");
    }

    #[test]
    fn token_case_is_preserved() {
        assert_eq!(normalize_bearer_scheme("bearer S3CRET"), "Bearer S3CRET");
    }
}
