//! Protocol version negotiation middleware.
//!
//! The engine may send an `X-Hasura-NDC-Version` header naming the protocol
//! version it expects. The request proceeds only when the server's protocol
//! version satisfies the NPM-style caret range `^<requested>`, i.e. the two
//! are compatible under semver rules. No header means no constraint.

use crate::error::ConnectorError;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use semver::{Version, VersionReq};
use std::future::{ready, Ready};

pub const VERSION_HEADER: &str = "x-hasura-ndc-version";

/// Version negotiation middleware factory.
#[derive(Clone)]
pub struct VersionNegotiation {
    server_version: Version,
}

impl VersionNegotiation {
    pub fn new(server_version: Version) -> Self {
        Self { server_version }
    }
}

impl Default for VersionNegotiation {
    fn default() -> Self {
        // The crate constant is a valid semver by construction.
        Self::new(Version::parse(ndc_ir::VERSION).unwrap())
    }
}

impl<S, B> Transform<S, ServiceRequest> for VersionNegotiation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = VersionNegotiationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VersionNegotiationMiddleware {
            service,
            server_version: self.server_version.clone(),
        }))
    }
}

pub struct VersionNegotiationMiddleware<S> {
    service: S,
    server_version: Version,
}

impl<S, B> Service<ServiceRequest> for VersionNegotiationMiddleware<S>
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
        // Header names are matched case-insensitively.
        let mut values = req.headers().get_all(VERSION_HEADER);

        let checked = match (values.next(), values.next()) {
            (None, _) => Ok(()),
            (Some(_), Some(_)) => Err(ConnectorError::version_incompatible(
                "Multiple X-Hasura-NDC-Version headers received. Only one is supported.",
            )),
            // Undecodable header bytes fall out as invalid semver.
            (Some(value), None) => {
                negotiate(value.to_str().unwrap_or(""), &self.server_version)
            }
        };

        if let Err(err) = checked {
            let response = HttpResponse::from_error(err);
            return Box::pin(ready(Ok(
                req.into_response(response).map_into_right_body()
            )));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Check a single requested version against the server's protocol version.
fn negotiate(requested: &str, server_version: &Version) -> Result<(), ConnectorError> {
    let mut wanted = Version::parse(requested).map_err(|_| {
        ConnectorError::version_incompatible("Invalid semver in X-Hasura-NDC-Version header")
    })?;

    // Build metadata carries no ordering and VersionReq refuses it; strip
    // it so `1.2.3+abc` negotiates like `1.2.3`.
    wanted.build = semver::BuildMetadata::EMPTY;

    let requirement = VersionReq::parse(&format!("^{}", wanted)).map_err(|_| {
        ConnectorError::version_incompatible("Invalid semver in X-Hasura-NDC-Version header")
    })?;

    if !requirement.matches(server_version) {
        return Err(ConnectorError::version_incompatible(
            "The connector does not support the requested NDC version",
        ));
    }
    Ok(())
}
