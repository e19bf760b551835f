//! The request processing chain in front of the route handlers.
//!
//! Effective order for a request: request logger, failure boundary,
//! authentication, version negotiation, handler. Each layer raises a
//! [`crate::error::ConnectorError`] on rejection and lets the
//! `ResponseError` impl render the uniform error body.

pub mod auth;
pub mod failure;
pub mod version;

pub use auth::BearerAuth;
pub use failure::FailureBoundary;
pub use version::VersionNegotiation;
