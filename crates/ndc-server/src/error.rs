//! The connector error taxonomy and its single HTTP rendering point.
//!
//! Every failure surfaced anywhere in the harness or in a connector
//! implementation is a [`ConnectorError`]. The `ResponseError` impl renders
//! the uniform [`ErrorResponse`] body, so handlers and middlewares can
//! return `Err` and never build an error response by hand.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use ndc_ir::ErrorResponse;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The request was invalid or did not match the schema (400)
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<JsonValue>,
    },

    /// The request was well formed but semantically impossible to
    /// answer (422)
    #[error("{message}")]
    UnprocessableContent {
        message: String,
        details: Option<JsonValue>,
    },

    /// An unexpected internal failure (500)
    #[error("{message}")]
    InternalServerError {
        message: String,
        details: Option<JsonValue>,
    },

    /// The connector does not implement the requested operation (501)
    #[error("{message}")]
    NotSupported {
        message: String,
        details: Option<JsonValue>,
    },

    /// The bearer credential was missing or did not match (401)
    #[error("{message}")]
    AuthenticationFailure {
        message: String,
        details: Option<JsonValue>,
    },

    /// The requested protocol version cannot be served (400)
    #[error("{message}")]
    VersionIncompatible {
        message: String,
        details: Option<JsonValue>,
    },

    /// The request body was not decodable as the expected JSON shape (400)
    #[error("{message}")]
    MalformedRequestBody {
        message: String,
        details: Option<JsonValue>,
    },
}

impl ConnectorError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ConnectorError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn unprocessable_content(message: impl Into<String>) -> Self {
        ConnectorError::UnprocessableContent {
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ConnectorError::InternalServerError {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        ConnectorError::NotSupported {
            message: message.into(),
            details: None,
        }
    }

    /// The fixed 401 body: the message is deliberately unspecific, the
    /// cause goes into `details`.
    pub fn authentication_failure() -> Self {
        ConnectorError::AuthenticationFailure {
            message: "Internal Error".to_string(),
            details: Some(json!({ "cause": "Bearer token does not match." })),
        }
    }

    pub fn version_incompatible(message: impl Into<String>) -> Self {
        ConnectorError::VersionIncompatible {
            message: message.into(),
            details: None,
        }
    }

    /// Wraps a serde diagnostic from a request body that failed to decode.
    pub fn malformed_request_body(cause: impl Into<String>) -> Self {
        ConnectorError::MalformedRequestBody {
            message: "Invalid JSON request body".to_string(),
            details: Some(json!({ "cause": cause.into() })),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ConnectorError::BadRequest { message, .. }
            | ConnectorError::UnprocessableContent { message, .. }
            | ConnectorError::InternalServerError { message, .. }
            | ConnectorError::NotSupported { message, .. }
            | ConnectorError::AuthenticationFailure { message, .. }
            | ConnectorError::VersionIncompatible { message, .. }
            | ConnectorError::MalformedRequestBody { message, .. } => message,
        }
    }

    pub fn details(&self) -> Option<&JsonValue> {
        match self {
            ConnectorError::BadRequest { details, .. }
            | ConnectorError::UnprocessableContent { details, .. }
            | ConnectorError::InternalServerError { details, .. }
            | ConnectorError::NotSupported { details, .. }
            | ConnectorError::AuthenticationFailure { details, .. }
            | ConnectorError::VersionIncompatible { details, .. }
            | ConnectorError::MalformedRequestBody { details, .. } => details.as_ref(),
        }
    }
}

impl ResponseError for ConnectorError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConnectorError::BadRequest { .. }
            | ConnectorError::VersionIncompatible { .. }
            | ConnectorError::MalformedRequestBody { .. } => StatusCode::BAD_REQUEST,
            ConnectorError::AuthenticationFailure { .. } => StatusCode::UNAUTHORIZED,
            ConnectorError::UnprocessableContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ConnectorError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ConnectorError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed ({}): {}", status, self.message());
        } else {
            log::debug!("Request rejected ({}): {}", status, self.message());
        }
        HttpResponse::build(status).json(ErrorResponse {
            message: self.message().to_string(),
            details: self.details().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn error_body_is_the_uniform_envelope() {
        let err = ConnectorError::not_supported("Mutations are not supported");
        assert_eq!(err.status_code(), StatusCode::NOT_IMPLEMENTED);

        let response = err.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            decoded,
            json!({ "message": "Mutations are not supported", "details": null })
        );
    }

    #[test]
    fn authentication_failure_has_the_fixed_shape() {
        let err = ConnectorError::authentication_failure();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Internal Error");
        assert_eq!(
            err.details(),
            Some(&json!({ "cause": "Bearer token does not match." }))
        );
    }

    #[test]
    fn malformed_body_carries_the_serde_diagnostic() {
        let serde_err = serde_json::from_str::<ndc_ir::QueryRequest>("{").unwrap_err();
        let err = ConnectorError::malformed_request_body(serde_err.to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid JSON request body");
        let cause = &err.details().unwrap()["cause"];
        assert!(!cause.as_str().unwrap().is_empty());
    }
}
