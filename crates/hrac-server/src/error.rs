//! HTTP error mapping and the structured error envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrac_core::error::HracError;
use serde::Serialize;

/// JSON body every error response carries.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub message: String,
    /// Machine-readable discriminator, e.g. `not_found`, `authorization`.
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_code: Option<String>,
}

/// Wrapper turning domain errors into HTTP responses.
///
/// Store failures map to 503 — an indeterminate check is a service
/// problem, never a 403.
#[derive(Debug)]
pub struct ApiError(pub HracError);

impl From<HracError> for ApiError {
    fn from(err: HracError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            HracError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            HracError::AlreadyExists { .. } => (StatusCode::CONFLICT, "already_exists"),
            HracError::AuthenticationFailed { .. } => (StatusCode::UNAUTHORIZED, "authentication"),
            HracError::AuthorizationDenied { .. } => (StatusCode::FORBIDDEN, "authorization"),
            HracError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
            HracError::Database(_) => (StatusCode::SERVICE_UNAVAILABLE, "database"),
            HracError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorEnvelope {
            message: self.0.to_string(),
            kind,
            permission_code: None,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Denial response from the enforcement gate: 401 or 403 with the
/// exact gate message and, for 403, the failing permission code.
pub fn gate_denial(decision: &hrac_authz::GateDecision) -> Response {
    let status =
        StatusCode::from_u16(decision.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (kind, permission_code) = match decision {
        hrac_authz::GateDecision::Forbidden { code } => ("authorization", Some(code.clone())),
        _ => ("authentication", None),
    };
    let body = ErrorEnvelope {
        message: decision.message().unwrap_or_default(),
        kind,
        permission_code,
    };
    (status, Json(body)).into_response()
}
