//! Error types for the console.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Console error taxonomy.
///
/// `Validation`, `Precondition`, and `Busy` are raised before any external
/// call goes out and leave the session untouched. The remaining variants
/// settle the triggering status slot as failed with the message attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required field is missing or malformed.
    Validation(String),
    /// Operation attempted without the wallet or contract being ready.
    Precondition(String),
    /// A previous invocation of the same operation is still in flight.
    Busy(String),
    /// Network failure reaching an external service.
    Transport(String),
    /// External service reached, but it declined the request.
    Rejection(String),
    /// Query for a token that was never minted (or has been burned).
    NotFound(String),
    /// Configuration error.
    Config(String),
}

impl Error {
    /// Stable machine-readable tag for API responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Precondition(_) => "precondition",
            Error::Busy(_) => "busy",
            Error::Transport(_) => "transport",
            Error::Rejection(_) => "rejection",
            Error::NotFound(_) => "not_found",
            Error::Config(_) => "config",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "validation error: {msg}"),
            Error::Precondition(msg) => write!(f, "precondition error: {msg}"),
            Error::Busy(msg) => write!(f, "operation in flight: {msg}"),
            Error::Transport(msg) => write!(f, "transport error: {msg}"),
            Error::Rejection(msg) => write!(f, "rejected: {msg}"),
            Error::NotFound(msg) => write!(f, "not found: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Precondition(_) => StatusCode::PRECONDITION_FAILED,
            Error::Busy(_) => StatusCode::CONFLICT,
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
            Error::Rejection(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}
