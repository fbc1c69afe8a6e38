//! Error taxonomy for token acquisition, upstream calls and gateway routes.
//!
//! Nothing in this crate retries. Every failure is surfaced to the layer above
//! with the upstream status code and body text so the caller can decide policy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The reason an outbound call did not produce a usable response.
#[derive(Debug, Error)]
pub enum Failure {
    /// The remote side answered with a status outside the accepted set.
    #[error("status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// DNS, connect, timeout, or a body that could not be read or decoded.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl Failure {
    /// Upstream status code, if the remote side answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Failure::Status { status, .. } => Some(*status),
            Failure::Transport(e) => e.status(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A required credential or config value is missing, empty or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token exchange with the authorization server failed.
    #[error("failed to get access token: {0}")]
    Auth(Failure),

    /// The proxied Spotify call failed.
    #[error("upstream request failed: {0}")]
    Upstream(Failure),

    /// The inbound gateway request could not be interpreted.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Upstream answered 404 for a route that has its own explanation for it.
    #[error("{0}")]
    NotFound(String),
}

impl Error {
    /// HTTP status the gateway answers with for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Config(_) | Error::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Upstream(Failure::Status { status, .. }) => *status,
            Error::Upstream(Failure::Transport(_)) => StatusCode::BAD_GATEWAY,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
