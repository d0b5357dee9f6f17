use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hermes_inbox::{ErrorKind, InboxError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request itself is unusable, e.g. it carries no host.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Inbox(#[from] InboxError),

    #[error("request exceeded its {}s deadline", .0.as_secs())]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] hermes_store::KvError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Inbox(e) => match e.kind() {
                ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) | Self::Store(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
            let reason = status.canonical_reason().unwrap_or("error");
            return (status, reason).into_response();
        }
        (status, self.to_string()).into_response()
    }
}
