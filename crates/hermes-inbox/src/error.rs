use hermes_types::{InboxId, NotificationId, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InboxError {
    /// Malformed client input: unparsable payload or invalid identifier.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("notification not found: {inbox}/{notification}")]
    NotFound {
        inbox: InboxId,
        notification: NotificationId,
    },

    #[error("storage write failed: {0}")]
    StorageWrite(String),

    #[error("storage read failed: {0}")]
    StorageRead(String),

    /// An identifier template is malformed or lacks a placeholder value.
    #[error("identifier template error: {0}")]
    TemplateRender(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// How an error surfaces at the request boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    /// Server-side fault; details stay in the logs.
    Internal,
}

impl InboxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StorageWrite(_)
            | Self::StorageRead(_)
            | Self::TemplateRender(_)
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<TypeError> for InboxError {
    fn from(e: TypeError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

pub type InboxResult<T> = Result<T, InboxError>;
