use std::fmt;

use crate::chat::ChatError;
use crate::store::StoreError;

use super::ProcedureKind;

/// Why an input was rejected, and where in the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::new("input", err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Please login")]
    Unauthorized,

    #[error("You do not have required permission")]
    Forbidden,

    #[error("No procedure found on path \"{0}\"")]
    ProcedureNotFound(String),

    #[error("\"{path}\" is a {expected}; it cannot be called as a {received}")]
    MethodNotSupported {
        path: String,
        expected: ProcedureKind,
        received: ProcedureKind,
    },

    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(String),
}

pub type RpcResult<T> = Result<T, RpcError>;

/// Wire-level error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotSupported,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RpcError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::BadRequest,
            Self::Unauthorized => ErrorCode::Unauthorized,
            Self::Forbidden => ErrorCode::Forbidden,
            Self::ProcedureNotFound(_) => ErrorCode::NotFound,
            Self::MethodNotSupported { .. } => ErrorCode::MethodNotSupported,
            Self::CollaboratorFailure(_) => ErrorCode::InternalServerError,
        }
    }

    /// Message safe to return to the caller. Collaborator details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::CollaboratorFailure(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for RpcError {
    fn from(err: StoreError) -> Self {
        Self::CollaboratorFailure(err.to_string())
    }
}

impl From<ChatError> for RpcError {
    fn from(err: ChatError) -> Self {
        Self::CollaboratorFailure(err.to_string())
    }
}
