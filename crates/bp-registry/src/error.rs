use bp_protocol::{ErrorBody, ErrorCode};
use bp_types::{AppId, TypeError};
use thiserror::Error;

/// Errors returned by registry calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A named entity (deployment, object) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("app not found: {0}")]
    AppNotFound(AppId),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The registry could not be reached or refused the call.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

impl RegistryError {
    /// The wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::AppNotFound(_) => ErrorCode::AppNotFound,
            Self::InvalidRequest(_) | Self::Type(_) => ErrorCode::InvalidRequest,
            Self::Unavailable(_) | Self::Transport(_) => ErrorCode::Unavailable,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// The wire body for this error. `AppNotFound` carries the bare app
    /// id so [`from_body`](Self::from_body) can restore it.
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::AppNotFound(app_id) => ErrorBody::new(self.code(), app_id.as_str()),
            Self::NotFound(message)
            | Self::InvalidRequest(message)
            | Self::Unavailable(message)
            | Self::Transport(message)
            | Self::Internal(message) => ErrorBody::new(self.code(), message.clone()),
            Self::Type(err) => ErrorBody::new(self.code(), err.to_string()),
        }
    }

    /// Rebuild an error from a wire body.
    pub fn from_body(body: ErrorBody) -> Self {
        match body.code {
            ErrorCode::NotFound => Self::NotFound(body.message),
            ErrorCode::AppNotFound => match AppId::parse(body.message.clone()) {
                Ok(app_id) => Self::AppNotFound(app_id),
                Err(_) => Self::NotFound(body.message),
            },
            ErrorCode::InvalidRequest => Self::InvalidRequest(body.message),
            ErrorCode::Unavailable => Self::Unavailable(body.message),
            ErrorCode::Internal => Self::Internal(body.message),
        }
    }
}

/// Result alias for registry calls.
pub type RegistryResult<T> = Result<T, RegistryError>;
