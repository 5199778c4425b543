use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id {id:?}: {reason}")]
    InvalidObjectId { id: String, reason: String },

    #[error("invalid tag {tag:?}: {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("invalid app name {name:?}: {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("unknown deployment namespace: {0}")]
    UnknownNamespace(String),
}
