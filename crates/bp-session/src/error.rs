use bp_registry::RegistryError;
use bp_types::{AppId, ObjectId, TypeError};
use thiserror::Error;

/// Errors raised while building blueprints and materializing sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A same- or cross-application lookup found no matching object.
    #[error("not found: {0}")]
    NotFound(String),

    /// A previously deployed id and the freshly produced id disagree for an
    /// object whose identity must be stable.
    #[error("tried creating an object using existing id {existing} but it has id {produced}")]
    IdentityMismatch { existing: ObjectId, produced: ObjectId },

    /// Transport or server-side failure of a registry call.
    #[error("registry error: {0}")]
    Remote(RegistryError),

    /// A reference names a tag that has no definition in the blueprint.
    #[error("reference to undefined tag {0:?}")]
    UnresolvedTag(String),

    /// Registration was attempted before every blueprint tag resolved.
    #[error("cannot register app: unresolved tags {missing:?}")]
    IncompleteRegistration { missing: Vec<String> },

    #[error("duplicate tag in blueprint: {0:?}")]
    DuplicateTag(String),

    /// The session has already ended.
    #[error("session for app {0} is disconnected")]
    Disconnected(AppId),

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

impl From<RegistryError> for SessionError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(message) => Self::NotFound(message),
            other => Self::Remote(other),
        }
    }
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_not_found_maps_to_not_found() {
        let err = SessionError::from(RegistryError::NotFound("App x".into()));
        assert!(matches!(err, SessionError::NotFound(m) if m == "App x"));
    }

    #[test]
    fn other_registry_errors_are_remote() {
        let err = SessionError::from(RegistryError::Unavailable("down".into()));
        assert!(matches!(err, SessionError::Remote(RegistryError::Unavailable(_))));
    }

    #[test]
    fn mismatch_message_names_both_ids() {
        let err = SessionError::IdentityMismatch {
            existing: ObjectId::parse("fu-1").unwrap(),
            produced: ObjectId::parse("fu-2").unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fu-1") && msg.contains("fu-2"));
    }
}
