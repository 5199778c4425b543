use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Process-local identity of a definition instance.
///
/// Assigned once when a definition or reference is constructed and shared
/// by every clone of it, so re-using the same definition in several places
/// still materializes it only once per session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalUuid(Uuid);

impl LocalUuid {
    /// Allocate a fresh identity (UUID v7, so ids sort by creation time).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LocalUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalUuid({})", self.0)
    }
}

impl fmt::Display for LocalUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_opaque(kind: &str, s: &str) -> Result<(), TypeError> {
    if s.is_empty() {
        return Err(TypeError::InvalidIdentifier(format!("{kind} must not be empty")));
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(TypeError::InvalidIdentifier(format!(
            "{kind} {s:?} contains whitespace or control characters"
        )));
    }
    Ok(())
}

/// Server-assigned application identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        validate_opaque("app id", &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AppId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AppId> for String {
    fn from(id: AppId) -> Self {
        id.0
    }
}

/// Identity of a worker task attached to a running application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        validate_opaque("task id", &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

/// Identity of one connected client process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Allocate a random client identity (`cl-<uuid>`).
    pub fn generate() -> Self {
        Self(format!("cl-{}", Uuid::now_v7().simple()))
    }

    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        validate_opaque("client id", &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClientId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}
