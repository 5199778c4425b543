use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of a remote object.
///
/// Every kind owns a two-letter id prefix. Whether a kind is
/// content-addressed is a declared property of the kind rather than
/// something inferred from id text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Function,
    Image,
    Queue,
    Secret,
    Dict,
    SharedVolume,
}

impl ObjectKind {
    /// All known kinds.
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Function,
        ObjectKind::Image,
        ObjectKind::Queue,
        ObjectKind::Secret,
        ObjectKind::Dict,
        ObjectKind::SharedVolume,
    ];

    /// The id prefix owned by this kind (without the trailing `-`).
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Function => "fu",
            Self::Image => "im",
            Self::Queue => "qu",
            Self::Secret => "st",
            Self::Dict => "di",
            Self::SharedVolume => "sv",
        }
    }

    /// Resolve a kind from an id prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }

    /// Content-addressed kinds derive their id from a hash of their
    /// content, so the server cannot be forced to keep a prior id for them.
    pub const fn is_content_addressed(self) -> bool {
        matches!(self, Self::Image)
    }

    /// Human-readable name, used in progress messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Image => "image",
            Self::Queue => "queue",
            Self::Secret => "secret",
            Self::Dict => "dict",
            Self::SharedVolume => "shared volume",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(Self::Function),
            "image" => Ok(Self::Image),
            "queue" => Ok(Self::Queue),
            "secret" => Ok(Self::Secret),
            "dict" => Ok(Self::Dict),
            "shared_volume" | "shared-volume" => Ok(Self::SharedVolume),
            other => Err(TypeError::InvalidIdentifier(format!("unknown object kind: {other}"))),
        }
    }
}

/// Remote, server-assigned identity of an object.
///
/// Ids are opaque to clients: any non-empty string without whitespace is
/// accepted. Ids minted by this workspace have the shape `<prefix>-<rest>`,
/// and [`kind`](Self::kind) reads the kind back from that prefix when it
/// is one of ours.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an id.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.is_empty() {
            return Err(TypeError::InvalidObjectId {
                id: s,
                reason: "empty id".to_string(),
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidObjectId {
                id: s,
                reason: "contains whitespace or control characters".to_string(),
            });
        }
        Ok(Self(s))
    }

    /// Build an id for `kind` with the given suffix.
    pub fn for_kind(kind: ObjectKind, suffix: impl fmt::Display) -> Self {
        Self(format!("{}-{}", kind.prefix(), suffix))
    }

    /// The id prefix (everything before the first `-`), empty when the id
    /// has no separator.
    pub fn prefix(&self) -> &str {
        self.0.split_once('-').map(|(p, _)| p).unwrap_or_default()
    }

    /// The kind named by the prefix, if known.
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_prefix(self.prefix())
    }

    /// Whether this id belongs to a content-addressed kind.
    pub fn is_content_addressed(&self) -> bool {
        self.kind().is_some_and(ObjectKind::is_content_addressed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_accepts_kind_ids() {
        let id = ObjectId::parse("fu-1").unwrap();
        assert_eq!(id.prefix(), "fu");
        assert_eq!(id.kind(), Some(ObjectKind::Function));
        assert!(!id.is_content_addressed());
    }

    #[test]
    fn image_ids_are_content_addressed() {
        let id = ObjectId::parse("im-3fa9c2").unwrap();
        assert_eq!(id.kind(), Some(ObjectKind::Image));
        assert!(id.is_content_addressed());
    }

    #[test]
    fn unknown_prefix_passes_through() {
        let id = ObjectId::parse("zz-abc").unwrap();
        assert_eq!(id.kind(), None);
        assert!(!id.is_content_addressed());
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("fu-1 2").is_err());
        assert!(ObjectId::parse("fu-1\n").is_err());
    }

    #[test]
    fn foreign_server_ids_are_opaque() {
        for raw in ["fu1", "FU-1", "-1", "Obj_42"] {
            let id = ObjectId::parse(raw).unwrap();
            assert_eq!(id.as_str(), raw);
            assert_eq!(id.kind(), None);
            assert!(!id.is_content_addressed());
        }
        assert_eq!(ObjectId::parse("fu1").unwrap().prefix(), "");
        assert_eq!(ObjectId::parse("FU-1").unwrap().prefix(), "FU");
    }

    #[test]
    fn for_kind_uses_prefix() {
        let id = ObjectId::for_kind(ObjectKind::Queue, 7);
        assert_eq!(id.as_str(), "qu-7");
    }

    #[test]
    fn serde_rejects_invalid_id() {
        let parsed: Result<ObjectId, _> = serde_json::from_str("\"no pe\"");
        assert!(parsed.is_err());
        let parsed: ObjectId = serde_json::from_str("\"st-9\"").unwrap();
        assert_eq!(parsed.kind(), Some(ObjectKind::Secret));
    }

    #[test]
    fn kind_prefixes_are_unique() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_prefix(kind.prefix()), Some(kind));
        }
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("image".parse::<ObjectKind>().unwrap(), ObjectKind::Image);
        assert_eq!("shared-volume".parse::<ObjectKind>().unwrap(), ObjectKind::SharedVolume);
        assert!("volcano".parse::<ObjectKind>().is_err());
    }

    proptest! {
        #[test]
        fn prefix_survives_any_suffix(suffix in "[a-zA-Z0-9_.-]{1,24}") {
            let id = ObjectId::parse(format!("qu-{suffix}")).unwrap();
            prop_assert_eq!(id.prefix(), "qu");
            prop_assert_eq!(id.kind(), Some(ObjectKind::Queue));
        }
    }
}
