//! Object definitions: the kind-specific half of materialization.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bp_types::{AppId, LocalUuid, ObjectId, ObjectKind};

use crate::client::Client;
use crate::error::SessionResult;
use crate::load::LoadContext;

/// Kind-specific creation logic for one object.
///
/// The engine never looks inside an implementation: it only calls
/// [`create`](ObjectDefinition::create) once per session and records the id
/// it returns. Implementations resolve their own dependencies through
/// [`LoadContext::load`] before sending their creation call, so every
/// dependency has an id by the time the enclosing object is created.
#[async_trait]
pub trait ObjectDefinition: Send + Sync + fmt::Debug {
    /// The kind of object this definition creates.
    fn kind(&self) -> ObjectKind;

    /// Whether the created id is derived from content. Such objects may
    /// legitimately receive a different id than a previous deployment.
    fn is_content_addressed(&self) -> bool {
        self.kind().is_content_addressed()
    }

    /// Progress message shown while the object is being created.
    fn creating_message(&self) -> Option<String> {
        None
    }

    /// Progress message shown once the object exists.
    fn created_message(&self) -> Option<String> {
        None
    }

    /// Create the object and return its id.
    ///
    /// `existing_id` is the id this object had in a previous deployment of
    /// the same app; implementations should ask the registry to keep it.
    async fn create(
        &self,
        ctx: &mut LoadContext<'_>,
        existing_id: Option<&ObjectId>,
    ) -> SessionResult<ObjectId>;

    /// Called after registration for objects that route later calls
    /// through the running session.
    fn bind(&self, _binding: &SessionBinding) {}
}

/// What a bound object learns about the session that registered it.
#[derive(Clone, Debug)]
pub struct SessionBinding {
    pub app_id: AppId,
    pub tag: String,
    pub object_id: ObjectId,
    pub client: Client,
}

/// A user-declared, not-yet-materialized object.
///
/// Clones share the same [`LocalUuid`], so one definition placed in
/// several spots of a blueprint is still created only once per session.
#[derive(Clone)]
pub struct Definition {
    local_uuid: LocalUuid,
    object: Arc<dyn ObjectDefinition>,
}

impl Definition {
    pub fn new<T: ObjectDefinition + 'static>(object: T) -> Self {
        Self::from_arc(Arc::new(object))
    }

    /// Wrap a shared object, so the caller can keep a typed handle to it.
    pub fn from_arc(object: Arc<dyn ObjectDefinition>) -> Self {
        Self {
            local_uuid: LocalUuid::new(),
            object,
        }
    }

    pub fn local_uuid(&self) -> LocalUuid {
        self.local_uuid
    }

    pub fn object(&self) -> &Arc<dyn ObjectDefinition> {
        &self.object
    }

    pub fn kind(&self) -> ObjectKind {
        self.object.kind()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("local_uuid", &self.local_uuid)
            .field("object", &self.object)
            .finish()
    }
}
