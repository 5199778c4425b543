use std::fmt;
use std::sync::Arc;

use bp_registry::RemoteRegistry;
use bp_types::{ClientId, ObjectId, ObjectKind};

/// A connection to the registry plus the identity of this client.
///
/// Cheap to clone; every clone talks to the same registry as the same
/// client.
#[derive(Clone)]
pub struct Client {
    registry: Arc<dyn RemoteRegistry>,
    client_id: ClientId,
}

impl Client {
    /// Connect with a freshly generated client id.
    pub fn new(registry: Arc<dyn RemoteRegistry>) -> Self {
        Self::with_client_id(registry, ClientId::generate())
    }

    pub fn with_client_id(registry: Arc<dyn RemoteRegistry>, client_id: ClientId) -> Self {
        Self { registry, client_id }
    }

    pub fn registry(&self) -> &dyn RemoteRegistry {
        self.registry.as_ref()
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// A materialized object: its remote id and the client it was resolved
/// through.
#[derive(Clone, Debug)]
pub struct ObjectHandle {
    object_id: ObjectId,
    client: Client,
}

impl ObjectHandle {
    pub fn new(object_id: ObjectId, client: Client) -> Self {
        Self { object_id, client }
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    /// The kind named by the id prefix, if known.
    pub fn kind(&self) -> Option<ObjectKind> {
        self.object_id.kind()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
