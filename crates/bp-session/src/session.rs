//! Session lifecycle: start, register, disconnect.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use bp_protocol::{AppClientDisconnectRequest, AppCreateRequest, AppGetObjectsRequest, AppSetObjectsRequest};
use bp_types::{AppId, LocalUuid, ObjectId, TaskId};
use tracing::{debug, info};

use crate::blueprint::Blueprint;
use crate::client::{Client, ObjectHandle};
use crate::definition::SessionBinding;
use crate::error::{SessionError, SessionResult};
use crate::node::{Node, Reference};
use crate::progress::ProgressReporter;

/// How a session came to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Constructing (or redeploying) an application from a client.
    Client,
    /// A worker attached to an application that is already running.
    Container { task_id: TaskId },
}

/// One active application context bound to one registry connection.
///
/// A session owns three caches:
///
/// - `tag_to_object`: tags that are materialized in this session (or, in a
///   container, were materialized by the client that started the app).
/// - `tag_to_existing_id`: ids from a previous deployment, used to keep
///   object identity stable across redeploys.
/// - `local_uuid_to_object_id`: the memoization cache of [`Session::load`].
///
/// Sessions are driven by one task at a time; every mutating operation
/// takes `&mut self`.
pub struct Session {
    pub(crate) blueprint: Arc<Blueprint>,
    pub(crate) client: Client,
    app_id: AppId,
    mode: SessionMode,
    pub(crate) tag_to_object: HashMap<String, ObjectHandle>,
    pub(crate) tag_to_existing_id: HashMap<String, ObjectId>,
    pub(crate) local_uuid_to_object_id: HashMap<LocalUuid, ObjectId>,
    pub(crate) progress: Option<Box<dyn ProgressReporter>>,
    disconnected: bool,
}

impl Session {
    fn with_parts(blueprint: Blueprint, client: Client, app_id: AppId, mode: SessionMode) -> Self {
        Self {
            blueprint: Arc::new(blueprint),
            client,
            app_id,
            mode,
            tag_to_object: HashMap::new(),
            tag_to_existing_id: HashMap::new(),
            local_uuid_to_object_id: HashMap::new(),
            progress: None,
            disconnected: false,
        }
    }

    /// Start a session for a freshly allocated application.
    pub async fn init_new(
        blueprint: Blueprint,
        client: Client,
        description: impl Into<String>,
    ) -> SessionResult<Self> {
        let response = client
            .registry()
            .app_create(AppCreateRequest {
                client_id: client.client_id().clone(),
                description: description.into(),
            })
            .await?;
        info!(app_id = %response.app_id, "started new app");
        Ok(Self::with_parts(blueprint, client, response.app_id, SessionMode::Client))
    }

    /// Start a session on top of an existing application. Its current
    /// objects become the identity hints for the next materialization;
    /// nothing is created.
    pub async fn init_existing(blueprint: Blueprint, client: Client, app_id: AppId) -> SessionResult<Self> {
        let response = client
            .registry()
            .app_get_objects(AppGetObjectsRequest {
                app_id: app_id.clone(),
                task_id: None,
            })
            .await?;
        info!(app_id = %app_id, existing = response.object_ids.len(), "attached to existing app");

        let mut session = Self::with_parts(blueprint, client, app_id, SessionMode::Client);
        session.tag_to_existing_id = response.object_ids.into_iter().collect();
        Ok(session)
    }

    /// Attach a worker process to a running application. Every registered
    /// object is taken as already materialized; blueprint objects with a
    /// registered id are bound to this session.
    pub async fn init_container(
        blueprint: Blueprint,
        client: Client,
        app_id: AppId,
        task_id: TaskId,
    ) -> SessionResult<Self> {
        let response = client
            .registry()
            .app_get_objects(AppGetObjectsRequest {
                app_id: app_id.clone(),
                task_id: Some(task_id.clone()),
            })
            .await?;
        info!(app_id = %app_id, task_id = %task_id, objects = response.object_ids.len(), "container session started");

        let mut session = Self::with_parts(blueprint, client, app_id, SessionMode::Container { task_id });
        for (tag, object_id) in response.object_ids {
            let handle = ObjectHandle::new(object_id, session.client.clone());
            session.tag_to_object.insert(tag, handle);
        }
        session.bind_all();
        Ok(session)
    }

    /// Report object creation to `progress`.
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Materialize every blueprint tag, then register the complete tag → id
    /// map with one `AppSetObjects` call.
    ///
    /// Tags are visited in blueprint order; dependencies are created before
    /// their dependents regardless of that order. On error nothing is
    /// registered, but objects created so far stay cached, so a retry only
    /// creates what is missing.
    pub async fn create_all(&mut self) -> SessionResult<()> {
        self.ensure_connected()?;

        let blueprint = Arc::clone(&self.blueprint);
        for tag in blueprint.tags() {
            let node = Node::from(Reference::local(tag));
            self.load(&node, None).await?;
        }

        let missing: Vec<String> = blueprint
            .tags()
            .filter(|tag| !self.tag_to_object.contains_key(*tag))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(SessionError::IncompleteRegistration { missing });
        }

        let object_ids: BTreeMap<String, ObjectId> = self
            .tag_to_object
            .iter()
            .map(|(tag, handle)| (tag.clone(), handle.object_id().clone()))
            .collect();
        let count = object_ids.len();
        self.client
            .registry()
            .app_set_objects(AppSetObjectsRequest {
                app_id: self.app_id.clone(),
                object_ids,
                client_id: self.client.client_id().clone(),
            })
            .await?;
        info!(app_id = %self.app_id, objects = count, "registered objects");

        self.bind_all();
        Ok(())
    }

    fn bind_all(&self) {
        for (tag, definition) in self.blueprint.iter() {
            if let Some(handle) = self.tag_to_object.get(tag) {
                definition.object().bind(&SessionBinding {
                    app_id: self.app_id.clone(),
                    tag: tag.to_string(),
                    object_id: handle.object_id().clone(),
                    client: self.client.clone(),
                });
            }
        }
    }

    /// Tell the registry this session is over.
    ///
    /// Only the first call reaches the registry; later calls do nothing.
    /// In-flight loads are not cancelled.
    pub async fn disconnect(&mut self) -> SessionResult<()> {
        if self.disconnected {
            debug!(app_id = %self.app_id, "session already disconnected");
            return Ok(());
        }
        self.disconnected = true;
        self.client
            .registry()
            .app_client_disconnect(AppClientDisconnectRequest {
                app_id: self.app_id.clone(),
            })
            .await?;
        info!(app_id = %self.app_id, "disconnected");
        Ok(())
    }

    pub(crate) fn ensure_connected(&self) -> SessionResult<()> {
        if self.disconnected {
            return Err(SessionError::Disconnected(self.app_id.clone()));
        }
        Ok(())
    }

    /// The materialized object for `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<&ObjectHandle> {
        self.tag_to_object.get(tag)
    }

    /// The id `tag` had in the previous deployment, if any.
    pub fn existing_object_id(&self, tag: &str) -> Option<&ObjectId> {
        self.tag_to_existing_id.get(tag)
    }

    /// Every materialized tag and its id, sorted by tag.
    pub fn object_ids(&self) -> BTreeMap<String, ObjectId> {
        self.tag_to_object
            .iter()
            .map(|(tag, handle)| (tag.clone(), handle.object_id().clone()))
            .collect()
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn is_container(&self) -> bool {
        matches!(self.mode, SessionMode::Container { .. })
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("app_id", &self.app_id)
            .field("mode", &self.mode)
            .field("tags", &self.blueprint.len())
            .field("materialized", &self.tag_to_object.len())
            .field("disconnected", &self.disconnected)
            .finish_non_exhaustive()
    }
}
