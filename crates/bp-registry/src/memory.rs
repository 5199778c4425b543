//! In-memory registry for tests, embedding, and the HTTP service.
//!
//! [`InMemoryRegistry`] keeps all applications, deployments and objects in
//! `HashMap`s behind one `RwLock`. Besides implementing [`RemoteRegistry`]
//! it records every call it receives, and can be told to fail object
//! creation for a given label.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use bp_protocol::{
    AppClientDisconnectRequest, AppCreateRequest, AppCreateResponse, AppDeployRequest,
    AppGetByDeploymentNameRequest, AppGetByDeploymentNameResponse, AppGetObjectsRequest,
    AppGetObjectsResponse, AppLookupObjectRequest, AppLookupObjectResponse, AppSetObjectsRequest,
    ObjectCreateRequest, ObjectCreateResponse, RegistryCall,
};
use bp_types::{
    validate_app_name, validate_tag, AppId, ClientId, DeploymentNamespace, ObjectId, ObjectKind,
    TaskId,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::traits::RemoteRegistry;

/// Lifecycle state of an application inside the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Allocated, objects not yet registered.
    Initializing,
    /// Objects registered by a connected client.
    Running,
    /// Published under a deployment name; survives client disconnects.
    Deployed,
    /// Client disconnected from a non-deployed app.
    Stopped,
}

/// An object as stored by the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredObject {
    pub object_id: ObjectId,
    pub kind: ObjectKind,
    pub label: String,
    pub payload: serde_json::Value,
    pub app_id: AppId,
}

#[derive(Debug)]
struct AppRecord {
    description: String,
    created_by: ClientId,
    created_at: DateTime<Utc>,
    state: AppState,
    object_ids: BTreeMap<String, ObjectId>,
}

#[derive(Debug, Default)]
struct State {
    apps: HashMap<AppId, AppRecord>,
    deployments: HashMap<(DeploymentNamespace, String), AppId>,
    objects: HashMap<ObjectId, StoredObject>,
    tasks: HashMap<TaskId, AppId>,
    kind_counters: HashMap<ObjectKind, u64>,
    app_counter: u64,
    failing_labels: HashSet<String>,
    calls: Vec<RegistryCall>,
}

impl State {
    fn app(&self, app_id: &AppId) -> RegistryResult<&AppRecord> {
        self.apps
            .get(app_id)
            .ok_or_else(|| RegistryError::AppNotFound(app_id.clone()))
    }

    fn app_mut(&mut self, app_id: &AppId) -> RegistryResult<&mut AppRecord> {
        self.apps
            .get_mut(app_id)
            .ok_or_else(|| RegistryError::AppNotFound(app_id.clone()))
    }

    fn next_object_id(&mut self, kind: ObjectKind) -> ObjectId {
        let counter = self.kind_counters.entry(kind).or_insert(0);
        *counter += 1;
        ObjectId::for_kind(kind, *counter)
    }
}

/// Derive the id of a content-addressed object from its kind and payload.
fn content_address(kind: ObjectKind, payload: &serde_json::Value) -> ObjectId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"bp-object-v1:");
    hasher.update(kind.prefix().as_bytes());
    hasher.update(b":");
    hasher.update(payload.to_string().as_bytes());
    let digest = hasher.finalize();
    ObjectId::for_kind(kind, hex::encode(&digest.as_bytes()[..8]))
}

/// An in-memory implementation of [`RemoteRegistry`].
///
/// Object ids are sequential per kind (`qu-1`, `qu-2`, ...) except for
/// content-addressed kinds, whose ids are derived from the payload. Data is
/// lost when the registry is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    state: RwLock<State>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RegistryResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| RegistryError::Internal(format!("lock poisoned: {e}")))
    }

    fn read_state<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    /// Make every subsequent `object_create` with this label fail with
    /// [`RegistryError::Unavailable`].
    pub fn fail_object_create(&self, label: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .failing_labels
            .insert(label.into());
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.state
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .failing_labels
            .clear();
    }

    /// Attach a worker task to an application, so that
    /// `app_get_objects` calls carrying the task id are accepted.
    pub fn register_task(&self, app_id: &AppId, task_id: TaskId) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.app(app_id)?;
        state.tasks.insert(task_id, app_id.clone());
        Ok(())
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.read_state(|s| s.calls.clone())
    }

    /// Calls with the given [`RegistryCall::name`].
    pub fn calls_named(&self, name: &str) -> Vec<RegistryCall> {
        self.read_state(|s| s.calls.iter().filter(|c| c.name() == name).cloned().collect())
    }

    /// Number of calls with the given [`RegistryCall::name`].
    pub fn call_count(&self, name: &str) -> usize {
        self.read_state(|s| s.calls.iter().filter(|c| c.name() == name).count())
    }

    /// Forget the call journal.
    pub fn clear_calls(&self) {
        self.state.write().unwrap_or_else(|e| e.into_inner()).calls.clear();
    }

    /// Look up a stored object.
    pub fn object(&self, object_id: &ObjectId) -> Option<StoredObject> {
        self.read_state(|s| s.objects.get(object_id).cloned())
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.read_state(|s| s.objects.len())
    }

    /// The registered tag → id map of an application.
    pub fn app_objects(&self, app_id: &AppId) -> Option<BTreeMap<String, ObjectId>> {
        self.read_state(|s| s.apps.get(app_id).map(|a| a.object_ids.clone()))
    }

    pub fn app_state(&self, app_id: &AppId) -> Option<AppState> {
        self.read_state(|s| s.apps.get(app_id).map(|a| a.state))
    }

    pub fn app_description(&self, app_id: &AppId) -> Option<String> {
        self.read_state(|s| s.apps.get(app_id).map(|a| a.description.clone()))
    }

    /// Creation time and creating client of an application.
    pub fn app_origin(&self, app_id: &AppId) -> Option<(ClientId, DateTime<Utc>)> {
        self.read_state(|s| {
            s.apps
                .get(app_id)
                .map(|a| (a.created_by.clone(), a.created_at))
        })
    }

    /// The application deployed under `(namespace, name)`.
    pub fn deployment(&self, name: &str, namespace: DeploymentNamespace) -> Option<AppId> {
        self.read_state(|s| s.deployments.get(&(namespace, name.to_string())).cloned())
    }
}

#[async_trait]
impl RemoteRegistry for InMemoryRegistry {
    async fn app_create(&self, req: AppCreateRequest) -> RegistryResult<AppCreateResponse> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppCreate(req.clone()));

        state.app_counter += 1;
        let app_id = AppId::parse(format!("ap-{}", state.app_counter))?;
        state.apps.insert(
            app_id.clone(),
            AppRecord {
                description: req.description,
                created_by: req.client_id,
                created_at: Utc::now(),
                state: AppState::Initializing,
                object_ids: BTreeMap::new(),
            },
        );
        debug!(app_id = %app_id, "allocated app");
        Ok(AppCreateResponse { app_id })
    }

    async fn app_get_objects(&self, req: AppGetObjectsRequest) -> RegistryResult<AppGetObjectsResponse> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppGetObjects(req.clone()));

        if let Some(task_id) = &req.task_id {
            match state.tasks.get(task_id) {
                Some(owner) if *owner == req.app_id => {}
                Some(owner) => {
                    return Err(RegistryError::InvalidRequest(format!(
                        "task {task_id} belongs to app {owner}, not {}",
                        req.app_id
                    )))
                }
                None => {
                    return Err(RegistryError::InvalidRequest(format!("unknown task {task_id}")))
                }
            }
        }

        let app = state.app(&req.app_id)?;
        Ok(AppGetObjectsResponse {
            object_ids: app.object_ids.clone(),
        })
    }

    async fn app_set_objects(&self, req: AppSetObjectsRequest) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppSetObjects(req.clone()));

        for (tag, object_id) in &req.object_ids {
            validate_tag(tag)?;
            if !state.objects.contains_key(object_id) {
                // Objects created elsewhere (other registries, older
                // deployments) are accepted as opaque ids.
                debug!(tag = %tag, object_id = %object_id, "registering unknown object id");
            }
        }

        let app = state.app_mut(&req.app_id)?;
        app.object_ids = req.object_ids;
        if app.state != AppState::Deployed {
            app.state = AppState::Running;
        }
        Ok(())
    }

    async fn app_client_disconnect(&self, req: AppClientDisconnectRequest) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppClientDisconnect(req.clone()));

        let app = state.app_mut(&req.app_id)?;
        if app.state != AppState::Deployed {
            app.state = AppState::Stopped;
        }
        debug!(app_id = %req.app_id, "client disconnected");
        Ok(())
    }

    async fn app_lookup_object(&self, req: AppLookupObjectRequest) -> RegistryResult<AppLookupObjectResponse> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppLookupObject(req.clone()));

        let not_found = |message: String| AppLookupObjectResponse {
            object_id: None,
            error_message: Some(message),
        };

        let key = (req.namespace, req.app_name.clone());
        let Some(app_id) = state.deployments.get(&key) else {
            return Ok(not_found(format!("App {} not found", req.app_name)));
        };
        let app = state.app(app_id)?;

        let object_id = match &req.object_tag {
            Some(tag) => app.object_ids.get(tag).cloned(),
            None if app.object_ids.len() == 1 => app.object_ids.values().next().cloned(),
            None => {
                return Ok(not_found(format!(
                    "App {} has {} objects; a tag is required",
                    req.app_name,
                    app.object_ids.len()
                )))
            }
        };

        Ok(match object_id {
            Some(object_id) => AppLookupObjectResponse {
                object_id: Some(object_id),
                error_message: None,
            },
            None => not_found(format!(
                "Object {} not found in app {}",
                req.object_tag.as_deref().unwrap_or_default(),
                req.app_name
            )),
        })
    }

    async fn app_get_by_deployment_name(
        &self,
        req: AppGetByDeploymentNameRequest,
    ) -> RegistryResult<AppGetByDeploymentNameResponse> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppGetByDeploymentName(req.clone()));

        let app_id = state.deployments.get(&(req.namespace, req.name)).cloned();
        Ok(AppGetByDeploymentNameResponse { app_id })
    }

    async fn app_deploy(&self, req: AppDeployRequest) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::AppDeploy(req.clone()));

        validate_app_name(&req.name)?;
        state.app_mut(&req.app_id)?.state = AppState::Deployed;

        let previous = state
            .deployments
            .insert((req.namespace, req.name.clone()), req.app_id.clone());
        if let Some(previous) = previous.filter(|p| *p != req.app_id) {
            if let Some(old) = state.apps.get_mut(&previous) {
                old.state = AppState::Stopped;
            }
        }
        debug!(app_id = %req.app_id, name = %req.name, "deployed app");
        Ok(())
    }

    async fn object_create(&self, req: ObjectCreateRequest) -> RegistryResult<ObjectCreateResponse> {
        let mut state = self.write()?;
        state.calls.push(RegistryCall::ObjectCreate(req.clone()));

        state.app(&req.app_id)?;
        if state.failing_labels.contains(&req.label) {
            return Err(RegistryError::Unavailable(format!(
                "failed to create {} {:?}",
                req.kind, req.label
            )));
        }

        let object_id = if req.kind.is_content_addressed() {
            content_address(req.kind, &req.payload)
        } else {
            match &req.existing_object_id {
                Some(existing) if state.objects.get(existing).is_some_and(|o| o.kind == req.kind) => {
                    existing.clone()
                }
                _ => state.next_object_id(req.kind),
            }
        };

        state.objects.insert(
            object_id.clone(),
            StoredObject {
                object_id: object_id.clone(),
                kind: req.kind,
                label: req.label,
                payload: req.payload,
                app_id: req.app_id,
            },
        );
        Ok(ObjectCreateResponse { object_id })
    }
}
