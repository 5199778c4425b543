use std::collections::BTreeMap;

use bp_types::{AppId, ClientId, DeploymentNamespace, ObjectId, ObjectKind, TaskId};
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u32 = 1;

/// Allocate a new application identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCreateRequest {
    pub client_id: ClientId,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCreateResponse {
    pub app_id: AppId,
}

/// Fetch the current tag → id map of an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGetObjectsRequest {
    pub app_id: AppId,
    #[serde(default)]
    pub task_id: Option<TaskId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGetObjectsResponse {
    pub object_ids: BTreeMap<String, ObjectId>,
}

/// Bulk-register the final tag → id map of an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSetObjectsRequest {
    pub app_id: AppId,
    pub object_ids: BTreeMap<String, ObjectId>,
    pub client_id: ClientId,
}

/// Advisory end of a client session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClientDisconnectRequest {
    pub app_id: AppId,
}

/// Resolve `(app_name, tag, namespace)` to an object id.
///
/// With no tag, the registry resolves the application's single object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLookupObjectRequest {
    pub app_name: String,
    #[serde(default)]
    pub object_tag: Option<String>,
    #[serde(default)]
    pub namespace: DeploymentNamespace,
}

/// Lookup result. A missing `object_id` means not found; `error_message`
/// then says why.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLookupObjectResponse {
    #[serde(default)]
    pub object_id: Option<ObjectId>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGetByDeploymentNameRequest {
    pub name: String,
    #[serde(default)]
    pub namespace: DeploymentNamespace,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGetByDeploymentNameResponse {
    #[serde(default)]
    pub app_id: Option<AppId>,
}

/// Publish an application under a deployment name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDeployRequest {
    pub app_id: AppId,
    pub name: String,
    #[serde(default)]
    pub namespace: DeploymentNamespace,
}

/// Create (or re-create) one object of a given kind inside an application.
///
/// `payload` is opaque to the registry except for content-addressed kinds,
/// whose id is derived from it. `existing_object_id` asks the registry to
/// keep a previously assigned identity when it can.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectCreateRequest {
    pub app_id: AppId,
    pub kind: ObjectKind,
    pub label: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub existing_object_id: Option<ObjectId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCreateResponse {
    pub object_id: ObjectId,
}

/// Body of calls that return nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// One registry call, as recorded by registries that keep a journal.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryCall {
    AppCreate(AppCreateRequest),
    AppGetObjects(AppGetObjectsRequest),
    AppSetObjects(AppSetObjectsRequest),
    AppClientDisconnect(AppClientDisconnectRequest),
    AppLookupObject(AppLookupObjectRequest),
    AppGetByDeploymentName(AppGetByDeploymentNameRequest),
    AppDeploy(AppDeployRequest),
    ObjectCreate(ObjectCreateRequest),
}

impl RegistryCall {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppCreate(_) => "AppCreate",
            Self::AppGetObjects(_) => "AppGetObjects",
            Self::AppSetObjects(_) => "AppSetObjects",
            Self::AppClientDisconnect(_) => "AppClientDisconnect",
            Self::AppLookupObject(_) => "AppLookupObject",
            Self::AppGetByDeploymentName(_) => "AppGetByDeploymentName",
            Self::AppDeploy(_) => "AppDeploy",
            Self::ObjectCreate(_) => "ObjectCreate",
        }
    }

    /// The application a call targets, when it names one.
    pub fn app_id(&self) -> Option<&AppId> {
        match self {
            Self::AppGetObjects(r) => Some(&r.app_id),
            Self::AppSetObjects(r) => Some(&r.app_id),
            Self::AppClientDisconnect(r) => Some(&r.app_id),
            Self::AppDeploy(r) => Some(&r.app_id),
            Self::ObjectCreate(r) => Some(&r.app_id),
            Self::AppCreate(_) | Self::AppLookupObject(_) | Self::AppGetByDeploymentName(_) => None,
        }
    }
}
