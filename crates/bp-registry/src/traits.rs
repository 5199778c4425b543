//! The [`RemoteRegistry`] trait defining the registry interface.

use async_trait::async_trait;
use bp_protocol::{
    AppClientDisconnectRequest, AppCreateRequest, AppCreateResponse, AppDeployRequest,
    AppGetByDeploymentNameRequest, AppGetByDeploymentNameResponse, AppGetObjectsRequest,
    AppGetObjectsResponse, AppLookupObjectRequest, AppLookupObjectResponse, AppSetObjectsRequest,
    ObjectCreateRequest, ObjectCreateResponse,
};

use crate::error::RegistryResult;

/// Server-side registry of applications and their objects.
///
/// Implementations must be thread-safe (`Send + Sync`). No call is retried
/// by callers in this workspace: retry policy, if any, belongs inside the
/// implementation's transport.
#[async_trait]
pub trait RemoteRegistry: Send + Sync {
    /// Allocate a new application identity.
    async fn app_create(&self, req: AppCreateRequest) -> RegistryResult<AppCreateResponse>;

    /// Fetch the current tag → id map of an application.
    async fn app_get_objects(&self, req: AppGetObjectsRequest) -> RegistryResult<AppGetObjectsResponse>;

    /// Replace the tag → id map of an application and mark it running.
    async fn app_set_objects(&self, req: AppSetObjectsRequest) -> RegistryResult<()>;

    /// Advisory end of a client session. The registry stops outstanding
    /// work for the application unless it is deployed.
    async fn app_client_disconnect(&self, req: AppClientDisconnectRequest) -> RegistryResult<()>;

    /// Resolve a deployed `(app_name, tag, namespace)` to an object id.
    ///
    /// "Not found" is reported in the response, not as an error.
    async fn app_lookup_object(&self, req: AppLookupObjectRequest) -> RegistryResult<AppLookupObjectResponse>;

    /// Find the application currently deployed under a name.
    async fn app_get_by_deployment_name(
        &self,
        req: AppGetByDeploymentNameRequest,
    ) -> RegistryResult<AppGetByDeploymentNameResponse>;

    /// Publish an application under a deployment name.
    async fn app_deploy(&self, req: AppDeployRequest) -> RegistryResult<()>;

    /// Create one object inside an application.
    async fn object_create(&self, req: ObjectCreateRequest) -> RegistryResult<ObjectCreateResponse>;
}
