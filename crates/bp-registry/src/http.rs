//! HTTP client for a registry served by `bp-server`.

use std::time::Duration;

use async_trait::async_trait;
use bp_protocol::{
    endpoints, AppClientDisconnectRequest, AppCreateRequest, AppCreateResponse, AppDeployRequest,
    AppGetByDeploymentNameRequest, AppGetByDeploymentNameResponse, AppGetObjectsRequest,
    AppGetObjectsResponse, AppLookupObjectRequest, AppLookupObjectResponse, AppSetObjectsRequest,
    Empty, ErrorBody, ObjectCreateRequest, ObjectCreateResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::traits::RemoteRegistry;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`RemoteRegistry`] reached over HTTP.
///
/// Every call is one `POST` of a JSON request document. Failures come
/// back as an [`ErrorBody`] and are rebuilt into the matching
/// [`RegistryError`]; connection problems become
/// [`RegistryError::Transport`].
#[derive(Clone, Debug)]
pub struct HttpRegistry {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRegistry {
    pub fn new(base_url: impl Into<String>) -> RegistryResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> RegistryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bp-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, path: &str, req: &Req) -> RegistryResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "registry call");
        let response = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Resp>()
                .await
                .map_err(|e| RegistryError::Transport(format!("malformed response from {path}: {e}")));
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => Err(RegistryError::from_body(body)),
            Err(_) => Err(RegistryError::Transport(format!("{path} returned {status}"))),
        }
    }
}

#[async_trait]
impl RemoteRegistry for HttpRegistry {
    async fn app_create(&self, req: AppCreateRequest) -> RegistryResult<AppCreateResponse> {
        self.post(endpoints::APP_CREATE, &req).await
    }

    async fn app_get_objects(&self, req: AppGetObjectsRequest) -> RegistryResult<AppGetObjectsResponse> {
        self.post(endpoints::APP_GET_OBJECTS, &req).await
    }

    async fn app_set_objects(&self, req: AppSetObjectsRequest) -> RegistryResult<()> {
        self.post::<_, Empty>(endpoints::APP_SET_OBJECTS, &req).await?;
        Ok(())
    }

    async fn app_client_disconnect(&self, req: AppClientDisconnectRequest) -> RegistryResult<()> {
        self.post::<_, Empty>(endpoints::APP_CLIENT_DISCONNECT, &req).await?;
        Ok(())
    }

    async fn app_lookup_object(&self, req: AppLookupObjectRequest) -> RegistryResult<AppLookupObjectResponse> {
        self.post(endpoints::APP_LOOKUP_OBJECT, &req).await
    }

    async fn app_get_by_deployment_name(
        &self,
        req: AppGetByDeploymentNameRequest,
    ) -> RegistryResult<AppGetByDeploymentNameResponse> {
        self.post(endpoints::APP_GET_BY_DEPLOYMENT_NAME, &req).await
    }

    async fn app_deploy(&self, req: AppDeployRequest) -> RegistryResult<()> {
        self.post::<_, Empty>(endpoints::APP_DEPLOY, &req).await?;
        Ok(())
    }

    async fn object_create(&self, req: ObjectCreateRequest) -> RegistryResult<ObjectCreateResponse> {
        self.post(endpoints::OBJECT_CREATE, &req).await
    }
}
