//! One handler per registry call. Each decodes its request document,
//! forwards it to the shared registry, and encodes the reply.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use bp_protocol::{
    AppClientDisconnectRequest, AppCreateRequest, AppCreateResponse, AppDeployRequest,
    AppGetByDeploymentNameRequest, AppGetByDeploymentNameResponse, AppGetObjectsRequest,
    AppGetObjectsResponse, AppLookupObjectRequest, AppLookupObjectResponse, AppSetObjectsRequest,
    Empty, HealthResponse, ObjectCreateRequest, ObjectCreateResponse,
};
use bp_registry::RemoteRegistry;
use serde_json::json;

use crate::error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub registry: Arc<dyn RemoteRegistry>,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "bp-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": bp_protocol::PROTOCOL_VERSION,
    }))
}

pub async fn app_create(
    State(state): State<ServerState>,
    Json(req): Json<AppCreateRequest>,
) -> ApiResult<AppCreateResponse> {
    Ok(Json(state.registry.app_create(req).await?))
}

pub async fn app_get_objects(
    State(state): State<ServerState>,
    Json(req): Json<AppGetObjectsRequest>,
) -> ApiResult<AppGetObjectsResponse> {
    Ok(Json(state.registry.app_get_objects(req).await?))
}

pub async fn app_set_objects(
    State(state): State<ServerState>,
    Json(req): Json<AppSetObjectsRequest>,
) -> ApiResult<Empty> {
    state.registry.app_set_objects(req).await?;
    Ok(Json(Empty {}))
}

pub async fn app_client_disconnect(
    State(state): State<ServerState>,
    Json(req): Json<AppClientDisconnectRequest>,
) -> ApiResult<Empty> {
    state.registry.app_client_disconnect(req).await?;
    Ok(Json(Empty {}))
}

pub async fn app_lookup_object(
    State(state): State<ServerState>,
    Json(req): Json<AppLookupObjectRequest>,
) -> ApiResult<AppLookupObjectResponse> {
    Ok(Json(state.registry.app_lookup_object(req).await?))
}

pub async fn app_get_by_deployment_name(
    State(state): State<ServerState>,
    Json(req): Json<AppGetByDeploymentNameRequest>,
) -> ApiResult<AppGetByDeploymentNameResponse> {
    Ok(Json(state.registry.app_get_by_deployment_name(req).await?))
}

pub async fn app_deploy(
    State(state): State<ServerState>,
    Json(req): Json<AppDeployRequest>,
) -> ApiResult<Empty> {
    state.registry.app_deploy(req).await?;
    Ok(Json(Empty {}))
}

pub async fn object_create(
    State(state): State<ServerState>,
    Json(req): Json<ObjectCreateRequest>,
) -> ApiResult<ObjectCreateResponse> {
    Ok(Json(state.registry.object_create(req).await?))
}
