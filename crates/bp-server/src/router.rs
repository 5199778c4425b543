use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use bp_protocol::endpoints;
use bp_registry::RemoteRegistry;
use tower_http::trace::TraceLayer;

use crate::handler::{self, ServerState};

/// Build the axum router with every registry endpoint.
pub fn build_router(registry: Arc<dyn RemoteRegistry>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::APP_CREATE, post(handler::app_create))
        .route(endpoints::APP_GET_OBJECTS, post(handler::app_get_objects))
        .route(endpoints::APP_SET_OBJECTS, post(handler::app_set_objects))
        .route(endpoints::APP_CLIENT_DISCONNECT, post(handler::app_client_disconnect))
        .route(endpoints::APP_LOOKUP_OBJECT, post(handler::app_lookup_object))
        .route(endpoints::APP_GET_BY_DEPLOYMENT_NAME, post(handler::app_get_by_deployment_name))
        .route(endpoints::APP_DEPLOY, post(handler::app_deploy))
        .route(endpoints::OBJECT_CREATE, post(handler::object_create))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { registry })
}
