//! HTTP service for the blueprint registry.
//!
//! Exposes every [`RemoteRegistry`](bp_registry::RemoteRegistry) call as a
//! `POST` endpoint taking and returning the JSON documents of
//! `bp-protocol`. Failures are returned as an
//! [`ErrorBody`](bp_protocol::ErrorBody) with a matching status code.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::ServerState;
pub use server::RegistryServer;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use bp_protocol::{endpoints, AppCreateResponse, AppLookupObjectResponse, ErrorBody, ErrorCode};
    use bp_registry::{HttpRegistry, InMemoryRegistry};
    use bp_session::objects::Queue;
    use bp_session::{Blueprint, Client, Definition, Reference, Session};
    use bp_types::DeploymentNamespace;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;
    use tower::util::ServiceExt;

    use super::*;

    fn app() -> (Arc<InMemoryRegistry>, Router) {
        let registry = Arc::new(InMemoryRegistry::new());
        let router = router::build_router(registry.clone(), 64 * 1024);
        (registry, router)
    }

    async fn post(router: &Router, path: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (_, app) = app();
        let response = app
            .oneshot(Request::builder().uri("/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (_, app) = app();
        let response = app
            .oneshot(Request::builder().uri("/v1/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn create_app_and_object() {
        let (registry, app) = app();
        let (status, body) = post(
            &app,
            endpoints::APP_CREATE,
            json!({"client_id": "cl-test", "description": "demo"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: AppCreateResponse = serde_json::from_value(body).unwrap();

        let (status, body) = post(
            &app,
            endpoints::OBJECT_CREATE,
            json!({
                "app_id": created.app_id,
                "kind": "queue",
                "label": "jobs",
                "payload": {},
                "existing_object_id": null,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["object_id"], "qu-1");
        assert_eq!(registry.call_count("ObjectCreate"), 1);
    }

    #[tokio::test]
    async fn unknown_app_is_404_with_error_body() {
        let (_, app) = app();
        let (status, body) = post(&app, endpoints::APP_GET_OBJECTS, json!({"app_id": "ap-404"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: ErrorBody = serde_json::from_value(body).unwrap();
        assert_eq!(body.code, ErrorCode::AppNotFound);
        assert_eq!(body.message, "ap-404");
    }

    #[tokio::test]
    async fn lookup_miss_is_reported_in_body() {
        let (_, app) = app();
        let (status, body) = post(
            &app,
            endpoints::APP_LOOKUP_OBJECT,
            json!({"app_name": "nope", "object_tag": "q", "namespace": "account"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: AppLookupObjectResponse = serde_json::from_value(body).unwrap();
        assert!(body.object_id.is_none());
        assert!(body.error_message.is_some());
    }

    #[tokio::test]
    async fn malformed_request_is_rejected() {
        let (registry, app) = app();
        let (status, _) = post(&app, endpoints::APP_CREATE, json!({"description": 3})).await;
        assert!(status.is_client_error());
        assert!(registry.calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (_, app) = app();
        let (status, _) = post(
            &app,
            endpoints::APP_CREATE,
            json!({"client_id": "cl-x", "description": "x".repeat(128 * 1024)}),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn sessions_work_over_http() {
        let registry = Arc::new(InMemoryRegistry::new());
        let server = RegistryServer::new(ServerConfig::default(), registry.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_on(listener, async move {
            let _ = stopped.await;
        }));

        let client = Client::new(Arc::new(HttpRegistry::new(url).unwrap()));
        bp_session::deploy(
            &client,
            Blueprint::new().with("jobs", Definition::new(Queue::new("jobs"))).unwrap(),
            "shared-queue",
            DeploymentNamespace::Account,
        )
        .await
        .unwrap();

        let blueprint = Blueprint::new()
            .with("local", Definition::new(Queue::new("local")))
            .unwrap();
        let mut session = Session::init_new(blueprint, client.clone(), "over http").await.unwrap();
        session.create_all().await.unwrap();
        let remote = session
            .load(&Reference::remote("shared-queue", "jobs").into(), None)
            .await
            .unwrap();
        assert_eq!(remote.as_str(), "qu-1");
        assert_eq!(session.get("local").unwrap().object_id().as_str(), "qu-2");

        let missing = session
            .load(&Reference::remote("shared-queue", "nope").into(), None)
            .await
            .unwrap_err();
        assert!(matches!(missing, bp_session::SessionError::NotFound(_)));
        session.disconnect().await.unwrap();
        assert_eq!(registry.call_count("AppClientDisconnect"), 2);

        stop.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
