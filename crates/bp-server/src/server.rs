use std::future::Future;
use std::sync::Arc;

use bp_registry::{InMemoryRegistry, RemoteRegistry};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Registry HTTP service.
pub struct RegistryServer {
    config: ServerConfig,
    registry: Arc<dyn RemoteRegistry>,
}

impl RegistryServer {
    pub fn new(config: ServerConfig, registry: Arc<dyn RemoteRegistry>) -> Self {
        Self { config, registry }
    }

    /// A server backed by a fresh [`InMemoryRegistry`].
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(InMemoryRegistry::new()))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.registry), self.config.max_body_bytes)
    }

    /// Bind `config.bind_addr` and serve until the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener, std::future::pending()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        tracing::info!("registry listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
