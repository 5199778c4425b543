use std::sync::Arc;

use bp_registry::RemoteRegistry;
use bp_types::{ClientId, DeploymentNamespace};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{SessionError, SessionResult};

/// Client-side defaults for sessions and deployments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Description given to apps created with [`Session::init_new`](crate::Session::init_new).
    pub description: String,
    /// Namespace used for deployments and cross-app lookups.
    pub namespace: DeploymentNamespace,
    /// Fixed client identity; a fresh one is generated when unset.
    pub client_id: Option<ClientId>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            description: "blueprint app".to_string(),
            namespace: DeploymentNamespace::Account,
            client_id: None,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> SessionResult<Self> {
        toml::from_str(s).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Connect to `registry` with this configuration's client identity.
    pub fn client(&self, registry: Arc<dyn RemoteRegistry>) -> Client {
        match &self.client_id {
            Some(client_id) => Client::with_client_id(registry, client_id.clone()),
            None => Client::new(registry),
        }
    }
}

#[cfg(test)]
mod tests {
    use bp_registry::InMemoryRegistry;

    use super::*;

    #[test]
    fn default_config() {
        let c = ClientConfig::default();
        assert_eq!(c.namespace, DeploymentNamespace::Account);
        assert!(c.client_id.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ClientConfig::from_toml_str("namespace = \"global\"\nclient_id = \"cl-fixed\"\n").unwrap();
        assert_eq!(c.namespace, DeploymentNamespace::Global);
        assert_eq!(c.client_id.as_ref().map(ClientId::as_str), Some("cl-fixed"));
        assert_eq!(c.description, ClientConfig::default().description);

        let client = c.client(Arc::new(InMemoryRegistry::new()));
        assert_eq!(client.client_id().as_str(), "cl-fixed");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = ClientConfig::from_toml_str("namespace = \"sideways\"").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
        let err = ClientConfig::from_toml_str("client_id = \"has space\"").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }
}
