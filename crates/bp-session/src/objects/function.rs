use std::sync::RwLock;

use async_trait::async_trait;
use bp_types::{AppId, ObjectId, ObjectKind};
use serde_json::json;
use tracing::debug;

use super::create_object;
use crate::definition::SessionBinding;
use crate::error::SessionResult;
use crate::load::LoadContext;
use crate::node::Node;
use crate::ObjectDefinition;

/// A serverless function running in an image, with access to secrets.
///
/// Once its app is registered the function is bound to that session, so
/// later invocations know which app and object to address.
#[derive(Debug)]
pub struct Function {
    name: String,
    image: Option<Node>,
    secrets: Vec<Node>,
    binding: RwLock<Option<SessionBinding>>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            secrets: Vec::new(),
            binding: RwLock::new(None),
        }
    }

    pub fn with_image(mut self, image: impl Into<Node>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<Node>) -> Self {
        self.secrets.push(secret.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The session this function was registered in, if any.
    pub fn binding(&self) -> Option<SessionBinding> {
        self.binding.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn bound_app_id(&self) -> Option<AppId> {
        self.binding().map(|b| b.app_id)
    }
}

#[async_trait]
impl ObjectDefinition for Function {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Function
    }

    fn creating_message(&self) -> Option<String> {
        Some(format!("Creating function {}...", self.name))
    }

    fn created_message(&self) -> Option<String> {
        Some(format!("Created function {}.", self.name))
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        let image_id = match &self.image {
            Some(image) => Some(ctx.load(image).await?),
            None => None,
        };
        let mut secret_ids = Vec::with_capacity(self.secrets.len());
        for secret in &self.secrets {
            secret_ids.push(ctx.load(secret).await?);
        }

        let payload = json!({
            "function_name": self.name,
            "image_id": image_id,
            "secret_ids": secret_ids,
        });
        create_object(ctx, ObjectKind::Function, &self.name, payload, existing_id).await
    }

    fn bind(&self, binding: &SessionBinding) {
        debug!(function = %self.name, app_id = %binding.app_id, "bound to session");
        *self.binding.write().unwrap_or_else(|e| e.into_inner()) = Some(binding.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bp_registry::InMemoryRegistry;

    use super::*;
    use crate::objects::{Image, Secret};
    use crate::{Blueprint, Client, Definition, Reference, Session};

    #[tokio::test]
    async fn payload_carries_dependency_ids() {
        let registry = Arc::new(InMemoryRegistry::new());
        let blueprint = Blueprint::new()
            .with("image", Definition::new(Image::new("image").run_commands(["pip install requests"])))
            .unwrap()
            .with("token", Definition::new(Secret::new("token").with_env("TOKEN", "t")))
            .unwrap()
            .with(
                "fetch",
                Definition::new(
                    Function::new("fetch")
                        .with_image(Reference::local("image"))
                        .with_secret(Reference::local("token")),
                ),
            )
            .unwrap();
        let mut session = Session::init_new(blueprint, Client::new(registry.clone()), "fn").await.unwrap();
        session.create_all().await.unwrap();

        let stored = registry.object(session.get("fetch").unwrap().object_id()).unwrap();
        assert_eq!(stored.object_id.as_str(), "fu-1");
        assert_eq!(stored.payload["function_name"], "fetch");
        assert_eq!(stored.payload["image_id"], session.get("image").unwrap().object_id().as_str());
        assert_eq!(stored.payload["secret_ids"][0], session.get("token").unwrap().object_id().as_str());
    }

    #[test]
    fn unbound_until_registered() {
        let f = Function::new("f");
        assert!(f.binding().is_none());
        assert!(f.bound_app_id().is_none());
    }
}
