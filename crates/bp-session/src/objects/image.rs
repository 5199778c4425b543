use async_trait::async_trait;
use bp_types::{ObjectId, ObjectKind};
use serde_json::json;

use super::create_object;
use crate::error::SessionResult;
use crate::load::LoadContext;
use crate::node::Node;
use crate::ObjectDefinition;

/// A container image: build commands layered on an optional base image.
///
/// Images are content-addressed; changing the commands (or the base)
/// yields a new id on the next deploy.
#[derive(Clone, Debug)]
pub struct Image {
    label: String,
    commands: Vec<String>,
    base: Option<Node>,
}

impl Image {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
            base: None,
        }
    }

    /// A new layer on top of `base`.
    pub fn layered(label: impl Into<String>, base: impl Into<Node>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::new(label)
        }
    }

    pub fn run_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

#[async_trait]
impl ObjectDefinition for Image {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Image
    }

    fn creating_message(&self) -> Option<String> {
        Some(format!("Building image {}...", self.label))
    }

    fn created_message(&self) -> Option<String> {
        Some(format!("Built image {}.", self.label))
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        let base_image_id = match &self.base {
            Some(base) => Some(ctx.load(base).await?),
            None => None,
        };
        let payload = json!({
            "base_image_id": base_image_id,
            "commands": self.commands,
        });
        create_object(ctx, ObjectKind::Image, &self.label, payload, existing_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bp_registry::InMemoryRegistry;

    use super::*;
    use crate::{Blueprint, Client, Definition, Reference, Session};

    async fn build(blueprint: Blueprint) -> (Arc<InMemoryRegistry>, Session) {
        let registry = Arc::new(InMemoryRegistry::new());
        let mut session = Session::init_new(blueprint, Client::new(registry.clone()), "images")
            .await
            .unwrap();
        session.create_all().await.unwrap();
        (registry, session)
    }

    #[tokio::test]
    async fn layered_image_builds_base_first() {
        let blueprint = Blueprint::new()
            .with("base", Definition::new(Image::new("base").run_commands(["apt-get update"])))
            .unwrap()
            .with("app", Definition::new(Image::layered("app", Reference::local("base")).run_commands(["pip install ."])))
            .unwrap();
        let (registry, session) = build(blueprint).await;

        let base = session.get("base").unwrap().object_id();
        let app = registry.object(session.get("app").unwrap().object_id()).unwrap();
        assert_eq!(app.payload["base_image_id"], base.as_str());
        assert_eq!(app.kind, ObjectKind::Image);
        assert_eq!(registry.call_count("ObjectCreate"), 2);
    }

    #[tokio::test]
    async fn identical_images_share_an_id() {
        let blueprint = Blueprint::new()
            .with("one", Definition::new(Image::new("one").run_commands(["echo hi"])))
            .unwrap()
            .with("two", Definition::new(Image::new("two").run_commands(["echo hi"])))
            .unwrap()
            .with("three", Definition::new(Image::new("three").run_commands(["echo bye"])))
            .unwrap();
        let (_registry, session) = build(blueprint).await;

        let id = |tag| session.get(tag).unwrap().object_id().clone();
        assert_eq!(id("one"), id("two"));
        assert_ne!(id("one"), id("three"));
        assert!(id("one").is_content_addressed());
    }
}
