use std::collections::BTreeMap;

use async_trait::async_trait;
use bp_types::{ObjectId, ObjectKind};
use serde_json::json;

use super::create_object;
use crate::error::SessionResult;
use crate::load::LoadContext;
use crate::ObjectDefinition;

/// Environment variables injected into functions that use the secret.
#[derive(Clone)]
pub struct Secret {
    label: String,
    env: BTreeMap<String, String>,
}

impl Secret {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            env: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Variable names, without their values.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.env.keys().map(String::as_str)
    }
}

// Values stay out of logs.
impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("label", &self.label)
            .field("keys", &self.env.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl ObjectDefinition for Secret {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Secret
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        create_object(ctx, ObjectKind::Secret, &self.label, json!({ "env": self.env }), existing_id).await
    }
}
