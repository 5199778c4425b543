use async_trait::async_trait;
use bp_types::{ObjectId, ObjectKind};
use serde_json::json;

use super::create_object;
use crate::error::SessionResult;
use crate::load::LoadContext;
use crate::ObjectDefinition;

/// A distributed FIFO queue. Has no dependencies.
#[derive(Clone, Debug)]
pub struct Queue {
    label: String,
}

impl Queue {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl ObjectDefinition for Queue {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Queue
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        create_object(ctx, ObjectKind::Queue, &self.label, json!({}), existing_id).await
    }
}
