use async_trait::async_trait;
use bp_types::{ObjectId, ObjectKind};
use serde_json::json;

use super::create_object;
use crate::error::SessionResult;
use crate::load::LoadContext;
use crate::ObjectDefinition;

/// A writable volume shared between function containers.
#[derive(Clone, Debug)]
pub struct SharedVolume {
    label: String,
}

impl SharedVolume {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

#[async_trait]
impl ObjectDefinition for SharedVolume {
    fn kind(&self) -> ObjectKind {
        ObjectKind::SharedVolume
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        create_object(ctx, ObjectKind::SharedVolume, &self.label, json!({}), existing_id).await
    }
}
