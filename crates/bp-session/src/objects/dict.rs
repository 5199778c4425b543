use async_trait::async_trait;
use bp_types::{ObjectId, ObjectKind};
use serde_json::{json, Map, Value};

use super::create_object;
use crate::error::{SessionError, SessionResult};
use crate::load::LoadContext;
use crate::ObjectDefinition;

/// A distributed key/value map, optionally seeded with initial entries.
#[derive(Clone, Debug)]
pub struct Dict {
    label: String,
    data: Map<String, Value>,
}

impl Dict {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: Map::new(),
        }
    }

    /// Seed the dict from a JSON object.
    pub fn with_data(mut self, data: Value) -> SessionResult<Self> {
        match data {
            Value::Object(map) => {
                self.data.extend(map);
                Ok(self)
            }
            other => Err(SessionError::InvalidDefinition(format!(
                "dict {} expects a table of initial entries, got {other}",
                self.label
            ))),
        }
    }
}

#[async_trait]
impl ObjectDefinition for Dict {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Dict
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        create_object(ctx, ObjectKind::Dict, &self.label, json!({ "data": self.data }), existing_id).await
    }
}
