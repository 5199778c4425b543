//! Definitions used only by this crate's tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bp_types::{ObjectId, ObjectKind};
use serde_json::json;

use crate::error::SessionResult;
use crate::load::LoadContext;
use crate::node::Node;
use crate::objects::create_object;
use crate::ObjectDefinition;

/// A dict whose payload lists the ids of its dependencies, in order.
#[derive(Debug)]
pub(crate) struct Composite {
    label: String,
    deps: Vec<Node>,
}

impl Composite {
    pub(crate) fn new(label: &str, deps: Vec<Node>) -> Self {
        Self {
            label: label.to_string(),
            deps,
        }
    }
}

#[async_trait]
impl ObjectDefinition for Composite {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Dict
    }

    async fn create(&self, ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        let mut deps = Vec::new();
        for dep in &self.deps {
            deps.push(ctx.load(dep).await?);
        }
        create_object(ctx, ObjectKind::Dict, &self.label, json!({ "deps": deps }), existing_id).await
    }
}

/// Returns a fixed id without talking to the registry, recording the
/// existing ids it was offered.
#[derive(Debug)]
pub(crate) struct FixedId {
    kind: ObjectKind,
    id: ObjectId,
    seen: Mutex<Vec<Option<ObjectId>>>,
}

impl FixedId {
    pub(crate) fn new(kind: ObjectKind, id: &str) -> Self {
        Self {
            kind,
            id: ObjectId::parse(id).unwrap(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn seen_existing_ids(&self) -> Vec<Option<ObjectId>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectDefinition for FixedId {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    async fn create(&self, _ctx: &mut LoadContext<'_>, existing_id: Option<&ObjectId>) -> SessionResult<ObjectId> {
        self.seen.lock().unwrap().push(existing_id.cloned());
        Ok(self.id.clone())
    }
}
