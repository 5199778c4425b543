//! The materializer: turns a [`Node`] into an [`ObjectId`], depth-first and
//! at most once per [`LocalUuid`](bp_types::LocalUuid) per session.
//!
//! # Algorithm
//!
//! 1. Memoized nodes return their cached id with no remote call.
//! 2. References resolve by variant: deploy-then-lookup, lookup, or the
//!    same-app tag (via `tag_to_object`, else by loading the tag's
//!    definition with its previously deployed id as a hint).
//! 3. Definitions run their own creation logic, which re-enters `load`
//!    through [`LoadContext`] for every dependency first.
//! 4. A produced id that differs from the previously deployed one is an
//!    error unless the object is content-addressed.
//! 5. The id is cached under the node's local uuid.
//!
//! There is no topological pre-sort: order emerges from the recursion.
//! Cycles are a caller bug and recurse without bound.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bp_types::{AppId, ObjectId};
use tracing::{debug, warn};

use crate::blueprint::Blueprint;
use crate::client::{Client, ObjectHandle};
use crate::deploy::{deploy, lookup_to_id};
use crate::error::{SessionError, SessionResult};
use crate::node::{Node, Reference};
use crate::session::Session;

/// A boxed, sendable future, as returned by the recursive [`Session::load`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability handed to [`ObjectDefinition::create`](crate::ObjectDefinition::create):
/// materialize nested dependencies and reach the registry.
pub struct LoadContext<'s> {
    session: &'s mut Session,
}

impl LoadContext<'_> {
    /// Materialize a dependency in the enclosing session and return its id.
    pub async fn load(&mut self, node: &Node) -> SessionResult<ObjectId> {
        self.session.load(node, None).await
    }

    /// The registry connection of the enclosing session.
    pub fn client(&self) -> &Client {
        self.session.client()
    }

    /// The application objects are created in.
    pub fn app_id(&self) -> &AppId {
        self.session.app_id()
    }
}

impl Session {
    /// Resolve `node` to an object id, creating it and its dependencies if
    /// needed.
    ///
    /// `existing_id` is the id the object had in a previous deployment.
    /// Failures leave already-cached ids in place.
    pub fn load<'a>(
        &'a mut self,
        node: &'a Node,
        existing_id: Option<ObjectId>,
    ) -> BoxFuture<'a, SessionResult<ObjectId>> {
        Box::pin(async move {
            self.ensure_connected()?;

            let local_uuid = node.local_uuid();
            if let Some(object_id) = self.local_uuid_to_object_id.get(&local_uuid) {
                return Ok(object_id.clone());
            }

            let object_id = match node {
                Node::Reference(reference) => self.resolve_reference(reference).await?,
                Node::Definition(definition) => {
                    // A blueprint definition reached inline, before its own
                    // tag, still owes that tag's previous id.
                    let owner = self.blueprint.tag_of(local_uuid).map(str::to_string);
                    let existing_id = existing_id.or_else(|| {
                        owner
                            .as_ref()
                            .and_then(|tag| self.tag_to_existing_id.get(tag).cloned())
                    });

                    let object = Arc::clone(definition.object());
                    let creating = object.creating_message();
                    if let (Some(progress), Some(message)) = (self.progress.as_mut(), &creating) {
                        progress.step_started(message);
                    }

                    let created = {
                        let mut ctx = LoadContext { session: &mut *self };
                        object.create(&mut ctx, existing_id.as_ref()).await
                    };

                    if let (Some(progress), Some(message)) = (self.progress.as_mut(), &creating) {
                        match &created {
                            Ok(_) => progress
                                .step_completed(&object.created_message().unwrap_or_else(|| message.clone())),
                            Err(_) => progress.step_failed(message),
                        }
                    }
                    let object_id = created?;
                    debug!(kind = %object.kind(), object_id = %object_id, "created object");

                    if let Some(existing) = existing_id.as_ref().filter(|e| **e != object_id) {
                        if object.is_content_addressed() || existing.is_content_addressed() {
                            warn!(
                                existing = %existing,
                                produced = %object_id,
                                "content-addressed object changed id"
                            );
                        } else {
                            return Err(SessionError::IdentityMismatch {
                                existing: existing.clone(),
                                produced: object_id,
                            });
                        }
                    }
                    if let Some(tag) = owner {
                        self.tag_to_object
                            .insert(tag, ObjectHandle::new(object_id.clone(), self.client.clone()));
                    }
                    object_id
                }
            };

            self.local_uuid_to_object_id.insert(local_uuid, object_id.clone());
            Ok(object_id)
        })
    }

    async fn resolve_reference(&mut self, reference: &Reference) -> SessionResult<ObjectId> {
        match reference {
            Reference::Deployed {
                app_name,
                tag,
                namespace,
                definition,
                ..
            } => {
                let blueprint = Blueprint::new().with(tag.clone(), definition.clone())?;
                deploy(&self.client, blueprint, app_name, *namespace).await?;
                lookup_to_id(&self.client, app_name, Some(tag), *namespace).await
            }
            Reference::Remote {
                app_name,
                tag,
                namespace,
                ..
            } => lookup_to_id(&self.client, app_name, Some(tag), *namespace).await,
            Reference::Local { tag, .. } => {
                if let Some(handle) = self.tag_to_object.get(tag) {
                    return Ok(handle.object_id().clone());
                }
                let definition = self
                    .blueprint
                    .get(tag)
                    .cloned()
                    .ok_or_else(|| SessionError::UnresolvedTag(tag.clone()))?;
                let existing_id = self.tag_to_existing_id.get(tag).cloned();

                let node = Node::Definition(definition);
                let object_id = self.load(&node, existing_id).await?;
                self.tag_to_object
                    .insert(tag.clone(), ObjectHandle::new(object_id.clone(), self.client.clone()));
                Ok(object_id)
            }
        }
    }
}
