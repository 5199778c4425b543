//! Built-in object kinds.
//!
//! Each kind turns its fields into a JSON payload and asks the registry to
//! create the object. Dependencies (an image's base, a function's image and
//! secrets) are loaded through the [`LoadContext`](crate::LoadContext)
//! before the payload is built.

mod dict;
mod function;
mod image;
mod queue;
mod secret;
mod volume;

pub use dict::Dict;
pub use function::Function;
pub use image::Image;
pub use queue::Queue;
pub use secret::Secret;
pub use volume::SharedVolume;

use bp_protocol::ObjectCreateRequest;
use bp_types::{ObjectId, ObjectKind};
use tracing::debug;

use crate::error::SessionResult;
use crate::load::LoadContext;

/// Send one `ObjectCreate` for the session's app.
pub(crate) async fn create_object(
    ctx: &LoadContext<'_>,
    kind: ObjectKind,
    label: &str,
    payload: serde_json::Value,
    existing_id: Option<&ObjectId>,
) -> SessionResult<ObjectId> {
    let client = ctx.client().clone();
    let request = ObjectCreateRequest {
        app_id: ctx.app_id().clone(),
        kind,
        label: label.to_string(),
        payload,
        existing_object_id: existing_id.cloned(),
    };
    let object_id = client.registry().object_create(request).await?.object_id;
    debug!(kind = %kind, label = %label, object_id = %object_id, "object_create");
    Ok(object_id)
}
