//! Publishing blueprints under a name and resolving published objects.

use std::collections::BTreeMap;

use bp_protocol::{AppDeployRequest, AppGetByDeploymentNameRequest, AppLookupObjectRequest};
use bp_types::{validate_app_name, AppId, DeploymentNamespace, ObjectId};
use tracing::{info, warn};

use crate::blueprint::Blueprint;
use crate::client::{Client, ObjectHandle};
use crate::error::{SessionError, SessionResult};
use crate::session::Session;

/// The result of a successful [`deploy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub app_id: AppId,
    pub name: String,
    pub namespace: DeploymentNamespace,
    pub object_ids: BTreeMap<String, ObjectId>,
}

/// Resolve `tag` in the app deployed as `app_name`. Without a tag, the app
/// must hold exactly one object.
pub async fn lookup(
    client: &Client,
    app_name: &str,
    tag: Option<&str>,
    namespace: DeploymentNamespace,
) -> SessionResult<ObjectHandle> {
    let object_id = lookup_to_id(client, app_name, tag, namespace).await?;
    Ok(ObjectHandle::new(object_id, client.clone()))
}

pub(crate) async fn lookup_to_id(
    client: &Client,
    app_name: &str,
    tag: Option<&str>,
    namespace: DeploymentNamespace,
) -> SessionResult<ObjectId> {
    let response = client
        .registry()
        .app_lookup_object(AppLookupObjectRequest {
            app_name: app_name.to_string(),
            object_tag: tag.map(str::to_string),
            namespace,
        })
        .await?;

    match (response.object_id, response.error_message) {
        (Some(object_id), _) => Ok(object_id),
        (None, Some(message)) => Err(SessionError::NotFound(message)),
        (None, None) => Err(SessionError::NotFound(format!(
            "{app_name}/{}",
            tag.unwrap_or("<default>")
        ))),
    }
}

/// Materialize `blueprint` and publish it as `name`.
///
/// Redeploying an existing name reuses that app, so object ids stay
/// stable. The deploy session is always disconnected afterwards; the
/// deployed app keeps running on the registry.
pub async fn deploy(
    client: &Client,
    blueprint: Blueprint,
    name: &str,
    namespace: DeploymentNamespace,
) -> SessionResult<Deployment> {
    validate_app_name(name)?;

    let existing = client
        .registry()
        .app_get_by_deployment_name(AppGetByDeploymentNameRequest {
            name: name.to_string(),
            namespace,
        })
        .await?
        .app_id;

    let mut session = match existing {
        Some(app_id) => {
            info!(name = %name, app_id = %app_id, "redeploying");
            Session::init_existing(blueprint, client.clone(), app_id).await?
        }
        None => Session::init_new(blueprint, client.clone(), name).await?,
    };

    let published = publish(&mut session, name, namespace).await;
    if let Err(err) = session.disconnect().await {
        warn!(name = %name, error = %err, "failed to disconnect deploy session");
    }
    published
}

async fn publish(
    session: &mut Session,
    name: &str,
    namespace: DeploymentNamespace,
) -> SessionResult<Deployment> {
    session.create_all().await?;
    session
        .client()
        .registry()
        .app_deploy(AppDeployRequest {
            app_id: session.app_id().clone(),
            name: name.to_string(),
            namespace,
        })
        .await?;
    info!(name = %name, app_id = %session.app_id(), namespace = %namespace, "deployed");

    Ok(Deployment {
        app_id: session.app_id().clone(),
        name: name.to_string(),
        namespace,
        object_ids: session.object_ids(),
    })
}
