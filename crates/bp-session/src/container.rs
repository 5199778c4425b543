//! Worker-side bootstrap.
//!
//! A worker process attaches to an app that a client already
//! materialized. [`ContainerContext::bootstrap`] builds that attachment
//! once; the caller owns it and passes it to whatever runs user code.

use bp_types::{AppId, TaskId};

use crate::blueprint::Blueprint;
use crate::client::{Client, ObjectHandle};
use crate::error::SessionResult;
use crate::session::Session;

/// The session of a worker process, plus the task it serves.
#[derive(Debug)]
pub struct ContainerContext {
    session: Session,
    task_id: TaskId,
}

impl ContainerContext {
    pub async fn bootstrap(
        blueprint: Blueprint,
        client: Client,
        app_id: AppId,
        task_id: TaskId,
    ) -> SessionResult<Self> {
        let session = Session::init_container(blueprint, client, app_id, task_id.clone()).await?;
        Ok(Self { session, task_id })
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn app_id(&self) -> &AppId {
        self.session.app_id()
    }

    /// A registered object of the running app.
    pub fn object(&self, tag: &str) -> Option<&ObjectHandle> {
        self.session.get(tag)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// End the worker's session.
    pub async fn shutdown(mut self) -> SessionResult<()> {
        self.session.disconnect().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bp_registry::InMemoryRegistry;

    use super::*;
    use crate::definition::Definition;
    use crate::objects::Queue;

    #[tokio::test]
    async fn bootstrap_exposes_registered_objects() {
        let registry = Arc::new(InMemoryRegistry::new());
        let client = Client::new(registry.clone());
        let blueprint = || Blueprint::new().with("jobs", Definition::new(Queue::new("jobs"))).unwrap();

        let mut app = Session::init_new(blueprint(), client.clone(), "app").await.unwrap();
        app.create_all().await.unwrap();
        let task_id = TaskId::parse("ta-7").unwrap();
        registry.register_task(app.app_id(), task_id.clone()).unwrap();

        let ctx = ContainerContext::bootstrap(blueprint(), client, app.app_id().clone(), task_id)
            .await
            .unwrap();
        assert_eq!(ctx.task_id().as_str(), "ta-7");
        assert_eq!(ctx.app_id(), app.app_id());
        assert_eq!(ctx.object("jobs").map(ObjectHandle::object_id), app.get("jobs").map(ObjectHandle::object_id));
        assert!(ctx.session().is_container());

        ctx.shutdown().await.unwrap();
        assert_eq!(registry.call_count("AppClientDisconnect"), 1);
    }

    #[tokio::test]
    async fn bootstrap_with_unknown_task_fails() {
        let registry = Arc::new(InMemoryRegistry::new());
        let client = Client::new(registry.clone());
        let app = Session::init_new(Blueprint::new(), client.clone(), "app").await.unwrap();
        let result = ContainerContext::bootstrap(
            Blueprint::new(),
            client,
            app.app_id().clone(),
            TaskId::parse("ta-unknown").unwrap(),
        )
        .await;
        assert!(result.is_err());
    }
}
