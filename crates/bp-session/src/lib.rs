//! Blueprint sessions.
//!
//! A [`Blueprint`] maps tags to object [`Definition`]s. A [`Session`]
//! binds a blueprint to one application on the registry and materializes
//! it: every definition is created exactly once, dependencies before
//! dependents, and the resulting tag → id map is registered in a single
//! call.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bp_registry::InMemoryRegistry;
//! use bp_session::objects::{Function, Image, Queue};
//! use bp_session::{Blueprint, Client, Definition, Reference, Session};
//!
//! # async fn run() -> bp_session::SessionResult<()> {
//! let client = Client::new(Arc::new(InMemoryRegistry::new()));
//! let blueprint = Blueprint::new()
//!     .with("image", Definition::new(Image::new("base").run_commands(["pip install httpx"])))?
//!     .with("jobs", Definition::new(Queue::new("jobs")))?
//!     .with("worker", Definition::new(Function::new("worker").with_image(Reference::local("image"))))?;
//!
//! let mut session = Session::init_new(blueprint, client, "example").await?;
//! session.create_all().await?;
//! println!("{:?}", session.object_ids());
//! session.disconnect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - [`Reference::Local`]: another tag of the same blueprint.
//! - [`Reference::Remote`]: a tag of an already deployed app, resolved by
//!   lookup.
//! - [`Reference::Deployed`]: deploys the embedded definition as its own
//!   app first, then resolves it by lookup.

pub mod blueprint;
pub mod client;
pub mod config;
pub mod container;
pub mod definition;
pub mod deploy;
pub mod error;
pub mod load;
pub mod node;
pub mod objects;
pub mod progress;
pub mod session;

#[cfg(test)]
mod testing;

pub use blueprint::Blueprint;
pub use client::{Client, ObjectHandle};
pub use config::ClientConfig;
pub use container::ContainerContext;
pub use definition::{Definition, ObjectDefinition, SessionBinding};
pub use deploy::{deploy, lookup, Deployment};
pub use error::{SessionError, SessionResult};
pub use load::{BoxFuture, LoadContext};
pub use node::{Node, Reference};
pub use progress::{ProgressEvent, ProgressReporter, RecordingProgress, TracingProgress};
pub use session::{Session, SessionMode};
