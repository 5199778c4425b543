//! Foundation types for the blueprint runtime.
//!
//! Every other `bp-*` crate depends on `bp-types`. The types here carry no
//! remote ties: they only describe identities and names.
//!
//! # Key Types
//!
//! - [`ObjectId`]: server-assigned object identity (`"<prefix>-<rest>"`)
//! - [`ObjectKind`]: the object kind named by an id prefix
//! - [`LocalUuid`]: process-local identity of a definition instance
//! - [`AppId`], [`TaskId`], [`ClientId`]: session identities
//! - [`DeploymentNamespace`]: scope in which deployed app names resolve

pub mod error;
pub mod identity;
pub mod namespace;
pub mod object;
pub mod tag;

pub use error::TypeError;
pub use identity::{AppId, ClientId, LocalUuid, TaskId};
pub use namespace::DeploymentNamespace;
pub use object::{ObjectId, ObjectKind};
pub use tag::{validate_app_name, validate_tag};
