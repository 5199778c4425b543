//! Remote registry interface for the blueprint runtime.
//!
//! The registry is the server-side authority that allocates application
//! ids, creates objects, stores each application's tag → id map, and
//! resolves deployed names. Sessions talk to it only through the
//! [`RemoteRegistry`] trait.
//!
//! # Backends
//!
//! - [`InMemoryRegistry`]: `HashMap`-based registry for tests, embedding,
//!   and the HTTP service. Keeps a journal of every call it receives.
//! - [`HttpRegistry`]: client for a registry served over HTTP.

pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::{RegistryError, RegistryResult};
pub use http::HttpRegistry;
pub use memory::{AppState, InMemoryRegistry, StoredObject};
pub use traits::RemoteRegistry;
