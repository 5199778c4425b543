//! Wire protocol for the blueprint registry.
//!
//! Defines the request/response documents exchanged between sessions and
//! the registry, the HTTP endpoint paths that carry them, and the error
//! body returned on failure.

pub mod endpoint;
pub mod error;
pub mod message;

pub use endpoint::{endpoints, HealthResponse};
pub use error::{ErrorBody, ErrorCode};
pub use message::{
    AppClientDisconnectRequest, AppCreateRequest, AppCreateResponse, AppDeployRequest,
    AppGetByDeploymentNameRequest, AppGetByDeploymentNameResponse, AppGetObjectsRequest,
    AppGetObjectsResponse, AppLookupObjectRequest, AppLookupObjectResponse, AppSetObjectsRequest,
    Empty, ObjectCreateRequest, ObjectCreateResponse, RegistryCall, PROTOCOL_VERSION,
};
