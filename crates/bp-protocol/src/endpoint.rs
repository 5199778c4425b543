/// HTTP endpoint paths for the registry protocol.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
    pub const APP_CREATE: &str = "/v1/app/create";
    pub const APP_GET_OBJECTS: &str = "/v1/app/get_objects";
    pub const APP_SET_OBJECTS: &str = "/v1/app/set_objects";
    pub const APP_CLIENT_DISCONNECT: &str = "/v1/app/client_disconnect";
    pub const APP_LOOKUP_OBJECT: &str = "/v1/app/lookup_object";
    pub const APP_GET_BY_DEPLOYMENT_NAME: &str = "/v1/app/get_by_deployment_name";
    pub const APP_DEPLOY: &str = "/v1/app/deploy";
    pub const OBJECT_CREATE: &str = "/v1/object/create";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.protocol_version, 1);
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::HEALTH, "/v1/health");
        assert_eq!(endpoints::APP_SET_OBJECTS, "/v1/app/set_objects");
        assert_eq!(endpoints::OBJECT_CREATE, "/v1/object/create");
    }
}
