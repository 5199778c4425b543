use std::path::{Path, PathBuf};

use anyhow::Context;
use bp_server::ServerConfig;
use bp_session::ClientConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "BP_CONFIG";

/// Everything the `bp` binary can be configured with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Registry used when no `--registry` flag is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    pub client: ClientConfig,
    pub server: ServerConfig,
}

impl CliConfig {
    /// Load from `explicit`, else from `$BP_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bp_types::DeploymentNamespace;

    use super::*;

    #[test]
    fn sections_are_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "registry_url = \"http://10.0.0.2:7420\"\n\n[client]\nnamespace = \"global\"").unwrap();
        let config = CliConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.registry_url.as_deref(), Some("http://10.0.0.2:7420"));
        assert_eq!(config.client.namespace, DeploymentNamespace::Global);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn printed_config_parses_back() {
        let config = CliConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[server]"));
        assert_eq!(toml::from_str::<CliConfig>(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
