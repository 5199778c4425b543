use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Scope in which deployed application names are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentNamespace {
    /// Names visible only within the deploying account.
    #[default]
    Account,
    /// Names visible to every account.
    Global,
}

impl fmt::Display for DeploymentNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => f.write_str("account"),
            Self::Global => f.write_str("global"),
        }
    }
}

impl FromStr for DeploymentNamespace {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(Self::Account),
            "global" => Ok(Self::Global),
            other => Err(TypeError::UnknownNamespace(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_account() {
        assert_eq!(DeploymentNamespace::default(), DeploymentNamespace::Account);
    }

    #[test]
    fn parse_and_display() {
        for ns in [DeploymentNamespace::Account, DeploymentNamespace::Global] {
            assert_eq!(ns.to_string().parse::<DeploymentNamespace>().unwrap(), ns);
        }
        assert!("team".parse::<DeploymentNamespace>().is_err());
    }
}
