use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// Environment variable consulted when no deployment environment is given explicitly.
pub const DEPLOYMENT_ENV_VAR: &str = "DEPLOYMENT_ENV";

/// Base configuration file shared by every environment.
pub const BASE_CONFIG_FILE: &str = "cdk.config.json";

/// Untracked personal overrides.
pub const LOCAL_CONFIG_FILE: &str = "cdk.config.local.json";

/// Template operators copy when creating an environment file.
pub const EXAMPLE_CONFIG_FILE: &str = "cdk.config.json.example";

// ── Deployment environment ─────────────────────────────────────

/// Deployment environment a zone is synthesized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnv {
    Dev,
    Prod,
}

impl DeploymentEnv {
    pub const ALL: [DeploymentEnv; 2] = [DeploymentEnv::Dev, DeploymentEnv::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentEnv::Dev => "dev",
            DeploymentEnv::Prod => "prod",
        }
    }

    /// Suffix appended to base stack names.
    pub fn stack_suffix(&self) -> &'static str {
        match self {
            DeploymentEnv::Dev => "Dev",
            DeploymentEnv::Prod => "Prod",
        }
    }

    /// Full stack name for a base name, e.g. `SlackVerification` → `SlackVerification-Dev`.
    pub fn stack_name(&self, base: &str) -> String {
        format!("{}-{}", base, self.stack_suffix())
    }

    /// Name of the environment-specific (required) config file.
    pub fn config_file_name(&self) -> String {
        format!("cdk.config.{}.json", self.as_str())
    }

    /// Comma-separated list of accepted values, for remediation messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentEnv {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(DeploymentEnv::Dev),
            "prod" => Ok(DeploymentEnv::Prod),
            _ => Err(BridgeError::InvalidEnvironment(s.to_string())),
        }
    }
}

// ── Zones ──────────────────────────────────────────────────────

/// An independently deployable unit of the system, each with its own config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    /// Slack-facing Lambda and verification agent.
    Verification,
    /// Bedrock execution agent.
    Execution,
    /// Documentation search agent.
    Docs,
    /// Web fetch agent.
    WebFetch,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Verification, Zone::Execution, Zone::Docs, Zone::WebFetch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Verification => "verification",
            Zone::Execution => "execution",
            Zone::Docs => "docs",
            Zone::WebFetch => "web-fetch",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Zone::ALL
            .into_iter()
            .find(|z| z.as_str() == wanted)
            .ok_or_else(|| BridgeError::UnknownZone(s.to_string()))
    }
}
