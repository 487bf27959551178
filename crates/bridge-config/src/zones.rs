//! Typed settings for each zone, deserialized from a validated [`ZoneConfig`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use bridge_core::logging::REDACTED;
use bridge_core::{DeploymentEnv, Result, Zone};

use crate::env::EnvProvider;
use crate::loader::load_config_with_env;
use crate::record::ZoneConfig;

/// A zone's typed settings.
pub trait ZoneSettings: DeserializeOwned {
    const ZONE: Zone;

    /// Base name of the zone's primary stack.
    fn base_stack_name(&self) -> &str;

    fn deployment_env(&self) -> DeploymentEnv;

    /// Deployed name of the zone's primary stack.
    fn stack_name(&self) -> String {
        self.deployment_env().stack_name(self.base_stack_name())
    }

    fn from_config(config: &ZoneConfig) -> Result<Self> {
        config.typed()
    }
}

/// Load and deserialize a zone's settings in one step.
pub fn load_zone<T: ZoneSettings>(
    env: DeploymentEnv,
    config_dir: Option<&Path>,
    vars: &dyn EnvProvider,
) -> Result<T> {
    let config = load_config_with_env(T::ZONE, env, config_dir, vars)?;
    T::from_config(&config)
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| REDACTED)
}

// ── Verification ───────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationConfig {
    pub aws_region: String,
    pub bedrock_model_id: String,
    pub deployment_env: DeploymentEnv,
    pub verification_stack_name: String,
    /// Stack the verification agent calls into.
    pub execution_stack_name: String,
    pub verification_account_id: String,
    pub execution_account_id: String,
    #[serde(default)]
    pub slack_bot_token: Option<String>,
    #[serde(default)]
    pub slack_signing_secret: Option<String>,
    #[serde(default)]
    pub verification_agent_name: Option<String>,
    #[serde(default)]
    pub execution_agent_arn: Option<String>,
    /// Agent id → AgentCore runtime ARN for every agent the verifier may route to.
    #[serde(default)]
    pub execution_agent_arns: BTreeMap<String, String>,
}

impl VerificationConfig {
    pub fn execution_stack(&self) -> String {
        self.deployment_env.stack_name(&self.execution_stack_name)
    }

    /// Whether the execution zone lives in a different account.
    pub fn is_cross_account(&self) -> bool {
        self.verification_account_id != self.execution_account_id
    }
}

impl ZoneSettings for VerificationConfig {
    const ZONE: Zone = Zone::Verification;

    fn base_stack_name(&self) -> &str {
        &self.verification_stack_name
    }

    fn deployment_env(&self) -> DeploymentEnv {
        self.deployment_env
    }
}

impl fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("aws_region", &self.aws_region)
            .field("bedrock_model_id", &self.bedrock_model_id)
            .field("deployment_env", &self.deployment_env)
            .field("verification_stack_name", &self.verification_stack_name)
            .field("execution_stack_name", &self.execution_stack_name)
            .field("verification_account_id", &self.verification_account_id)
            .field("execution_account_id", &self.execution_account_id)
            .field("slack_bot_token", &redact(&self.slack_bot_token))
            .field("slack_signing_secret", &redact(&self.slack_signing_secret))
            .field("verification_agent_name", &self.verification_agent_name)
            .field("execution_agent_arn", &self.execution_agent_arn)
            .field("execution_agent_arns", &self.execution_agent_arns)
            .finish()
    }
}

// ── Execution ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionConfig {
    pub aws_region: String,
    pub bedrock_model_id: String,
    pub deployment_env: DeploymentEnv,
    pub execution_stack_name: String,
    /// Account allowed to invoke the execution agent.
    pub verification_account_id: String,
    pub execution_account_id: String,
    #[serde(default)]
    pub execution_agent_name: Option<String>,
    #[serde(default)]
    pub verification_agent_arn: Option<String>,
}

impl ZoneSettings for ExecutionConfig {
    const ZONE: Zone = Zone::Execution;

    fn base_stack_name(&self) -> &str {
        &self.execution_stack_name
    }

    fn deployment_env(&self) -> DeploymentEnv {
        self.deployment_env
    }
}

// ── Docs ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsConfig {
    pub aws_region: String,
    pub bedrock_model_id: String,
    pub deployment_env: DeploymentEnv,
    pub docs_stack_name: String,
    pub verification_account_id: String,
    pub execution_account_id: String,
    #[serde(default)]
    pub docs_agent_name: Option<String>,
}

impl ZoneSettings for DocsConfig {
    const ZONE: Zone = Zone::Docs;

    fn base_stack_name(&self) -> &str {
        &self.docs_stack_name
    }

    fn deployment_env(&self) -> DeploymentEnv {
        self.deployment_env
    }
}

// ── Web fetch ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebFetchConfig {
    pub aws_region: String,
    pub bedrock_model_id: String,
    pub deployment_env: DeploymentEnv,
    pub web_fetch_stack_name: String,
    pub verification_account_id: String,
    pub execution_account_id: String,
    #[serde(default)]
    pub web_fetch_agent_name: Option<String>,
}

impl ZoneSettings for WebFetchConfig {
    const ZONE: Zone = Zone::WebFetch;

    fn base_stack_name(&self) -> &str {
        &self.web_fetch_stack_name
    }

    fn deployment_env(&self) -> DeploymentEnv {
        self.deployment_env
    }
}

/// The setting naming each zone's primary stack.
pub fn primary_stack_field(zone: Zone) -> &'static str {
    match zone {
        Zone::Verification => "verificationStackName",
        Zone::Execution => "executionStackName",
        Zone::Docs => "docsStackName",
        Zone::WebFetch => "webFetchStackName",
    }
}
