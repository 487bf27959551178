use std::collections::HashMap;

use bridge_core::{DEPLOYMENT_ENV_VAR, DeploymentEnv};

/// Source of environment variables consulted by the loader.
pub trait EnvProvider {
    fn var(&self, name: &str) -> Option<String>;

    /// Trimmed value, or `None` when unset or blank.
    fn non_blank(&self, name: &str) -> Option<String> {
        self.var(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvProvider for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Resolve the deployment environment: explicit value > `DEPLOYMENT_ENV` > `dev`.
pub fn resolve_deployment_env(
    explicit: Option<&str>,
    env: &dyn EnvProvider,
) -> bridge_core::Result<DeploymentEnv> {
    if let Some(v) = explicit.map(str::trim).filter(|v| !v.is_empty()) {
        return v.parse();
    }
    match env.non_blank(DEPLOYMENT_ENV_VAR) {
        Some(v) => v.parse(),
        None => Ok(DeploymentEnv::Dev),
    }
}
