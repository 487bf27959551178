use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{DeploymentEnv, Zone};

/// Value of the `Project` tag on every resource.
pub const PROJECT_NAME: &str = "slack-bedrock-bridge";

/// Value of the `ManagedBy` tag on every resource.
pub const MANAGED_BY: &str = "cdk";

/// Anything that carries key/value resource tags.
pub trait Taggable {
    fn set_tag(&mut self, key: &str, value: &str);
    fn tags(&self) -> &BTreeMap<String, String>;
}

/// A declared cloud resource (Lambda function, table, runtime, repository, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDeclaration {
    pub logical_id: String,
    /// Provider type name, e.g. `AWS::DynamoDB::Table`.
    pub resource_type: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl ResourceDeclaration {
    pub fn new(logical_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            tags: BTreeMap::new(),
        }
    }
}

impl Taggable for ResourceDeclaration {
    fn set_tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}

/// The fixed tag set written onto every resource of a zone stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardTags {
    pub zone: Zone,
    pub env: DeploymentEnv,
    /// Full (suffixed) stack name.
    pub stack_name: String,
}

impl StandardTags {
    pub fn new(zone: Zone, env: DeploymentEnv, stack_name: impl Into<String>) -> Self {
        Self {
            zone,
            env,
            stack_name: stack_name.into(),
        }
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Project", PROJECT_NAME.to_string()),
            ("Zone", self.zone.as_str().to_string()),
            ("Environment", self.env.as_str().to_string()),
            ("ManagedBy", MANAGED_BY.to_string()),
            ("StackName", self.stack_name.clone()),
        ]
    }
}

/// Write the standard tags onto `target`. Tags under other keys are left alone.
pub fn apply_standard_tags<T: Taggable + ?Sized>(target: &mut T, tags: &StandardTags) {
    for (key, value) in tags.pairs() {
        target.set_tag(key, &value);
    }
}
