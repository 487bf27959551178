use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use bridge_core::logging::REDACTED;
use bridge_core::{DeploymentEnv, Result, StandardTags, Zone};

use crate::schema::{DEPLOYMENT_ENV_KEY, FieldSpec};

/// A validated configuration record for one zone and environment.
///
/// Built fresh by every load and never mutated afterwards.
#[derive(Clone, PartialEq)]
pub struct ZoneConfig {
    zone: Zone,
    deployment_env: DeploymentEnv,
    values: Map<String, Value>,
    fields: &'static [FieldSpec],
}

impl ZoneConfig {
    pub(crate) fn new(
        zone: Zone,
        deployment_env: DeploymentEnv,
        values: Map<String, Value>,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            zone,
            deployment_env,
            values,
            fields,
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn deployment_env(&self) -> DeploymentEnv {
        self.deployment_env
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// String setting, `None` when absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// String setting with a caller-supplied default for optional fields.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Mapping setting (e.g. agent id → ARN), `None` when absent.
    pub fn get_map(&self, name: &str) -> Option<BTreeMap<String, String>> {
        self.values.get(name).and_then(Value::as_object).map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
    }

    /// Deployed stack name for a `*StackName` setting, with the environment suffix.
    pub fn stack_name(&self, field: &str) -> Option<String> {
        self.get(field).map(|base| self.deployment_env.stack_name(base))
    }

    /// Standard resource tags for the stack named by `stack_field`.
    pub fn standard_tags(&self, stack_field: &str) -> Option<StandardTags> {
        self.stack_name(stack_field)
            .map(|name| StandardTags::new(self.zone, self.deployment_env, name))
    }

    pub fn is_secret(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name && f.secret)
    }

    /// JSON view of the record; secret values are redacted unless `reveal_secrets`.
    pub fn to_json(&self, reveal_secrets: bool) -> Value {
        let map = self
            .values
            .iter()
            .map(|(k, v)| {
                if !reveal_secrets && self.is_secret(k) {
                    (k.clone(), Value::String(REDACTED.into()))
                } else {
                    (k.clone(), v.clone())
                }
            })
            .collect();
        Value::Object(map)
    }

    /// Deserialize into a zone's typed settings struct.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T> {
        let mut values = self.values.clone();
        values.insert(
            DEPLOYMENT_ENV_KEY.into(),
            Value::String(self.deployment_env.as_str().into()),
        );
        Ok(serde_json::from_value(Value::Object(values))?)
    }
}

impl fmt::Debug for ZoneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneConfig")
            .field("zone", &self.zone)
            .field("deployment_env", &self.deployment_env)
            .field("values", &self.to_json(false))
            .finish()
    }
}
