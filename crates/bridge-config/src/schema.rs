use serde_json::{Map, Value};

use bridge_core::{BridgeError, DeploymentEnv, FieldIssue, Result, Zone};

use crate::record::ZoneConfig;
use crate::rules::Rule;

/// Key that is always forced to the requested environment.
pub const DEPLOYMENT_ENV_KEY: &str = "deploymentEnv";

/// Declaration of one configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// camelCase key used in the JSON files.
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    /// Environment variable that overrides the file value.
    pub env_var: Option<&'static str>,
    /// Never echoed in errors, logs or `show` output.
    pub secret: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: true,
            env_var: None,
            secret: false,
        }
    }

    pub const fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: false,
            env_var: None,
            secret: false,
        }
    }

    pub const fn env(mut self, var: &'static str) -> Self {
        self.env_var = Some(var);
        self
    }

    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

// ── Shared settings ────────────────────────────────────────────

const AWS_REGION: FieldSpec = FieldSpec::required("awsRegion", Rule::AwsRegion).env("AWS_REGION");
const BEDROCK_MODEL_ID: FieldSpec =
    FieldSpec::required("bedrockModelId", Rule::NonEmpty).env("BEDROCK_MODEL_ID");
const DEPLOYMENT_ENV: FieldSpec = FieldSpec::required(DEPLOYMENT_ENV_KEY, Rule::DeploymentEnv);
const VERIFICATION_ACCOUNT_ID: FieldSpec =
    FieldSpec::required("verificationAccountId", Rule::AccountId).env("VERIFICATION_ACCOUNT_ID");
const EXECUTION_ACCOUNT_ID: FieldSpec =
    FieldSpec::required("executionAccountId", Rule::AccountId).env("EXECUTION_ACCOUNT_ID");

// ── Zone schemas ───────────────────────────────────────────────

static VERIFICATION_FIELDS: [FieldSpec; 12] = [
    AWS_REGION,
    BEDROCK_MODEL_ID,
    DEPLOYMENT_ENV,
    FieldSpec::required("verificationStackName", Rule::NonEmpty),
    FieldSpec::required("executionStackName", Rule::NonEmpty),
    VERIFICATION_ACCOUNT_ID,
    EXECUTION_ACCOUNT_ID,
    FieldSpec::optional("slackBotToken", Rule::NonEmpty)
        .env("SLACK_BOT_TOKEN")
        .secret(),
    FieldSpec::optional("slackSigningSecret", Rule::NonEmpty)
        .env("SLACK_SIGNING_SECRET")
        .secret(),
    FieldSpec::optional("verificationAgentName", Rule::AgentName),
    FieldSpec::optional("executionAgentArn", Rule::AgentArn).env("EXECUTION_AGENT_ARN"),
    FieldSpec::optional("executionAgentArns", Rule::AgentArnMap),
];

static EXECUTION_FIELDS: [FieldSpec; 8] = [
    AWS_REGION,
    BEDROCK_MODEL_ID,
    DEPLOYMENT_ENV,
    FieldSpec::required("executionStackName", Rule::NonEmpty),
    VERIFICATION_ACCOUNT_ID,
    EXECUTION_ACCOUNT_ID,
    FieldSpec::optional("executionAgentName", Rule::AgentName),
    FieldSpec::optional("verificationAgentArn", Rule::AgentArn).env("VERIFICATION_AGENT_ARN"),
];

static DOCS_FIELDS: [FieldSpec; 7] = [
    AWS_REGION,
    BEDROCK_MODEL_ID,
    DEPLOYMENT_ENV,
    FieldSpec::required("docsStackName", Rule::NonEmpty),
    VERIFICATION_ACCOUNT_ID,
    EXECUTION_ACCOUNT_ID,
    FieldSpec::optional("docsAgentName", Rule::AgentName),
];

static WEB_FETCH_FIELDS: [FieldSpec; 7] = [
    AWS_REGION,
    BEDROCK_MODEL_ID,
    DEPLOYMENT_ENV,
    FieldSpec::required("webFetchStackName", Rule::NonEmpty),
    VERIFICATION_ACCOUNT_ID,
    EXECUTION_ACCOUNT_ID,
    FieldSpec::optional("webFetchAgentName", Rule::AgentName),
];

static VERIFICATION: ZoneSchema = ZoneSchema::new(Zone::Verification, &VERIFICATION_FIELDS);
static EXECUTION: ZoneSchema = ZoneSchema::new(Zone::Execution, &EXECUTION_FIELDS);
static DOCS: ZoneSchema = ZoneSchema::new(Zone::Docs, &DOCS_FIELDS);
static WEB_FETCH: ZoneSchema = ZoneSchema::new(Zone::WebFetch, &WEB_FETCH_FIELDS);

/// The set of settings one zone accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSchema {
    pub zone: Zone,
    pub fields: &'static [FieldSpec],
    /// Reject keys the schema does not declare instead of ignoring them.
    pub strict: bool,
}

impl ZoneSchema {
    pub const fn new(zone: Zone, fields: &'static [FieldSpec]) -> Self {
        Self {
            zone,
            fields,
            strict: false,
        }
    }

    pub fn for_zone(zone: Zone) -> &'static ZoneSchema {
        match zone {
            Zone::Verification => &VERIFICATION,
            Zone::Execution => &EXECUTION,
            Zone::Docs => &DOCS,
            Zone::WebFetch => &WEB_FETCH,
        }
    }

    pub fn with_strict(self, strict: bool) -> Self {
        Self { strict, ..self }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Settings that can be overridden from the environment, as `(field, variable)`.
    pub fn env_overrides(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields
            .iter()
            .filter_map(|f| f.env_var.map(|var| (f.name, var)))
    }

    /// Keys present in `candidate` that the schema does not declare, in file order.
    pub fn unknown_keys(&self, candidate: &Map<String, Value>) -> Vec<String> {
        candidate
            .keys()
            .filter(|k| self.field(k).is_none())
            .cloned()
            .collect()
    }

    /// Starting-point environment file: every required setting with a placeholder.
    pub fn example_template(&self, env: DeploymentEnv) -> Value {
        let mut map = Map::new();
        for spec in self.fields.iter().filter(|f| f.required) {
            let value = if spec.name == DEPLOYMENT_ENV_KEY {
                Value::String(env.as_str().into())
            } else {
                spec.rule.placeholder()
            };
            map.insert(spec.name.into(), value);
        }
        Value::Object(map)
    }

    /// Check `candidate` against every rule and collect all violations.
    pub fn issues(&self, candidate: &Map<String, Value>) -> Vec<FieldIssue> {
        let mut issues: Vec<FieldIssue> = self
            .fields
            .iter()
            .flat_map(|spec| match candidate.get(spec.name).filter(|v| !v.is_null()) {
                Some(value) => spec.rule.check(spec.name, value, spec.secret),
                None if spec.required => vec![FieldIssue::new(
                    spec.name,
                    format!("{} is required", spec.name),
                )],
                None => vec![],
            })
            .collect();

        if self.strict {
            issues.extend(
                self.unknown_keys(candidate)
                    .into_iter()
                    .map(|k| FieldIssue::new(&k, format!("{k} is not a recognized setting"))),
            );
        }
        issues
    }
}

/// Validate a merged candidate and build the immutable record.
///
/// Pure: no I/O, and the same input always gives the same outcome. Keys the
/// schema does not declare are dropped from the record.
pub fn validate_config(schema: &ZoneSchema, candidate: &Map<String, Value>) -> Result<ZoneConfig> {
    let issues = schema.issues(candidate);
    if !issues.is_empty() {
        return Err(BridgeError::Validation { issues });
    }

    let deployment_env: DeploymentEnv = candidate
        .get(DEPLOYMENT_ENV_KEY)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| BridgeError::Validation {
            issues: vec![FieldIssue::new(
                DEPLOYMENT_ENV_KEY,
                format!("{DEPLOYMENT_ENV_KEY} is required"),
            )],
        })?;

    let values: Map<String, Value> = candidate
        .iter()
        .filter(|(k, v)| schema.field(k).is_some() && !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(ZoneConfig::new(schema.zone, deployment_env, values, schema.fields))
}
