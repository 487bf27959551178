//! Declarative per-field validation rules.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use bridge_core::{DeploymentEnv, FieldIssue};

static AWS_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+-[a-z]+-[0-9]+$").expect("region pattern"));

static ACCOUNT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("account id pattern"));

static AGENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{0,47}$").expect("agent name pattern"));

static AGENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{0,63}$").expect("agent id pattern"));

static AGENT_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:aws:bedrock-agentcore:[a-z0-9-]+:[0-9]{12}:runtime/[A-Za-z0-9_-]+$")
        .expect("agent arn pattern")
});

/// What a present value must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any non-blank string.
    NonEmpty,
    /// `<letters>-<letters>-<digits>`, e.g. `ap-northeast-1`.
    AwsRegion,
    /// Exactly 12 digits.
    AccountId,
    /// Identifier-safe name, at most 48 characters.
    AgentName,
    /// AgentCore runtime ARN.
    AgentArn,
    /// Object mapping agent id → runtime ARN.
    AgentArnMap,
    /// `dev` or `prod`.
    DeploymentEnv,
}

impl Rule {
    /// Human-readable description of the accepted shape.
    pub fn describe(&self) -> &'static str {
        match self {
            Rule::NonEmpty => "a non-empty string",
            Rule::AwsRegion => "an AWS region like ap-northeast-1",
            Rule::AccountId => "a 12-digit AWS account id",
            Rule::AgentName => {
                "a name starting with a letter, using only letters, digits and underscores (max 48 chars)"
            }
            Rule::AgentArn => {
                "an AgentCore runtime ARN (arn:aws:bedrock-agentcore:<region>:<account>:runtime/<id>)"
            }
            Rule::AgentArnMap => "an object mapping agent ids to AgentCore runtime ARNs",
            Rule::DeploymentEnv => "one of: dev, prod",
        }
    }

    /// Placeholder written into example templates.
    pub fn placeholder(&self) -> Value {
        match self {
            Rule::NonEmpty => Value::String("CHANGE_ME".into()),
            Rule::AwsRegion => Value::String("ap-northeast-1".into()),
            Rule::AccountId => Value::String("123456789012".into()),
            Rule::AgentName => Value::String("SlackAgent".into()),
            Rule::AgentArn => Value::String(
                "arn:aws:bedrock-agentcore:ap-northeast-1:123456789012:runtime/agent-id".into(),
            ),
            Rule::AgentArnMap => Value::Object(Default::default()),
            Rule::DeploymentEnv => Value::String("dev".into()),
        }
    }

    /// Check a present value. Secret values are never echoed back in the reasons.
    pub fn check(&self, field: &str, value: &Value, secret: bool) -> Vec<FieldIssue> {
        if *self == Rule::AgentArnMap {
            return check_arn_map(field, value);
        }

        let Some(s) = value.as_str() else {
            return vec![FieldIssue::new(field, format!("{field} must be a string"))];
        };

        let ok = match self {
            Rule::NonEmpty => !s.trim().is_empty(),
            Rule::AwsRegion => AWS_REGION.is_match(s),
            Rule::AccountId => ACCOUNT_ID.is_match(s),
            Rule::AgentName => AGENT_NAME.is_match(s),
            Rule::AgentArn => AGENT_ARN.is_match(s),
            Rule::DeploymentEnv => DeploymentEnv::ALL.iter().any(|e| e.as_str() == s),
            Rule::AgentArnMap => false,
        };
        if ok {
            return vec![];
        }

        let reason = if *self == Rule::NonEmpty {
            format!("{field} must not be empty")
        } else if secret {
            format!("{field} must be {}", self.describe())
        } else {
            format!("{field} must be {} (got '{s}')", self.describe())
        };
        vec![FieldIssue::new(field, reason)]
    }
}

fn check_arn_map(field: &str, value: &Value) -> Vec<FieldIssue> {
    let Some(map) = value.as_object() else {
        return vec![FieldIssue::new(
            field,
            format!("{field} must be {}", Rule::AgentArnMap.describe()),
        )];
    };

    let mut issues = Vec::new();
    for (agent_id, arn) in map {
        let entry = format!("{field}.{agent_id}");
        if !AGENT_ID.is_match(agent_id) {
            issues.push(FieldIssue::new(
                &entry,
                format!("agent id '{agent_id}' must be lowercase letters, digits and dashes"),
            ));
        }
        issues.extend(Rule::AgentArn.check(&entry, arn, false));
    }
    issues
}
