use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{DeploymentEnv, EXAMPLE_CONFIG_FILE, Zone};

/// A single violated schema rule, rendered as `field: reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Unified error type for the bridge tooling.
#[derive(Error, Debug)]
pub enum BridgeError {
    // ── Config errors ──────────────────────────────────────────
    #[error(
        "required config file not found: {}. Create {expected} (copy {example} as a starting point)",
        .path.display(),
        example = EXAMPLE_CONFIG_FILE
    )]
    MissingRequiredFile { path: PathBuf, expected: String },

    #[error("failed to parse {file}: {reason}")]
    FileParse { file: String, reason: String },

    #[error("{}", render_issues(.issues))]
    Validation { issues: Vec<FieldIssue> },

    #[error("config error: {0}")]
    Config(String),

    // ── Caller input errors ────────────────────────────────────
    #[error("invalid deployment environment '{0}' (valid: {valid})", valid = DeploymentEnv::valid_values())]
    InvalidEnvironment(String),

    #[error("unknown zone '{0}'")]
    UnknownZone(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

fn render_issues(issues: &[FieldIssue]) -> String {
    let lines: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
    format!("Configuration validation failed:\n  • {}", lines.join("\n  • "))
}

impl BridgeError {
    pub fn missing_required_file(path: &Path) -> Self {
        let expected = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        BridgeError::MissingRequiredFile {
            path: path.to_path_buf(),
            expected,
        }
    }

    /// Violated rules, if this is a validation failure.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            BridgeError::Validation { issues } => issues,
            _ => &[],
        }
    }

    /// Build the operator-facing report for this error.
    pub fn report(&self) -> ErrorReport {
        let report = ErrorReport::new(self.to_string());
        match self {
            BridgeError::MissingRequiredFile { path, expected } => report
                .with_cause("file does not exist")
                .with_remediation(format!(
                    "Create {} in {} (copy {} or run `bridge init`)",
                    expected,
                    path.parent().unwrap_or(Path::new(".")).display(),
                    EXAMPLE_CONFIG_FILE
                ))
                .with_source(ErrorSource::Configuration),
            BridgeError::FileParse { file, reason } => report
                .with_cause(reason.clone())
                .with_remediation(format!("Fix the JSON syntax in {file}"))
                .with_source(ErrorSource::Configuration),
            BridgeError::Validation { issues } => report
                .with_cause(format!("{} field(s) failed validation", issues.len()))
                .with_remediation(
                    "Fix the listed fields in the cdk.config*.json files or set the matching environment variables",
                )
                .with_source(ErrorSource::Configuration),
            BridgeError::Config(_) => report.with_source(ErrorSource::Configuration),
            BridgeError::InvalidEnvironment(_) => report
                .with_remediation(format!(
                    "Pass one of: {} (e.g. --env dev)",
                    DeploymentEnv::valid_values()
                ))
                .with_source(ErrorSource::UserInput),
            BridgeError::UnknownZone(_) => report
                .with_remediation(format!(
                    "Pass one of: {}",
                    Zone::ALL.map(|z| z.as_str()).join(", ")
                ))
                .with_source(ErrorSource::UserInput),
            BridgeError::Io(_) | BridgeError::Serialization(_) | BridgeError::Other(_) => {
                report.with_source(ErrorSource::Internal)
            }
        }
    }
}

// ── Error report ───────────────────────────────────────────────

/// Where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSource {
    UserInput,
    Configuration,
    Provisioning,
    Internal,
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorSource::UserInput => "user input",
            ErrorSource::Configuration => "configuration",
            ErrorSource::Provisioning => "provisioning",
            ErrorSource::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Multi-part, human-readable failure description printed by the binary.
///
/// Only `message` is mandatory; the other parts are rendered when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Resource / construct the failure relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construct_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            construct_id: None,
            remediation: None,
            source: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn with_construct(mut self, construct_id: impl Into<String>) -> Self {
        self.construct_id = Some(construct_id.into());
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn with_source(mut self, source: ErrorSource) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref c) = self.cause {
            write!(f, "\n   Cause: {c}")?;
        }
        if let Some(ref id) = self.construct_id {
            write!(f, "\n   Construct: {id}")?;
        }
        if let Some(ref r) = self.remediation {
            write!(f, "\n   ↳ {r}")?;
        }
        if let Some(s) = self.source {
            write!(f, "\n   Source: {s}")?;
        }
        Ok(())
    }
}
