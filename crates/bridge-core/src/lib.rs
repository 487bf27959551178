//! # bridge-core
//!
//! Shared vocabulary for the Slack-to-Bedrock bridge zones: deployment
//! environments, zones, the error type and its operator-facing report, the
//! structured logger and the resource tagging helper.

pub mod error;
pub mod logging;
pub mod tags;
pub mod types;

pub use error::{BridgeError, ErrorReport, ErrorSource, FieldIssue, Result};
pub use logging::{LogEntry, LogLevel, StructuredLogger};
pub use tags::{ResourceDeclaration, StandardTags, Taggable, apply_standard_tags};
pub use types::*;
