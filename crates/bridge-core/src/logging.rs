//! Single-line structured log records.
//!
//! Every record carries a level, the pipeline phase that produced it, a short
//! message and an optional context object. Records render to one JSON line
//! via [`LogEntry::to_line`] and are emitted through `tracing` as fields
//! (`component`, `phase`, `context`) at the matching level, so the active
//! subscriber decides the output format.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::Level;

/// Replacement for context values whose key looks secret-bearing.
pub const REDACTED: &str = "[REDACTED]";

const SECRET_KEY_MARKERS: &[&str] = &[
    "token",
    "secret",
    "password",
    "credential",
    "apikey",
    "api_key",
    "authorization",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One structured log record.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub component: String,
    pub phase: String,
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl LogEntry {
    /// Render as a single JSON line.
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(line) => line,
            Err(e) => format!(
                "{{\"level\":\"{}\",\"phase\":{:?},\"message\":{:?},\"error\":{:?}}}",
                self.level,
                self.phase,
                self.message,
                e.to_string()
            ),
        }
    }
}

/// Returns true when a context key would likely carry a secret value.
pub fn is_secret_key(key: &str) -> bool {
    let k = key.to_ascii_lowercase();
    SECRET_KEY_MARKERS.iter().any(|m| k.contains(m))
}

/// Replace secret-looking values, recursing into nested objects and arrays.
pub fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(redact_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

fn redact_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| {
            if is_secret_key(&k) && !v.is_null() {
                (k, Value::String(REDACTED.into()))
            } else {
                (k, redact(v))
            }
        })
        .collect()
}

/// Logger bound to one component (a zone, the CLI, ...).
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Build a record without emitting it. Non-object context is stored under `value`.
    pub fn entry(&self, level: LogLevel, phase: &str, message: &str, context: Value) -> LogEntry {
        let context = match redact(context) {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                map
            }
        };
        LogEntry {
            timestamp: Utc::now(),
            level,
            component: self.component.clone(),
            phase: phase.to_string(),
            message: message.to_string(),
            context,
        }
    }

    /// Build, emit and return a record.
    pub fn log(&self, level: LogLevel, phase: &str, message: &str, context: Value) -> LogEntry {
        let entry = self.entry(level, phase, message, context);
        let context = Value::Object(entry.context.clone());

        macro_rules! emit {
            ($lvl:expr) => {
                tracing::event!(
                    target: "bridge",
                    $lvl,
                    component = %entry.component,
                    phase = %entry.phase,
                    context = %context,
                    "{}",
                    entry.message
                )
            };
        }
        match level {
            LogLevel::Debug => emit!(Level::DEBUG),
            LogLevel::Info => emit!(Level::INFO),
            LogLevel::Warn => emit!(Level::WARN),
            LogLevel::Error => emit!(Level::ERROR),
        }
        entry
    }

    pub fn debug(&self, phase: &str, message: &str, context: Value) -> LogEntry {
        self.log(LogLevel::Debug, phase, message, context)
    }

    pub fn info(&self, phase: &str, message: &str, context: Value) -> LogEntry {
        self.log(LogLevel::Info, phase, message, context)
    }

    pub fn warn(&self, phase: &str, message: &str, context: Value) -> LogEntry {
        self.log(LogLevel::Warn, phase, message, context)
    }

    pub fn error(&self, phase: &str, message: &str, context: Value) -> LogEntry {
        self.log(LogLevel::Error, phase, message, context)
    }
}
