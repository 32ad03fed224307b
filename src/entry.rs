use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{ContextMap, ContextValue};
use crate::error::ValidationError;
use crate::guard::LogGuard;
use crate::validate::ValidatedContext;

/// Log severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

/// An immutable, fully validated log record.
///
/// The only way to obtain one is [`LogEntryBuilder::build`], which sanitizes
/// the context and validates every field first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    level: LogLevel,
    message: String,
    context: ValidatedContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<String>,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Start building an entry. `level` may be a [`LogLevel`] or a raw name.
    pub fn builder(level: impl AsRef<str>, message: impl Into<String>) -> LogEntryBuilder {
        LogEntryBuilder::new(level, message)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &ValidatedContext {
        &self.context
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Raw, unvalidated parts of a log entry. Each step consumes the builder and
/// returns a new one.
#[derive(Debug, Clone)]
pub struct LogEntryBuilder {
    level: String,
    message: String,
    context: ContextValue,
    channel: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl LogEntryBuilder {
    pub fn new(level: impl AsRef<str>, message: impl Into<String>) -> Self {
        Self {
            level: level.as_ref().to_string(),
            message: message.into(),
            context: ContextValue::Map(ContextMap::new()),
            channel: None,
            timestamp: None,
        }
    }

    pub fn context(self, context: impl Into<ContextValue>) -> Self {
        Self {
            context: context.into(),
            ..self
        }
    }

    pub fn channel(self, channel: impl Into<String>) -> Self {
        Self {
            channel: Some(channel.into()),
            ..self
        }
    }

    /// Defaults to the time of [`build`](Self::build).
    pub fn timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..self
        }
    }

    /// Sanitize, validate and freeze the entry.
    pub fn build(self, guard: &LogGuard) -> Result<LogEntry, ValidationError> {
        let level = guard.validate_log_level(&self.level)?;
        let message = guard.validate_message(&self.message)?;
        let channel = self
            .channel
            .as_deref()
            .map(|c| guard.validate_channel(c))
            .transpose()?;
        let context = guard.clean_context(&self.context)?;
        let timestamp = match self.timestamp {
            Some(ts) => guard.validate_timestamp(&ts)?,
            None => Utc::now(),
        };

        Ok(LogEntry {
            level,
            message,
            context,
            channel,
            timestamp,
        })
    }
}
