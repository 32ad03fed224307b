use std::sync::Arc;

use crate::config::Settings;
use crate::context::ContextValue;
use crate::entry::{LogEntry, LogLevel};
use crate::error::Result;
use crate::guard::LogGuard;
use crate::writer::{FileLogWriter, LogWriter};

/// Validating logger: every call goes through [`LogGuard`] before it reaches
/// the writer, so a rejected entry is never partially written.
pub struct Logger {
    guard: Arc<LogGuard>,
    writer: Box<dyn LogWriter>,
    default_channel: Option<String>,
    min_level: LogLevel,
}

impl Logger {
    pub fn new(guard: Arc<LogGuard>, writer: Box<dyn LogWriter>) -> Self {
        Self {
            guard,
            writer,
            default_channel: None,
            min_level: LogLevel::Debug,
        }
    }

    /// Build a file-backed logger from settings. The log directory and
    /// default channel are validated here, once.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let guard = Arc::new(LogGuard::from_settings(settings)?);
        let directory = guard.validate_directory(&settings.logger.directory.to_string_lossy())?;
        let channel = guard.validate_channel(&settings.logger.default_channel)?;
        let writer = FileLogWriter::new(directory, channel.clone());
        Ok(Self::new(guard, Box::new(writer))
            .with_default_channel(channel)
            .with_min_level(settings.logger.min_level))
    }

    pub fn with_default_channel(mut self, channel: impl Into<String>) -> Self {
        self.default_channel = Some(channel.into());
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn guard(&self) -> &LogGuard {
        &self.guard
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Log to the default channel. Returns `false` when the entry was below
    /// the minimum level and dropped.
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        context: impl Into<ContextValue>,
    ) -> Result<bool> {
        self.emit(level, message, context.into(), self.default_channel.as_deref())
    }

    pub fn log_to(
        &self,
        channel: &str,
        level: LogLevel,
        message: &str,
        context: impl Into<ContextValue>,
    ) -> Result<bool> {
        self.emit(level, message, context.into(), Some(channel))
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        context: ContextValue,
        channel: Option<&str>,
    ) -> Result<bool> {
        if level < self.min_level {
            return Ok(false);
        }
        let mut builder = LogEntry::builder(level, message).context(context);
        if let Some(channel) = channel {
            builder = builder.channel(channel);
        }
        let entry = match builder.build(&self.guard) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(field = %e.field(), error = %e, "log entry rejected");
                return Err(e.into());
            }
        };
        self.writer.write(&entry)?;
        Ok(true)
    }

    pub fn debug(&self, message: &str, context: impl Into<ContextValue>) -> Result<bool> {
        self.log(LogLevel::Debug, message, context)
    }

    pub fn info(&self, message: &str, context: impl Into<ContextValue>) -> Result<bool> {
        self.log(LogLevel::Info, message, context)
    }

    pub fn warning(&self, message: &str, context: impl Into<ContextValue>) -> Result<bool> {
        self.log(LogLevel::Warning, message, context)
    }

    pub fn error(&self, message: &str, context: impl Into<ContextValue>) -> Result<bool> {
        self.log(LogLevel::Error, message, context)
    }

    pub fn critical(&self, message: &str, context: impl Into<ContextValue>) -> Result<bool> {
        self.log(LogLevel::Critical, message, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextMap;
    use crate::error::LogsecError;
    use crate::writer::MemoryLogWriter;
    use serde_json::json;

    fn memory_logger() -> (Logger, Arc<MemoryLogWriter>) {
        let writer = Arc::new(MemoryLogWriter::new());
        let logger = Logger::new(Arc::new(LogGuard::default()), Box::new(writer.clone()));
        (logger, writer)
    }

    #[test]
    fn test_info_writes_sanitized_line() {
        let (logger, writer) = memory_logger();
        assert!(logger
            .info("login ok", json!({"user": "alice", "token": "abc"}))
            .unwrap());
        let lines = writer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[info] Login ok."));
        assert!(lines[0].contains(r#""token":"[MASKED]""#));
        assert!(!lines[0].contains("abc"));
    }

    #[test]
    fn test_below_min_level_is_dropped() {
        let (logger, writer) = memory_logger();
        let logger = logger.with_min_level(LogLevel::Warning);
        assert!(!logger.info("quiet", ContextMap::new()).unwrap());
        assert!(logger.error("loud", ContextMap::new()).unwrap());
        assert_eq!(writer.lines().len(), 1);
    }

    #[test]
    fn test_rejected_entry_writes_nothing() {
        let (logger, writer) = memory_logger();
        let err = logger.info("   ", ContextMap::new()).unwrap_err();
        assert!(matches!(err, LogsecError::Validation(_)));
        assert!(writer.lines().is_empty());
    }

    #[test]
    fn test_from_settings_rejects_root_directory() {
        let mut settings = Settings::default();
        settings.logger.directory = "/".into();
        assert!(matches!(
            Logger::from_settings(&settings),
            Err(LogsecError::Validation(_))
        ));
    }

    #[test]
    fn test_from_settings_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.logger.directory = tmp.path().join("out");
        let logger = Logger::from_settings(&settings).unwrap();
        logger
            .log_to("billing", LogLevel::Error, "charge failed", json!({"cvv": "123"}))
            .unwrap();
        let content = std::fs::read_to_string(tmp.path().join("out/billing.log")).unwrap();
        assert!(content.contains("[error] Charge failed."));
        assert!(!content.contains("123"));
    }
}
