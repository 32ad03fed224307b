use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::entry::LogEntry;
use crate::error::{Result, ValidationError};
use crate::validate::is_file_name;

/// Destination for finished log entries.
pub trait LogWriter: Send + Sync {
    fn write(&self, entry: &LogEntry) -> Result<()>;
}

/// Render an entry as one line:
/// `[2024-01-15T10:30:45+00:00] [info] Message. | context: {"k":"v"}`.
///
/// The context part is left out when the context is empty.
pub fn format_line(entry: &LogEntry) -> Result<String> {
    let mut line = format!(
        "[{}] [{}] {}",
        entry.timestamp().to_rfc3339(),
        entry.level(),
        entry.message()
    );
    if !entry.context().is_empty() {
        line.push_str(" | context: ");
        line.push_str(&serde_json::to_string(entry.context())?);
    }
    Ok(line)
}

/// Appends entries to `<directory>/<channel>.log`.
pub struct FileLogWriter {
    directory: PathBuf,
    default_channel: String,
}

impl FileLogWriter {
    /// `directory` and `default_channel` are expected to be validated already
    /// (see [`LogGuard::validate_directory`](crate::guard::LogGuard::validate_directory)).
    pub fn new(directory: PathBuf, default_channel: impl Into<String>) -> Self {
        Self {
            directory,
            default_channel: default_channel.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File an entry is routed to. Fails if the channel would resolve
    /// outside the log directory.
    pub fn path_for(&self, entry: &LogEntry) -> Result<PathBuf> {
        let channel = entry.channel().unwrap_or(self.default_channel.as_str());
        if !is_file_name(channel, "..") {
            return Err(ValidationError::ChannelNotFileName.into());
        }
        Ok(self.directory.join(format!("{channel}.log")))
    }
}

impl LogWriter for FileLogWriter {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let path = self.path_for(entry)?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                tracing::debug!(path = %parent.display(), "creating log directory");
                fs::create_dir_all(parent)?;
            }
        }
        let line = format_line(entry)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", line)?;
        tracing::debug!(path = %path.display(), level = %entry.level(), "log entry written");
        Ok(())
    }
}

/// Keeps formatted lines in memory. Useful in tests.
#[derive(Default)]
pub struct MemoryLogWriter {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl LogWriter for MemoryLogWriter {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let line = format_line(entry)?;
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line);
        Ok(())
    }
}

impl<W: LogWriter + ?Sized> LogWriter for std::sync::Arc<W> {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        (**self).write(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogLevel;
    use crate::guard::LogGuard;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:45Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(channel: Option<&str>) -> LogEntry {
        let mut builder = LogEntry::builder(LogLevel::Info, "user logged in")
            .context(json!({"user": "alice", "password": "x"}))
            .timestamp(fixed_time());
        if let Some(c) = channel {
            builder = builder.channel(c);
        }
        builder.build(&LogGuard::default()).unwrap()
    }

    #[test]
    fn test_format_line() {
        let line = format_line(&entry(None)).unwrap();
        assert_eq!(
            line,
            r#"[2024-01-15T10:30:45+00:00] [info] User logged in. | context: {"user":"alice","password":"[MASKED]"}"#
        );
    }

    #[test]
    fn test_format_line_without_context() {
        let e = LogEntry::builder("error", "boom")
            .timestamp(fixed_time())
            .build(&LogGuard::default())
            .unwrap();
        assert_eq!(
            format_line(&e).unwrap(),
            "[2024-01-15T10:30:45+00:00] [error] Boom."
        );
    }

    #[test]
    fn test_file_writer_routes_by_channel() {
        let tmp = TempDir::new().unwrap();
        let writer = FileLogWriter::new(tmp.path().join("logs"), "app");

        writer.write(&entry(Some("Auth"))).unwrap();
        writer.write(&entry(Some("auth"))).unwrap();
        writer.write(&entry(None)).unwrap();

        let auth = fs::read_to_string(tmp.path().join("logs/auth.log")).unwrap();
        assert_eq!(auth.lines().count(), 2);
        let app = fs::read_to_string(tmp.path().join("logs/app.log")).unwrap();
        assert_eq!(app.lines().count(), 1);
        assert!(!app.contains("\"x\""));
    }

    #[test]
    fn test_default_channel_must_be_file_name() {
        let tmp = TempDir::new().unwrap();
        let writer = FileLogWriter::new(tmp.path().join("logs"), "../outside");
        assert!(writer.write(&entry(None)).is_err());
        assert!(!tmp.path().join("outside.log").exists());
    }

    #[test]
    fn test_memory_writer() {
        let writer = MemoryLogWriter::new();
        writer.write(&entry(None)).unwrap();
        assert_eq!(writer.lines().len(), 1);
    }
}
