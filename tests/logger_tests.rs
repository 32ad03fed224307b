//! End-to-end logging: entries are validated and sanitized before any
//! writer sees them.

use std::sync::Arc;

use logsec::config::Settings;
use logsec::writer::{FileLogWriter, LogWriter, MemoryLogWriter};
use logsec::{ContextMap, LogEntry, LogGuard, LogLevel, Logger, LogsecError, ValidationError};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn logger_routes_channels_to_files() {
    let tmp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.logger.directory = tmp.path().join("logs");
    settings.logger.default_channel = "Main".into();

    let logger = Logger::from_settings(&settings).unwrap();
    logger.info("service booted", ContextMap::new()).unwrap();
    logger
        .log_to(
            "payments",
            LogLevel::Error,
            "charge declined",
            json!({"card_number": "4111111111111111", "amount": 10.5}),
        )
        .unwrap();

    let main = std::fs::read_to_string(tmp.path().join("logs/main.log")).unwrap();
    assert!(main.ends_with("[info] Service booted.\n"));

    let payments = std::fs::read_to_string(tmp.path().join("logs/payments.log")).unwrap();
    assert!(payments.contains(r#"| context: {"card_number":"[MASKED]","amount":"10.5"}"#));
    assert!(!payments.contains("4111"));
}

#[test]
fn min_level_from_settings() {
    let tmp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.logger.directory = tmp.path().to_path_buf();
    settings.logger.min_level = LogLevel::Error;

    let logger = Logger::from_settings(&settings).unwrap();
    assert!(!logger.warning("almost", ContextMap::new()).unwrap());
    assert!(logger.critical("down", ContextMap::new()).unwrap());

    let app = std::fs::read_to_string(tmp.path().join("app.log")).unwrap();
    assert_eq!(app.lines().count(), 1);
}

#[test]
fn invalid_context_is_not_written() {
    let writer = Arc::new(MemoryLogWriter::new());
    let logger = Logger::new(Arc::new(LogGuard::default()), Box::new(writer.clone()));

    let err = logger
        .info("dup keys", ContextMap::new().with("Id", 1).with(" id", 2))
        .unwrap_err();
    assert!(matches!(err, LogsecError::Validation(_)));
    assert!(writer.lines().is_empty());
}

#[test]
fn bad_settings_fail_early() {
    let mut settings = Settings::default();
    settings.sanitization.mask_token = "x".repeat(41);
    assert!(matches!(
        Logger::from_settings(&settings),
        Err(LogsecError::Config(_))
    ));

    let mut settings = Settings::default();
    settings.logger.directory = "logs/../../etc".into();
    assert!(matches!(
        Logger::from_settings(&settings),
        Err(LogsecError::Validation(_))
    ));
}

#[test]
fn file_writer_accepts_prebuilt_entries() {
    let tmp = TempDir::new().unwrap();
    let guard = LogGuard::default();
    let writer = FileLogWriter::new(tmp.path().to_path_buf(), "app");

    let entry = LogEntry::builder("debug", "cache warmed")
        .channel("cache")
        .context(json!({"keys": 120, "bearer": "Bearer abcdefghijkl"}))
        .build(&guard)
        .unwrap();
    writer.write(&entry).unwrap();

    assert_eq!(writer.path_for(&entry).unwrap(), tmp.path().join("cache.log"));
    let content = std::fs::read_to_string(tmp.path().join("cache.log")).unwrap();
    assert!(content.contains(r#""bearer":"[MASKED]""#));
}

#[test]
fn channel_cannot_escape_log_directory() {
    let tmp = TempDir::new().unwrap();
    let logs = tmp.path().join("logs");
    let mut settings = Settings::default();
    settings.logger.directory = logs.clone();
    let logger = Logger::from_settings(&settings).unwrap();

    let outside = tmp.path().join("abs_target");
    for channel in ["../escaped".to_string(), outside.to_string_lossy().into_owned()] {
        let err = logger
            .log_to(&channel, LogLevel::Info, "hi", ContextMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            LogsecError::Validation(ValidationError::ChannelNotFileName)
        ));
    }
    assert!(!tmp.path().join("escaped.log").exists());
    assert!(!tmp.path().join("abs_target.log").exists());
    assert!(!logs.exists());

    let mut settings = Settings::default();
    settings.logger.directory = logs;
    settings.logger.default_channel = "../app".into();
    assert!(matches!(
        Logger::from_settings(&settings),
        Err(LogsecError::Validation(ValidationError::ChannelNotFileName))
    ));
}
