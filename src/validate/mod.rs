//! Field validators for log entries.
//!
//! Each validator returns the normalized value or a [`ValidationError`]
//! naming the field and the rule that failed. Validators never mask: context
//! is expected to have been sanitized first.

mod channel;
mod context;
mod directory;
mod level;
mod message;
mod timestamp;

pub use channel::validate_channel;
pub(crate) use channel::is_file_name;
pub use context::{validate_context, ContextField, ValidatedContext};
pub use directory::validate_directory;
pub use level::{validate_level, validate_log_level};
pub use message::validate_message;
pub use timestamp::validate_timestamp;

use std::any::Any;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::config::ValidationConfig;
use crate::context::ContextValue;
use crate::entry::LogLevel;
use crate::error::{ConfigError, Field, ValidationError};
use crate::normalize;

/// Compiled validation settings. Built once, then shared read-only.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub max_channel_length: usize,
    pub max_message_length: usize,
    pub max_context_key_length: usize,
    pub max_context_value_length: usize,
    pub max_directory_length: usize,
    pub forbidden_chars: Regex,
    pub root_directory: String,
    pub traversal_sequence: String,
    pub terminal_punctuation: Regex,
    pub allowed_levels: Vec<String>,
}

impl ValidationRules {
    pub fn from_config(config: &ValidationConfig) -> Result<Self, ConfigError> {
        let allowed_levels: Vec<String> = config
            .allowed_levels
            .iter()
            .map(|l| normalize::fold_key(l))
            .collect();
        for level in &allowed_levels {
            if level.parse::<LogLevel>().is_err() {
                return Err(ConfigError::InvalidLevel {
                    level: level.clone(),
                });
            }
        }

        Ok(Self {
            max_channel_length: config.max_channel_length,
            max_message_length: config.max_message_length,
            max_context_key_length: config.max_context_key_length,
            max_context_value_length: config.max_context_value_length,
            max_directory_length: config.max_directory_length,
            forbidden_chars: compile("forbidden_chars", &config.forbidden_chars)?,
            root_directory: config.root_directory.clone(),
            traversal_sequence: config.traversal_sequence.clone(),
            terminal_punctuation: compile("terminal_punctuation", &config.terminal_punctuation)?,
            allowed_levels,
        })
    }

    /// Reject `value` if it contains a forbidden character.
    pub(crate) fn check_chars(&self, field: Field, value: &str) -> Result<(), ValidationError> {
        if self.forbidden_chars.is_match(value) {
            return Err(ValidationError::ForbiddenCharacters { field });
        }
        Ok(())
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
            .expect("default validation config should be valid")
    }
}

fn compile(setting: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        setting: setting.into(),
        reason: e.to_string(),
    })
}

/// All field validators bound to one set of rules.
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    rules: ValidationRules,
}

impl FieldValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &ValidationConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(ValidationRules::from_config(config)?))
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn validate_channel(&self, raw: &str) -> Result<String, ValidationError> {
        validate_channel(raw, &self.rules)
    }

    /// Validate against the configured allowed levels.
    pub fn validate_level(&self, raw: &str) -> Result<String, ValidationError> {
        validate_level(raw, &self.rules.allowed_levels)
    }

    /// Validate against a caller-supplied subset, e.g. per channel.
    pub fn validate_level_in<S: AsRef<str>>(
        &self,
        raw: &str,
        allowed: &[S],
    ) -> Result<String, ValidationError> {
        validate_level(raw, allowed)
    }

    pub fn validate_log_level(&self, raw: &str) -> Result<LogLevel, ValidationError> {
        validate_log_level(raw, &self.rules.allowed_levels)
    }

    pub fn validate_message(&self, raw: &str) -> Result<String, ValidationError> {
        validate_message(raw, &self.rules)
    }

    pub fn validate_directory(&self, raw: &str) -> Result<PathBuf, ValidationError> {
        validate_directory(raw, &self.rules)
    }

    pub fn validate_context(&self, value: &ContextValue) -> Result<ValidatedContext, ValidationError> {
        validate_context(value, &self.rules)
    }

    pub fn validate_timestamp<T: Any>(&self, value: &T) -> Result<DateTime<Utc>, ValidationError> {
        validate_timestamp(value)
    }
}
