//! Single entry point combining the context sanitizer and the field
//! validators. Build one per process and share it.

use std::any::Any;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::context::ContextValue;
use crate::entry::LogLevel;
use crate::error::{ConfigError, ValidationError};
use crate::sanitize::{ContextSanitizer, MaskToken};
use crate::validate::{FieldValidator, ValidatedContext};

#[derive(Debug, Clone, Default)]
pub struct LogGuard {
    sanitizer: ContextSanitizer,
    validator: FieldValidator,
}

impl LogGuard {
    pub fn new(sanitizer: ContextSanitizer, validator: FieldValidator) -> Self {
        Self {
            sanitizer,
            validator,
        }
    }

    /// Compile both halves from configuration. Any error here means the
    /// process cannot log safely and should not start.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            ContextSanitizer::from_config(&settings.sanitization)?,
            FieldValidator::from_config(&settings.validation)?,
        ))
    }

    pub fn sanitizer(&self) -> &ContextSanitizer {
        &self.sanitizer
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn sanitize(&self, input: &ContextValue) -> ContextValue {
        self.sanitizer.sanitize(input)
    }

    pub fn sanitize_with_mask(&self, input: &ContextValue, mask: &MaskToken) -> ContextValue {
        self.sanitizer.sanitize_with_mask(input, mask)
    }

    pub fn is_sensitive_key(&self, key: &str) -> bool {
        self.sanitizer.is_sensitive_key(key)
    }

    /// Sanitize, then validate.
    pub fn clean_context(&self, input: &ContextValue) -> Result<ValidatedContext, ValidationError> {
        self.validator.validate_context(&self.sanitizer.sanitize(input))
    }

    pub fn validate_channel(&self, raw: &str) -> Result<String, ValidationError> {
        self.validator.validate_channel(raw)
    }

    pub fn validate_level(&self, raw: &str) -> Result<String, ValidationError> {
        self.validator.validate_level(raw)
    }

    pub fn validate_level_in<S: AsRef<str>>(
        &self,
        raw: &str,
        allowed: &[S],
    ) -> Result<String, ValidationError> {
        self.validator.validate_level_in(raw, allowed)
    }

    pub fn validate_log_level(&self, raw: &str) -> Result<LogLevel, ValidationError> {
        self.validator.validate_log_level(raw)
    }

    pub fn validate_message(&self, raw: &str) -> Result<String, ValidationError> {
        self.validator.validate_message(raw)
    }

    pub fn validate_directory(&self, raw: &str) -> Result<PathBuf, ValidationError> {
        self.validator.validate_directory(raw)
    }

    pub fn validate_context(&self, value: &ContextValue) -> Result<ValidatedContext, ValidationError> {
        self.validator.validate_context(value)
    }

    pub fn validate_timestamp<T: Any>(&self, value: &T) -> Result<DateTime<Utc>, ValidationError> {
        self.validator.validate_timestamp(value)
    }
}
