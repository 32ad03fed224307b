use std::path::PathBuf;

/// Problems detected while wiring the pipeline. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("mask token is empty")]
    EmptyMaskToken,

    #[error("mask token exceeds {max} characters")]
    MaskTokenTooLong { max: usize },

    #[error("mask token contains control characters")]
    MaskTokenControlCharacters,

    #[error("mask token contains forbidden content")]
    MaskTokenForbidden,

    #[error("mask token collides with reserved marker {marker}")]
    MaskTokenReserved { marker: String },

    #[error("sensitive key list is empty")]
    EmptySensitiveKeys,

    #[error("invalid regex pattern for {setting}: {reason}")]
    InvalidPattern { setting: String, reason: String },

    #[error("invalid log level in configuration: {level}")]
    InvalidLevel { level: String },

    #[error("glob pattern error: {pattern}: {reason}")]
    GlobPattern { pattern: String, reason: String },
}

/// The log field a validation rule was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Channel,
    Level,
    Message,
    Directory,
    Context,
    Timestamp,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Channel => "channel",
            Field::Level => "level",
            Field::Message => "message",
            Field::Directory => "directory",
            Field::Context => "context",
            Field::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A field failed validation. Messages never echo the rejected content,
/// only the field, the rule and (for context) the key path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: Field },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: Field, max: usize },

    #[error("{field} contains forbidden characters")]
    ForbiddenCharacters { field: Field },

    #[error("channel must be a plain file name")]
    ChannelNotFileName,

    #[error("level '{level}' is not one of the allowed levels")]
    InvalidLevel { level: String },

    #[error("directory cannot be the root directory")]
    RootDirectory,

    #[error("directory traversal detected")]
    DirectoryTraversal,

    #[error("timestamp must be an instant, got {type_name}")]
    InvalidTimestamp { type_name: String },

    #[error("context must be a mapping or a list")]
    ContextNotMapping,

    #[error("context key at '{path}' cannot be empty")]
    EmptyKey { path: String },

    #[error("context key at '{path}' exceeds maximum length of {max} characters")]
    KeyTooLong { path: String, max: usize },

    #[error("context key at '{path}' contains forbidden characters")]
    KeyForbiddenCharacters { path: String },

    #[error("duplicate context key '{path}' after normalization")]
    DuplicateKey { path: String },

    #[error("context value at '{path}' cannot be empty")]
    EmptyValue { path: String },

    #[error("context value at '{path}' exceeds maximum length of {max} characters")]
    ValueTooLong { path: String, max: usize },

    #[error("context value at '{path}' contains forbidden characters")]
    ValueForbiddenCharacters { path: String },

    #[error("context at '{path}' refers to itself")]
    CircularReference { path: String },
}

impl ValidationError {
    /// The field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Empty { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::ForbiddenCharacters { field } => *field,
            ValidationError::ChannelNotFileName => Field::Channel,
            ValidationError::InvalidLevel { .. } => Field::Level,
            ValidationError::RootDirectory | ValidationError::DirectoryTraversal => {
                Field::Directory
            }
            ValidationError::InvalidTimestamp { .. } => Field::Timestamp,
            _ => Field::Context,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogsecError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogsecError>;
