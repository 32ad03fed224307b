use crate::entry::LogLevel;
use crate::error::{Field, ValidationError};
use crate::normalize;

/// Validate a level name against the caller's allowed set.
///
/// The allowed set is a parameter so callers can narrow it per channel.
/// Returns the trimmed, lowercased level.
pub fn validate_level<S: AsRef<str>>(raw: &str, allowed: &[S]) -> Result<String, ValidationError> {
    let level = normalize::fold_key(raw);
    if level.is_empty() {
        return Err(ValidationError::Empty {
            field: Field::Level,
        });
    }
    if !allowed
        .iter()
        .any(|a| normalize::fold_key(a.as_ref()) == level)
    {
        return Err(ValidationError::InvalidLevel { level });
    }
    Ok(level)
}

/// Like [`validate_level`], but resolves aliases (`warn`) and returns the
/// typed level.
pub fn validate_log_level<S: AsRef<str>>(
    raw: &str,
    allowed: &[S],
) -> Result<LogLevel, ValidationError> {
    let folded = normalize::fold_key(raw);
    if folded.is_empty() {
        return Err(ValidationError::Empty {
            field: Field::Level,
        });
    }
    let level: LogLevel = folded
        .parse()
        .map_err(|_| ValidationError::InvalidLevel {
            level: folded.clone(),
        })?;
    validate_level(level.as_str(), allowed)?;
    Ok(level)
}
