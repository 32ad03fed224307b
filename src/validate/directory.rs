use std::path::PathBuf;

use crate::error::{Field, ValidationError};
use crate::normalize;

use super::ValidationRules;

/// Validate a log directory path.
///
/// NUL bytes, surrounding whitespace and trailing slashes are stripped
/// first. The root directory and any path containing the traversal sequence
/// are rejected.
pub fn validate_directory(raw: &str, rules: &ValidationRules) -> Result<PathBuf, ValidationError> {
    let stripped = normalize::strip_nul(raw);
    let trimmed = normalize::clean(&stripped);
    if trimmed.is_empty() {
        return Err(ValidationError::Empty {
            field: Field::Directory,
        });
    }

    let dir = trimmed.trim_end_matches('/');
    if dir.is_empty() || dir == rules.root_directory {
        return Err(ValidationError::RootDirectory);
    }
    if !rules.traversal_sequence.is_empty() && dir.contains(&rules.traversal_sequence) {
        return Err(ValidationError::DirectoryTraversal);
    }
    rules.check_chars(Field::Directory, dir)?;
    if normalize::char_len(dir) > rules.max_directory_length {
        return Err(ValidationError::TooLong {
            field: Field::Directory,
            max: rules.max_directory_length,
        });
    }
    Ok(PathBuf::from(dir))
}
