use crate::error::{Field, ValidationError};
use crate::normalize;

use super::ValidationRules;

/// Validate a channel name and return it lowercased.
///
/// The channel becomes a file name, so control characters, path separators
/// and traversal sequences are never allowed.
pub fn validate_channel(raw: &str, rules: &ValidationRules) -> Result<String, ValidationError> {
    let channel = normalize::clean(raw);
    if channel.is_empty() {
        return Err(ValidationError::Empty {
            field: Field::Channel,
        });
    }
    if normalize::char_len(channel) > rules.max_channel_length {
        return Err(ValidationError::TooLong {
            field: Field::Channel,
            max: rules.max_channel_length,
        });
    }
    rules.check_chars(Field::Channel, channel)?;
    if !is_file_name(channel, &rules.traversal_sequence) {
        return Err(ValidationError::ChannelNotFileName);
    }
    Ok(channel.to_lowercase())
}

/// True if `name` can only ever resolve to a file directly inside the log
/// directory.
pub(crate) fn is_file_name(name: &str, traversal_sequence: &str) -> bool {
    !name.contains(['/', '\\', ':'])
        && name != "."
        && name != ".."
        && (traversal_sequence.is_empty() || !name.contains(traversal_sequence))
}
