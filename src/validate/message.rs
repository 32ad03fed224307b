use crate::error::{Field, ValidationError};
use crate::normalize;

use super::ValidationRules;

/// Validate a log message and normalize it into a sentence: first character
/// upper-cased, terminal punctuation added when missing.
pub fn validate_message(raw: &str, rules: &ValidationRules) -> Result<String, ValidationError> {
    let message = normalize::clean(raw);
    if message.is_empty() {
        return Err(ValidationError::Empty {
            field: Field::Message,
        });
    }
    rules.check_chars(Field::Message, message)?;
    if normalize::char_len(message) > rules.max_message_length {
        return Err(ValidationError::TooLong {
            field: Field::Message,
            max: rules.max_message_length,
        });
    }

    let mut sentence = normalize::capitalize_first(message);
    if !rules.terminal_punctuation.is_match(&sentence) {
        sentence.push('.');
    }
    Ok(sentence)
}
