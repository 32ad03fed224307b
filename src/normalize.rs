//! String normalization primitives shared by validators and detectors.

/// Trim surrounding whitespace.
pub fn clean(input: &str) -> &str {
    input.trim()
}

/// Remove every NUL byte.
pub fn strip_nul(input: &str) -> String {
    input.chars().filter(|&c| c != '\0').collect()
}

/// Length in characters, which is what all configured limits count.
pub fn char_len(input: &str) -> usize {
    input.chars().count()
}

/// Trim and lowercase. Used for channels, levels and context keys.
pub fn fold_key(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True if the string contains any C0 control character or DEL.
pub fn has_control_chars(input: &str) -> bool {
    input.chars().any(|c| c.is_control())
}
