use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::normalize;

/// Longest raw token accepted, in characters.
pub const MAX_MASK_TOKEN_LENGTH: usize = 40;

/// Marker name substituted for subtrees deeper than the configured limit.
pub const DEPTH_LIMIT_MARKER: &str = "[DEPTH_LIMIT_EXCEEDED]";
/// Marker name substituted for a map that contains itself.
pub const CIRCULAR_REFERENCE_MARKER: &str = "[CIRCULAR_REFERENCE_DETECTED]";
/// Replacement for a real value that happens to equal the mask token.
pub const MASK_COLLISION_MARKER: &str = "[MASK_TOKEN_COLLISION]";

const RESERVED_MARKERS: &[&str] = &[
    DEPTH_LIMIT_MARKER,
    CIRCULAR_REFERENCE_MARKER,
    MASK_COLLISION_MARKER,
];

// A mask that log viewers could interpret as code or encoded payload.
static FORBIDDEN_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)base64|script|php").expect("static regex"));

/// A validated, normalized mask token such as `[MASKED]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaskToken(String);

impl MaskToken {
    /// Validate and normalize a raw token.
    ///
    /// Surrounding and interior brackets are stripped, the rest upper-cased
    /// and wrapped in exactly one pair of brackets: `redacted` → `[REDACTED]`.
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let token = normalize::clean(raw);
        if token.is_empty() {
            return Err(ConfigError::EmptyMaskToken);
        }
        if normalize::char_len(token) > MAX_MASK_TOKEN_LENGTH {
            return Err(ConfigError::MaskTokenTooLong {
                max: MAX_MASK_TOKEN_LENGTH,
            });
        }
        if normalize::has_control_chars(token) {
            return Err(ConfigError::MaskTokenControlCharacters);
        }
        if FORBIDDEN_CONTENT.is_match(token) {
            return Err(ConfigError::MaskTokenForbidden);
        }

        let inner: String = token
            .trim_start_matches('[')
            .trim_end_matches(']')
            .chars()
            .filter(|&c| c != '[' && c != ']')
            .collect();
        let inner = inner.trim();
        if inner.is_empty() {
            return Err(ConfigError::EmptyMaskToken);
        }

        let normalized = format!("[{}]", inner.to_uppercase());
        if RESERVED_MARKERS.contains(&normalized.as_str()) {
            return Err(ConfigError::MaskTokenReserved { marker: normalized });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MaskToken {
    fn default() -> Self {
        Self("[MASKED]".into())
    }
}

impl fmt::Display for MaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
