use serde::{Deserialize, Serialize};

/// Sanitizer settings: what counts as sensitive and how it is masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizationConfig {
    /// Key names whose values are always masked.
    pub sensitive_keys: Vec<String>,

    /// Regex patterns; a string value matching any of them is masked.
    pub sensitive_patterns: Vec<String>,

    /// Deepest container level that is walked. Default: 8.
    pub max_depth: usize,

    /// Placeholder written in place of sensitive content. Default: `[MASKED]`.
    pub mask_token: String,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            sensitive_keys: default_sensitive_keys(),
            sensitive_patterns: default_sensitive_patterns(),
            max_depth: 8,
            mask_token: "[MASKED]".into(),
        }
    }
}

/// Default deny-list of key names, English and Portuguese.
pub fn default_sensitive_keys() -> Vec<String> {
    vec![
        "password".into(),
        "passwd".into(),
        "token".into(),
        "access_token".into(),
        "refresh_token".into(),
        "secret".into(),
        "api_key".into(),
        "apikey".into(),
        "authorization".into(),
        "credit_card".into(),
        "card_number".into(),
        "cvv".into(),
        "ssn".into(),
        // Portuguese
        "senha".into(),
        "chave_api".into(),
        "segredo".into(),
        "cpf".into(),
        "cnpj".into(),
    ]
}

/// Default value patterns for credentials and personal identifiers.
pub fn default_sensitive_patterns() -> Vec<String> {
    vec![
        // Card numbers: 13-19 digits, optionally grouped by spaces or dashes
        r"\b(?:\d[ -]?){12,18}\d\b".into(),
        // Email addresses
        r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}".into(),
        // CPF: 000.000.000-00
        r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b".into(),
        // CNPJ: 00.000.000/0000-00
        r"\b\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b".into(),
        // Credential phrases such as "password: abc123" or "senha=abc"
        r"(?i)\b(?:password|passwd|senha|secret|segredo|token|api[_-]?key)\s*[:=]\s*\S+".into(),
        // Bearer tokens
        r"(?i)\bbearer\s+[A-Za-z0-9_\-\.=]{8,}".into(),
    ]
}

/// Validator settings: length limits and character rules per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub max_channel_length: usize,
    pub max_message_length: usize,
    pub max_context_key_length: usize,
    pub max_context_value_length: usize,
    pub max_directory_length: usize,

    /// Characters rejected in every string field.
    pub forbidden_chars: String,

    /// A directory equal to this (after trailing slashes are stripped) is rejected.
    pub root_directory: String,

    /// A directory containing this substring is rejected.
    pub traversal_sequence: String,

    /// Messages not matching this get a trailing `.` appended.
    pub terminal_punctuation: String,

    /// Levels accepted by the level validator.
    pub allowed_levels: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_channel_length: 64,
            max_message_length: 2000,
            max_context_key_length: 64,
            max_context_value_length: 1000,
            max_directory_length: 255,
            forbidden_chars: r"[\x00-\x1F\x7F]".into(),
            root_directory: "/".into(),
            traversal_sequence: "..".into(),
            terminal_punctuation: r"[.!?]$".into(),
            allowed_levels: vec![
                "debug".into(),
                "info".into(),
                "warning".into(),
                "error".into(),
                "critical".into(),
            ],
        }
    }
}
