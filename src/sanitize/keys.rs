use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::ConfigError;

/// Separators ignored when comparing keys (`pass_word`, `api-key`, `api@key`).
const SEPARATORS: &[char] = &['_', '-', '@'];

/// Vowels dropped for the consonant skeleton, Latin plus Portuguese accents.
const VOWELS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'á', 'à', 'â', 'ã', 'ä', 'é', 'è', 'ê', 'ë', 'í', 'ì', 'î', 'ï',
    'ó', 'ò', 'ô', 'õ', 'ö', 'ú', 'ù', 'û', 'ü',
];

/// Decides whether a context key names sensitive data.
///
/// Every key is compared in four forms against the same four forms of every
/// deny-list entry:
///
/// 1. trimmed and lowercased
/// 2. form 1 decomposed (NFD) with combining marks dropped, so `pássword`
///    compares as `password`
/// 3. form 1 without `_`, `-` and `@`
/// 4. form 1 without vowels
///
/// This catches trivial evasions of the exact list. It is a heuristic, not a
/// guarantee: value patterns remain the second line of defense.
#[derive(Debug, Clone)]
pub struct SensitiveKeyDetector {
    forms: HashSet<String>,
    entries: usize,
}

impl SensitiveKeyDetector {
    pub fn new<S: AsRef<str>>(keys: &[S]) -> Result<Self, ConfigError> {
        let mut forms = HashSet::new();
        let mut entries = 0;
        for key in keys {
            let variants = key_forms(key.as_ref());
            if variants.is_empty() {
                continue;
            }
            entries += 1;
            forms.extend(variants);
        }
        if entries == 0 {
            return Err(ConfigError::EmptySensitiveKeys);
        }
        Ok(Self { forms, entries })
    }

    pub fn is_sensitive_key(&self, key: &str) -> bool {
        key_forms(key).iter().any(|form| self.forms.contains(form))
    }

    /// Number of deny-list entries loaded.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// The four comparison forms of a key. Forms that end up empty are dropped,
/// so an all-vowel key never matches on its skeleton.
pub fn key_forms(key: &str) -> Vec<String> {
    let base = key.trim().to_lowercase();
    if base.is_empty() {
        return Vec::new();
    }
    let decomposed: String = base.nfd().filter(|&c| !is_combining_mark(c)).collect();
    let unseparated: String = base.chars().filter(|c| !SEPARATORS.contains(c)).collect();
    let skeleton: String = base.chars().filter(|c| !VOWELS.contains(c)).collect();

    let mut forms = vec![base];
    for form in [decomposed, unseparated, skeleton] {
        if !form.is_empty() && !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_sensitive_keys;

    fn detector() -> SensitiveKeyDetector {
        SensitiveKeyDetector::new(&default_sensitive_keys()).unwrap()
    }

    #[test]
    fn test_exact_and_case_insensitive() {
        let d = detector();
        assert!(d.is_sensitive_key("password"));
        assert!(d.is_sensitive_key("  PASSWORD "));
        assert!(d.is_sensitive_key("Senha"));
    }

    #[test]
    fn test_accents_are_folded() {
        let d = detector();
        assert!(d.is_sensitive_key("pássword"));
        // Already decomposed input: 'a' followed by U+0301
        assert!(d.is_sensitive_key("pa\u{301}ssword"));
        assert!(d.is_sensitive_key("sênha"));
    }

    #[test]
    fn test_separators_are_ignored() {
        let d = detector();
        assert!(d.is_sensitive_key("pass_word"));
        assert!(d.is_sensitive_key("api-key"));
        assert!(d.is_sensitive_key("chave-api"));
        assert!(d.is_sensitive_key("credit@card"));
    }

    #[test]
    fn test_vowel_skeleton() {
        let d = detector();
        assert!(d.is_sensitive_key("psswrd"));
        assert!(d.is_sensitive_key("tkn"));
        assert!(d.is_sensitive_key("sgrd"));
    }

    #[test]
    fn test_unrelated_keys() {
        let d = detector();
        assert!(!d.is_sensitive_key("username"));
        assert!(!d.is_sensitive_key("quotation_id"));
        assert!(!d.is_sensitive_key(""));
    }

    #[test]
    fn test_empty_list_is_config_error() {
        let empty: Vec<String> = vec!["  ".into()];
        assert!(matches!(
            SensitiveKeyDetector::new(&empty),
            Err(ConfigError::EmptySensitiveKeys)
        ));
    }

    #[test]
    fn test_key_forms() {
        assert_eq!(
            key_forms(" Pass_Word "),
            vec!["pass_word", "password", "pss_wrd"]
        );
    }
}
