//! Context sanitization: masks sensitive keys and values, bounds recursion
//! depth and breaks reference cycles.
//!
//! Sanitizing never fails. Problems in the input become data: masked leaves,
//! or marker maps such as `{"[DEPTH_LIMIT_EXCEEDED]": true}` in place of a
//! subtree. The only errors are raised once, when a policy is built from
//! configuration.

pub mod keys;
pub mod mask;
pub mod patterns;
mod walker;

pub use keys::SensitiveKeyDetector;
pub use mask::{
    MaskToken, CIRCULAR_REFERENCE_MARKER, DEPTH_LIMIT_MARKER, MASK_COLLISION_MARKER,
};
pub use patterns::SensitivePatternDetector;

use crate::config::SanitizationConfig;
use crate::context::ContextValue;
use crate::error::ConfigError;

use walker::Walker;

/// Immutable sanitizer configuration, compiled once at startup.
#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    keys: SensitiveKeyDetector,
    patterns: SensitivePatternDetector,
    max_depth: usize,
    mask: MaskToken,
}

impl SanitizationPolicy {
    pub fn new(
        keys: SensitiveKeyDetector,
        patterns: SensitivePatternDetector,
        max_depth: usize,
        mask: MaskToken,
    ) -> Self {
        Self {
            keys,
            patterns,
            max_depth,
            mask,
        }
    }

    pub fn from_config(config: &SanitizationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            keys: SensitiveKeyDetector::new(&config.sensitive_keys)?,
            patterns: SensitivePatternDetector::new(&config.sensitive_patterns)?,
            max_depth: config.max_depth,
            mask: MaskToken::new(&config.mask_token)?,
        })
    }

    pub fn keys(&self) -> &SensitiveKeyDetector {
        &self.keys
    }

    pub fn patterns(&self) -> &SensitivePatternDetector {
        &self.patterns
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn mask(&self) -> &MaskToken {
        &self.mask
    }
}

/// Recursive context sanitizer bound to one [`SanitizationPolicy`].
#[derive(Debug, Clone)]
pub struct ContextSanitizer {
    policy: SanitizationPolicy,
}

impl ContextSanitizer {
    pub fn new(policy: SanitizationPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &SanitizationConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(SanitizationPolicy::from_config(config)?))
    }

    /// Sanitize with the policy's mask token.
    ///
    /// The result has the shape of the input, with shared maps copied out
    /// into plain maps.
    pub fn sanitize(&self, input: &ContextValue) -> ContextValue {
        self.sanitize_with_mask(input, &self.policy.mask)
    }

    /// Sanitize with a caller-supplied mask token.
    pub fn sanitize_with_mask(&self, input: &ContextValue, mask: &MaskToken) -> ContextValue {
        Walker::new(&self.policy, mask).walk(input, 0)
    }

    pub fn is_sensitive_key(&self, key: &str) -> bool {
        self.policy.keys.is_sensitive_key(key)
    }

    pub fn is_sensitive_value(&self, value: &str) -> bool {
        self.policy.patterns.is_sensitive_value(value)
    }

    pub fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }
}

impl Default for ContextSanitizer {
    fn default() -> Self {
        Self::from_config(&SanitizationConfig::default())
            .expect("default sanitization config should be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextMap, SharedMap};
    use serde_json::json;

    fn sanitizer_with_depth(max_depth: usize) -> ContextSanitizer {
        ContextSanitizer::from_config(&SanitizationConfig {
            max_depth,
            ..Default::default()
        })
        .unwrap()
    }

    fn masked() -> ContextValue {
        ContextValue::Masked("[MASKED]".into())
    }

    fn depth_marker() -> ContextValue {
        ContextValue::Map(ContextMap::new().with(DEPTH_LIMIT_MARKER, true))
    }

    #[test]
    fn test_masks_sensitive_key() {
        let san = ContextSanitizer::default();
        let out = san.sanitize(&json!({"password": "s3cr3t", "user": "alice"}).into());
        assert_eq!(out.get("password"), Some(&masked()));
        assert_eq!(out.get("user"), Some(&ContextValue::from("alice")));
    }

    #[test]
    fn test_sensitive_key_masks_whole_subtree() {
        let san = ContextSanitizer::default();
        let out = san.sanitize(&json!({"token": {"value": "abc", "expires": 10}}).into());
        assert_eq!(out.get("token"), Some(&masked()));
    }

    #[test]
    fn test_masks_sensitive_values() {
        let san = ContextSanitizer::default();
        let out = san.sanitize(
            &json!({
                "note": "card 4111 1111 1111 1111",
                "email": "ana@example.com",
                "doc": "123.456.789-09",
                "quote_id": 42
            })
            .into(),
        );
        assert_eq!(out.get("note"), Some(&masked()));
        assert_eq!(out.get("email"), Some(&masked()));
        assert_eq!(out.get("doc"), Some(&masked()));
        assert_eq!(out.get("quote_id"), Some(&ContextValue::Int(42)));
    }

    #[test]
    fn test_lists_are_walked() {
        let san = ContextSanitizer::default();
        let out = san.sanitize(&json!({"users": [{"name": "a", "senha": "x"}, "b@c.io"]}).into());
        let expected: ContextValue = ContextValue::List(vec![
            ContextValue::Map(
                ContextMap::new()
                    .with("name", "a")
                    .with("senha", masked()),
            ),
            masked(),
        ]);
        assert_eq!(out.get("users"), Some(&expected));
    }

    #[test]
    fn test_value_equal_to_mask_is_marked() {
        let san = ContextSanitizer::default();
        let out = san.sanitize(&json!({"comment": "[MASKED]"}).into());
        assert_eq!(
            out.get("comment"),
            Some(&ContextValue::from(MASK_COLLISION_MARKER))
        );
    }

    #[test]
    fn test_depth_limit() {
        let san = sanitizer_with_depth(2);
        let input: ContextValue = json!({"a": {"b": {"c": {"d": 1}}, "x": 1}}).into();
        let out = san.sanitize(&input);
        let b = out.get("a").and_then(|a| a.get("b")).unwrap();
        assert_eq!(b.get("c"), Some(&depth_marker()));
        assert_eq!(out.get("a").and_then(|a| a.get("x")), Some(&ContextValue::Int(1)));
    }

    #[test]
    fn test_depth_zero_sanitizes_top_level_only() {
        let san = sanitizer_with_depth(0);
        let out = san.sanitize(
            &json!({"password": "x", "user": "bob", "nested": {"k": "v"}}).into(),
        );
        assert_eq!(out.get("password"), Some(&masked()));
        assert_eq!(out.get("user"), Some(&ContextValue::from("bob")));
        assert_eq!(out.get("nested"), Some(&depth_marker()));
    }

    #[test]
    fn test_self_reference() {
        let san = ContextSanitizer::default();
        let a = SharedMap::default();
        a.insert("name", "loop");
        a.insert("self", a.clone());

        let out = san.sanitize(&ContextValue::Shared(a));
        assert_eq!(out.get("name"), Some(&ContextValue::from("loop")));
        assert_eq!(
            out.get("self"),
            Some(&ContextValue::Map(
                ContextMap::new().with(CIRCULAR_REFERENCE_MARKER, true)
            ))
        );
    }

    #[test]
    fn test_shared_siblings_not_flagged() {
        let san = ContextSanitizer::default();
        let shared = SharedMap::new(ContextMap::new().with("city", "Recife").with("cpf", "1"));
        let root = ContextMap::new()
            .with("billing", shared.clone())
            .with("shipping", shared);

        let out = san.sanitize(&ContextValue::Map(root));
        let expected = ContextValue::Map(
            ContextMap::new()
                .with("city", "Recife")
                .with("cpf", masked()),
        );
        assert_eq!(out.get("billing"), Some(&expected));
        assert_eq!(out.get("shipping"), Some(&expected));
    }

    #[test]
    fn test_custom_mask() {
        let san = ContextSanitizer::default();
        let mask = MaskToken::new("redacted").unwrap();
        let out = san.sanitize_with_mask(&json!({"secret": "x"}).into(), &mask);
        assert_eq!(
            out.get("secret"),
            Some(&ContextValue::Masked("[REDACTED]".into()))
        );
    }

    #[test]
    fn test_top_level_scalar() {
        let san = ContextSanitizer::default();
        assert_eq!(san.sanitize(&"hello".into()), ContextValue::from("hello"));
        assert_eq!(
            san.sanitize(&"password: hunter2".into()),
            masked()
        );
    }
}
