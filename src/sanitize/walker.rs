use std::collections::HashSet;

use crate::context::{ContextMap, ContextValue};

use super::mask::{
    MaskToken, CIRCULAR_REFERENCE_MARKER, DEPTH_LIMIT_MARKER, MASK_COLLISION_MARKER,
};
use super::SanitizationPolicy;

/// One sanitize pass over a context tree.
///
/// `on_stack` holds the identities of the shared maps between the root and
/// the current node. An identity is removed when its map is left, so two
/// siblings referring to the same map are both walked normally.
pub(crate) struct Walker<'a> {
    policy: &'a SanitizationPolicy,
    mask: &'a MaskToken,
    on_stack: HashSet<usize>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(policy: &'a SanitizationPolicy, mask: &'a MaskToken) -> Self {
        Self {
            policy,
            mask,
            on_stack: HashSet::new(),
        }
    }

    /// Sanitize `value` found at `depth` (the root container is depth 0).
    pub(crate) fn walk(&mut self, value: &ContextValue, depth: usize) -> ContextValue {
        if value.is_container() && depth > self.policy.max_depth() {
            tracing::debug!(depth, "context subtree exceeds depth limit");
            return marker(DEPTH_LIMIT_MARKER);
        }
        match value {
            ContextValue::Map(map) => ContextValue::Map(self.walk_map(map, depth)),
            ContextValue::List(items) => ContextValue::List(
                items
                    .iter()
                    .map(|item| self.walk_child(item, depth))
                    .collect(),
            ),
            ContextValue::Shared(shared) => {
                let id = shared.identity();
                if !self.on_stack.insert(id) {
                    tracing::debug!(depth, "circular reference in context");
                    return marker(CIRCULAR_REFERENCE_MARKER);
                }
                let sanitized = self.walk_map(&shared.borrow(), depth);
                self.on_stack.remove(&id);
                ContextValue::Map(sanitized)
            }
            leaf => self.leaf(leaf),
        }
    }

    fn walk_map(&mut self, map: &ContextMap, depth: usize) -> ContextMap {
        let mut out = ContextMap::new();
        for (key, value) in map.iter() {
            let sanitized = if self.policy.keys().is_sensitive_key(key) {
                ContextValue::Masked(self.mask.as_str().to_string())
            } else {
                self.walk_child(value, depth)
            };
            out.insert(key, sanitized);
        }
        out
    }

    fn walk_child(&mut self, value: &ContextValue, depth: usize) -> ContextValue {
        if value.is_container() {
            self.walk(value, depth + 1)
        } else {
            self.leaf(value)
        }
    }

    fn leaf(&self, value: &ContextValue) -> ContextValue {
        match value {
            ContextValue::String(s) if self.policy.patterns().is_sensitive_value(s) => {
                ContextValue::Masked(self.mask.as_str().to_string())
            }
            // A real value that reads like the mask would be indistinguishable
            // from masked content in the log file.
            ContextValue::String(s) if s == self.mask.as_str() => {
                ContextValue::String(MASK_COLLISION_MARKER.to_string())
            }
            other => other.clone(),
        }
    }
}

fn marker(name: &str) -> ContextValue {
    ContextValue::Map(ContextMap::new().with(name, true))
}
