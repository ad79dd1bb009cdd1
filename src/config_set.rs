//! Immutable slot-to-renderer mappings

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::overrides::Overrides;
use crate::renderer::Renderer;

/// Resolved mapping from slot name to renderer
///
/// A `ConfigSet` is never mutated once built. Merging produces a new set and
/// cloning shares the underlying storage, so handing sets down a render tree
/// costs a reference count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSet {
    slots: Arc<BTreeMap<String, Renderer>>,
}

impl ConfigSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the renderer bound to a slot
    pub fn get(&self, slot: &str) -> Option<&Renderer> {
        self.slots.get(slot)
    }

    /// Check if a slot is bound
    pub fn contains(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bound slot names, in sorted order
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Renderer)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether two sets share the same storage
    pub fn ptr_eq(&self, other: &ConfigSet) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }

    /// Apply a partial override on top of this set
    ///
    /// Override entries win per key. Entries without a renderer are treated as
    /// absent and keep this set's binding. When nothing would change, the
    /// result shares storage with `self`.
    pub fn merge(&self, overrides: &Overrides) -> ConfigSet {
        if overrides.present().next().is_none() {
            return self.clone();
        }

        let mut slots = (*self.slots).clone();
        for (slot, renderer) in overrides.present() {
            trace!(slot, replaced = slots.contains_key(slot), "override slot");
            slots.insert(slot.to_string(), renderer.clone());
        }
        ConfigSet {
            slots: Arc::new(slots),
        }
    }

    /// Layer a complete set on top of this one
    ///
    /// Every binding in `top` wins; bindings only present here are kept.
    pub fn overlay(&self, top: &ConfigSet) -> ConfigSet {
        if top.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return top.clone();
        }

        let mut slots = (*self.slots).clone();
        slots.extend(top.iter().map(|(k, v)| (k.to_string(), v.clone())));
        ConfigSet {
            slots: Arc::new(slots),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Renderer)> for ConfigSet {
    fn from_iter<I: IntoIterator<Item = (K, Renderer)>>(iter: I) -> Self {
        ConfigSet {
            slots: Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ConfigSet {
        [("code", Renderer::tag("r1")), ("heading", Renderer::tag("r2"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_merge_override_wins() {
        let merged = base().merge(&Overrides::new().with("code", Renderer::tag("r3")));
        assert_eq!(merged.get("code"), Some(&Renderer::tag("r3")));
        assert_eq!(merged.get("heading"), Some(&Renderer::tag("r2")));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_does_not_touch_original() {
        let original = base();
        let _ = original.merge(&Overrides::new().with("code", Renderer::tag("r3")));
        assert_eq!(original.get("code"), Some(&Renderer::tag("r1")));
    }

    #[test]
    fn test_merge_keeps_unknown_slots() {
        let merged = base().merge(&Overrides::new().with("sparkline", Renderer::tag("svg")));
        assert!(merged.contains("sparkline"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_absent_entry_falls_back() {
        let merged = base().merge(&Overrides::new().with_absent("code"));
        assert_eq!(merged.get("code"), Some(&Renderer::tag("r1")));
    }

    #[test]
    fn test_merge_empty_shares_storage() {
        let set = base();
        assert!(set.merge(&Overrides::new()).ptr_eq(&set));
        assert!(set.merge(&Overrides::new().with_absent("code")).ptr_eq(&set));
    }

    #[test]
    fn test_overlay() {
        let top: ConfigSet = [("code", Renderer::tag("kbd")), ("li", Renderer::tag("li"))]
            .into_iter()
            .collect();
        let layered = base().overlay(&top);
        assert_eq!(layered.get("code"), Some(&Renderer::tag("kbd")));
        assert_eq!(layered.get("heading"), Some(&Renderer::tag("r2")));
        assert_eq!(layered.slot_names().collect::<Vec<_>>(), vec!["code", "heading", "li"]);
    }
}
