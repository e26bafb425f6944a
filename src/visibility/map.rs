//! `VisibilityMap`: region key -> "has entered the viewport".

use std::collections::HashMap;

use super::region::RegionKey;

/// Current visibility flag per region.
///
/// A key is present only while its region is mounted. An absent key reads as
/// not visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    flags: HashMap<RegionKey, bool>,
}

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is visible. Absent keys are not.
    pub fn is_visible(&self, key: RegionKey) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    /// The raw flag, distinguishing "absent" from "present but false".
    pub fn get(&self, key: RegionKey) -> Option<bool> {
        self.flags.get(&key).copied()
    }

    /// Set the flag. Returns true if the stored value changed.
    pub fn set(&mut self, key: RegionKey, visible: bool) -> bool {
        self.flags.insert(key, visible) != Some(visible)
    }

    /// Drop the key entirely.
    pub fn remove(&mut self, key: RegionKey) {
        self.flags.remove(&key);
    }

    pub fn contains(&self, key: RegionKey) -> bool {
        self.flags.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Keys currently flagged visible, sorted in page order.
    pub fn visible_keys(&self) -> Vec<RegionKey> {
        let mut keys: Vec<RegionKey> = self
            .flags
            .iter()
            .filter_map(|(key, visible)| visible.then_some(*key))
            .collect();
        keys.sort();
        keys
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_reads_as_not_visible() {
        let map = VisibilityMap::new();
        assert!(!map.is_visible(RegionKey::Header));
        assert_eq!(map.get(RegionKey::Header), None);
    }

    #[test]
    fn set_reports_changes() {
        let mut map = VisibilityMap::new();
        assert!(map.set(RegionKey::Form, false));
        assert!(!map.set(RegionKey::Form, false));
        assert!(map.set(RegionKey::Form, true));
        assert!(map.is_visible(RegionKey::Form));
    }

    #[test]
    fn remove_forgets_key() {
        let mut map = VisibilityMap::new();
        map.set(RegionKey::Error, true);
        map.remove(RegionKey::Error);
        assert!(!map.contains(RegionKey::Error));
        assert!(map.is_empty());
    }

    #[test]
    fn visible_keys_in_page_order() {
        let mut map = VisibilityMap::new();
        map.set(RegionKey::Disclaimer, true);
        map.set(RegionKey::Header, true);
        map.set(RegionKey::Form, false);
        assert_eq!(
            map.visible_keys(),
            vec![RegionKey::Header, RegionKey::Disclaimer]
        );
        assert_eq!(map.len(), 3);
    }
}
