//! Sparse per-coordinate block overrides.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use holt_blocks::BlockId;

/// One override layer: either a world's global layer or a player's private
/// layer. Entries shadow generated terrain at their coordinate; an absent
/// entry means the generator's output stands. Air is never stored: callers
/// delete the entry instead, restoring fallthrough to generation.
///
/// Growth is unbounded; nothing evicts entries.
#[derive(Default, Debug, Clone)]
pub struct EditLayer {
    inner: HashMap<(i32, i32, i32), BlockId>,
}

impl EditLayer {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.inner.get(&(x, y, z)).copied()
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, b: BlockId) {
        self.inner.insert((x, y, z), b);
    }

    pub fn remove(&mut self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.inner.remove(&(x, y, z))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32, i32), BlockId)> + '_ {
        self.inner.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_roundtrip() {
        let mut layer = EditLayer::new();
        assert!(layer.is_empty());
        layer.set(1, -2, 30, 7);
        assert_eq!(layer.get(1, -2, 30), Some(7));
        assert_eq!(layer.get(1, -2, 31), None);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.remove(1, -2, 30), Some(7));
        assert_eq!(layer.get(1, -2, 30), None);
        assert!(layer.is_empty());
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut layer = EditLayer::new();
        layer.set(0, 0, 0, 3);
        layer.set(0, 0, 0, 4);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.get(0, 0, 0), Some(4));
    }

    #[test]
    fn removing_absent_entry_is_a_noop() {
        let mut layer = EditLayer::new();
        assert_eq!(layer.remove(9, 9, 9), None);
        assert!(layer.is_empty());
    }
}
