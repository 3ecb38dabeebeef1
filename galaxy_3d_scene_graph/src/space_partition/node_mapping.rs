/// NodeMapping: reverse lookup from object identity to its owning node.
///
/// The only way the Octree finds an object for removal: O(1) lookup, then
/// a scan of that single node's member list. Every link registers an entry
/// and every unlink drops it, whether or not the object was really present.

use std::fmt::Debug;
use std::hash::Hash;
use rustc_hash::FxHashMap;
use super::octree_node::NodeKey;

/// Object identity → owning node
pub struct NodeMapping<K> {
    map: FxHashMap<K, NodeKey>,
}

impl<K: Copy + Eq + Hash + Debug> NodeMapping<K> {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Record that `id` is now a member of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered: an object must be unlinked
    /// before it is linked again.
    pub fn notify_link(&mut self, id: K, node: NodeKey) {
        if let Some(existing) = self.map.get(&id) {
            crate::scene_error!("galaxy3d::NodeMapping",
                "Object {:?} linked to {:?} while already linked to {:?}", id, node, existing);
            panic!("object {:?} is already linked in the octree", id);
        }
        self.map.insert(id, node);
    }

    /// Drop the entry for `id`, if any. Returns the node it named.
    pub fn notify_unlink(&mut self, id: K) -> Option<NodeKey> {
        self.map.remove(&id)
    }

    /// The node currently owning `id`
    #[inline]
    pub fn get(&self, id: K) -> Option<NodeKey> {
        self.map.get(&id).copied()
    }

    /// Number of registered objects
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no object is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over (identity, node) entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (K, NodeKey)> + '_ {
        self.map.iter().map(|(id, node)| (*id, *node))
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for NodeMapping<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "node_mapping_tests.rs"]
mod tests;
