/// OctreeNode: the atomic unit of the Octree.
///
/// Each node is axis-aligned, has valid bounds at all times and owns either
/// 0 or exactly 8 children of equal size. Objects are stored in exactly one
/// node: the deepest node whose bounds fully contain the object's world
/// bounds. Objects straddling a child boundary, or with invalid bounds, stay
/// in the node where the descent stopped.
///
/// Nodes live in the Octree's slot map. `parent` is a plain key, so a child
/// never keeps its parent alive.

use slotmap::new_key_type;
use crate::math::AABB;

new_key_type! {
    /// Stable key for a node within an Octree.
    ///
    /// Keys of discarded nodes (after a root regraft) become invalid.
    pub struct NodeKey;
}

/// A single node in the octree.
pub struct OctreeNode<N> {
    /// World-space bounds of this node
    pub(super) bounds: AABB,
    /// Parent node (None for the root)
    pub(super) parent: Option<NodeKey>,
    /// The 8 octants, indexed with the AABB::octant bit layout (None = leaf)
    pub(super) children: Option<[NodeKey; 8]>,
    /// Objects assigned to this node, in link order
    pub(super) members: Vec<N>,
}

impl<N> OctreeNode<N> {
    pub(super) fn new(bounds: AABB, parent: Option<NodeKey>) -> Self {
        debug_assert!(bounds.is_valid(), "octree node bounds must be valid");
        Self {
            bounds,
            parent,
            children: None,
            members: Vec::new(),
        }
    }

    /// The bounds of this node
    #[inline]
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// The parent node (None for the root)
    #[inline]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// The child nodes (either 8 or 0)
    pub fn children(&self) -> &[NodeKey] {
        match &self.children {
            Some(children) => children.as_slice(),
            None => &[],
        }
    }

    /// Child in octant `octant` (bit0 = +X, bit1 = +Y, bit2 = +Z)
    pub fn child(&self, octant: u8) -> Option<NodeKey> {
        self.children.map(|children| children[octant as usize])
    }

    /// Objects stored directly in this node
    #[inline]
    pub fn members(&self) -> &[N] {
        &self.members
    }

    /// Number of objects stored directly in this node
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// True if this node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
