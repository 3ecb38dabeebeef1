/// Octree: dynamic space partition for scene objects.
///
/// Uses single-node placement: each object is stored in exactly one node,
/// the deepest node whose bounds fully contain the object. If the object
/// straddles a child boundary, it stays in the parent.
///
/// Unlike a static octree, the tree grows on demand:
/// - a leaf subdivides into 8 octants once it holds `subdivision_threshold`
///   members and is larger than `min_node_extents`
/// - the root doubles (and is regrafted) until it contains every object
///   with valid bounds, capped by `max_world_coord`
///
/// Nodes live in a slot map, the root is replaced as a whole when it grows.
/// A `NodeMapping` gives O(1) access to the owning node of every object.

use glam::Vec3;
use slotmap::SlotMap;
use crate::error::Result;
use crate::indexed_object::IndexedObject;
use crate::math::AABB;
use crate::{scene_debug, scene_err, scene_error, scene_trace, scene_warn};
use super::config::OctreeConfig;
use super::node_mapping::NodeMapping;
use super::octree_node::{NodeKey, OctreeNode};

/// Dynamic octree space partition.
pub struct Octree<N: IndexedObject> {
    /// All live nodes
    nodes: SlotMap<NodeKey, OctreeNode<N>>,
    /// Current root node
    root: NodeKey,
    /// Reverse lookup: object id → owning node
    mapping: NodeMapping<N::Id>,
    config: OctreeConfig,
}

impl<N: IndexedObject> Octree<N> {
    /// Create an empty octree with the default configuration.
    pub fn new() -> Self {
        Self::build(OctreeConfig::default())
    }

    /// Create an empty octree with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration is out of range.
    pub fn with_config(config: OctreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: OctreeConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root_bounds = AABB::from_origin_extents(Vec3::ZERO, Vec3::splat(config.initial_extents));
        let root = nodes.insert(OctreeNode::new(root_bounds, None));

        Self {
            nodes,
            root,
            mapping: NodeMapping::new(),
            config,
        }
    }

    // ===== ACCESSORS =====

    /// The configuration this octree was built with
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Key of the current root node
    #[inline]
    pub fn root_key(&self) -> NodeKey {
        self.root
    }

    /// The current root node
    #[inline]
    pub fn root(&self) -> &OctreeNode<N> {
        &self.nodes[self.root]
    }

    /// Look up a node by key (None for discarded nodes)
    #[inline]
    pub fn node(&self, key: NodeKey) -> Option<&OctreeNode<N>> {
        self.nodes.get(key)
    }

    /// Iterate over all live nodes in arbitrary order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &OctreeNode<N>)> + '_ {
        self.nodes.iter()
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of linked objects
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Whether no object is linked
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Whether an object with this id is linked
    pub fn contains(&self, id: N::Id) -> bool {
        self.mapping.get(id).is_some()
    }

    /// The node currently owning the object with this id
    pub fn find_node(&self, id: N::Id) -> Option<NodeKey> {
        self.mapping.get(id)
    }

    /// Depth of the tree (1 for a lone root)
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((key, level)) = stack.pop() {
            depth = depth.max(level);
            for &child in self.nodes[key].children() {
                stack.push((child, level + 1));
            }
        }
        depth
    }

    /// Drop every node and object, keeping the configuration.
    pub fn clear(&mut self) {
        *self = Self::build(self.config);
    }

    // ===== LINK / UNLINK =====

    /// Link an object into the tree.
    ///
    /// Grows the root first if the object's valid bounds are not contained.
    /// Objects with invalid bounds are linked at the root without any
    /// containment test.
    ///
    /// # Panics
    ///
    /// Panics if the object is already linked.
    pub fn link(&mut self, object: &N) {
        let bounds = object.world_aabb();
        self.ensure_root_extent(&bounds);
        self.link_recursively(self.root, object.clone(), &bounds);
    }

    /// Unlink an object. Returns false if it was not linked.
    pub fn unlink(&mut self, object: &N) -> bool {
        let id = object.id();
        match self.mapping.get(id) {
            Some(node) => {
                let found = self.unlink_member(node, id);
                debug_assert!(found, "lookup table names a node that does not hold {:?}", id);
                true
            }
            None => false,
        }
    }

    /// Descend from `start` to the deepest node fully containing `bounds`
    /// and add the object there, subdividing that node if it became full.
    fn link_recursively(&mut self, start: NodeKey, object: N, bounds: &AABB) {
        // Invalid bounds are never containment-tested and never subdivide
        if !bounds.is_valid() {
            self.add_member(start, object);
            return;
        }

        let mut key = start;
        'descend: while let Some(children) = self.nodes[key].children {
            for child in children {
                if self.nodes[child].bounds.contains(bounds) {
                    key = child;
                    continue 'descend;
                }
            }
            break;
        }

        self.add_member(key, object);

        let node = &self.nodes[key];
        if node.is_leaf()
            && node.members.len() >= self.config.subdivision_threshold
            && node.bounds.extents.x > self.config.min_node_extents
        {
            self.subdivide(key);
        }
    }

    fn add_member(&mut self, key: NodeKey, object: N) {
        let id = object.id();
        debug_assert!(
            !self.nodes[key].members.iter().any(|m| m.id() == id),
            "object {:?} is already a member of this node", id
        );

        self.nodes[key].members.push(object);
        self.mapping.notify_link(id, key);
    }

    /// Remove `id` from the member list of `key`. The lookup entry is
    /// dropped whether or not the member was found.
    fn unlink_member(&mut self, key: NodeKey, id: N::Id) -> bool {
        let members = &mut self.nodes[key].members;
        let found = match members.iter().position(|m| m.id() == id) {
            Some(pos) => {
                members.remove(pos);
                true
            }
            None => false,
        };

        self.mapping.notify_unlink(id);
        found
    }

    // ===== STRUCTURE =====

    /// Split a leaf into 8 octants and redistribute its members.
    fn subdivide(&mut self, key: NodeKey) {
        debug_assert!(self.nodes[key].is_leaf(), "subdividing a node that has children");

        let bounds = self.nodes[key].bounds;
        let nodes = &mut self.nodes;
        let children: [NodeKey; 8] = std::array::from_fn(|octant| {
            nodes.insert(OctreeNode::new(bounds.octant(octant as u8), Some(key)))
        });
        self.nodes[key].children = Some(children);

        scene_trace!("galaxy3d::Octree",
            "Subdividing node at {:?} (extents {:?}) with {} members",
            bounds.origin, bounds.extents, self.nodes[key].members.len());

        // Let lazily computed bounds settle before anything is re-placed.
        // Bounds change notifications raised here are deferred by the scene graph.
        for member in &self.nodes[key].members {
            member.world_aabb();
        }

        // Having 8 children now, re-linking cannot subdivide this node again
        let members = std::mem::take(&mut self.nodes[key].members);
        for member in members {
            self.mapping.notify_unlink(member.id());
            let member_bounds = member.world_aabb();
            self.link_recursively(key, member, &member_bounds);
        }
    }

    /// Move all members of `from` to the end of `target`'s member list.
    fn relocate_members_to(&mut self, from: NodeKey, target: NodeKey) {
        let members = std::mem::take(&mut self.nodes[from].members);

        for member in &members {
            let id = member.id();
            self.mapping.notify_unlink(id);
            self.mapping.notify_link(id, target);
        }

        self.nodes[target].members.extend(members);
    }

    /// Hand the child array of `from` over to `target`.
    ///
    /// # Panics
    ///
    /// Panics if both nodes have children: child arrays are never merged.
    fn relocate_children_to(&mut self, from: NodeKey, target: NodeKey) {
        if !self.nodes[from].is_leaf() && !self.nodes[target].is_leaf() {
            scene_error!("galaxy3d::Octree",
                "Cannot relocate children: source and target both have children");
            panic!("relocate_children_to: neither node is a leaf");
        }

        let Some(children) = self.nodes[from].children.take() else {
            return;
        };

        for child in children {
            self.nodes[child].parent = Some(target);
        }
        self.nodes[target].children = Some(children);
    }

    /// Grow the root until it contains `bounds` or would exceed the
    /// configured maximum world coordinate.
    fn ensure_root_extent(&mut self, bounds: &AABB) {
        if !bounds.is_valid() {
            return;
        }

        while !self.nodes[self.root].bounds.contains(bounds) {
            let new_extents = self.nodes[self.root].bounds.extents * 2.0;

            if new_extents.max_element() > self.config.max_world_coord {
                scene_warn!("galaxy3d::Octree",
                    "Object bounds {:?}..{:?} exceed max world coordinate {}, linking at root",
                    bounds.min(), bounds.max(), self.config.max_world_coord);
                break;
            }

            self.regraft(new_extents);
        }
    }

    /// Replace the root with a new one of `new_extents` at the same center,
    /// keeping every member and subtree of the old root.
    ///
    /// Old child `i` ends up as sub-octant `i ^ 7` of new child `i`: the
    /// match is made by octant index, never by comparing float bounds.
    fn regraft(&mut self, new_extents: Vec3) {
        let old_root = self.root;
        let origin = self.nodes[old_root].bounds.origin;
        let new_root = self.nodes.insert(OctreeNode::new(
            AABB::from_origin_extents(origin, new_extents),
            None,
        ));

        scene_debug!("galaxy3d::Octree",
            "Growing root from {:?} to {:?}", self.nodes[old_root].bounds.extents, new_extents);

        self.relocate_members_to(old_root, new_root);
        self.subdivide(new_root);

        if let (Some(old_children), Some(new_children)) =
            (self.nodes[old_root].children, self.nodes[new_root].children)
        {
            for octant in 0..8 {
                let new_child = new_children[octant];
                if self.nodes[new_child].is_leaf() {
                    self.subdivide(new_child);
                }

                let Some(target) = self.nodes[new_child].child(octant as u8 ^ 7) else {
                    continue;
                };

                let old_child = old_children[octant];
                self.relocate_members_to(old_child, target);
                self.relocate_children_to(old_child, target);
            }
        }

        self.root = new_root;
        self.destroy_subtree(old_root);
    }

    /// Remove a node and all its descendants from the arena.
    fn destroy_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.remove(key) {
                debug_assert!(node.members.is_empty(), "discarding a node that still has members");
                stack.extend_from_slice(node.children());
            }
        }
    }

    // ===== INVARIANTS =====

    /// Verify the structural invariants of the tree.
    ///
    /// - every child array is complete and exactly tiles its parent
    /// - parent back-references match the owning node
    /// - every node is reachable from the root
    /// - every lookup entry names a node holding the object exactly once,
    ///   and every member has a lookup entry
    ///
    /// # Errors
    ///
    /// Returns `Error::InvariantViolation` describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<()> {
        if self.nodes[self.root].parent.is_some() {
            return Err(scene_err!(InvariantViolation, "galaxy3d::Octree", "root has a parent"));
        }

        let mut reachable = 0usize;
        let mut member_total = 0usize;
        let mut stack = vec![self.root];

        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                    "dangling child key {:?}", key));
            };
            reachable += 1;
            member_total += node.members.len();

            for (octant, &child_key) in node.children().iter().enumerate() {
                let Some(child) = self.nodes.get(child_key) else {
                    return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                        "dangling child key {:?}", child_key));
                };
                if child.parent != Some(key) {
                    return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                        "child {:?} does not point back to its parent", child_key));
                }
                let expected = node.bounds.octant(octant as u8);
                let tolerance = 1e-4 * node.bounds.extents.max_element().max(1.0);
                if !child.bounds.origin.abs_diff_eq(expected.origin, tolerance)
                    || !child.bounds.extents.abs_diff_eq(expected.extents, tolerance)
                {
                    return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                        "child {} of node at {:?} does not tile its parent", octant, node.bounds.origin));
                }
                stack.push(child_key);
            }

            for member in &node.members {
                let id = member.id();
                if self.mapping.get(id) != Some(key) {
                    return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                        "member {:?} has no matching lookup entry", id));
                }
                let occurrences = node.members.iter().filter(|m| m.id() == id).count();
                if occurrences != 1 {
                    return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                        "member {:?} appears {} times in one node", id, occurrences));
                }
            }
        }

        if reachable != self.nodes.len() {
            return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                "{} nodes allocated but only {} reachable from the root", self.nodes.len(), reachable));
        }
        for (id, key) in self.mapping.iter() {
            let holds = self.nodes.get(key)
                .is_some_and(|node| node.members.iter().any(|m| m.id() == id));
            if !holds {
                return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                    "lookup entry for {:?} names a node that does not hold it", id));
            }
        }
        if member_total != self.mapping.len() {
            return Err(scene_err!(InvariantViolation, "galaxy3d::Octree",
                "{} members stored but {} lookup entries", member_total, self.mapping.len()));
        }

        Ok(())
    }
}

impl<N: IndexedObject> Default for Octree<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
