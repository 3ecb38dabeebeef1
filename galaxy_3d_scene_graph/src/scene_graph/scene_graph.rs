/// SceneGraph: mutation API and culled walks over a scene's space partition.
///
/// A graph is single-threaded and works through `&self`: a visitor may hold
/// a shared reference to the graph it is walking and ask for insertions,
/// removals or bounds changes. Those requests cannot touch the octree while
/// it is being walked (or while it is itself being restructured), so they go
/// through an ordered action buffer:
///
/// - outside any walk, a request is applied immediately
/// - during a walk, it is buffered and replayed when the outermost walk ends,
///   whether the walk completed or was stopped by the visitor
/// - during the replay itself, new requests are appended and replayed by the
///   same flush, in arrival order
///
/// # Example
///
/// ```ignore
/// let graph = SceneGraph::new();
/// graph.insert(node.clone());
///
/// // Erase everything a camera can see. Erasures land after the walk.
/// graph.foreach_node_in_volume(&frustum, |visited| {
///     graph.erase(visited);
///     true
/// });
/// ```

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use crate::error::Result;
use crate::indexed_object::IndexedObject;
use crate::space_partition::{NodeKey, Octree, OctreeConfig};
use crate::volume::{InfiniteVolume, VolumeIntersection, VolumeTest};
use crate::{scene_debug, scene_error, scene_trace, scene_warn};
use super::node_action::NodeAction;
use super::scene_observer::SceneObserver;

/// Counters collected during a single walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes entered (the root counts as visited)
    pub visited_nodes: usize,
    /// Child nodes pruned because they are entirely outside the volume
    pub skipped_nodes: usize,
    /// Members handed to the visitor
    pub visited_members: usize,
}

/// Sets a flag for the lifetime of the guard, then restores its previous value.
struct ScopedFlag<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> ScopedFlag<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for ScopedFlag<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Scene graph over objects of type `N`.
pub struct SceneGraph<N: IndexedObject> {
    /// Scene root object
    root: RefCell<Option<N>>,
    /// Space partition holding every inserted object
    space_partition: RefCell<Octree<N>>,
    /// True while a walk is running (nested walks included)
    traversal_ongoing: Cell<bool>,
    /// True while the action buffer is being replayed
    flushing: Cell<bool>,
    /// Requests waiting to be applied, in arrival order
    action_buffer: RefCell<Vec<NodeAction<N>>>,
    observers: RefCell<Vec<Rc<dyn SceneObserver<N>>>>,
    last_walk_stats: Cell<WalkStats>,
}

impl<N: IndexedObject> SceneGraph<N> {
    /// Create an empty scene graph with the default octree configuration.
    pub fn new() -> Self {
        Self::from_octree(Octree::new())
    }

    /// Create an empty scene graph with a custom octree configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration is out of range.
    pub fn with_config(config: OctreeConfig) -> Result<Self> {
        Ok(Self::from_octree(Octree::with_config(config)?))
    }

    fn from_octree(octree: Octree<N>) -> Self {
        Self {
            root: RefCell::new(None),
            space_partition: RefCell::new(octree),
            traversal_ongoing: Cell::new(false),
            flushing: Cell::new(false),
            action_buffer: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            last_walk_stats: Cell::new(WalkStats::default()),
        }
    }

    // ===== ROOT =====

    /// The current scene root
    pub fn root(&self) -> Option<N> {
        self.root.borrow().clone()
    }

    /// Make `root` the scene root and start over with an empty space
    /// partition. Pending actions belong to the previous scene and are
    /// dropped. Setting the current root again changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if called during a walk or while the partition is being
    /// modified.
    pub fn set_root(&self, root: Option<N>) {
        if self.traversal_ongoing.get() {
            scene_error!("galaxy3d::SceneGraph", "set_root called during a walk");
            panic!("set_root called during a walk");
        }
        if self.root.borrow().as_ref().map(IndexedObject::id) == root.as_ref().map(IndexedObject::id) {
            return;
        }
        let Ok(mut partition) = self.space_partition.try_borrow_mut() else {
            scene_error!("galaxy3d::SceneGraph", "set_root called while the space partition is busy");
            panic!("set_root called while the space partition is busy");
        };

        partition.clear();
        drop(partition);

        let dropped = std::mem::take(&mut *self.action_buffer.borrow_mut());
        if !dropped.is_empty() {
            scene_warn!("galaxy3d::SceneGraph",
                "Dropping {} pending actions on root change", dropped.len());
        }

        *self.root.borrow_mut() = root;
        self.notify_change();
    }

    // ===== MUTATIONS =====

    /// Insert an object into the space partition.
    ///
    /// # Panics
    ///
    /// Panics when the action is applied if the object is already inserted.
    pub fn insert(&self, node: N) {
        self.submit(NodeAction::Insert(node));
    }

    /// Remove an object from the space partition. Erasing an object that
    /// is not inserted does nothing.
    pub fn erase(&self, node: &N) {
        self.submit(NodeAction::Erase(node.clone()));
    }

    /// Re-place an object after its world bounds changed. Objects that are
    /// not inserted are left alone.
    pub fn node_bounds_changed(&self, node: &N) {
        self.submit(NodeAction::BoundsChange(node.clone()));
    }

    fn submit(&self, action: NodeAction<N>) {
        let deferred = self.traversal_ongoing.get() || self.flushing.get();
        if deferred {
            scene_trace!("galaxy3d::SceneGraph",
                "Deferring {} of {:?}", action.kind_name(), action.node().id());
        }

        self.action_buffer.borrow_mut().push(action);

        if !deferred {
            self.flush_actions();
        }
    }

    /// Replay the action buffer until it stays empty. Only the outermost
    /// caller replays; nested calls return at once.
    fn flush_actions(&self) {
        if self.traversal_ongoing.get() || self.flushing.get() {
            return;
        }
        let _flushing = ScopedFlag::raise(&self.flushing);

        loop {
            let actions = std::mem::take(&mut *self.action_buffer.borrow_mut());
            if actions.is_empty() {
                break;
            }
            for action in actions {
                self.apply(action);
            }
        }
    }

    fn apply(&self, action: NodeAction<N>) {
        match action {
            NodeAction::Insert(node) => {
                self.space_partition.borrow_mut().link(&node);
                self.notify_change();
                self.notify(|observer| observer.on_scene_node_insert(&node));
            }
            NodeAction::Erase(node) => {
                let removed = self.space_partition.borrow_mut().unlink(&node);
                if removed {
                    self.notify(|observer| observer.on_scene_node_erase(&node));
                    self.notify_change();
                }
            }
            NodeAction::BoundsChange(node) => {
                let mut partition = self.space_partition.borrow_mut();
                if partition.unlink(&node) {
                    partition.link(&node);
                }
            }
        }
    }

    // ===== WALKS =====

    /// Visit every member of every node not entirely outside `volume`.
    /// The visitor returns `false` to stop the walk.
    pub fn foreach_node_in_volume<V, F>(&self, volume: &V, visitor: F) -> WalkStats
    where
        V: VolumeTest + ?Sized,
        F: FnMut(&N) -> bool,
    {
        self.walk(volume, visitor, false)
    }

    /// Like `foreach_node_in_volume`, skipping members that are not visible.
    pub fn foreach_visible_node_in_volume<V, F>(&self, volume: &V, visitor: F) -> WalkStats
    where
        V: VolumeTest + ?Sized,
        F: FnMut(&N) -> bool,
    {
        self.walk(volume, visitor, true)
    }

    /// Visit every inserted object.
    pub fn foreach_node<F>(&self, visitor: F) -> WalkStats
    where
        F: FnMut(&N) -> bool,
    {
        self.walk(&InfiniteVolume, visitor, false)
    }

    /// Visit every inserted object that is visible.
    pub fn foreach_visible_node<F>(&self, visitor: F) -> WalkStats
    where
        F: FnMut(&N) -> bool,
    {
        self.walk(&InfiniteVolume, visitor, true)
    }

    fn walk<V, F>(&self, volume: &V, mut visitor: F, visible_only: bool) -> WalkStats
    where
        V: VolumeTest + ?Sized,
        F: FnMut(&N) -> bool,
    {
        // Let the root settle its bounds. Any resulting relink is applied
        // right away when no other walk is running.
        let root = self.root.borrow().clone();
        if let Some(root) = root {
            root.world_aabb();
        }

        let traversing = ScopedFlag::raise(&self.traversal_ongoing);
        let outermost = !traversing.previous;

        let mut stats = WalkStats::default();
        match self.space_partition.try_borrow() {
            Ok(partition) => {
                stats.visited_nodes += 1;
                Self::walk_node(&partition, partition.root_key(), volume, &mut visitor, visible_only, &mut stats);
            }
            Err(_) => {
                scene_warn!("galaxy3d::SceneGraph",
                    "Walk requested while the space partition is being modified, nothing visited");
            }
        }
        drop(traversing);

        scene_trace!("galaxy3d::SceneGraph",
            "Walk done: {} nodes visited, {} skipped, {} members",
            stats.visited_nodes, stats.skipped_nodes, stats.visited_members);
        self.last_walk_stats.set(stats);

        if outermost {
            let pending = self.action_buffer.borrow().len();
            if pending > 0 {
                scene_debug!("galaxy3d::SceneGraph", "Replaying {} deferred actions", pending);
            }
            self.flush_actions();
        }

        stats
    }

    /// Returns false once the visitor asked to stop.
    fn walk_node<V, F>(
        partition: &Octree<N>,
        key: NodeKey,
        volume: &V,
        visitor: &mut F,
        visible_only: bool,
        stats: &mut WalkStats,
    ) -> bool
    where
        V: VolumeTest + ?Sized,
        F: FnMut(&N) -> bool,
    {
        let Some(node) = partition.node(key) else {
            return true;
        };

        for member in node.members() {
            if visible_only && !member.visible() {
                continue;
            }
            stats.visited_members += 1;
            if !visitor(member) {
                return false;
            }
        }

        for &child_key in node.children() {
            let Some(child) = partition.node(child_key) else {
                continue;
            };
            if volume.test_aabb(child.bounds()) == VolumeIntersection::Outside {
                stats.skipped_nodes += 1;
                continue;
            }
            stats.visited_nodes += 1;
            if !Self::walk_node(partition, child_key, volume, visitor, visible_only, stats) {
                return false;
            }
        }

        true
    }

    // ===== OBSERVERS =====

    /// Register an observer. The same observer may be registered only once.
    pub fn add_scene_observer(&self, observer: Rc<dyn SceneObserver<N>>) {
        let mut observers = self.observers.borrow_mut();
        if !observers.iter().any(|o| Rc::ptr_eq(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Unregister an observer, compared by pointer identity.
    pub fn remove_scene_observer(&self, observer: &Rc<dyn SceneObserver<N>>) {
        self.observers.borrow_mut().retain(|o| !Rc::ptr_eq(o, observer));
    }

    fn notify(&self, hook: impl Fn(&dyn SceneObserver<N>)) {
        // Observers may register or remove observers from a hook
        let observers = self.observers.borrow().clone();
        for observer in &observers {
            hook(observer.as_ref());
        }
    }

    fn notify_change(&self) {
        self.notify(|observer| observer.on_scene_graph_change());
    }

    // ===== ACCESSORS =====

    /// Read-only access to the space partition, e.g. for a debug view.
    ///
    /// The returned guard must be released before the next mutation is
    /// applied. Like every read accessor below, this must not be called
    /// from `IndexedObject::world_aabb()` while a mutation is applied.
    pub fn space_partition(&self) -> Ref<'_, Octree<N>> {
        self.space_partition.borrow()
    }

    /// Number of inserted objects
    pub fn len(&self) -> usize {
        self.space_partition.borrow().len()
    }

    /// Whether no object is inserted
    pub fn is_empty(&self) -> bool {
        self.space_partition.borrow().is_empty()
    }

    /// Whether `node` is currently inserted
    pub fn contains(&self, node: &N) -> bool {
        self.space_partition.borrow().contains(node.id())
    }

    /// Whether a walk is running
    pub fn is_traversing(&self) -> bool {
        self.traversal_ongoing.get()
    }

    /// Number of buffered requests not applied yet
    pub fn pending_action_count(&self) -> usize {
        self.action_buffer.borrow().len()
    }

    /// Statistics of the most recent walk
    pub fn last_walk_stats(&self) -> WalkStats {
        self.last_walk_stats.get()
    }

    /// Verify the structural invariants of the space partition.
    pub fn check_invariants(&self) -> Result<()> {
        self.space_partition.borrow().check_invariants()
    }
}

impl<N: IndexedObject> Default for SceneGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
