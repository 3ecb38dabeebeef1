/// Hooks called by a SceneGraph when its content changes.
///
/// All hooks default to no-ops. They run when an action is applied to the
/// space partition, never when it is only buffered, and the partition is
/// not borrowed while they run: an observer may call back into the graph.
pub trait SceneObserver<N> {
    /// An object was linked into the space partition
    fn on_scene_node_insert(&self, _node: &N) {}

    /// An object was unlinked from the space partition
    fn on_scene_node_erase(&self, _node: &N) {}

    /// The set of indexed objects changed, or the scene root was replaced
    fn on_scene_graph_change(&self) {}
}
