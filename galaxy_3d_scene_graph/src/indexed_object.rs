/// IndexedObject: what the space partition needs from a scene object.
///
/// The partition never owns objects. It stores cheap handles (typically an
/// `Rc` or a slot key wrapper), keys its lookup table by the handle's
/// identity and reads the current world bounds whenever it places one.

use std::fmt::Debug;
use std::hash::Hash;
use crate::math::AABB;

/// A scene object that can be placed in the space partition.
///
/// `world_aabb()` may recompute bounds lazily. It may call the mutation
/// API of the owning [`SceneGraph`](crate::scene_graph::SceneGraph)
/// (`insert`, `erase`, `node_bounds_changed`), which defers such calls until
/// the partition is consistent again. It must not call the read accessors
/// (`len`, `contains`, `space_partition`, ...): they borrow the partition,
/// which may be under modification when bounds are read.
pub trait IndexedObject: Clone {
    /// Identity, stable for as long as the object is indexed
    type Id: Copy + Eq + Hash + Debug;

    /// Identity of this object
    fn id(&self) -> Self::Id;

    /// Current world-space bounds. An invalid box is a legal answer.
    fn world_aabb(&self) -> AABB;

    /// Whether the object is currently shown. Hidden objects are skipped
    /// by the "visible" walks.
    fn visible(&self) -> bool {
        true
    }
}
