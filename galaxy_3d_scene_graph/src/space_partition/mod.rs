/// Space partition module
///
/// Dynamic octree used by the scene graph to place objects and to cull
/// whole regions during volume walks.

mod config;
mod node_mapping;
mod octree;
mod octree_node;

pub use config::{
    OctreeConfig,
    SUBDIVISION_THRESHOLD, MIN_NODE_EXTENTS, INITIAL_ROOT_EXTENTS, DEFAULT_MAX_WORLD_COORD,
};
pub use node_mapping::NodeMapping;
pub use octree::Octree;
pub use octree_node::{OctreeNode, NodeKey};
