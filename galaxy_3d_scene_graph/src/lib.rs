/*!
# Galaxy 3D Scene Graph

Dynamic spatial index for the Galaxy 3D editor scene.

Scene objects are placed in a growing octree and walked with culling
volumes. Mutations requested from inside a walk are buffered and applied
once the walk ends, so a visitor can freely insert, erase or move objects.

## Architecture

- **SceneGraph**: mutation API, culled walks, deferred action buffer, observers
- **Octree**: space partition that subdivides crowded leaves and grows its root
- **NodeMapping**: O(1) lookup from object identity to owning node
- **VolumeTest**: 3-way classifier used to prune nodes (Frustum, AABB, InfiniteVolume)
- **IndexedObject**: what an object must expose to be indexed (identity + world AABB)
*/

// Internal modules
mod error;
mod indexed_object;
pub mod log;
pub mod math;
pub mod volume;
pub mod space_partition;
pub mod scene_graph;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Scene sub-module: graph, space partition and query volumes
    pub mod scene {
        pub use crate::indexed_object::IndexedObject;
        pub use crate::scene_graph::*;
        pub use crate::space_partition::*;
        pub use crate::volume::*;
    }
}

// Re-export math library at crate root
pub use glam;
