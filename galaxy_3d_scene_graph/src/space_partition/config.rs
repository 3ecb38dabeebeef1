/// Octree configuration.

use crate::error::Result;
use crate::scene_err;

/// The number of members a leaf may hold before it tries to subdivide
pub const SUBDIVISION_THRESHOLD: usize = 32;

/// A node must have a half extent above this to subdivide
pub const MIN_NODE_EXTENTS: f32 = 128.0;

/// Half extent of a freshly created root node
pub const INITIAL_ROOT_EXTENTS: f32 = 512.0;

/// Default maximum world coordinate
pub const DEFAULT_MAX_WORLD_COORD: f32 = 65536.0;

/// Octree configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeConfig {
    /// Maximum representable world coordinate. The root stops doubling
    /// once its half extent would exceed this value.
    pub max_world_coord: f32,
    /// Half extent of the root node (centered at the origin) before any growth
    pub initial_extents: f32,
    /// Member count at which a leaf subdivides
    pub subdivision_threshold: usize,
    /// Minimum half extent a node must exceed to be subdivided
    pub min_node_extents: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_world_coord: DEFAULT_MAX_WORLD_COORD,
            initial_extents: INITIAL_ROOT_EXTENTS,
            subdivision_threshold: SUBDIVISION_THRESHOLD,
            min_node_extents: MIN_NODE_EXTENTS,
        }
    }
}

impl OctreeConfig {
    /// Default configuration with a different world size.
    pub fn with_max_world_coord(max_world_coord: f32) -> Self {
        Self {
            max_world_coord,
            ..Self::default()
        }
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.max_world_coord.is_finite() || self.max_world_coord <= 0.0 {
            return Err(scene_err!(InvalidConfig, "galaxy3d::OctreeConfig",
                "max_world_coord must be positive and finite, got {}", self.max_world_coord));
        }
        if !self.initial_extents.is_finite() || self.initial_extents <= 0.0 {
            return Err(scene_err!(InvalidConfig, "galaxy3d::OctreeConfig",
                "initial_extents must be positive and finite, got {}", self.initial_extents));
        }
        if self.initial_extents > self.max_world_coord {
            return Err(scene_err!(InvalidConfig, "galaxy3d::OctreeConfig",
                "initial_extents {} exceeds max_world_coord {}",
                self.initial_extents, self.max_world_coord));
        }
        if self.subdivision_threshold == 0 {
            return Err(scene_err!(InvalidConfig, "galaxy3d::OctreeConfig",
                "subdivision_threshold must be at least 1"));
        }
        if !self.min_node_extents.is_finite() || self.min_node_extents < 0.0 {
            return Err(scene_err!(InvalidConfig, "galaxy3d::OctreeConfig",
                "min_node_extents must be finite and non-negative, got {}", self.min_node_extents));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
