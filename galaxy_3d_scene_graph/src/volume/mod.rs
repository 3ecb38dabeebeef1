//! Query volumes: the culling side of a space partition walk.
//!
//! A walk only needs one capability from a volume: a 3-way classification
//! of a node's bounds. Only `Outside` is used to prune, so implementations
//! must never report `Outside` for a box that actually intersects.

mod frustum;

pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};

use crate::math::AABB;

/// Result of a 3-way volume/AABB classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIntersection {
    /// AABB is entirely outside the volume
    Outside,
    /// AABB is entirely inside the volume
    Inside,
    /// AABB partially overlaps the volume
    Partial,
}

/// Tri-state classifier used to cull space partition nodes.
pub trait VolumeTest {
    /// Classify an AABB against this volume.
    fn test_aabb(&self, aabb: &AABB) -> VolumeIntersection;
}

/// A volume containing everything. Used by whole-scene walks.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteVolume;

impl VolumeTest for InfiniteVolume {
    fn test_aabb(&self, _aabb: &AABB) -> VolumeIntersection {
        VolumeIntersection::Inside
    }
}

/// A box used as a selection volume (e.g. a rubber-band region).
impl VolumeTest for AABB {
    fn test_aabb(&self, aabb: &AABB) -> VolumeIntersection {
        if !self.intersects(aabb) {
            VolumeIntersection::Outside
        } else if self.contains(aabb) {
            VolumeIntersection::Inside
        } else {
            VolumeIntersection::Partial
        }
    }
}

#[cfg(test)]
#[path = "volume_tests.rs"]
mod tests;
