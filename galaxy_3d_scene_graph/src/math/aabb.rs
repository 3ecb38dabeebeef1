/// AABB: axis-aligned bounding box stored as origin + half extents.
///
/// The origin is the center of the box; `extents` is the vector from the
/// origin to the max corner. A box whose extents are negative (or not
/// finite) is *invalid*: it is the "not yet computed" state of an object's
/// bounds, and the space partition places such objects without any
/// containment test.

use glam::Vec3;

/// Axis-Aligned Bounding Box (origin + symmetrical extents)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Center of the box
    pub origin: Vec3,
    /// Half size along each axis (negative = invalid)
    pub extents: Vec3,
}

impl AABB {
    /// The canonical invalid box: origin zero, extents (-1, -1, -1)
    pub const INVALID: AABB = AABB {
        origin: Vec3::ZERO,
        extents: Vec3::NEG_ONE,
    };

    /// Construct from center and half extents.
    pub fn from_origin_extents(origin: Vec3, extents: Vec3) -> Self {
        Self { origin, extents }
    }

    /// Construct from min and max corners.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let origin = (min + max) * 0.5;
        Self {
            origin,
            extents: max - origin,
        }
    }

    /// Minimum corner (x, y, z)
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.origin - self.extents
    }

    /// Maximum corner (x, y, z)
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.origin + self.extents
    }

    /// Check whether the box is valid.
    ///
    /// The origin must be finite and every extent in `[0, f32::MAX]`.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite()
            && self.extents.is_finite()
            && self.extents.cmpge(Vec3::ZERO).all()
    }

    /// Test if this AABB fully contains another AABB.
    ///
    /// Returns `true` if `other` is entirely within `self` on every axis.
    /// Touching faces count as contained.
    pub fn contains(&self, other: &AABB) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());

        min.x <= other_min.x && max.x >= other_max.x
        && min.y <= other_min.y && max.y >= other_max.y
        && min.z <= other_min.z && max.z >= other_max.z
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());

        min.x <= other_max.x && max.x >= other_min.x
        && min.y <= other_max.y && max.y >= other_min.y
        && min.z <= other_max.z && max.z >= other_min.z
    }

    /// Compute the AABB of a specific octant (0–7).
    ///
    /// Octant bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    /// Octants `i` and `i ^ 7` mirror each other through the center.
    pub fn octant(&self, octant: u8) -> AABB {
        debug_assert!(octant < 8, "octant index out of range: {}", octant);

        let half = self.extents * 0.5;
        let sign = Vec3::new(
            if octant & 1 == 0 { -1.0 } else { 1.0 },
            if octant & 2 == 0 { -1.0 } else { 1.0 },
            if octant & 4 == 0 { -1.0 } else { 1.0 },
        );

        AABB {
            origin: self.origin + sign * half,
            extents: half,
        }
    }

    /// Grow the box so it contains `point`. An invalid box becomes a
    /// zero-sized box at `point`.
    pub fn include_point(&mut self, point: Vec3) {
        if !self.is_valid() {
            *self = AABB::from_origin_extents(point, Vec3::ZERO);
            return;
        }
        *self = AABB::from_min_max(self.min().min(point), self.max().max(point));
    }

    /// Grow the box so it contains `other`. Invalid boxes are ignored.
    pub fn include_aabb(&mut self, other: &AABB) {
        if !other.is_valid() {
            return;
        }
        if !self.is_valid() {
            *self = *other;
            return;
        }
        *self = AABB::from_min_max(self.min().min(other.min()), self.max().max(other.max()));
    }
}

impl Default for AABB {
    fn default() -> Self {
        AABB::INVALID
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
