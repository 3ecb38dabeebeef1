/// Frustum: six clipping planes for visibility culling.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The caller is responsible for computing and setting the frustum.
/// `from_view_projection()` is provided as a utility, but the caller may
/// compute the planes by other means.

use glam::{Mat4, Vec3, Vec4};
use crate::math::AABB;
use super::{VolumeIntersection, VolumeTest};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes for culling.
///
/// Each plane is (A, B, C, D) where Ax + By + Cz + D = 0.
/// Normal (A, B, C) points inward (toward the visible volume).
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        // Gribb & Hartmann: extract planes from rows of the VP matrix
        let mut planes = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        for plane in &mut planes {
            let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }

        Self { planes }
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// Tests both the positive vertex (p-vertex) and negative vertex (n-vertex)
    /// against each plane:
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Partial`
    /// - If all n-vertices are inside all planes → `Inside`
    ///
    /// Conservative: boxes near a frustum corner may be reported `Partial`
    /// although they are outside, but an intersecting box is never `Outside`.
    pub fn classify_aabb(&self, aabb: &AABB) -> VolumeIntersection {
        let (min, max) = (aabb.min(), aabb.max());
        let mut all_inside = true;

        for plane in &self.planes {
            let normal = Vec3::new(plane.x, plane.y, plane.z);

            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { max.x } else { min.x },
                if normal.y >= 0.0 { max.y } else { min.y },
                if normal.z >= 0.0 { max.z } else { min.z },
            );

            if normal.dot(p_vertex) + plane.w < 0.0 {
                return VolumeIntersection::Outside;
            }

            let n_vertex = Vec3::new(
                if normal.x >= 0.0 { min.x } else { max.x },
                if normal.y >= 0.0 { min.y } else { max.y },
                if normal.z >= 0.0 { min.z } else { max.z },
            );

            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { VolumeIntersection::Inside } else { VolumeIntersection::Partial }
    }

    /// Test if an AABB (potentially) intersects this frustum.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) != VolumeIntersection::Outside
    }
}

impl VolumeTest for Frustum {
    fn test_aabb(&self, aabb: &AABB) -> VolumeIntersection {
        self.classify_aabb(aabb)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
