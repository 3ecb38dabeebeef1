use glam::Vec3;
use super::*;

fn cube(center: Vec3, half: f32) -> AABB {
    AABB::from_origin_extents(center, Vec3::splat(half))
}

// ============================================================================
// Construction and validity
// ============================================================================

#[test]
fn test_default_is_invalid() {
    let aabb = AABB::default();
    assert!(!aabb.is_valid());
    assert_eq!(aabb, AABB::INVALID);
}

#[test]
fn test_from_min_max() {
    let aabb = AABB::from_min_max(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 10.0, 6.0));
    assert_eq!(aabb.origin, Vec3::new(0.0, 5.0, 5.0));
    assert_eq!(aabb.extents, Vec3::new(2.0, 5.0, 1.0));
    assert_eq!(aabb.min(), Vec3::new(-2.0, 0.0, 4.0));
    assert_eq!(aabb.max(), Vec3::new(2.0, 10.0, 6.0));
}

#[test]
fn test_zero_extents_is_valid() {
    // A point-sized box is still a valid box
    assert!(cube(Vec3::ONE, 0.0).is_valid());
}

#[test]
fn test_negative_or_non_finite_is_invalid() {
    assert!(!AABB::from_origin_extents(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0)).is_valid());
    assert!(!AABB::from_origin_extents(Vec3::splat(f32::NAN), Vec3::ONE).is_valid());
    assert!(!AABB::from_origin_extents(Vec3::ZERO, Vec3::splat(f32::INFINITY)).is_valid());
}

// ============================================================================
// Containment and intersection
// ============================================================================

#[test]
fn test_contains() {
    let big = cube(Vec3::ZERO, 10.0);
    let small = cube(Vec3::ZERO, 1.0);
    let straddling = AABB::from_min_max(Vec3::splat(5.0), Vec3::splat(15.0));

    assert!(big.contains(&small));
    assert!(!small.contains(&big));
    assert!(!big.contains(&straddling));
}

#[test]
fn test_contains_touching_faces() {
    let big = cube(Vec3::ZERO, 10.0);
    let flush = AABB::from_min_max(Vec3::new(0.0, 0.0, 0.0), Vec3::splat(10.0));
    assert!(big.contains(&flush));
    assert!(big.contains(&big));
}

#[test]
fn test_intersects() {
    let a = cube(Vec3::ZERO, 2.0);
    let b = AABB::from_min_max(Vec3::splat(1.0), Vec3::splat(3.0));
    let c = AABB::from_min_max(Vec3::splat(5.0), Vec3::splat(7.0));
    let touching = AABB::from_min_max(Vec3::new(2.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0));

    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
    assert!(a.intersects(&touching));
}

// ============================================================================
// Octants
// ============================================================================

#[test]
fn test_octant_bit_layout() {
    let parent = cube(Vec3::ZERO, 8.0);

    let low = parent.octant(0);
    assert_eq!(low.origin, Vec3::splat(-4.0));
    assert_eq!(low.extents, Vec3::splat(4.0));

    let high = parent.octant(7);
    assert_eq!(high.origin, Vec3::splat(4.0));

    // bit0 = X only
    assert_eq!(parent.octant(1).origin, Vec3::new(4.0, -4.0, -4.0));
    // bit1 = Y only
    assert_eq!(parent.octant(2).origin, Vec3::new(-4.0, 4.0, -4.0));
    // bit2 = Z only
    assert_eq!(parent.octant(4).origin, Vec3::new(-4.0, -4.0, 4.0));
}

#[test]
fn test_octants_tile_parent() {
    let parent = AABB::from_origin_extents(Vec3::new(3.0, -7.0, 100.0), Vec3::new(16.0, 32.0, 8.0));
    let mut union = AABB::INVALID;
    let mut volume = 0.0;

    for i in 0..8 {
        let child = parent.octant(i);
        assert!(parent.contains(&child));
        union.include_aabb(&child);
        volume += child.extents.x * child.extents.y * child.extents.z * 8.0;
    }

    assert_eq!(union, parent);
    let parent_volume = parent.extents.x * parent.extents.y * parent.extents.z * 8.0;
    assert!((volume - parent_volume).abs() < 1e-3);
}

#[test]
fn test_mirrored_octant_one_level_down() {
    // The old root's child i sits in the new root's child i, at sub-octant i ^ 7
    let old_root = cube(Vec3::ZERO, 512.0);
    let new_root = cube(Vec3::ZERO, 1024.0);

    for i in 0..8u8 {
        let old_child = old_root.octant(i);
        let target = new_root.octant(i).octant(i ^ 7);
        assert_eq!(old_child, target);
    }
}

// ============================================================================
// Growth helpers
// ============================================================================

#[test]
fn test_include_point_from_invalid() {
    let mut aabb = AABB::INVALID;
    aabb.include_point(Vec3::new(1.0, 2.0, 3.0));
    assert!(aabb.is_valid());
    assert_eq!(aabb.extents, Vec3::ZERO);

    aabb.include_point(Vec3::new(3.0, 2.0, 3.0));
    assert_eq!(aabb.min(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.max(), Vec3::new(3.0, 2.0, 3.0));
}

#[test]
fn test_include_aabb_ignores_invalid() {
    let mut aabb = cube(Vec3::ZERO, 1.0);
    aabb.include_aabb(&AABB::INVALID);
    assert_eq!(aabb, cube(Vec3::ZERO, 1.0));
}
