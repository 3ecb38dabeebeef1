//! Math module: bounding volumes used by the space partition.

mod aabb;

pub use aabb::AABB;
