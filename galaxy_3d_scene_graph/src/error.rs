//! Error types for the Galaxy3D scene graph
//!
//! Insertion, removal and traversal never fail: they silently no-op when
//! their precondition does not hold. Errors only surface from configuration
//! validation and from the explicit invariant checker.

use std::fmt;

/// Result type for Galaxy3D scene graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D scene graph errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration value is out of range (octree extents, thresholds, etc.)
    InvalidConfig(String),

    /// A structural invariant of the space partition does not hold
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error message and build the matching [`Error`] value
///
/// # Example
///
/// ```ignore
/// return Err(scene_err!(InvalidConfig, "galaxy3d::OctreeConfig",
///     "max_world_coord must be positive, got {}", value));
/// ```
#[macro_export]
macro_rules! scene_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::scene_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
