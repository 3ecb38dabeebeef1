//! Scene graph module
//!
//! Owns the space partition of a scene document and walks it with culling
//! volumes. Mutations requested while a walk is running are buffered and
//! replayed once the outermost walk ends.

mod node_action;
mod scene_observer;
mod scene_graph;

pub use node_action::NodeAction;
pub use scene_observer::SceneObserver;
pub use scene_graph::{SceneGraph, WalkStats};
