/// A mutation request waiting in the scene graph's action buffer.
#[derive(Debug, Clone)]
pub enum NodeAction<N> {
    /// Link a new object into the space partition
    Insert(N),
    /// Unlink an object from the space partition
    Erase(N),
    /// Re-place an object whose world bounds changed
    BoundsChange(N),
}

impl<N> NodeAction<N> {
    /// The object this action applies to
    pub fn node(&self) -> &N {
        match self {
            NodeAction::Insert(node)
            | NodeAction::Erase(node)
            | NodeAction::BoundsChange(node) => node,
        }
    }

    /// Short name used in log messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeAction::Insert(_) => "insert",
            NodeAction::Erase(_) => "erase",
            NodeAction::BoundsChange(_) => "bounds change",
        }
    }
}
