//! Arena indices for snapshot nodes

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`PosterTree`](crate::PosterTree) arena.
///
/// Ids are only meaningful for the tree that produced them. Children are
/// stored as ids rather than owned boxes so the snapshot can be walked
/// without borrowing the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}
