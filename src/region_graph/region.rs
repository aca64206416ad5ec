use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a region inside a [`RegionGraph`](super::RegionGraph).
///
/// Handles index the graph's side tables; a handle is valid for the graph
/// that issued it and stays valid because regions are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(pub u32);

impl Region {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
