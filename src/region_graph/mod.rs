//! Per-frame hierarchy of mutually exclusive segmentation hypotheses.
//!
//! A [`RegionGraph`] starts with the level-0 regions of one frame's
//! segmentation together with their neighbor and conflict relations. Pairwise
//! merges then synthesize coarser hypotheses:
//!
//! - the merged region conflicts with both inputs and with everything either
//!   input conflicts with;
//! - it neighbors everything either input neighbors, minus its conflicts;
//! - it directly contains exactly the two inputs;
//! - its level is the smaller of the two input levels.
//!
//! Both relations are kept symmetric on every update, so any maximal set of
//! pairwise non-conflicting regions is one valid segmentation of the frame.
//! That closure is what lets the solver express hypothesis selection as a
//! simple exclusion constraint.
//!
//! Regions are never removed. Labels increase strictly with creation order.

mod export;
mod graph;
mod region;

pub use graph::RegionGraph;
pub use region::Region;

#[cfg(test)]
mod tests;
