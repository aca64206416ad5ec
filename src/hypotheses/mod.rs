//! Multi-hypotheses temporal graph.
//!
//! - [`store`]: per-timestep traxel collection read by the builder.
//! - [`graph`]: arena-backed graph of per-timestep nodes and arcs.
//! - [`builder`]: links hypotheses of consecutive frames.
//! - [`classifier`]: optional probability features for the cost model.

pub mod builder;
pub mod classifier;
pub mod graph;
pub mod store;

pub use builder::{BuilderOptions, MultiHypothesesGraphBuilder};
pub use classifier::{Classifier, ConstantClassifier};
pub use graph::{ArcData, ArcId, MultiHypothesesGraph, NodeId};
pub use store::TraxelStore;

#[cfg(test)]
mod tests;
