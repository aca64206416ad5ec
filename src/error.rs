//! Error types shared by the tracking pipeline.
//!
//! Region merges report invalid handles through [`RegionError`], which carries
//! the integer status of the merge (`1` for the first argument, `2` for the
//! second). Everything else funnels into [`TrackingError`].

use std::path::PathBuf;
use thiserror::Error;

/// Invalid region handle passed to a two-argument [`RegionGraph`](crate::region_graph::RegionGraph)
/// operation such as `merge_regions`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RegionError {
    /// The first region handle does not belong to the graph.
    #[error("first region handle is invalid")]
    InvalidFirst,
    /// The second region handle does not belong to the graph.
    #[error("second region handle is invalid")]
    InvalidSecond,
}

impl RegionError {
    /// Status code of the failed operation (`1` or `2`).
    pub fn code(self) -> i32 {
        match self {
            RegionError::InvalidFirst => 1,
            RegionError::InvalidSecond => 2,
        }
    }
}

/// Errors raised while building, solving or decoding a tracking graph.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// A named weight required by the run is absent from the options.
    #[error("Weight {0} not found in tracking options")]
    MissingWeight(String),

    /// A node handle that does not belong to the graph.
    #[error("Invalid node handle {0}")]
    InvalidNode(usize),

    /// A traxel id that is not contained in the given node.
    #[error("Traxel {id} not found in node {node}")]
    UnknownTraxel { node: usize, id: u32 },

    /// A traxel lacks a feature the current stage relies on.
    #[error("Traxel {id} at timestep {timestep} has no feature {name:?}")]
    MissingFeature {
        id: u32,
        timestep: i32,
        name: String,
    },

    /// Solved state that cannot be turned into events.
    #[error("Inconsistent solution: {0}")]
    Decoding(String),

    /// Failure reported by the solver (infeasible model, timeout, fault).
    #[error("Solver failed: {0}")]
    Solver(String),

    /// `infer`/`conclude` called before `formulate`.
    #[error("No model has been formulated")]
    NotFormulated,

    /// Malformed traxel store.
    #[error("Invalid traxel store: {0}")]
    Store(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TrackingError>;
