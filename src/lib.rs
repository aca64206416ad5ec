#![doc = include_str!("../README.md")]

// Public modules
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod hypotheses;
pub mod io;
pub mod logging;
pub mod model;
pub mod reasoner;
pub mod region_graph;
pub mod tracking;
pub mod traxel;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{RegionError, Result, TrackingError};
pub use crate::events::{Event, EventKind};
pub use crate::hypotheses::{MultiHypothesesGraph, MultiHypothesesGraphBuilder, TraxelStore};
pub use crate::reasoner::{Reasoner, Solver};
pub use crate::region_graph::{Region, RegionGraph};
pub use crate::tracking::{MultiHypothesesTracking, TrackingOptions, TrackingOutcome};
pub use crate::traxel::Traxel;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hypotheses_tracking::prelude::*;
///
/// # fn main() -> hypotheses_tracking::Result<()> {
/// let store = TraxelStore::from_traxels([
///     Traxel::new(1, 0).with_feature("com", vec![0.0, 0.0, 0.0]),
///     Traxel::new(1, 1).with_feature("com", vec![1.0, 0.0, 0.0]),
/// ])?;
///
/// let mut tracking = MultiHypothesesTracking::new(TrackingOptions::default())?;
/// let outcome = tracking.run(&store)?;
/// println!("events={:?}", outcome.events);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::events::{Event, EventKind};
    pub use crate::hypotheses::TraxelStore;
    pub use crate::traxel::Traxel;
    pub use crate::{MultiHypothesesTracking, RegionGraph, TrackingOptions};
}
