//! Tracking events decoded from a solved hypotheses graph.
//!
//! The extractor walks timesteps in increasing order, then nodes in insertion
//! order, then each node's traxels. For an active traxel:
//!
//! - two outgoing links yield a `Division`, one yields a `Move`, none yields a
//!   `Disappearance` unless the traxel sits at the last timestep;
//! - independently, no parent yields an `Appearance` unless the traxel sits at
//!   the first timestep.
//!
//! Extraction only reads the graph, so repeated runs give identical output.

mod event;
mod extract;

pub use event::{Event, EventKind, EventSummary};
pub use extract::extract_events;
