//! Tracking entry point and its named-weight options.

mod options;
mod pipeline;

pub use options::{TrackingOptions, REQUIRED_WEIGHTS};
pub use pipeline::{MultiHypothesesTracking, TrackingOutcome};

#[cfg(test)]
mod tests;
