//! Diagnostics data model returned by a tracking run.
//!
//! `TrackingReport` bundles the input and graph sizes, the model size when
//! available, the solver objective, per-kind event counts and the per-stage
//! timings. Everything serializes in camelCase for the JSON report.

pub mod report;
pub mod timing;

pub use report::{GraphStage, InputDescriptor, ModelStage, TrackingReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
