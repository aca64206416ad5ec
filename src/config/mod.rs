//! JSON run configurations for the demo binaries.

pub mod tracking;
