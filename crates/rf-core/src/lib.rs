//! rf-core: The ringfence pipeline.
//!
//! Limit installation, validation, and execution run strictly in that order,
//! once per process. Exposed as a library for integration testing.

pub mod config;
pub mod logging;
pub mod pipeline;
