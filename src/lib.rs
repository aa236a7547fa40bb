//! Mines app ideas from Reddit pain points.
//!
//! Given already-fetched posts and comments, the pipeline extracts pain
//! statements, groups them into clusters, filters the clusters for problems
//! a small local-only app can solve, and synthesizes ranked app ideas with
//! evidence. See [`pipeline::run_pipeline`] for the entry point.

pub mod cluster;
pub mod config;
pub mod core_filter;
pub mod error;
pub mod extract;
pub mod ideas;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod util;

pub use error::{MinerError, Result};

// Tracing targets, one per pipeline stage.
pub const TARGET_EXTRACT: &str = "extract";
pub const TARGET_CLUSTER: &str = "cluster";
pub const TARGET_FILTER: &str = "core_filter";
pub const TARGET_IDEAS: &str = "ideas";
