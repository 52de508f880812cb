//! Data layer for activity statistics.
//!
//! Responsible for loading CSV activity logs, computing per-user statistics,
//! applying row filters and exporting filtered rows.

pub mod aggregator;
pub mod analysis;
pub mod filters;
pub mod reader;
pub mod writer;

pub use activity_core as core;
