//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - dataset rows and the immutable table (`Record`, `Dataset`)
//! - selector state (`ReportMode`, `Selection`) and the year enablement rule
//! - renderer-independent chart output (`ChartSpec`, `ChartLayout`)

pub mod chart;
pub mod dataset;
pub mod types;

pub use chart::*;
pub use dataset::*;
pub use types::*;
