//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - layout JSON, series CSV and dataset CSV exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
