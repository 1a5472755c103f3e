//! Dataset providers.
//!
//! - `source`: fetch over HTTP or read a local CSV
//! - `sample`: deterministic synthetic table for offline runs

pub mod sample;
pub mod source;

pub use sample::{SampleConfig, generate_dataset};
pub use source::{DEFAULT_DATA_URL, DEFAULT_TIMEOUT_SECS, DatasetClient, DatasetSource};
