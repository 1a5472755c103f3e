//! Text reports of computed views (used by `autosales report`).

pub mod format;

pub use format::{format_chart, format_dataset_summary, format_view};
