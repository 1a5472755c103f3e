//! `autosales-dashboard` library crate.
//!
//! The binary (`autosales`) is a thin wrapper around this library so that:
//!
//! - the aggregation pipelines and controller are testable without a terminal
//! - other front-ends can consume `DashboardView` / layout JSON directly

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod controller;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
