//! Error types.
//!
//! Two layers:
//!
//! - [`DashboardError`]: failures of the reactive core. The controller recovers
//!   from all of these locally (empty layout + notice); they never escape to a
//!   renderer as a panic.
//! - [`AppError`]: what the binary surfaces to the user, with a process exit code
//!   (2 = input/config, 3 = no usable rows, 4 = runtime/terminal/network).

use thiserror::Error;

/// Recoverable failures of the selection/aggregation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// A year outside the dataset's supported range was selected in Yearly mode.
    #[error("year {year} is outside the supported range {min}..={max}")]
    InvalidSelection { year: i32, min: i32, max: i32 },

    /// A pipeline's base input contained no rows at all.
    #[error("no rows available for the {pipeline} pipeline")]
    EmptyAggregationGroup { pipeline: &'static str },

    /// The dataset provider has nothing to offer (still loading, or failed).
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// A report-mode selector value that maps to no known mode.
    #[error("unknown report mode '{0}'")]
    UnknownReportMode(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        let exit_code = match err {
            DashboardError::InvalidSelection { .. } | DashboardError::UnknownReportMode(_) => 2,
            DashboardError::EmptyAggregationGroup { .. } => 3,
            DashboardError::DatasetUnavailable(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
