//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is
//! warn. The dashboard owns the terminal, so it only logs when given a file.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Log to stderr.
pub fn init_stderr(verbose: bool) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}

/// Log to a file (no ANSI colors), or not at all when `path` is `None`.
pub fn init_file(path: Option<&Path>, verbose: bool) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn no_log_file_is_a_no_op() {
        assert!(init_file(None, true).is_ok());
    }
}
