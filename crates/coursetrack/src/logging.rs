//! Logging configuration for coursetrack.
//!
//! Storage failures in this crate are never fatal; they surface as
//! `warn!` events, so the subscriber set up here is where they end up.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target prefix of every event this crate emits.
const CRATE_TARGET: &str = "coursetrack";

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (warnings and above).
    #[default]
    Normal,
    /// Verbose output (debug and above).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// Pick the level from `-q` and the number of `-v` flags; `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directive(self) -> String {
        format!("{CRATE_TARGET}={}", self.to_level_filter())
    }

    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Initialize the logging system.
///
/// This should be called once at application startup. The logging level can be
/// controlled via:
/// 1. The `verbosity` parameter
/// 2. The `RUST_LOG` environment variable (takes precedence)
///
/// Output goes to stderr so that command output on stdout stays clean.
///
/// # Examples
///
/// ```no_run
/// use coursetrack::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Install the subscriber (ignore error if already set)
    let _ = subscriber.try_init();
}

/// Capture this crate's warnings in test output.
///
/// Store fallbacks only show up as `warn!` events, so tests driving a
/// refusing store call this to make them visible with `--nocapture`.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(Verbosity::Normal.directive())
        .with_test_writer()
        .try_init();
}
