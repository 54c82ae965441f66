//! Error types for harness operations.
//!
//! None of these are recovered locally: every variant propagates to the
//! top-level invocation, which reports the failure and terminates. There is
//! no partial-success mode.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// Missing or invalid configuration, including an output-directory
    /// collision and an unregistered process name.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A run failed during execution. Remaining runs are aborted; there is
    /// no skip and no retry.
    #[error("run {run} failed during execution")]
    ProcessExecution {
        run: usize,
        #[source]
        source: anyhow::Error,
    },

    /// A run's metric series length does not match the configured
    /// generation count. This is a contract violation between the harness
    /// and the trainable process, never silently truncated or padded.
    #[error("run {run} produced a {metric} series of length {actual}, expected {expected}")]
    DimensionMismatch {
        run: usize,
        metric: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Filesystem failure while laying out run directories or writing
    /// report artifacts. A partially written first artifact is not rolled
    /// back.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
