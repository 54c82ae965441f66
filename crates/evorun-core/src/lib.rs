//! evorun core - multi-run experiment orchestration for evolutionary training.
//!
//! Drives an opaque trainable process through N independent, strictly
//! sequential runs, collects the per-generation performance and fitness
//! series each run reports, averages them across runs and persists the
//! aggregate as plain-text report artifacts.
//!
//! The engine being trained is an external collaborator: it enters the
//! harness through the [`TrainableProcess`] and [`ProcessFactory`] traits
//! and is treated as a black box that yields one finite score series per
//! metric per run.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod logsink;
pub mod orchestrator;
pub mod policy;
pub mod process;
pub mod report;
pub mod telemetry;
pub mod timing;

// Re-export key types
pub use aggregate::aggregate;
pub use config::Properties;
pub use error::{HarnessError, Result};
pub use logsink::{FileLogSink, LogSink, NullLogSink};
pub use orchestrator::{Harness, HarnessOptions, RunResultTable};
pub use policy::OutputPolicy;
pub use process::{FactoryRegistry, ProcessFactory, TrainableProcess};
pub use report::{format_score, write_reports};
pub use telemetry::{init_tracing, RunSpan};
pub use timing::{format_interval, Clock, RunTimeEstimator, SystemClock};
