//! Multi-run orchestration.
//!
//! The [`Harness`] owns the top-level loop: for each of N runs it derives an
//! isolated run configuration, arranges the run's output directory, executes
//! the trainable process synchronously, captures its metric series and
//! tracks timing for progress/ETA reporting. Runs are strictly sequential;
//! no run begins until the previous run's handle has been dropped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::aggregate::aggregate;
use crate::config::{self, Properties};
use crate::error::{HarnessError, Result};
use crate::logsink::{LogSink, NullLogSink};
use crate::policy::OutputPolicy;
use crate::process::ProcessFactory;
use crate::report::write_reports;
use crate::telemetry::RunSpan;
use crate::timing::{format_interval, Clock, RunTimeEstimator, SystemClock};

/// Per-run metric series, indexed by run. Built incrementally as runs
/// finish and consumed exactly once by the aggregator.
#[derive(Debug, Clone, Default)]
pub struct RunResultTable {
    pub performance: Vec<Vec<f64>>,
    pub fitness: Vec<Vec<f64>>,
}

impl RunResultTable {
    pub fn push(&mut self, performance: Vec<f64>, fitness: Vec<f64>) {
        self.performance.push(performance);
        self.fitness.push(fitness);
    }

    pub fn num_runs(&self) -> usize {
        self.performance.len()
    }
}

/// Invocation-scoped options resolved from the command-line surface.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub policy: OutputPolicy,
    /// Overrides the `output.dir` property; used as-is, without the
    /// experiment-id path segment.
    pub output_dir: Option<PathBuf>,
    /// Name prefix of the aggregate result files.
    pub result_name: String,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            policy: OutputPolicy::Full,
            output_dir: None,
            result_name: "results".to_string(),
        }
    }
}

/// Drives one or more runs of the trainable process and reduces their
/// metrics to aggregate report artifacts.
pub struct Harness {
    factory: Box<dyn ProcessFactory>,
    clock: Box<dyn Clock>,
    sink: Box<dyn LogSink>,
}

impl Harness {
    pub fn new(factory: Box<dyn ProcessFactory>) -> Self {
        Self {
            factory,
            clock: Box::new(SystemClock),
            sink: Box::new(NullLogSink),
        }
    }

    /// Replace the wall clock used for the experiment identifier.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach the log sink redirected into each run's directory.
    pub fn with_log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Perform all configured runs and return the final generation's
    /// averaged fitness.
    ///
    /// Either every run completes and a full aggregate report is produced,
    /// or this fails and no aggregate is written; per-run artifacts of runs
    /// that did complete may remain on disk.
    pub fn run(&mut self, base: &Properties, opts: &HarnessOptions) -> Result<f64> {
        let experiment_id = self.clock.timestamp_millis();

        let output_root = if opts.policy.files_enabled() {
            let root = match &opts.output_dir {
                Some(dir) => dir.clone(),
                None => {
                    Path::new(base.get(config::OUTPUT_DIR_KEY)?).join(experiment_id.to_string())
                }
            };
            // A pre-existing directory means a prior experiment's artifacts
            // would be overwritten. Fatal, and checked before any run starts.
            if root.exists() {
                return Err(HarnessError::Configuration(format!(
                    "output directory {} already exists",
                    root.display()
                )));
            }
            Some(root)
        } else {
            None
        };

        let num_runs = positive_property(base, config::NUM_RUNS_KEY)?;
        let num_generations = positive_property(base, config::NUM_GENERATIONS_KEY)?;

        let result_base = match &output_root {
            Some(root) => root.join(&opts.result_name),
            None => PathBuf::from(&opts.result_name),
        };
        if let Some(root) = &output_root {
            info!(dir = %root.display(), "output directory");
            info!(
                prefix = %result_base.display(),
                "aggregate results will be written under this prefix"
            );
        }

        let started = Instant::now();
        let table = self.orchestrate(
            base,
            experiment_id,
            num_runs,
            output_root.as_deref(),
        )?;
        info!(
            runs = num_runs,
            elapsed = %format_interval(started.elapsed().as_secs()),
            "all runs completed"
        );

        let (avg_performance, avg_fitness) = aggregate(&table, num_generations)?;
        write_reports(&result_base, &avg_performance, &avg_fitness, opts.policy)
    }

    /// The orchestration loop proper. Returns a fully populated table;
    /// never a partial one.
    fn orchestrate(
        &mut self,
        base: &Properties,
        experiment_id: i64,
        num_runs: usize,
        output_root: Option<&Path>,
    ) -> Result<RunResultTable> {
        let run_name = base.get(config::RUN_NAME_KEY)?.to_string();
        let log_file = base.get_opt(config::RUN_LOG_FILE_KEY).map(str::to_string);

        let mut table = RunResultTable::default();
        let mut estimator = RunTimeEstimator::new();

        for run in 0..num_runs {
            let run_started = Instant::now();

            // Single-run naming stays stable: the index suffix appears only
            // when there is more than one run.
            let mut run_props = base.derive();
            let run_id = if num_runs > 1 {
                format!("{run_name}-{experiment_id}-{run}")
            } else {
                format!("{run_name}-{experiment_id}")
            };
            run_props.set(config::RUN_ID_KEY, &run_id);

            if let Some(root) = output_root {
                let run_dir = if num_runs > 1 {
                    root.join(run.to_string())
                } else {
                    root.to_path_buf()
                };
                fs::create_dir_all(&run_dir)?;
                run_props.set(config::OUTPUT_DIR_KEY, &run_dir.display().to_string());

                if let Some(name) = &log_file {
                    self.sink.redirect(&run_dir.join(name))?;
                }
            }

            let _span = RunSpan::enter(&run_id);
            info!(
                run = run + 1,
                total = num_runs,
                percent = run * 100 / num_runs,
                "starting run"
            );

            let mut process = self.factory.create(&run_props)?;
            process
                .execute()
                .map_err(|source| HarnessError::ProcessExecution { run, source })?;
            table.push(
                process.performance_series().to_vec(),
                process.fitness_series().to_vec(),
            );
            // Handle resources are released here, before the next run starts.
            drop(process);

            let duration = run_started.elapsed();
            estimator.observe(duration);
            let eta = estimator.eta(num_runs - run - 1);
            info!(
                run = run + 1,
                total = num_runs,
                percent = (run + 1) * 100 / num_runs,
                duration = %format_interval(duration.as_secs()),
                eta = %format_interval(eta.as_secs()),
                "run finished"
            );
        }

        Ok(table)
    }
}

fn positive_property(props: &Properties, key: &str) -> Result<usize> {
    let value = props.get_int(key)?;
    if value == 0 {
        return Err(HarnessError::Configuration(format!(
            "property '{key}' must be at least 1"
        )));
    }
    Ok(value)
}
