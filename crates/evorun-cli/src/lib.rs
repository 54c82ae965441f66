//! Command-line surface for the evorun harness.
//!
//! The shipped `evorun` binary carries an empty [`FactoryRegistry`]: the
//! optimization engines themselves live in embedding crates, which register
//! their factories and reuse this surface through [`run`].

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::Level;

use evorun_core::config;
use evorun_core::telemetry::{init_tracing, init_tracing_with_run_log};
use evorun_core::{
    FactoryRegistry, FileLogSink, Harness, HarnessOptions, OutputPolicy, Properties,
};

#[derive(Parser, Debug)]
#[command(name = "evorun")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-run experiment harness for evolutionary training", long_about = None)]
pub struct Cli {
    /// Disable all output, to files and the terminal.
    #[arg(long)]
    pub no_output: bool,

    /// Do not generate any files (output to the terminal is still allowed).
    #[arg(long)]
    pub no_files: bool,

    /// Directory to write output files to (overrides output.dir in the
    /// configuration file).
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Name prefix of the files the aggregate results are written to.
    #[arg(long, default_value = "results")]
    pub result_name: String,

    /// Emit JSON-formatted log lines.
    #[arg(long)]
    pub json: bool,

    /// Configuration file to read experiment parameters from.
    pub config: Option<PathBuf>,
}

/// Parse the process arguments and drive the harness with the factories in
/// `registry`. Returns the final generation's averaged fitness.
///
/// When no configuration file is supplied, prints usage and exits with
/// code -1.
pub fn run(registry: FactoryRegistry) -> Result<f64> {
    let cli = Cli::parse();
    let Some(config_path) = cli.config.clone() else {
        Cli::command().print_help().ok();
        process::exit(-1);
    };

    let policy = OutputPolicy::from_flags(cli.no_output, cli.no_files);
    let properties = load_properties(&config_path)?;
    let sink = FileLogSink::new();

    // Under full suppression no subscriber is installed at all, so nothing
    // reaches the terminal either.
    if policy != OutputPolicy::Suppressed {
        let wants_run_log =
            policy.files_enabled() && properties.get_opt(config::RUN_LOG_FILE_KEY).is_some();
        if wants_run_log {
            init_tracing_with_run_log(cli.json, Level::INFO, sink.clone());
        } else {
            init_tracing(cli.json, Level::INFO);
        }
    }

    execute(&cli, properties, policy, sink, registry)
}

pub fn load_properties(path: &Path) -> Result<Properties> {
    Properties::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Apply the output policy to the loaded properties and run the harness.
pub fn execute(
    cli: &Cli,
    mut properties: Properties,
    policy: OutputPolicy,
    sink: FileLogSink,
    registry: FactoryRegistry,
) -> Result<f64> {
    if !policy.files_enabled() {
        properties.remove(config::OUTPUT_DIR_KEY);
    }

    let opts = HarnessOptions {
        policy,
        output_dir: if policy.files_enabled() {
            cli.output_dir.clone()
        } else {
            None
        },
        result_name: cli.result_name.clone(),
    };

    let mut harness = Harness::new(Box::new(registry)).with_log_sink(Box::new(sink));
    let final_fitness = harness.run(&properties, &opts)?;
    Ok(final_fitness)
}
