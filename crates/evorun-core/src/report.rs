//! Aggregate report artifacts.
//!
//! One harness invocation produces two plain-text files, one per metric,
//! each a single line of comma-separated values formatted to exactly four
//! fractional digits. Existing files at the destination are overwritten
//! without warning.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{HarnessError, Result};
use crate::policy::OutputPolicy;

pub const PERFORMANCE_SUFFIX: &str = "avg_performance_in_each_gen_over_all_runs.txt";
pub const FITNESS_SUFFIX: &str = "avg_fitness_in_each_gen_over_all_runs.txt";

/// Format a score with exactly four fractional digits, rounding half away
/// from zero. The rounding happens over scaled integers so the rendered
/// text is exact.
pub fn format_score(value: f64) -> String {
    let scaled = (value * 10_000.0).round() as i64;
    let (sign, scaled) = if scaled < 0 { ("-", -scaled) } else { ("", scaled) };
    format!("{sign}{}.{:04}", scaled / 10_000, scaled % 10_000)
}

fn render_series(series: &[f64]) -> String {
    let mut line = String::new();
    for value in series {
        line.push_str(&format_score(*value));
        line.push_str(", ");
    }
    line.push('\n');
    line
}

fn artifact_path(base: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}", base.display(), suffix))
}

/// Serialize the averaged series to `{base}-<suffix>` artifacts, or do
/// nothing at all under the suppressed policy.
///
/// Returns the final generation's averaged fitness as the harness's scalar
/// summary result in every policy. An I/O failure is fatal; a partially
/// written first artifact is not rolled back.
pub fn write_reports(
    base: &Path,
    performance: &[f64],
    fitness: &[f64],
    policy: OutputPolicy,
) -> Result<f64> {
    let final_fitness = fitness.last().copied().ok_or_else(|| {
        HarnessError::Configuration("cannot report an empty fitness series".to_string())
    })?;

    if policy == OutputPolicy::Suppressed {
        return Ok(final_fitness);
    }

    for (series, suffix, metric) in [
        (performance, PERFORMANCE_SUFFIX, "performance"),
        (fitness, FITNESS_SUFFIX, "fitness"),
    ] {
        let path = artifact_path(base, suffix);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, render_series(series))?;
        info!(metric, path = %path.display(), "wrote per-generation average over all runs");
    }

    Ok(final_fitness)
}
