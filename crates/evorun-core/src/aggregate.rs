//! Cross-run aggregation of per-generation metric series.

use crate::error::{HarnessError, Result};
use crate::orchestrator::RunResultTable;

/// Reduce a fully populated result table to two averaged series, one value
/// per generation: the arithmetic mean across runs of performance and of
/// fitness. Plain mean, no weighting, no outlier handling.
///
/// Pure and deterministic. Any run whose series length differs from
/// `num_generations` is a contract violation and fails with
/// [`HarnessError::DimensionMismatch`].
pub fn aggregate(table: &RunResultTable, num_generations: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let num_runs = table.num_runs();
    if num_runs == 0 {
        return Err(HarnessError::Configuration(
            "result table holds no runs".to_string(),
        ));
    }

    check_lengths(&table.performance, "performance", num_generations)?;
    check_lengths(&table.fitness, "fitness", num_generations)?;

    let mut avg_performance = vec![0.0; num_generations];
    let mut avg_fitness = vec![0.0; num_generations];
    for run in 0..num_runs {
        for gen in 0..num_generations {
            avg_performance[gen] += table.performance[run][gen];
            avg_fitness[gen] += table.fitness[run][gen];
        }
    }
    for gen in 0..num_generations {
        avg_performance[gen] /= num_runs as f64;
        avg_fitness[gen] /= num_runs as f64;
    }

    Ok((avg_performance, avg_fitness))
}

fn check_lengths(series: &[Vec<f64>], metric: &'static str, expected: usize) -> Result<()> {
    for (run, values) in series.iter().enumerate() {
        if values.len() != expected {
            return Err(HarnessError::DimensionMismatch {
                run,
                metric,
                expected,
                actual: values.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(performance: Vec<Vec<f64>>, fitness: Vec<Vec<f64>>) -> RunResultTable {
        let mut t = RunResultTable::default();
        for (p, f) in performance.into_iter().zip(fitness) {
            t.push(p, f);
        }
        t
    }

    #[test]
    fn test_mean_over_three_runs() {
        let t = table(
            vec![vec![1.0], vec![3.0], vec![2.0]],
            vec![vec![2.0], vec![2.0], vec![2.0]],
        );
        let (perf, fit) = aggregate(&t, 1).unwrap();
        assert_eq!(perf, vec![2.0]);
        assert_eq!(fit, vec![2.0]);
    }

    #[test]
    fn test_aggregate_length_matches_generations() {
        let t = table(
            vec![vec![0.0; 7], vec![1.0; 7]],
            vec![vec![0.5; 7], vec![0.5; 7]],
        );
        let (perf, fit) = aggregate(&t, 7).unwrap();
        assert_eq!(perf.len(), 7);
        assert_eq!(fit.len(), 7);
    }

    #[test]
    fn test_identical_runs_average_to_themselves() {
        let series = vec![0.25, 0.5, 0.75, 1.0];
        let t = table(
            vec![series.clone(), series.clone(), series.clone()],
            vec![series.clone(), series.clone(), series.clone()],
        );
        let (perf, fit) = aggregate(&t, 4).unwrap();
        for gen in 0..4 {
            assert!((perf[gen] - series[gen]).abs() < 1e-12);
            assert!((fit[gen] - series[gen]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_short_series_is_dimension_mismatch() {
        let t = table(
            vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]],
            vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]],
        );
        let err = aggregate(&t, 3).unwrap_err();
        match err {
            HarnessError::DimensionMismatch {
                run,
                metric,
                expected,
                actual,
            } => {
                assert_eq!(run, 1);
                assert_eq!(metric, "performance");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_long_series_is_dimension_mismatch() {
        let t = table(vec![vec![1.0, 2.0]], vec![vec![0.0, 0.0, 0.0]]);
        let err = aggregate(&t, 2).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::DimensionMismatch {
                metric: "fitness",
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_table_rejected() {
        let t = RunResultTable::default();
        assert!(matches!(
            aggregate(&t, 1),
            Err(HarnessError::Configuration(_))
        ));
    }
}
