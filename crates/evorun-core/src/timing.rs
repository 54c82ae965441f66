//! Run timing: wall-clock identifiers and ETA estimation.

use std::time::Duration;

use chrono::Utc;

/// Injectable wall-clock source for the experiment identifier, so tests can
/// supply deterministic timestamps.
pub trait Clock {
    fn timestamp_millis(&self) -> i64;
}

/// System wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Exponential moving average of per-run wall-clock duration, used to
/// project the time remaining until all runs complete.
///
/// Mutated once per completed run; never persisted. The smoothing assumes
/// one in-flight run at a time.
#[derive(Debug, Default)]
pub struct RunTimeEstimator {
    avg_secs: Option<f64>,
}

impl RunTimeEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed run's duration into the average: the first
    /// observation seeds it, later ones are smoothed with a 0.9/0.1 split.
    pub fn observe(&mut self, duration: Duration) {
        let secs = duration.as_secs_f64();
        self.avg_secs = Some(match self.avg_secs {
            None => secs,
            Some(avg) => avg * 0.9 + secs * 0.1,
        });
    }

    /// Projected time to complete `remaining_runs` more runs, rounded to
    /// whole seconds. Zero before the first observation.
    pub fn eta(&self, remaining_runs: usize) -> Duration {
        let avg = self.avg_secs.unwrap_or(0.0);
        Duration::from_secs((avg * remaining_runs as f64).round() as u64)
    }
}

/// Render a second count as a compact interval, e.g. `1d 2h 3m 4s`.
pub fn format_interval(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let mins = (total_secs % 3_600) / 60;
    let secs = total_secs % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}d "));
    }
    if hours > 0 || !out.is_empty() {
        out.push_str(&format!("{hours}h "));
    }
    if mins > 0 || !out.is_empty() {
        out.push_str(&format!("{mins}m "));
    }
    out.push_str(&format!("{secs}s"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_seeds_average() {
        let mut est = RunTimeEstimator::new();
        est.observe(Duration::from_secs(100));
        assert_eq!(est.eta(3), Duration::from_secs(300));
    }

    #[test]
    fn test_later_observations_are_smoothed() {
        let mut est = RunTimeEstimator::new();
        est.observe(Duration::from_secs(100));
        est.observe(Duration::from_secs(200));
        // 100 * 0.9 + 200 * 0.1 = 110
        assert_eq!(est.eta(1), Duration::from_secs(110));
        assert_eq!(est.eta(2), Duration::from_secs(220));
    }

    #[test]
    fn test_eta_zero_before_any_observation() {
        let est = RunTimeEstimator::new();
        assert_eq!(est.eta(10), Duration::ZERO);
    }

    #[test]
    fn test_eta_rounds_to_whole_seconds() {
        let mut est = RunTimeEstimator::new();
        est.observe(Duration::from_millis(1_500));
        assert_eq!(est.eta(1), Duration::from_secs(2));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "0s");
        assert_eq!(format_interval(59), "59s");
        assert_eq!(format_interval(61), "1m 1s");
        assert_eq!(format_interval(3_600), "1h 0m 0s");
        assert_eq!(format_interval(90_061), "1d 1h 1m 1s");
    }
}
