// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use tokio::time::Instant;

use crate::engine::SimulationResult;

/// Estimate the seconds remaining in a run.
///
/// Takes the median elapsed time of the `window` most recent successful
/// results with a finite elapsed time (newest first, other entries are
/// skipped without counting against the window) and scales it by the number
/// of samples still outstanding per configured worker.
///
/// Returns NaN when no result qualifies.
///
/// # Example
/// ```
/// use sim_dispatch::engine::{estimate_remaining_time, SimulationResult};
///
/// let results: Vec<SimulationResult<()>> = [5.0, 7.0, 3.0]
///     .into_iter()
///     .map(|elapsed| SimulationResult {
///         succeeded: true,
///         error_message: None,
///         elapsed_time: elapsed,
///         payload: (),
///     })
///     .collect();
///
/// assert_eq!(estimate_remaining_time(&results, 10, 2, 25), 17.5);
/// ```
pub fn estimate_remaining_time<P>(
    results: &[SimulationResult<P>],
    num_samples: usize,
    num_workers: usize,
    window: usize,
) -> f64 {
    let mut recent: Vec<f64> = results
        .iter()
        .rev()
        .filter(|result| result.succeeded && result.has_finite_elapsed_time())
        .take(window)
        .map(|result| result.elapsed_time)
        .collect();

    if recent.is_empty() || num_workers == 0 {
        return f64::NAN;
    }

    recent.sort_by(f64::total_cmp);
    let mid = recent.len() / 2;
    let median = if recent.len() % 2 == 0 {
        (recent[mid - 1] + recent[mid]) / 2.0
    } else {
        recent[mid]
    };

    let remaining = num_samples.saturating_sub(results.len()) as f64;
    median * remaining / num_workers as f64
}

/// Single-shot coalescing timer for progress notifications.
///
/// Arming while already pending keeps the original deadline, so a burst of
/// results produces one notification one interval after the first of them.
#[derive(Debug)]
pub struct ProgressDebounce {
    interval: Duration,
    deadline: Option<Instant>,
}

impl ProgressDebounce {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Arm the timer unless it is already pending. Returns whether it was armed.
    pub fn arm(&mut self) -> bool {
        self.arm_at(Instant::now())
    }

    pub fn arm_at(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.interval);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Clear the pending deadline after it fired.
    pub fn reset(&mut self) {
        self.deadline = None;
    }
}

/// Sleep until `deadline`, or forever when there is none.
pub(crate) async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(elapsed: f64, succeeded: bool) -> SimulationResult<()> {
        SimulationResult {
            succeeded,
            error_message: None,
            elapsed_time: elapsed,
            payload: (),
        }
    }

    #[test]
    fn eta_for_three_results_on_two_workers() {
        let results = vec![finished(5.0, true), finished(7.0, true), finished(3.0, true)];
        assert_eq!(estimate_remaining_time(&results, 10, 2, 25), 17.5);
    }

    #[test]
    fn eta_is_nan_without_finite_durations() {
        let results = vec![finished(f64::NAN, true), finished(f64::INFINITY, true)];
        assert!(estimate_remaining_time(&results, 10, 2, 25).is_nan());
        assert!(estimate_remaining_time::<()>(&[], 10, 2, 25).is_nan());
    }

    #[test]
    fn failed_results_do_not_feed_the_median_but_count_as_processed() {
        let results = vec![finished(4.0, true), finished(100.0, false)];
        // median 4, remaining 8, one worker
        assert_eq!(estimate_remaining_time(&results, 10, 1, 25), 32.0);
    }

    #[test]
    fn even_count_uses_mean_of_middle_values() {
        let results = vec![finished(2.0, true), finished(4.0, true), finished(6.0, true), finished(10.0, true)];
        // median 5, remaining 6, three workers
        assert_eq!(estimate_remaining_time(&results, 10, 3, 25), 10.0);
    }

    #[test]
    fn window_takes_newest_entries_and_skips_non_finite() {
        let results = vec![
            finished(100.0, true),
            finished(1.0, true),
            finished(f64::NAN, true),
            finished(3.0, true),
        ];
        // newest two finite: 3 and 1, median 2, remaining 6
        assert_eq!(estimate_remaining_time(&results, 10, 2, 2), 6.0);
    }

    #[test]
    fn no_remaining_samples_means_zero_eta() {
        let results = vec![finished(5.0, true), finished(5.0, true)];
        assert_eq!(estimate_remaining_time(&results, 2, 2, 25), 0.0);
    }

    #[test]
    fn debounce_arms_only_when_idle() {
        let mut debounce = ProgressDebounce::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(debounce.arm_at(start));
        let first = debounce.deadline();
        assert!(!debounce.arm_at(start + Duration::from_millis(200)));
        assert_eq!(debounce.deadline(), first);
        assert_eq!(first, Some(start + Duration::from_millis(500)));

        debounce.reset();
        assert!(!debounce.is_pending());
        assert!(debounce.arm());
    }

    #[tokio::test]
    async fn sleep_until_opt_waits_for_the_deadline() {
        let deadline = Instant::now() + Duration::from_millis(50);
        sleep_until_opt(Some(deadline)).await;
        assert!(Instant::now() >= deadline);

        let never = tokio::time::timeout(Duration::from_millis(50), sleep_until_opt(None)).await;
        assert!(never.is_err());
    }
}
