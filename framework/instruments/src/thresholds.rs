use std::fmt;

use crate::checks::CheckSummary;
use crate::metrics::OperationStats;

/// A pass/fail criterion evaluated over the frozen run data.
///
/// Violations are only detected at the end of the run, they never stop in-flight work.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// The given percentile of all successful request durations must be below `below_ms`.
    DurationPercentile { percentile: f64, below_ms: f64 },
    /// The overall check pass rate must be above `above`.
    CheckRate { above: f64 },
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::DurationPercentile {
                percentile,
                below_ms,
            } => {
                write!(f, "http_req_duration: p({percentile})<{below_ms}")
            }
            Threshold::CheckRate { above } => write!(f, "checks: rate>{above}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdViolation {
    pub threshold: Threshold,
    pub actual: f64,
}

impl fmt::Display for ThresholdViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violated, actual {:.3}", self.threshold, self.actual)
    }
}

/// Evaluate every threshold against the run's frozen stats and checks.
///
/// A duration threshold over a run with no successful requests counts as a violation, a run
/// that measured nothing cannot demonstrate that it met its latency target.
pub fn evaluate_thresholds(
    thresholds: &[Threshold],
    stats: &OperationStats,
    checks: &CheckSummary,
) -> Vec<ThresholdViolation> {
    let mut violations = Vec::new();

    for threshold in thresholds {
        match threshold {
            Threshold::DurationPercentile {
                percentile,
                below_ms,
            } => match stats.duration_percentile_ms(*percentile) {
                Some(actual) if actual < *below_ms => {}
                Some(actual) => violations.push(ThresholdViolation {
                    threshold: threshold.clone(),
                    actual,
                }),
                None => violations.push(ThresholdViolation {
                    threshold: threshold.clone(),
                    actual: f64::NAN,
                }),
            },
            Threshold::CheckRate { above } => {
                let actual = checks.overall_rate();
                if actual <= *above {
                    violations.push(ThresholdViolation {
                        threshold: threshold.clone(),
                        actual,
                    });
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CheckRecorder, OperationRecord, Reporter};
    use std::time::Duration;

    fn reporter_with_durations(durations_ms: &[u64]) -> Reporter {
        let reporter = Reporter::new();
        for &ms in durations_ms {
            let mut record = OperationRecord::new("op").finish(false);
            record.elapsed = Some(Duration::from_millis(ms));
            reporter.add_operation(record);
        }
        reporter
    }

    #[test]
    fn passing_run_has_no_violations() {
        let stats = reporter_with_durations(&[10, 20, 30]).freeze();
        let recorder = CheckRecorder::new();
        recorder.record("ok", true);

        let thresholds = [
            Threshold::DurationPercentile {
                percentile: 95.0,
                below_ms: 1000.0,
            },
            Threshold::CheckRate { above: 0.99 },
        ];
        let violations = evaluate_thresholds(&thresholds, &stats, &recorder.aggregate());
        assert!(violations.is_empty());
    }

    #[test]
    fn slow_p95_is_reported() {
        let stats = reporter_with_durations(&[10, 20, 1500]).freeze();
        let thresholds = [Threshold::DurationPercentile {
            percentile: 95.0,
            below_ms: 1000.0,
        }];

        let violations =
            evaluate_thresholds(&thresholds, &stats, &CheckRecorder::new().aggregate());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].actual, 1500.0);
    }

    #[test]
    fn failing_check_rate_is_reported() {
        let stats = reporter_with_durations(&[10]).freeze();
        let recorder = CheckRecorder::new();
        for i in 0..100 {
            recorder.record("flaky", i >= 2);
        }

        let thresholds = [Threshold::CheckRate { above: 0.99 }];
        let violations = evaluate_thresholds(&thresholds, &stats, &recorder.aggregate());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].actual, 0.98);
    }

    #[test]
    fn duration_threshold_without_samples_is_a_violation() {
        let stats = Reporter::new().freeze();
        let thresholds = [Threshold::DurationPercentile {
            percentile: 95.0,
            below_ms: 1000.0,
        }];

        let violations =
            evaluate_thresholds(&thresholds, &stats, &CheckRecorder::new().aggregate());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].actual.is_nan());
    }
}
