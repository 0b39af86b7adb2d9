use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, Default)]
struct CheckCounter {
    passed: u64,
    total: u64,
}

/// Records named boolean checks from any virtual user.
///
/// Cheap to clone and safe to call concurrently. Each named check keeps a passed/total pair,
/// appended under a short lock so recording never meaningfully blocks an iteration.
#[derive(Debug, Clone, Default)]
pub struct CheckRecorder {
    counters: Arc<Mutex<HashMap<String, CheckCounter>>>,
}

impl CheckRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str, outcome: bool) {
        let mut counters = self.counters.lock();
        let counter = counters.entry(name.to_string()).or_default();
        counter.total += 1;
        if outcome {
            counter.passed += 1;
        }
    }

    /// Snapshot the per-name counters. Rows come out sorted by name so repeated runs produce
    /// the report in a stable order.
    pub fn aggregate(&self) -> CheckSummary {
        let counters = self.counters.lock();
        let mut rows: Vec<CheckRow> = counters
            .iter()
            .map(|(name, counter)| CheckRow {
                name: name.clone(),
                passed: counter.passed,
                total: counter.total,
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        CheckSummary { rows }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    pub name: String,
    pub passed: u64,
    pub total: u64,
}

impl CheckRow {
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub rows: Vec<CheckRow>,
}

impl CheckSummary {
    /// Overall pass rate across every named check. A run that recorded no checks at all gets
    /// a rate of 1.0 so it cannot spuriously fail a rate threshold.
    pub fn overall_rate(&self) -> f64 {
        let total: u64 = self.rows.iter().map(|row| row.total).sum();
        if total == 0 {
            return 1.0;
        }
        let passed: u64 = self.rows.iter().map(|row| row.passed).sum();
        passed as f64 / total as f64
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.total).sum()
    }

    pub fn passed(&self) -> u64 {
        self.rows.iter().map(|row| row.passed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aggregates_per_name_and_overall() {
        let recorder = CheckRecorder::new();
        recorder.record("status 200", true);
        recorder.record("status 200", true);
        recorder.record("status 200", false);
        recorder.record("body has id", true);

        let summary = recorder.aggregate();
        assert_eq!(
            summary.rows,
            vec![
                CheckRow {
                    name: "body has id".to_string(),
                    passed: 1,
                    total: 1,
                },
                CheckRow {
                    name: "status 200".to_string(),
                    passed: 2,
                    total: 3,
                },
            ]
        );
        assert_eq!(summary.overall_rate(), 3.0 / 4.0);
    }

    #[test]
    fn empty_recorder_rate_is_one() {
        let summary = CheckRecorder::new().aggregate();
        assert_eq!(summary.overall_rate(), 1.0);
        assert_eq!(summary.total(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_records_are_all_counted() {
        let recorder = CheckRecorder::new();

        let mut handles = Vec::new();
        for worker in 0..8 {
            let recorder = recorder.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..250 {
                    recorder.record("shared check", (i + worker) % 2 == 0);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let summary = recorder.aggregate();
        assert_eq!(summary.total(), 2000);
        assert_eq!(summary.passed(), 1000);
        assert_eq!(summary.overall_rate(), 0.5);
    }
}
