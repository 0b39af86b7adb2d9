mod checks;
mod metrics;
mod report;
mod thresholds;

pub use checks::{CheckRecorder, CheckRow, CheckSummary};
pub use metrics::{OperationStats, OperationSummary};
pub use report::print_run_summary;
pub use thresholds::{evaluate_thresholds, Threshold, ThresholdViolation};

use std::time::{Duration, Instant};

/// One timed operation against the service under test.
///
/// Created when the operation starts and finished with the outcome, so the elapsed time covers
/// the whole request including the wait for the response.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    operation_id: String,
    started: Instant,
    elapsed: Option<Duration>,
    is_error: bool,
}

impl OperationRecord {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            started: Instant::now(),
            elapsed: None,
            is_error: false,
        }
    }

    /// Stamp the record with the elapsed time and whether the operation failed at the
    /// transport level. A response with an error status is not a transport failure.
    pub fn finish(mut self, is_error: bool) -> Self {
        self.elapsed = Some(self.started.elapsed());
        self.is_error = is_error;
        self
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

/// Collects operation records from every virtual user during a run.
///
/// Cheap to clone, records are appended under a short lock. The series is only inspected once
/// the run has ended, via [Reporter::freeze].
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    records: std::sync::Arc<parking_lot::Mutex<Vec<OperationRecord>>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operation(&self, record: OperationRecord) {
        if record.elapsed.is_none() {
            log::warn!(
                "Dropping unfinished operation record for {}",
                record.operation_id
            );
            return;
        }
        self.records.lock().push(record);
    }

    /// Snapshot the recorded operations into an immutable statistics view.
    pub fn freeze(&self) -> OperationStats {
        OperationStats::from_records(&self.records.lock())
    }
}
