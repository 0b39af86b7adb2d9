use std::collections::HashMap;

use crate::OperationRecord;

/// Immutable view over the operation records of a finished run.
///
/// Built once from the frozen record series. Durations are held in milliseconds, sorted
/// ascending, with transport errors kept out of the duration series but counted per
/// operation.
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    sorted_durations_ms: Vec<f64>,
    summaries: Vec<OperationSummary>,
}

#[derive(Debug, Clone)]
pub struct OperationSummary {
    pub operation_id: String,
    pub count: usize,
    pub errors: usize,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p95_ms: f64,
}

impl OperationStats {
    pub(crate) fn from_records(records: &[OperationRecord]) -> Self {
        let mut sorted_durations_ms = Vec::with_capacity(records.len());
        let mut grouped: HashMap<&str, Vec<&OperationRecord>> = HashMap::new();
        for record in records {
            grouped
                .entry(record.operation_id())
                .or_default()
                .push(record);
            if !record.is_error() {
                if let Some(elapsed) = record.elapsed() {
                    sorted_durations_ms.push(elapsed.as_secs_f64() * 1000.0);
                }
            }
        }
        sorted_durations_ms.sort_by(|a, b| a.total_cmp(b));

        let mut summaries: Vec<OperationSummary> = grouped
            .into_iter()
            .map(|(operation_id, records)| {
                let mut durations_ms: Vec<f64> = records
                    .iter()
                    .filter(|record| !record.is_error())
                    .filter_map(|record| record.elapsed())
                    .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
                    .collect();
                durations_ms.sort_by(|a, b| a.total_cmp(b));

                let errors = records.iter().filter(|record| record.is_error()).count();
                let sum: f64 = durations_ms.iter().sum();

                OperationSummary {
                    operation_id: operation_id.to_string(),
                    count: records.len(),
                    errors,
                    avg_ms: if durations_ms.is_empty() {
                        0.0
                    } else {
                        sum / durations_ms.len() as f64
                    },
                    min_ms: durations_ms.first().copied().unwrap_or(0.0),
                    max_ms: durations_ms.last().copied().unwrap_or(0.0),
                    p95_ms: percentile_of_sorted(&durations_ms, 95.0).unwrap_or(0.0),
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.operation_id.cmp(&b.operation_id));

        Self {
            sorted_durations_ms,
            summaries,
        }
    }

    /// Percentile over all successful request durations, in milliseconds. None when no
    /// successful request was recorded.
    pub fn duration_percentile_ms(&self, percentile: f64) -> Option<f64> {
        percentile_of_sorted(&self.sorted_durations_ms, percentile)
    }

    pub fn summaries(&self) -> &[OperationSummary] {
        &self.summaries
    }

    pub fn total_operations(&self) -> usize {
        self.summaries.iter().map(|summary| summary.count).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.summaries.iter().map(|summary| summary.errors).sum()
    }
}

// Nearest-rank percentile, as k6 reports it: index ceil(p/100 * n) - 1 over the ascending
// series.
fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (percentile / 100.0 * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, sorted.len()) - 1])
}
