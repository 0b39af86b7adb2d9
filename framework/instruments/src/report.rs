mod checks_table;
mod operations_table;

use tabled::settings::Style;
use tabled::Table;

use crate::checks::CheckSummary;
use crate::metrics::OperationStats;
use crate::thresholds::ThresholdViolation;
use crate::report::checks_table::CheckTableRow;
use crate::report::operations_table::OperationRow;

/// Print the end-of-run summary tables and the threshold verdicts.
pub fn print_run_summary(
    stats: &OperationStats,
    checks: &CheckSummary,
    violations: &[ThresholdViolation],
) {
    println!("\nSummary of operations");
    let rows: Vec<OperationRow> = stats
        .summaries()
        .iter()
        .map(|summary| OperationRow {
            operation_id: summary.operation_id.clone(),
            count: summary.count,
            errors: summary.errors,
            avg_ms: summary.avg_ms,
            min_ms: summary.min_ms,
            max_ms: summary.max_ms,
            p95_ms: summary.p95_ms,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");

    println!("\nChecks");
    let rows: Vec<CheckTableRow> = checks
        .rows
        .iter()
        .map(|row| CheckTableRow {
            name: row.name.clone(),
            passed: row.passed,
            total: row.total,
            rate: row.rate(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");
    println!(
        "Overall check pass rate: {:.4} ({}/{})",
        checks.overall_rate(),
        checks.passed(),
        checks.total()
    );

    if violations.is_empty() {
        println!("\nAll thresholds met");
    } else {
        println!("\nThresholds violated:");
        for violation in violations {
            println!("  ✗ {violation}");
        }
    }
}
