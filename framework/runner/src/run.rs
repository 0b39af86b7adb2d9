use std::sync::Arc;

use anyhow::Context;
use gust_instruments::{evaluate_thresholds, print_run_summary, CheckRecorder, Reporter};
use tokio::task::JoinSet;

use crate::config::RunConfigBuilder;
use crate::context::{RunnerContext, SharedValuesConstraint};
use crate::executor::run_scenario;
use crate::progress::start_progress;
use crate::shutdown::start_shutdown_listener;

/// Execute a run from its builder: setup once, every scenario concurrently, then the summary
/// and threshold evaluation.
///
/// Returns an error if the configuration is invalid, if the setup hook fails (in which case
/// no scenario has started), or if any threshold is violated at the end.
pub fn run<C: SharedValuesConstraint>(builder: RunConfigBuilder<C>) -> anyhow::Result<()> {
    let config = builder.build()?;

    log::info!("Running: {}", config.name);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let shutdown_handle = start_shutdown_listener(&runtime);

    let planned_runtime = config.planned_runtime();

    let reporter = Reporter::new();
    let checks = CheckRecorder::new();
    let mut runner_context = RunnerContext::new(
        reporter.clone(),
        checks.clone(),
        config.cli.base_url.clone(),
        std::time::Duration::from_secs(config.cli.request_timeout),
        config.initial_value,
    );

    if let Some(setup_fn) = config.setup_fn {
        runtime
            .block_on(setup_fn(&mut runner_context))
            .context("Setup failed, aborting before any scenario starts")?;
    }

    if !config.cli.no_progress {
        start_progress(planned_runtime, shutdown_handle.new_listener());
    }

    // The shared context is frozen from here on, scenarios only read it.
    let runner_context = Arc::new(runner_context);

    runtime.block_on(async {
        let mut scenarios = JoinSet::new();
        for scenario in config.scenarios {
            scenarios.spawn(run_scenario(
                scenario,
                runner_context.clone(),
                shutdown_handle.new_listener(),
            ));
        }

        while let Some(joined) = scenarios.join_next().await {
            if let Err(e) = joined {
                log::error!("Scenario task panicked: {:?}", e);
            }
        }
    });

    // Stops the progress bar if the run completed without an interrupt.
    shutdown_handle.shutdown();

    let stats = reporter.freeze();
    let check_summary = checks.aggregate();
    let violations = evaluate_thresholds(&config.thresholds, &stats, &check_summary);
    print_run_summary(&stats, &check_summary, &violations);

    if violations.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "Run failed: {} threshold(s) violated: {}",
            violations.len(),
            violations
                .iter()
                .map(|violation| violation.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        )
    }
}
