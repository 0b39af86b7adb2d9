use std::{fmt::Debug, sync::Arc};

use gust_core::prelude::DelegatedShutdownListener;
use gust_instruments::{CheckRecorder, Reporter};

/// Constraint on the shared context value produced by the setup hook.
pub trait SharedValuesConstraint: Default + Debug + Send + Sync + 'static {}

/// Run-wide context: the reporter, the check recorder and the shared value the setup hook
/// produced.
///
/// The setup hook gets mutable access, exactly once, before any scenario starts. After that
/// the context sits behind an `Arc` and every virtual user reads the same frozen value.
#[derive(Debug)]
pub struct RunnerContext<C: SharedValuesConstraint> {
    reporter: Reporter,
    checks: CheckRecorder,
    base_url: String,
    request_timeout: std::time::Duration,
    value: C,
}

impl<C: SharedValuesConstraint> RunnerContext<C> {
    pub(crate) fn new(
        reporter: Reporter,
        checks: CheckRecorder,
        base_url: String,
        request_timeout: std::time::Duration,
        value: C,
    ) -> Self {
        Self {
            reporter,
            checks,
            base_url,
            request_timeout,
            value,
        }
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn checks(&self) -> &CheckRecorder {
        &self.checks
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout the scenario's HTTP client should use.
    pub fn request_timeout(&self) -> std::time::Duration {
        self.request_timeout
    }

    pub fn get(&self) -> &C {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut C {
        &mut self.value
    }
}

/// Per-virtual-user context handed to the behaviour function on every iteration.
pub struct VuContext<C: SharedValuesConstraint> {
    vu_id: usize,
    scenario_name: String,
    runner_context: Arc<RunnerContext<C>>,
    shutdown_listener: DelegatedShutdownListener,
}

impl<C: SharedValuesConstraint> VuContext<C> {
    pub(crate) fn new(
        vu_id: usize,
        scenario_name: String,
        runner_context: Arc<RunnerContext<C>>,
        shutdown_listener: DelegatedShutdownListener,
    ) -> Self {
        Self {
            vu_id,
            scenario_name,
            runner_context,
            shutdown_listener,
        }
    }

    /// The worker index within this scenario, stable across the virtual user's iterations.
    pub fn vu_id(&self) -> usize {
        self.vu_id
    }

    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    pub fn runner_context(&self) -> &Arc<RunnerContext<C>> {
        &self.runner_context
    }

    /// Shortcut to the run-wide check recorder.
    pub fn checks(&self) -> &CheckRecorder {
        self.runner_context.checks()
    }

    /// For behaviours that want to react to shutdown mid-iteration instead of waiting for the
    /// loop check between iterations.
    pub fn shutdown_listener(&mut self) -> &mut DelegatedShutdownListener {
        &mut self.shutdown_listener
    }
}
