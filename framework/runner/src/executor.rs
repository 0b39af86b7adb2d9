use std::sync::Arc;
use std::time::Duration;

use gust_core::prelude::{
    DelegatedShutdownListener, IterationBailError, ShutdownHandle, ShutdownSignalError,
};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::config::{Executor, Scenario, VuBehaviour};
use crate::context::{RunnerContext, SharedValuesConstraint, VuContext};
use crate::schedule::RampSchedule;

// How often a ramping scenario re-evaluates its schedule and adjusts the pool.
const RAMP_TICK: Duration = Duration::from_millis(100);

/// Decides, between iterations, whether a virtual user should stop.
///
/// Constant scenarios stop on the scenario shutdown signal alone. Ramping scenarios also
/// retire any user whose index is at or above the published target, so ramp-down always
/// retires the highest-indexed users first.
struct VuGate {
    shutdown: DelegatedShutdownListener,
    target: Option<watch::Receiver<usize>>,
}

impl VuGate {
    fn should_stop(&mut self, vu_id: usize) -> bool {
        if self.shutdown.should_shutdown() {
            return true;
        }
        match &self.target {
            Some(target) => *target.borrow() <= vu_id,
            None => false,
        }
    }
}

/// Drive one scenario to completion: wait out its start offset, run its executor, retire
/// every virtual user.
pub(crate) async fn run_scenario<C: SharedValuesConstraint>(
    scenario: Scenario<C>,
    runner_context: Arc<RunnerContext<C>>,
    mut run_shutdown: DelegatedShutdownListener,
) {
    if !scenario.start_offset.is_zero() {
        tokio::select! {
            _ = tokio::time::sleep(scenario.start_offset) => {}
            _ = run_shutdown.wait_for_shutdown() => {
                log::debug!("Scenario [{}] cancelled before its start offset elapsed", scenario.name);
                return;
            }
        }
    }

    log::info!("Scenario [{}] starting", scenario.name);

    match &scenario.executor {
        Executor::ConstantVus { vus, duration } => {
            run_constant_vus(&scenario, *vus, *duration, runner_context, run_shutdown).await;
        }
        Executor::RampingVus { stages } => {
            let schedule = RampSchedule::new(stages);
            run_ramping_vus(&scenario, schedule, runner_context, run_shutdown).await;
        }
    }

    log::info!("Scenario [{}] finished", scenario.name);
}

async fn run_constant_vus<C: SharedValuesConstraint>(
    scenario: &Scenario<C>,
    vus: usize,
    duration: Duration,
    runner_context: Arc<RunnerContext<C>>,
    mut run_shutdown: DelegatedShutdownListener,
) {
    let scenario_shutdown = ShutdownHandle::new();

    let mut workers = JoinSet::new();
    for vu_id in 0..vus {
        workers.spawn(vu_loop(
            VuContext::new(
                vu_id,
                scenario.name.clone(),
                runner_context.clone(),
                scenario_shutdown.new_listener(),
            ),
            scenario.behaviour,
            VuGate {
                shutdown: scenario_shutdown.new_listener(),
                target: None,
            },
        ));
    }

    // Teardown fires when the declared duration elapses, regardless of how long individual
    // iterations take. In-flight iterations finish before their user stops.
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = run_shutdown.wait_for_shutdown() => {}
    }
    scenario_shutdown.shutdown();

    while workers.join_next().await.is_some() {}
}

async fn run_ramping_vus<C: SharedValuesConstraint>(
    scenario: &Scenario<C>,
    schedule: RampSchedule,
    runner_context: Arc<RunnerContext<C>>,
    mut run_shutdown: DelegatedShutdownListener,
) {
    let scenario_shutdown = ShutdownHandle::new();
    let (target_tx, target_rx) = watch::channel(0usize);

    log::debug!(
        "Scenario [{}] will peak at {} virtual users",
        scenario.name,
        schedule.max_target()
    );

    let started = Instant::now();
    let total = schedule.total_duration();
    let mut spawned = 0usize;
    let mut workers = JoinSet::new();
    let mut ticker = tokio::time::interval(RAMP_TICK);

    loop {
        let elapsed = started.elapsed();
        if elapsed >= total {
            break;
        }

        let target = schedule.target_at(elapsed);

        // Publish before spawning. A user spawned in this tick must never observe the
        // previous, lower target on its first gate check, or it would retire immediately
        // and leave the pool permanently below target.
        if target_tx.send(target).is_err() {
            break;
        }

        // New virtual users get the next free indices. Retired indices are not reused within
        // a ramp-down/ramp-up cycle, the gate only compares against the live target.
        while spawned < target {
            workers.spawn(vu_loop(
                VuContext::new(
                    spawned,
                    scenario.name.clone(),
                    runner_context.clone(),
                    scenario_shutdown.new_listener(),
                ),
                scenario.behaviour,
                VuGate {
                    shutdown: scenario_shutdown.new_listener(),
                    target: Some(target_rx.clone()),
                },
            ));
            spawned += 1;
        }

        tokio::select! {
            _ = ticker.tick() => {}
            _ = run_shutdown.wait_for_shutdown() => break,
        }
    }

    scenario_shutdown.shutdown();
    while workers.join_next().await.is_some() {}
}

async fn vu_loop<C: SharedValuesConstraint>(
    mut ctx: VuContext<C>,
    behaviour: VuBehaviour<C>,
    mut gate: VuGate,
) {
    let vu_id = ctx.vu_id();
    loop {
        if gate.should_stop(vu_id) {
            log::debug!("Retiring virtual user {} of [{}]", vu_id, ctx.scenario_name());
            break;
        }

        match behaviour(&mut ctx).await {
            Ok(()) => {}
            Err(e) if e.is::<IterationBailError>() => {
                log::debug!(
                    "Virtual user {} of [{}] bailed: {:?}",
                    vu_id,
                    ctx.scenario_name(),
                    e
                );
                break;
            }
            Err(e) if e.is::<ShutdownSignalError>() => {
                // Expected when an iteration raced the shutdown signal. The gate check at
                // the top of the loop stops the user.
            }
            Err(e) => {
                // An iteration failure never takes the virtual user down with it.
                log::warn!(
                    "Iteration failed for virtual user {} of [{}]: {:?}",
                    vu_id,
                    ctx.scenario_name(),
                    e
                );
            }
        }
    }
}
