use std::collections::HashSet;
use std::time::Duration;

use futures::future::BoxFuture;
use gust_instruments::Threshold;

use crate::cli::GustScenarioCli;
use crate::context::{RunnerContext, SharedValuesConstraint, VuContext};
use crate::types::HookResult;

/// A virtual user's behaviour: one iteration per call, invoked back-to-back until the
/// scenario retires the user.
pub type VuBehaviour<C> = for<'a> fn(&'a mut VuContext<C>) -> BoxFuture<'a, HookResult>;

/// The setup hook. Runs exactly once, before any scenario's first iteration, and populates
/// the shared context every virtual user will read.
pub type SetupFn<C> = for<'a> fn(&'a mut RunnerContext<C>) -> BoxFuture<'a, HookResult>;

/// One step of a ramping executor: interpolate the active virtual-user count linearly from
/// the previous stage's target to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub duration: Duration,
    pub target: usize,
}

/// How a scenario drives its virtual-user population.
#[derive(Debug, Clone)]
pub enum Executor {
    /// Exactly `vus` virtual users alive for `duration`, each looping its behaviour with no
    /// delay between iterations beyond what the behaviour itself sleeps.
    ConstantVus { vus: usize, duration: Duration },

    /// Ramp the active virtual-user count through the ordered stages. A final target of 0
    /// drains the pool by the end of the last stage.
    RampingVus { stages: Vec<Stage> },
}

impl Executor {
    /// Wall-clock time this executor runs for, excluding the scenario's start offset.
    pub fn total_duration(&self) -> Duration {
        match self {
            Executor::ConstantVus { duration, .. } => *duration,
            Executor::RampingVus { stages } => stages.iter().map(|stage| stage.duration).sum(),
        }
    }

    fn scaled(self, factor: f64) -> Self {
        match self {
            Executor::ConstantVus { vus, duration } => Executor::ConstantVus {
                vus,
                duration: duration.mul_f64(factor),
            },
            Executor::RampingVus { stages } => Executor::RampingVus {
                stages: stages
                    .into_iter()
                    .map(|stage| Stage {
                        duration: stage.duration.mul_f64(factor),
                        target: stage.target,
                    })
                    .collect(),
            },
        }
    }
}

/// A named scenario bound to a behaviour function.
#[derive(Debug)]
pub struct Scenario<C: SharedValuesConstraint> {
    pub(crate) name: String,
    pub(crate) executor: Executor,
    pub(crate) start_offset: Duration,
    pub(crate) behaviour: VuBehaviour<C>,
}

impl<C: SharedValuesConstraint> Scenario<C> {
    pub fn constant_vus(
        name: &str,
        vus: usize,
        duration: Duration,
        behaviour: VuBehaviour<C>,
    ) -> Self {
        Self {
            name: name.to_string(),
            executor: Executor::ConstantVus { vus, duration },
            start_offset: Duration::ZERO,
            behaviour,
        }
    }

    pub fn ramping_vus(name: &str, stages: Vec<Stage>, behaviour: VuBehaviour<C>) -> Self {
        Self {
            name: name.to_string(),
            executor: Executor::RampingVus { stages },
            start_offset: Duration::ZERO,
            behaviour,
        }
    }

    /// Delay this scenario's start relative to the start of the run.
    pub fn with_start_offset(mut self, offset: Duration) -> Self {
        self.start_offset = offset;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The builder for a run configuration.
///
/// Declare the scenarios, thresholds and setup hook here, then hand the builder to
/// [crate::run::run]. Validation happens in [RunConfigBuilder::build] so an invalid
/// configuration fails before anything touches the service under test.
pub struct RunConfigBuilder<C: SharedValuesConstraint> {
    /// The name of the run, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: GustScenarioCli,
    initial_value: C,
    setup_fn: Option<SetupFn<C>>,
    scenarios: Vec<Scenario<C>>,
    thresholds: Vec<Threshold>,
}

impl<C: SharedValuesConstraint> RunConfigBuilder<C> {
    pub fn new(name: &str, cli: GustScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            initial_value: Default::default(),
            setup_fn: None,
            scenarios: Vec::new(),
            thresholds: Vec::new(),
        }
    }

    /// Seed the shared context value before the setup hook runs. Scenario-specific options
    /// that behaviours need at runtime go in here rather than in any global state.
    pub fn with_context(mut self, value: C) -> Self {
        self.initial_value = value;
        self
    }

    /// Set the setup hook. If it fails the whole run aborts before any scenario starts.
    pub fn use_setup(mut self, setup_fn: SetupFn<C>) -> Self {
        self.setup_fn = Some(setup_fn);
        self
    }

    pub fn add_scenario(mut self, scenario: Scenario<C>) -> Self {
        self.scenarios.push(scenario);
        self
    }

    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub(crate) fn build(self) -> anyhow::Result<RunConfig<C>> {
        url::Url::parse(&self.cli.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid base URL {}: {}", self.cli.base_url, e))?;

        if !(self.cli.duration_scale.is_finite() && self.cli.duration_scale > 0.0) {
            anyhow::bail!("--duration-scale must be a positive number");
        }

        if self.scenarios.is_empty() {
            anyhow::bail!("A run needs at least one scenario");
        }

        let mut names = HashSet::new();
        for scenario in &self.scenarios {
            if !names.insert(scenario.name.clone()) {
                anyhow::bail!("Scenario [{}] is declared twice", scenario.name);
            }

            match &scenario.executor {
                Executor::ConstantVus { vus, duration } => {
                    if *vus == 0 {
                        anyhow::bail!("Scenario [{}] declares zero virtual users", scenario.name);
                    }
                    if duration.is_zero() {
                        anyhow::bail!("Scenario [{}] declares a zero duration", scenario.name);
                    }
                }
                Executor::RampingVus { stages } => {
                    if stages.is_empty() {
                        anyhow::bail!("Scenario [{}] declares no ramp stages", scenario.name);
                    }
                    if stages.iter().any(|stage| stage.duration.is_zero()) {
                        anyhow::bail!(
                            "Scenario [{}] declares a zero-duration ramp stage",
                            scenario.name
                        );
                    }
                }
            }
        }

        let factor = self.cli.duration_scale;
        let scenarios = self
            .scenarios
            .into_iter()
            .map(|scenario| {
                let Scenario {
                    name,
                    executor,
                    start_offset,
                    behaviour,
                } = scenario;
                Scenario {
                    name,
                    executor: executor.scaled(factor),
                    start_offset: start_offset.mul_f64(factor),
                    behaviour,
                }
            })
            .collect();

        Ok(RunConfig {
            name: self.name,
            cli: self.cli,
            initial_value: self.initial_value,
            setup_fn: self.setup_fn,
            scenarios,
            thresholds: self.thresholds,
        })
    }
}

/// The validated, immutable configuration for one run.
#[derive(Debug)]
pub(crate) struct RunConfig<C: SharedValuesConstraint> {
    pub(crate) name: String,
    pub(crate) cli: GustScenarioCli,
    pub(crate) initial_value: C,
    pub(crate) setup_fn: Option<SetupFn<C>>,
    pub(crate) scenarios: Vec<Scenario<C>>,
    pub(crate) thresholds: Vec<Threshold>,
}

impl<C: SharedValuesConstraint> RunConfig<C> {
    /// The planned wall-clock runtime of the whole run: the slowest scenario's start offset
    /// plus its executor duration.
    pub(crate) fn planned_runtime(&self) -> Duration {
        self.scenarios
            .iter()
            .map(|scenario| scenario.start_offset + scenario.executor.total_duration())
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HookResult;
    use futures::future::BoxFuture;
    use futures::FutureExt;

    #[derive(Debug, Default)]
    struct NoContext {}

    impl SharedValuesConstraint for NoContext {}

    fn noop(_ctx: &mut VuContext<NoContext>) -> BoxFuture<'_, HookResult> {
        async { Ok(()) }.boxed()
    }

    fn cli() -> GustScenarioCli {
        GustScenarioCli {
            base_url: "http://localhost:8080".to_string(),
            duration_scale: 1.0,
            request_timeout: 30,
            no_progress: true,
        }
    }

    #[test]
    fn rejects_duplicate_scenario_names() {
        let result = RunConfigBuilder::<NoContext>::new("test", cli())
            .add_scenario(Scenario::constant_vus(
                "smoke",
                1,
                Duration::from_secs(1),
                noop,
            ))
            .add_scenario(Scenario::constant_vus(
                "smoke",
                1,
                Duration::from_secs(1),
                noop,
            ))
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("declared twice"));
    }

    #[test]
    fn rejects_empty_stage_list() {
        let result = RunConfigBuilder::<NoContext>::new("test", cli())
            .add_scenario(Scenario::ramping_vus("ramp", vec![], noop))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_duration_stage() {
        let result = RunConfigBuilder::<NoContext>::new("test", cli())
            .add_scenario(Scenario::ramping_vus(
                "ramp",
                vec![Stage {
                    duration: Duration::ZERO,
                    target: 10,
                }],
                noop,
            ))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let mut cli = cli();
        cli.base_url = "not a url".to_string();

        let result = RunConfigBuilder::<NoContext>::new("test", cli)
            .add_scenario(Scenario::constant_vus(
                "smoke",
                1,
                Duration::from_secs(1),
                noop,
            ))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn duration_scale_shrinks_offsets_and_stages() {
        let mut cli = cli();
        cli.duration_scale = 0.5;

        let config = RunConfigBuilder::<NoContext>::new("test", cli)
            .add_scenario(
                Scenario::ramping_vus(
                    "ramp",
                    vec![Stage {
                        duration: Duration::from_secs(60),
                        target: 10,
                    }],
                    noop,
                )
                .with_start_offset(Duration::from_secs(10)),
            )
            .build()
            .unwrap();

        let scenario = &config.scenarios[0];
        assert_eq!(scenario.start_offset, Duration::from_secs(5));
        assert_eq!(scenario.executor.total_duration(), Duration::from_secs(30));
        assert_eq!(config.planned_runtime(), Duration::from_secs(35));
    }
}
