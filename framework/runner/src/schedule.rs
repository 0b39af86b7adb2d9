use std::time::Duration;

use crate::config::Stage;

/// The virtual-user target of a ramping scenario as a pure function of elapsed time.
///
/// Within a stage the target moves linearly from the previous stage's target (0 before the
/// first stage) to the stage's own. Past the end of the last stage the final target holds, so
/// a schedule ending at 0 stays drained.
#[derive(Debug, Clone)]
pub(crate) struct RampSchedule {
    // (stage start, stage end, from target, to target)
    segments: Vec<(Duration, Duration, usize, usize)>,
}

impl RampSchedule {
    pub(crate) fn new(stages: &[Stage]) -> Self {
        let mut segments = Vec::with_capacity(stages.len());
        let mut start = Duration::ZERO;
        let mut from = 0usize;
        for stage in stages {
            let end = start + stage.duration;
            segments.push((start, end, from, stage.target));
            start = end;
            from = stage.target;
        }

        Self { segments }
    }

    pub(crate) fn target_at(&self, elapsed: Duration) -> usize {
        for (start, end, from, to) in &self.segments {
            if elapsed < *end {
                let fraction =
                    (elapsed - *start).as_secs_f64() / (*end - *start).as_secs_f64();
                let interpolated = *from as f64 + (*to as f64 - *from as f64) * fraction;
                return interpolated.round() as usize;
            }
        }

        self.segments.last().map(|(_, _, _, to)| *to).unwrap_or(0)
    }

    pub(crate) fn total_duration(&self) -> Duration {
        self.segments.last().map(|(_, end, _, _)| *end).unwrap_or(Duration::ZERO)
    }

    /// The largest instantaneous target anywhere on the schedule.
    pub(crate) fn max_target(&self) -> usize {
        self.segments
            .iter()
            .map(|(_, _, from, to)| (*from).max(*to))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stage(secs: u64, target: usize) -> Stage {
        Stage {
            duration: Duration::from_secs(secs),
            target,
        }
    }

    // The declared shape of the `full` scenario: up to 10 over 1m, to 50 over 2m, to 100
    // over 1m, down to 0 over 1m.
    fn full_ramp() -> RampSchedule {
        RampSchedule::new(&[
            stage(60, 10),
            stage(120, 50),
            stage(60, 100),
            stage(60, 0),
        ])
    }

    #[test]
    fn ramps_linearly_within_a_stage() {
        let schedule = full_ramp();

        assert_eq!(schedule.target_at(Duration::ZERO), 0);
        assert_eq!(schedule.target_at(Duration::from_secs(30)), 5);
        assert_eq!(schedule.target_at(Duration::from_secs(60)), 10);
        assert_eq!(schedule.target_at(Duration::from_secs(120)), 30);
        assert_eq!(schedule.target_at(Duration::from_secs(180)), 50);
        assert_eq!(schedule.target_at(Duration::from_secs(240)), 100);
        assert_eq!(schedule.target_at(Duration::from_secs(270)), 50);
    }

    #[test]
    fn drains_to_zero_and_stays_there() {
        let schedule = full_ramp();

        assert_eq!(schedule.target_at(Duration::from_secs(300)), 0);
        assert_eq!(schedule.target_at(Duration::from_secs(10_000)), 0);
        assert_eq!(schedule.total_duration(), Duration::from_secs(300));
    }

    #[test]
    fn never_exceeds_the_peak_target() {
        let schedule = full_ramp();
        let max = schedule.max_target();
        assert_eq!(max, 100);

        for tenth_of_second in 0..3000 {
            let elapsed = Duration::from_millis(tenth_of_second * 100);
            assert!(schedule.target_at(elapsed) <= max);
        }
    }

    #[test]
    fn ramp_down_only_schedule_starts_from_zero() {
        // The first stage always interpolates from 0, so a single draining stage is just 0
        // the whole way after its initial instant.
        let schedule = RampSchedule::new(&[stage(10, 0)]);
        assert_eq!(schedule.target_at(Duration::from_secs(5)), 0);
    }
}
