//! Repeated-trial timing of planner calls.

use std::collections::BTreeMap;
use std::time::Instant;

use gridcheck_map::{MotionPlanner, RobotPath};
use serde::{Deserialize, Serialize};

use crate::cases::TestCase;

/// Which series a single planner call lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeBucket {
    /// The planner returned more than one pose.
    Success,
    Failure,
}

impl OutcomeBucket {
    pub fn of(path: &RobotPath) -> Self {
        if path.is_candidate() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// One timed planner call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSample {
    pub scenario: String,
    pub duration_us: u64,
    pub bucket: OutcomeBucket,
}

/// Durations per scenario name, split by bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSeries {
    pub success: BTreeMap<String, Vec<u64>>,
    pub failure: BTreeMap<String, Vec<u64>>,
}

impl TimingSeries {
    pub fn record(&mut self, sample: TimingSample) {
        self.bucket_mut(sample.bucket)
            .entry(sample.scenario)
            .or_default()
            .push(sample.duration_us);
    }

    pub fn bucket(&self, bucket: OutcomeBucket) -> &BTreeMap<String, Vec<u64>> {
        match bucket {
            OutcomeBucket::Success => &self.success,
            OutcomeBucket::Failure => &self.failure,
        }
    }

    fn bucket_mut(&mut self, bucket: OutcomeBucket) -> &mut BTreeMap<String, Vec<u64>> {
        match bucket {
            OutcomeBucket::Success => &mut self.success,
            OutcomeBucket::Failure => &mut self.failure,
        }
    }

    /// Samples recorded for `scenario` in `bucket` (empty when none).
    pub fn samples(&self, bucket: OutcomeBucket, scenario: &str) -> &[u64] {
        self.bucket(bucket)
            .get(scenario)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_samples(&self) -> usize {
        self.success
            .values()
            .chain(self.failure.values())
            .map(Vec::len)
            .sum()
    }
}

/// Runs planner calls and accumulates their wall-clock durations.
#[derive(Debug, Default)]
pub struct TimingCollector {
    series: TimingSeries,
}

impl TimingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call the planner `repeats` times (at least once) for `case`, recording every
    /// duration under `scenario`. Returns the last trial's path.
    pub fn measure<P>(
        &mut self,
        scenario: &str,
        case: &TestCase,
        planner: &P,
        repeats: usize,
    ) -> RobotPath
    where
        P: MotionPlanner + ?Sized,
    {
        let repeats = repeats.max(1);
        let mut path = RobotPath::default();

        for _ in 0..repeats {
            let started = Instant::now();
            path = planner.plan_path(case.start, case.goal);
            let elapsed = started.elapsed();

            let sample = TimingSample {
                scenario: scenario.to_string(),
                duration_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                bucket: OutcomeBucket::of(&path),
            };
            tracing::trace!(
                scenario,
                duration_us = sample.duration_us,
                bucket = ?sample.bucket,
                "Planner trial"
            );
            self.series.record(sample);
        }

        path
    }

    pub fn series(&self) -> &TimingSeries {
        &self.series
    }

    /// Hand the accumulated series to the reporter.
    pub fn into_series(self) -> TimingSeries {
        self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcheck_map::Pose;
    use std::cell::Cell;

    struct CountingPlanner {
        calls: Cell<usize>,
        succeed_on: fn(usize) -> bool,
    }

    impl MotionPlanner for CountingPlanner {
        fn plan_path(&self, start: Pose, goal: Pose) -> RobotPath {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if (self.succeed_on)(call) {
                RobotPath::new(vec![start, goal])
            } else {
                RobotPath::unreachable(start)
            }
        }
    }

    fn case() -> TestCase {
        TestCase::new(Pose::at(0.5, 0.5), Pose::at(1.5, 1.5), true)
    }

    #[test]
    fn zero_repeats_still_runs_once() {
        let planner = CountingPlanner {
            calls: Cell::new(0),
            succeed_on: |_| true,
        };
        let mut collector = TimingCollector::new();
        collector.measure("empty", &case(), &planner, 0);

        assert_eq!(planner.calls.get(), 1);
        assert_eq!(collector.series().samples(OutcomeBucket::Success, "empty").len(), 1);
    }

    #[test]
    fn buckets_each_trial_and_returns_last_path() {
        let planner = CountingPlanner {
            calls: Cell::new(0),
            succeed_on: |call| call % 2 == 0,
        };
        let mut collector = TimingCollector::new();
        let path = collector.measure("alternating", &case(), &planner, 5);

        assert_eq!(planner.calls.get(), 5);
        // Trial index 4 succeeds.
        assert!(path.is_candidate());

        let series = collector.into_series();
        assert_eq!(series.samples(OutcomeBucket::Success, "alternating").len(), 3);
        assert_eq!(series.samples(OutcomeBucket::Failure, "alternating").len(), 2);
        assert_eq!(series.total_samples(), 5);
    }

    #[test]
    fn series_are_keyed_by_scenario() {
        let mut series = TimingSeries::default();
        for (scenario, bucket, us) in [
            ("b", OutcomeBucket::Success, 3),
            ("a", OutcomeBucket::Success, 1),
            ("a", OutcomeBucket::Failure, 2),
        ] {
            series.record(TimingSample {
                scenario: scenario.to_string(),
                duration_us: us,
                bucket,
            });
        }

        let names: Vec<_> = series.success.keys().cloned().collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(series.samples(OutcomeBucket::Failure, "a"), &[2]);
        assert!(series.samples(OutcomeBucket::Failure, "b").is_empty());
    }
}
