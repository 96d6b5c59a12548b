//! Runner - drives scenarios through the timing collector and the oracle.

use gridcheck_map::{MotionPlanner, OccupancyGrid, Pose, RobotPath};
use serde::{Deserialize, Serialize};

use crate::cases::{load_cases, TestCase};
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::observability::EventLog;
use crate::oracle::{classify, found_path, validate_path, CaseOutcome, Collision, PathVerdict};
use crate::registry::{Scenario, ScenarioRegistry};
use crate::stats::{log_case_diagnostics, TimingSummaries};
use crate::timing::{TimingCollector, TimingSeries};

/// Builds a planner for a freshly loaded map.
pub trait PlannerFactory {
    type Planner: MotionPlanner;

    fn build(&self, grid: &OccupancyGrid) -> Self::Planner;
}

impl<F, P> PlannerFactory for F
where
    F: Fn(&OccupancyGrid) -> P,
    P: MotionPlanner,
{
    type Planner = P;

    fn build(&self, grid: &OccupancyGrid) -> P {
        self(grid)
    }
}

/// What the oracle concluded about one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub index: usize,
    pub start: Pose,
    pub goal: Pose,
    pub expected_to_exist: bool,
    pub found_path: bool,
    pub is_valid: bool,
    pub outcome: CaseOutcome,
    pub path_len: usize,
    /// Index of the first waypoint that failed the clearance check.
    pub unsafe_waypoint: Option<usize>,
    pub collision: Option<Collision>,
}

impl CaseRecord {
    /// One-line account of the case, e.g.
    /// `Correctly found path between start and goal: (0.5,0.5,0) -> (4.5,4.5,0)`.
    pub fn describe(&self) -> String {
        let mut line = format!("{}: {} -> {}", self.outcome.message(), self.start, self.goal);
        if self.outcome == CaseOutcome::FalseNegativeOrUnsafe && self.expected_to_exist {
            line.push_str(" Too close to obstacle!");
        }
        line
    }
}

/// Judge the planner's `path` for `case`.
pub fn judge_case(
    index: usize,
    case: &TestCase,
    path: &RobotPath,
    clearance_radius: f64,
    grid: &OccupancyGrid,
) -> CaseRecord {
    let found = found_path(path, case.goal, grid);
    let verdict = validate_path(path, clearance_radius, grid);
    let outcome = classify(found, case.expected_to_exist, verdict.is_valid());

    let unsafe_waypoint = match verdict {
        PathVerdict::Unsafe { index, .. } => Some(index),
        _ => None,
    };

    CaseRecord {
        index,
        start: case.start,
        goal: case.goal,
        expected_to_exist: case.expected_to_exist,
        found_path: found,
        is_valid: verdict.is_valid(),
        outcome,
        path_len: path.len(),
        unsafe_waypoint,
        collision: verdict.collision(),
    }
}

/// Per-scenario tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub correct_count: usize,
    pub total_count: usize,
    pub cases: Vec<CaseRecord>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.correct_count == self.total_count
    }

    /// Number of cases with the given outcome.
    pub fn count(&self, outcome: CaseOutcome) -> usize {
        self.cases.iter().filter(|c| c.outcome == outcome).count()
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub repeats: usize,
    pub scenarios: Vec<ScenarioResult>,
    pub timings: TimingSeries,
    pub summaries: TimingSummaries,
}

impl RunReport {
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.passed_count() == self.scenarios.len()
    }
}

/// Runs scenarios sequentially.
pub struct Runner {
    repeats: usize,
    clearance_radius: f64,
    events: Option<EventLog>,
}

impl Runner {
    pub fn new(repeats: usize, clearance_radius: f64) -> Self {
        Self {
            repeats: repeats.max(1),
            clearance_radius,
            events: None,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        let runner = Self::new(config.repeats, config.robot_radius);
        match config.events_path.as_deref() {
            Some(path) => runner.with_events(EventLog::new(path)),
            None => runner,
        }
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    /// Load one scenario's resources and run its cases.
    pub fn run_scenario<F>(
        &self,
        scenario: &Scenario,
        factory: &F,
        collector: &mut TimingCollector,
    ) -> Result<ScenarioResult, HarnessError>
    where
        F: PlannerFactory + ?Sized,
    {
        tracing::info!(scenario = %scenario.name, "STARTING");

        let grid = OccupancyGrid::load(&scenario.map_path)?;
        let cases = load_cases(&scenario.cases_path)?;
        let planner = factory.build(&grid);

        Ok(self.run_cases(&scenario.name, &grid, &cases, &planner, collector))
    }

    /// Run already loaded cases against a planner built for `grid`.
    pub fn run_cases<P>(
        &self,
        name: &str,
        grid: &OccupancyGrid,
        cases: &[TestCase],
        planner: &P,
        collector: &mut TimingCollector,
    ) -> ScenarioResult
    where
        P: MotionPlanner + ?Sized,
    {
        let mut records = Vec::with_capacity(cases.len());
        let mut correct_count = 0;

        for (index, case) in cases.iter().enumerate() {
            let path = collector.measure(name, case, planner, self.repeats);
            let record = judge_case(index, case, &path, self.clearance_radius, grid);

            if record.outcome.is_correct() {
                correct_count += 1;
                tracing::info!(scenario = name, "{}", record.describe());
            }
            records.push(record);
        }

        let result = ScenarioResult {
            name: name.to_string(),
            correct_count,
            total_count: cases.len(),
            cases: records,
        };

        log_case_diagnostics(&result);
        if result.passed() {
            tracing::info!(scenario = name, "PASSED!");
        } else {
            tracing::warn!(
                scenario = name,
                correct = result.correct_count,
                total = result.total_count,
                "FAILED!"
            );
        }

        if let Some(events) = &self.events {
            if let Err(err) = events.emit_scenario(&result) {
                tracing::warn!(error = %err, "Failed to write harness events");
            }
        }

        result
    }

    /// Run every registered scenario. A missing or unreadable resource aborts the run.
    pub fn run_all<F>(
        &self,
        registry: &ScenarioRegistry,
        factory: &F,
    ) -> Result<RunReport, HarnessError>
    where
        F: PlannerFactory + ?Sized,
    {
        let mut collector = TimingCollector::new();
        let mut scenarios = Vec::with_capacity(registry.len());

        for scenario in registry.iter() {
            scenarios.push(self.run_scenario(scenario, factory, &mut collector)?);
        }

        let timings = collector.into_series();
        tracing::debug!(
            scenarios = scenarios.len(),
            samples = timings.total_samples(),
            "Run finished"
        );
        Ok(RunReport {
            repeats: self.repeats,
            scenarios,
            summaries: TimingSummaries::from_series(&timings),
            timings,
        })
    }
}
