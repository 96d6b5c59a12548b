use gridcheck_core::oracle::{validate_path, PathVerdict};
use gridcheck_core::runner::judge_case;
use gridcheck_core::{
    is_valid_path, CaseOutcome, OutcomeBucket, Runner, TestCase, TimingCollector,
};
use gridcheck_map::{AStarPlanner, GridCell, MotionPlanner, OccupancyGrid, PlannerParams, Pose, RobotPath};

/// Always answers with the same canned path, whatever the query.
struct ScriptedPlanner(RobotPath);

impl MotionPlanner for ScriptedPlanner {
    fn plan_path(&self, _start: Pose, _goal: Pose) -> RobotPath {
        self.0.clone()
    }
}

fn reference_planner(grid: &OccupancyGrid, robot_radius: f64) -> AStarPlanner {
    AStarPlanner::new(grid.clone(), PlannerParams { robot_radius })
}

#[test]
fn free_grid_yields_correct_success() {
    let grid = OccupancyGrid::new(5, 5, 1.0);
    let case = TestCase::new(Pose::new(0.5, 0.5, 0.0), Pose::new(4.5, 4.5, 0.0), true);
    let planner = reference_planner(&grid, 0.0);

    let mut collector = TimingCollector::new();
    let path = collector.measure("free", &case, &planner, 1);
    let record = judge_case(0, &case, &path, 0.0, &grid);

    assert!(record.found_path);
    assert!(record.is_valid);
    assert_eq!(record.outcome, CaseOutcome::CorrectSuccess);
    assert_eq!(
        collector
            .series()
            .samples(OutcomeBucket::Success, "free")
            .len(),
        1
    );
}

#[test]
fn filled_grid_yields_absence_or_missing_path() {
    let mut grid = OccupancyGrid::new(5, 5, 1.0);
    grid.fill(100);
    let planner = reference_planner(&grid, 0.0);
    let runner = Runner::new(1, 0.0);

    let cases = [
        TestCase::new(Pose::at(0.5, 0.5), Pose::at(4.5, 4.5), false),
        TestCase::new(Pose::at(0.5, 0.5), Pose::at(4.5, 4.5), true),
    ];
    let mut collector = TimingCollector::new();
    let result = runner.run_cases("filled", &grid, &cases, &planner, &mut collector);

    assert_eq!(result.cases[0].outcome, CaseOutcome::CorrectAbsence);
    assert_eq!(result.cases[1].outcome, CaseOutcome::MissingExpectedPath);
    assert!(result.cases.iter().all(|c| !c.found_path));
    assert_eq!(result.correct_count, 1);
    assert!(!result.passed());

    let series = collector.into_series();
    assert_eq!(series.samples(OutcomeBucket::Failure, "filled").len(), 2);
    assert!(series.samples(OutcomeBucket::Success, "filled").is_empty());
}

#[test]
fn filled_grid_with_lying_planner_is_unsafe() {
    let mut grid = OccupancyGrid::new(5, 5, 1.0);
    grid.fill(100);
    let lying = ScriptedPlanner(RobotPath::new(vec![
        Pose::at(0.5, 0.5),
        Pose::at(2.5, 2.5),
        Pose::at(4.5, 4.5),
    ]));

    let runner = Runner::new(1, 0.0);
    let cases = [
        TestCase::new(Pose::at(0.5, 0.5), Pose::at(4.5, 4.5), true),
        TestCase::new(Pose::at(0.5, 0.5), Pose::at(4.5, 4.5), false),
    ];
    let mut collector = TimingCollector::new();
    let result = runner.run_cases("filled", &grid, &cases, &lying, &mut collector);

    assert!(result.cases[0].describe().ends_with("Too close to obstacle!"));
    assert_eq!(
        result.cases[1].describe(),
        "Incorrectly found unsafe path between start and goal: (0.5,0.5,0) -> (4.5,4.5,0)"
    );
    for case in &result.cases {
        assert!(case.found_path);
        assert!(!case.is_valid);
        assert_eq!(case.outcome, CaseOutcome::FalseNegativeOrUnsafe);
        assert_eq!(case.unsafe_waypoint, Some(0));
        assert_eq!(case.collision.map(|c| c.occupancy), Some(100));
    }
    assert_eq!(result.correct_count, 0);
}

fn gap_grid() -> OccupancyGrid {
    // 0.1 m cells, vertical wall at column 5 with a one-cell gap at row 5.
    let mut grid = OccupancyGrid::new(11, 11, 0.1);
    for y in 0..11 {
        if y != 5 {
            grid.set_log_odds(5, y, 100);
        }
    }
    grid
}

#[test]
fn clearance_wider_than_gap_rejects_paths_through_it() {
    let grid = gap_grid();
    let start = Pose::at(0.15, 0.55);
    let goal = Pose::at(0.95, 0.55);

    // Straight through the gap; planner claims success.
    let through_gap = RobotPath::new(
        (1..=9)
            .map(|x| Pose::at(x as f64 * 0.1 + 0.05, 0.55))
            .collect(),
    );
    // Half-width of the gap is 0.05 m.
    let clearance = 0.1;

    let verdict = validate_path(&through_gap, clearance, &grid);
    let PathVerdict::Unsafe { index, collision } = verdict else {
        panic!("expected unsafe verdict, got {verdict:?}");
    };
    // The gap cell itself is the first waypoint whose disk reaches the wall.
    assert_eq!(index, 4);
    assert_eq!(grid.world_to_cell(through_gap.poses[index]), GridCell::new(5, 5));
    assert_eq!(collision.hit, GridCell::new(5, 4));

    let case = TestCase::new(start, goal, true);
    let record = judge_case(0, &case, &through_gap, clearance, &grid);
    assert!(record.found_path);
    assert_eq!(record.outcome, CaseOutcome::FalseNegativeOrUnsafe);

    // With zero clearance the same path is fine.
    assert!(is_valid_path(&through_gap, 0.0, &grid));
}

#[test]
fn reference_planner_refuses_gap_and_matches_expectation() {
    let grid = gap_grid();
    let planner = reference_planner(&grid, 0.1);
    let runner = Runner::new(3, 0.1);

    let cases = [
        TestCase::new(Pose::at(0.15, 0.55), Pose::at(0.95, 0.55), false),
        TestCase::new(Pose::at(0.15, 0.15), Pose::at(0.35, 0.95), true),
    ];
    let mut collector = TimingCollector::new();
    let result = runner.run_cases("gap", &grid, &cases, &planner, &mut collector);

    assert_eq!(result.cases[0].outcome, CaseOutcome::CorrectAbsence);
    assert_eq!(result.cases[1].outcome, CaseOutcome::CorrectSuccess);
    assert!(result.passed());

    let series = collector.into_series();
    assert_eq!(series.samples(OutcomeBucket::Failure, "gap").len(), 3);
    assert_eq!(series.samples(OutcomeBucket::Success, "gap").len(), 3);
}

#[test]
fn path_ending_short_of_goal_cell_counts_as_not_found() {
    let grid = OccupancyGrid::new(5, 5, 1.0);
    let stops_short = ScriptedPlanner(RobotPath::new(vec![
        Pose::at(0.5, 0.5),
        Pose::at(3.5, 4.5),
    ]));

    let runner = Runner::new(1, 0.0);
    let cases = [TestCase::new(Pose::at(0.5, 0.5), Pose::at(4.5, 4.5), true)];
    let mut collector = TimingCollector::new();
    let result = runner.run_cases("short", &grid, &cases, &stops_short, &mut collector);

    let record = &result.cases[0];
    assert!(!record.found_path);
    assert!(record.is_valid);
    assert_eq!(record.outcome, CaseOutcome::MissingExpectedPath);
    // The timing bucket only looks at length.
    assert_eq!(
        collector
            .series()
            .samples(OutcomeBucket::Success, "short")
            .len(),
        1
    );
}

#[test]
fn valid_path_where_none_expected_is_false_positive() {
    let grid = OccupancyGrid::new(5, 5, 1.0);
    let planner = reference_planner(&grid, 0.0);
    let case = TestCase::new(Pose::at(0.5, 0.5), Pose::at(4.5, 0.5), false);

    let path = planner.plan_path(case.start, case.goal);
    let record = judge_case(0, &case, &path, 0.0, &grid);
    assert_eq!(record.outcome, CaseOutcome::FalsePositiveUnsafe);
    assert!(!record.outcome.is_correct());
}
