//! Outcome classification: did the planner find a path, and was that the right answer?

use core::fmt;

use gridcheck_map::{OccupancyGrid, Pose, RobotPath};
use serde::{Deserialize, Serialize};

/// Judgment for one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Found a valid path where one was expected.
    CorrectSuccess,
    /// Found nothing where nothing was expected.
    CorrectAbsence,
    /// Found a valid-looking path where none should exist.
    FalsePositiveUnsafe,
    /// Found a path that fails the clearance check.
    FalseNegativeOrUnsafe,
    /// Found nothing where a path was expected.
    MissingExpectedPath,
}

impl CaseOutcome {
    pub const ALL: [CaseOutcome; 5] = [
        Self::CorrectSuccess,
        Self::CorrectAbsence,
        Self::FalsePositiveUnsafe,
        Self::FalseNegativeOrUnsafe,
        Self::MissingExpectedPath,
    ];

    /// Only the two correct outcomes count toward a scenario's pass tally.
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::CorrectSuccess | Self::CorrectAbsence)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CorrectSuccess => "correct_success",
            Self::CorrectAbsence => "correct_absence",
            Self::FalsePositiveUnsafe => "false_positive_unsafe",
            Self::FalseNegativeOrUnsafe => "false_negative_or_unsafe",
            Self::MissingExpectedPath => "missing_expected_path",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::CorrectSuccess => "Correctly found path between start and goal",
            Self::CorrectAbsence => "Correctly found no path between start and goal",
            Self::FalsePositiveUnsafe => "Incorrectly found valid path between start and goal",
            Self::FalseNegativeOrUnsafe => {
                "Incorrectly found unsafe path between start and goal"
            }
            Self::MissingExpectedPath => "Incorrectly found no path between start and goal",
        }
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The planner found a path: more than one pose, ending in the goal's cell.
///
/// Cell equality is exact; a path that stops one cell short is "not found".
pub fn found_path(path: &RobotPath, goal: Pose, grid: &OccupancyGrid) -> bool {
    if !path.is_candidate() {
        return false;
    }
    path.last()
        .is_some_and(|end| grid.world_to_cell(*end) == grid.world_to_cell(goal))
}

/// Combine the planner result, the declared expectation and the validator verdict.
///
/// Total over all eight inputs. `is_valid` only matters when a path was found.
pub fn classify(found_path: bool, expected_to_exist: bool, is_valid: bool) -> CaseOutcome {
    match (found_path, expected_to_exist, is_valid) {
        (true, true, true) => CaseOutcome::CorrectSuccess,
        (true, false, true) => CaseOutcome::FalsePositiveUnsafe,
        (true, _, false) => CaseOutcome::FalseNegativeOrUnsafe,
        (false, true, _) => CaseOutcome::MissingExpectedPath,
        (false, false, _) => CaseOutcome::CorrectAbsence,
    }
}
