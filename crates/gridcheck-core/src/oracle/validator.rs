//! Path-level validity check.
//!
//! Only waypoints are checked. Straight segments between sparse waypoints are not
//! sampled, so a planner that skips over an obstacle between two safe waypoints still
//! passes; callers rely on the planner emitting dense paths.

use gridcheck_map::{OccupancyGrid, RobotPath};
use serde::{Deserialize, Serialize};

use super::safety::{find_collision, Collision};

/// Why a path was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum PathVerdict {
    Valid,
    /// Fewer than two waypoints.
    TooShort { len: usize },
    /// Waypoint `index` lies too close to an occupied cell.
    Unsafe { index: usize, collision: Collision },
}

impl PathVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn collision(&self) -> Option<Collision> {
        match self {
            Self::Unsafe { collision, .. } => Some(*collision),
            _ => None,
        }
    }
}

pub fn validate_path(path: &RobotPath, clearance_radius: f64, grid: &OccupancyGrid) -> PathVerdict {
    if path.len() < 2 {
        return PathVerdict::TooShort { len: path.len() };
    }

    for (index, pose) in path.iter().enumerate() {
        let cell = grid.world_to_cell(*pose);
        if let Some(collision) = find_collision(cell, clearance_radius, grid) {
            return PathVerdict::Unsafe { index, collision };
        }
    }

    PathVerdict::Valid
}

/// True when the path has at least two waypoints and every waypoint keeps
/// `clearance_radius` meters from occupied cells.
pub fn is_valid_path(path: &RobotPath, clearance_radius: f64, grid: &OccupancyGrid) -> bool {
    validate_path(path, clearance_radius, grid).is_valid()
}
