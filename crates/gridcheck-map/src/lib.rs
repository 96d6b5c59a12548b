//! Grid collaborators for gridcheck: occupancy grid, `.map` codec, and a reference planner.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod grid;
pub mod io;
pub mod planner;
pub mod pose;

pub use grid::{CellOdds, OccupancyGrid};
pub use io::MapError;
pub use planner::{AStarPlanner, MotionPlanner, PlannerParams};
pub use pose::{GridCell, Pose, RobotPath};
