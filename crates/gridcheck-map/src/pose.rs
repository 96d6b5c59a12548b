use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A robot pose in world coordinates (meters, radians).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Pose at `(x, y)` with zero heading.
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.theta)
    }
}

/// Integer cell address into an occupancy grid (`x` = column, `y` = row).
///
/// Only meaningful relative to the grid it was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// Ordered sequence of poses returned by a planner.
///
/// A path with fewer than two poses means "no path found".
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RobotPath {
    pub poses: Vec<Pose>,
}

impl RobotPath {
    pub fn new(poses: Vec<Pose>) -> Self {
        Self { poses }
    }

    /// The "no path" answer: just the start pose.
    pub fn unreachable(start: Pose) -> Self {
        Self { poses: vec![start] }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// True when the path has at least two poses.
    pub fn is_candidate(&self) -> bool {
        self.poses.len() > 1
    }

    pub fn first(&self) -> Option<&Pose> {
        self.poses.first()
    }

    pub fn last(&self) -> Option<&Pose> {
        self.poses.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }
}

impl From<Vec<Pose>> for RobotPath {
    fn from(poses: Vec<Pose>) -> Self {
        Self::new(poses)
    }
}
