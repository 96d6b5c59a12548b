use crate::{GridCell, OccupancyGrid, Pose, RobotPath};
use core::cmp::Reverse;
use std::collections::BinaryHeap;

/// Anything that can plan a path between two poses on a pre-loaded map.
///
/// There is no error channel: "no path" is a [`RobotPath`] with at most one pose.
pub trait MotionPlanner {
    fn plan_path(&self, start: Pose, goal: Pose) -> RobotPath;
}

impl<P: MotionPlanner + ?Sized> MotionPlanner for &P {
    fn plan_path(&self, start: Pose, goal: Pose) -> RobotPath {
        (**self).plan_path(start, goal)
    }
}

impl<P: MotionPlanner + ?Sized> MotionPlanner for Box<P> {
    fn plan_path(&self, start: Pose, goal: Pose) -> RobotPath {
        (**self).plan_path(start, goal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerParams {
    /// Clearance the robot body keeps from occupied cells, in meters.
    pub robot_radius: f64,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            robot_radius: 0.075,
        }
    }
}

const NO_PARENT: usize = usize::MAX;

/// Shortest 4-connected route over the cells whose clearance disk is free.
///
/// Cells are addressed by their row-major grid index throughout. Among equal-cost
/// routes the search prefers the entry closest to the goal, then the oldest one, so
/// results are reproducible across runs.
#[derive(Debug, Clone)]
pub struct AStarPlanner {
    grid: OccupancyGrid,
    free: Vec<bool>,
}

impl AStarPlanner {
    pub fn new(grid: OccupancyGrid, params: PlannerParams) -> Self {
        let free = inflate_obstacles(&grid, params.robot_radius);
        Self { grid, free }
    }

    /// Whether the robot center may occupy `cell`.
    pub fn is_traversable(&self, cell: GridCell) -> bool {
        self.grid
            .idx(cell.x, cell.y)
            .is_some_and(|idx| self.free[idx])
    }

    fn free_index(&self, cell: GridCell) -> Option<usize> {
        self.grid.idx(cell.x, cell.y).filter(|&idx| self.free[idx])
    }

    fn manhattan(&self, from: usize, to: GridCell) -> u32 {
        let cell = self.grid.cell_from_idx(from);
        cell.x.abs_diff(to.x) + cell.y.abs_diff(to.y)
    }

    /// Grid indices of the in-grid neighbours of `idx`: up, right, down, left.
    fn adjacent(&self, idx: usize) -> impl Iterator<Item = usize> {
        let width = self.grid.width() as usize;
        let len = self.free.len();
        let col = idx % width;
        [
            idx.checked_sub(width),
            (col + 1 < width).then_some(idx + 1),
            Some(idx + width).filter(|&n| n < len),
            (col > 0).then(|| idx - 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Indices from `start` to `goal` inclusive, or `None` if either end is blocked or
    /// the two are disconnected.
    fn route(&self, start: GridCell, goal: GridCell) -> Option<Vec<usize>> {
        let from = self.free_index(start)?;
        let to = self.free_index(goal)?;

        let len = self.free.len();
        let mut cost = vec![u32::MAX; len];
        let mut parent = vec![NO_PARENT; len];
        let mut closed = vec![false; len];
        let mut frontier = BinaryHeap::new();
        let mut pushed: u64 = 0;

        cost[from] = 0;
        frontier.push(Reverse((self.manhattan(from, goal), 0u32, pushed, from)));

        while let Some(Reverse((_, _, _, idx))) = frontier.pop() {
            if idx == to {
                let mut route: Vec<usize> =
                    std::iter::successors(Some(to), |&i| Some(parent[i]).filter(|&p| p != NO_PARENT))
                        .collect();
                route.reverse();
                return Some(route);
            }
            if std::mem::replace(&mut closed[idx], true) {
                continue;
            }

            let next_cost = cost[idx] + 1;
            for n in self.adjacent(idx) {
                if !self.free[n] || closed[n] || next_cost >= cost[n] {
                    continue;
                }
                cost[n] = next_cost;
                parent[n] = idx;
                pushed += 1;
                let h = self.manhattan(n, goal);
                frontier.push(Reverse((next_cost + h, h, pushed, n)));
            }
        }

        None
    }
}

impl MotionPlanner for AStarPlanner {
    fn plan_path(&self, start: Pose, goal: Pose) -> RobotPath {
        let from = self.grid.world_to_cell(start);
        let to = self.grid.world_to_cell(goal);
        let Some(route) = self.route(from, to) else {
            return RobotPath::unreachable(start);
        };

        // Exact query poses at the ends, cell centers for every cell crossed between.
        let interior = route.get(1..route.len() - 1).unwrap_or(&[]);
        let mut poses = Vec::with_capacity(interior.len() + 2);
        poses.push(start);
        poses.extend(
            interior
                .iter()
                .map(|&idx| self.grid.cell_to_world(self.grid.cell_from_idx(idx))),
        );
        poses.push(goal);
        RobotPath::new(poses)
    }
}

/// Free-space mask: a cell is free when no occupied cell lies within `radius` meters
/// of it. Built by stamping the robot disk around every occupied cell.
fn inflate_obstacles(grid: &OccupancyGrid, radius: f64) -> Vec<bool> {
    let reach = (radius * grid.cells_per_meter()).ceil().max(0.0) as i32;
    let disk: Vec<(i32, i32)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f64).sqrt() * grid.meters_per_cell() <= radius)
        .collect();

    let mut free = vec![true; grid.len()];
    for (idx, _) in grid.cells().iter().enumerate().filter(|&(_, &odds)| odds > 0) {
        let center = grid.cell_from_idx(idx);
        for &(dx, dy) in &disk {
            if let Some(blocked) = grid.idx(center.x + dx, center.y + dy) {
                free[blocked] = false;
            }
        }
    }
    free
}
