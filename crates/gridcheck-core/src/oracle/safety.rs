//! Clearance check for a single grid cell.

use gridcheck_map::{CellOdds, GridCell, OccupancyGrid};
use serde::{Deserialize, Serialize};

/// First occupied cell found inside the clearance disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// Cell that was being checked.
    pub cell: GridCell,
    /// Occupied cell that violates the clearance.
    pub hit: GridCell,
    /// Log-odds of `hit`.
    pub occupancy: CellOdds,
}

/// Integer scan radius covering `clearance_radius` meters.
pub fn scan_radius(clearance_radius: f64, grid: &OccupancyGrid) -> i32 {
    (clearance_radius * grid.cells_per_meter()).ceil().max(0.0) as i32
}

/// Scan the disk of radius `clearance_radius` meters around `cell` and return the first
/// occupied cell, in row-major order starting at `(-r, -r)`.
///
/// Off-grid cells are queried like any other; the grid decides what they hold.
pub fn find_collision(
    cell: GridCell,
    clearance_radius: f64,
    grid: &OccupancyGrid,
) -> Option<Collision> {
    let r = scan_radius(clearance_radius, grid);

    for dy in -r..=r {
        for dx in -r..=r {
            // Trim the square to a disk.
            let distance = ((dx * dx + dy * dy) as f64).sqrt() * grid.meters_per_cell();
            if distance > clearance_radius {
                continue;
            }

            let hit = cell.offset(dx, dy);
            let occupancy = grid.log_odds(hit.x, hit.y);
            if occupancy > 0 {
                return Some(Collision {
                    cell,
                    hit,
                    occupancy,
                });
            }
        }
    }

    None
}

/// Whether the robot can sit on `cell` keeping `clearance_radius` meters from every
/// occupied cell.
pub fn is_safe(cell: GridCell, clearance_radius: f64, grid: &OccupancyGrid) -> bool {
    find_collision(cell, clearance_radius, grid).is_none()
}
