use crate::{GridCell, Pose};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Log-odds value stored per cell. Positive means "more likely occupied than free".
pub type CellOdds = i8;

/// Occupancy grid in log-odds form.
///
/// Cells are stored row-major with row 0 at `origin.y`. Reads outside the grid
/// return `0` (unknown), which the safety scan treats as not occupied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    meters_per_cell: f64,
    origin: Pose,
    cells: Vec<CellOdds>,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32, meters_per_cell: f64) -> Self {
        Self::with_origin(width, height, meters_per_cell, Pose::default())
    }

    pub fn with_origin(width: u32, height: u32, meters_per_cell: f64, origin: Pose) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        assert!(meters_per_cell > 0.0, "meters_per_cell must be > 0");
        let width = width as i32;
        let height = height as i32;
        Self {
            width,
            height,
            meters_per_cell,
            origin,
            cells: vec![0; (width * height) as usize],
        }
    }

    /// Build a grid from row-major cell values. Returns `None` if `cells.len()` does not
    /// match `width * height`, or if the grid is too large to index with `i32`.
    pub fn from_cells(
        width: u32,
        height: u32,
        meters_per_cell: f64,
        origin: Pose,
        cells: Vec<CellOdds>,
    ) -> Option<Self> {
        let width = i32::try_from(width).ok().filter(|w| *w > 0)?;
        let height = i32::try_from(height).ok().filter(|h| *h > 0)?;
        let len = width.checked_mul(height)?;
        if cells.len() != len as usize || meters_per_cell <= 0.0 {
            return None;
        }
        Some(Self {
            width,
            height,
            meters_per_cell,
            origin,
            cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn origin(&self) -> Pose {
        self.origin
    }

    pub fn meters_per_cell(&self) -> f64 {
        self.meters_per_cell
    }

    pub fn cells_per_meter(&self) -> f64 {
        1.0 / self.meters_per_cell
    }

    pub fn cells(&self) -> &[CellOdds] {
        &self.cells
    }

    pub fn is_cell_in_grid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Log-odds at `(x, y)`, or `0` when the cell is outside the grid.
    pub fn log_odds(&self, x: i32, y: i32) -> CellOdds {
        self.idx(x, y).map(|idx| self.cells[idx]).unwrap_or(0)
    }

    pub fn set_log_odds(&mut self, x: i32, y: i32, value: CellOdds) {
        if let Some(idx) = self.idx(x, y) {
            self.cells[idx] = value;
        }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.log_odds(x, y) > 0
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: CellOdds) {
        self.cells.iter_mut().for_each(|c| *c = value);
    }

    /// Cell containing the world position of `pose`.
    pub fn world_to_cell(&self, pose: Pose) -> GridCell {
        let x = ((pose.x - self.origin.x) * self.cells_per_meter()).floor() as i32;
        let y = ((pose.y - self.origin.y) * self.cells_per_meter()).floor() as i32;
        GridCell { x, y }
    }

    /// World position of the center of `cell`.
    pub fn cell_to_world(&self, cell: GridCell) -> Pose {
        Pose::at(
            (cell.x as f64 + 0.5) * self.meters_per_cell + self.origin.x,
            (cell.y as f64 + 0.5) * self.meters_per_cell + self.origin.y,
        )
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if !self.is_cell_in_grid(x, y) {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub(crate) fn cell_from_idx(&self, idx: usize) -> GridCell {
        let idx = idx as i32;
        GridCell {
            x: idx % self.width,
            y: idx / self.width,
        }
    }
}
