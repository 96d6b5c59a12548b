//! Plain-text `.map` codec.
//!
//! Layout: a header `originX originY width height metersPerCell`, then `width * height`
//! integer log-odds values, row-major starting at row 0. Whitespace (including newlines)
//! separates every token.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::{CellOdds, OccupancyGrid, Pose};

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid map header field `{field}`: {reason}")]
    Header { field: &'static str, reason: String },

    #[error("invalid cell value `{token}` at index {index}")]
    Cell { index: usize, token: String },

    #[error("map declares {expected} cells but only {found} were present")]
    Truncated { expected: usize, found: usize },
}

impl OccupancyGrid {
    /// Load a grid from a `.map` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse the `.map` text format.
    pub fn parse(content: &str) -> Result<Self, MapError> {
        let mut tokens = content.split_whitespace();

        let origin_x: f64 = header_field(&mut tokens, "originX")?;
        let origin_y: f64 = header_field(&mut tokens, "originY")?;
        let width: u32 = header_field(&mut tokens, "width")?;
        let height: u32 = header_field(&mut tokens, "height")?;
        let meters_per_cell: f64 = header_field(&mut tokens, "metersPerCell")?;

        if width == 0 || height == 0 {
            return Err(MapError::Header {
                field: "width",
                reason: format!("grid must be non-empty, got {width}x{height}"),
            });
        }
        if !meters_per_cell.is_finite() || meters_per_cell <= 0.0 {
            return Err(MapError::Header {
                field: "metersPerCell",
                reason: format!("must be > 0, got {meters_per_cell}"),
            });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| MapError::Header {
                field: "width",
                reason: format!("{width}x{height} cells overflow"),
            })?;
        // Sized by the tokens actually present, not by the header.
        let cells = tokens
            .take(expected)
            .enumerate()
            .map(|(index, token)| {
                token
                    .parse::<i32>()
                    .ok()
                    .and_then(|value| CellOdds::try_from(value).ok())
                    .ok_or_else(|| MapError::Cell {
                        index,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cells.len() != expected {
            return Err(MapError::Truncated {
                expected,
                found: cells.len(),
            });
        }

        let origin = Pose::at(origin_x, origin_y);
        Self::from_cells(width, height, meters_per_cell, origin, cells).ok_or_else(|| {
            MapError::Header {
                field: "width",
                reason: format!("{width}x{height} grid is too large"),
            }
        })
    }

    /// Render the grid in the `.map` text format.
    pub fn to_map_string(&self) -> String {
        let origin = self.origin();
        let mut out = format!(
            "{} {} {} {} {}\n",
            origin.x,
            origin.y,
            self.width(),
            self.height(),
            self.meters_per_cell()
        );
        for y in 0..self.height() {
            for x in 0..self.width() {
                let _ = write!(out, "{} ", self.log_odds(x, y));
            }
            out.push('\n');
        }
        out
    }

    /// Write the grid to a `.map` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_map_string()).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn header_field<'a, T>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<T, MapError>
where
    T: std::str::FromStr,
{
    let token = tokens.next().ok_or(MapError::Header {
        field,
        reason: "missing".to_string(),
    })?;
    token.parse().map_err(|_| MapError::Header {
        field,
        reason: format!("cannot parse `{token}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_row_major_cells() {
        let grid = OccupancyGrid::parse("0.5 -1 3 2 0.1\n0 1 2\n-3 4 127\n").expect("valid map");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.origin(), Pose::at(0.5, -1.0));
        assert_eq!(grid.log_odds(2, 0), 2);
        assert_eq!(grid.log_odds(0, 1), -3);
        assert_eq!(grid.log_odds(2, 1), 127);
    }

    #[test]
    fn rejects_truncated_cell_block() {
        let err = OccupancyGrid::parse("0 0 2 2 0.05\n0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            MapError::Truncated {
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn huge_header_with_few_cells_is_truncated() {
        let err = OccupancyGrid::parse("0 0 4294967295 4294967295 0.05\n0\n").unwrap_err();
        match err {
            MapError::Truncated { found, .. } => assert_eq!(found, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_out_of_range_log_odds() {
        let err = OccupancyGrid::parse("0 0 1 1 0.05\n300\n").unwrap_err();
        assert!(matches!(err, MapError::Cell { index: 0, .. }));
    }

    #[test]
    fn rejects_bad_header() {
        let err = OccupancyGrid::parse("0 0 two 2 0.05").unwrap_err();
        assert!(matches!(err, MapError::Header { field: "width", .. }));

        let err = OccupancyGrid::parse("0 0 2 2 0").unwrap_err();
        assert!(matches!(
            err,
            MapError::Header {
                field: "metersPerCell",
                ..
            }
        ));
    }

    #[test]
    fn text_format_survives_save_and_load() {
        let mut grid = OccupancyGrid::with_origin(4, 3, 0.05, Pose::at(-0.1, 0.2));
        grid.set_log_odds(1, 2, 90);
        grid.set_log_odds(3, 0, -40);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grid.map");
        grid.save(&path).expect("save map");

        let loaded = OccupancyGrid::load(&path).expect("load map");
        assert_eq!(loaded, grid);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = OccupancyGrid::load("/definitely/not/here.map").unwrap_err();
        match err {
            MapError::Io { path, .. } => assert!(path.ends_with("here.map")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
