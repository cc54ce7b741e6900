use std::{fmt::Display, io::Read, io::Write, path::Path};

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// A boolean occupancy grid, `true` = walkable, `false` = blocked.
///
/// Cells are stored row-major, `cells[y][x]` addresses row `y`, column `x`.
/// Field order is the external JSON contract: `width`, `height`, `cells`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<bool>>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Grid {
    /// Creates a grid where every cell is walkable
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![true; width]; height],
        }
    }

    /// Builds a grid from already classified rows, checking that the shape is rectangular
    pub fn from_rows(cells: Vec<Vec<bool>>) -> Result<Self, anyhow::Error> {
        let height = cells.len();
        let width = cells.first().map_or(0, |row| row.len());

        let grid = Self {
            width,
            height,
            cells,
        };
        grid.check_shape()?;
        Ok(grid)
    }

    fn check_shape(&self) -> Result<(), anyhow::Error> {
        ensure!(
            self.cells.len() == self.height,
            "grid has {} rows, expected {}",
            self.cells.len(),
            self.height
        );
        for (y, row) in self.cells.iter().enumerate() {
            ensure!(
                row.len() == self.width,
                "row {} has {} cells, expected {}",
                y,
                row.len(),
                self.width
            );
        }
        Ok(())
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.height && point.col < self.width
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.cells[point.row][point.col]
    }

    pub fn set(&mut self, point: Point, walkable: bool) {
        self.cells[point.row][point.col] = walkable;
    }

    pub fn total_count(&self) -> usize {
        self.width * self.height
    }

    pub fn walkable_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| **c).count())
            .sum()
    }

    pub fn blocked_count(&self) -> usize {
        self.total_count() - self.walkable_count()
    }

    /// Returns the points of all blocked cells, row by row
    pub fn blocked(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, walkable)| !**walkable)
                .map(move |(col, _)| Point { row, col })
        })
    }

    /// Returns the point itself and its eight neighbours.
    /// Only points inside the grid are returned, none if `point` itself is outside.
    pub fn neighbors_eight(&self, point: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(9);

        if !self.is_valid(point) {
            return points.into_iter();
        }

        let rows = point.row.saturating_sub(1)..=(point.row + 1).min(self.height - 1);
        for row in rows {
            let cols = point.col.saturating_sub(1)..=(point.col + 1).min(self.width - 1);
            for col in cols {
                points.push(Point { row, col });
            }
        }

        points.into_iter()
    }

    /// Expands blocked cells into their 8-neighbourhood `iterations` times.
    ///
    /// Every iteration reads from the previous generation only, so after `n`
    /// iterations a cell is blocked iff it lies within Chebyshev distance `n`
    /// of an originally blocked cell. Zero iterations returns an identical grid.
    pub fn dilate(&self, iterations: usize) -> Grid {
        let mut current = self.clone();

        for _ in 0..iterations {
            let mut next = current.clone();
            for point in current.blocked() {
                for neighbor in current.neighbors_eight(point) {
                    next.set(neighbor, false);
                }
            }

            // stop early once nothing is left to grow into
            if next == current {
                break;
            }
            current = next;
        }

        current
    }

    /// Writes the grid as a pretty printed JSON document
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), anyhow::Error> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a grid from a JSON document and verifies its dimensions
    pub fn read_json<R: Read>(reader: R) -> Result<Self, anyhow::Error> {
        let grid: Grid = serde_json::from_reader(reader)?;
        grid.check_shape()?;
        Ok(grid)
    }

    pub fn save(&self, path: &Path) -> Result<(), anyhow::Error> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("could not create {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_json(&mut writer)
            .with_context(|| format!("could not write grid to {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;
        Self::read_json(std::io::BufReader::new(file))
            .with_context(|| format!("could not read grid from {}", path.display()))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for walkable in row {
                write!(f, "{}", if *walkable { " " } else { "X" })?;
            }
            write!(f, "\n")?;
        }

        Ok(())
    }
}
