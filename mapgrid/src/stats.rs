use std::fmt::Display;

use crate::{Grid, GridParams};

/// Summary of a generated grid, reported next to the output but never persisted
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridStats {
    pub width: usize,
    pub height: usize,
    pub total: usize,
    pub walkable: usize,
    pub blocked: usize,
    /// Integer percentages, floored
    pub walkable_percent: usize,
    pub blocked_percent: usize,
    pub threshold: u8,
    pub dilate: u32,
    pub blur: u32,
}

impl GridStats {
    pub fn new(grid: &Grid, params: &GridParams) -> Self {
        let total = grid.total_count();
        let walkable = grid.walkable_count();
        let blocked = total - walkable;

        let percent = |count: usize| if total == 0 { 0 } else { count * 100 / total };

        Self {
            width: grid.width,
            height: grid.height,
            total,
            walkable,
            blocked,
            walkable_percent: percent(walkable),
            blocked_percent: percent(blocked),
            threshold: params.threshold,
            dilate: params.dilate,
            blur: params.blur,
        }
    }
}

impl Display for GridStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Statistics:")?;
        writeln!(
            f,
            "   - Size: {}x{} ({} cells)",
            self.width, self.height, self.total
        )?;
        writeln!(
            f,
            "   - Walkable: {} ({}%)",
            self.walkable, self.walkable_percent
        )?;
        writeln!(f, "   - Blocked: {} ({}%)", self.blocked, self.blocked_percent)?;
        writeln!(f, "   - Threshold: {}", self.threshold)?;
        write!(f, "   - Dilation: {}", self.dilate)
    }
}
