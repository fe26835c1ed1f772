//! Tile grid derived from a fixed pixel canvas.
//!
//! The canvas extent never changes; the cell size does. Escalation shrinks
//! cells down to a floor, which grows the tile count mid-round. Entities are
//! never repositioned by a regrid; their coordinates are simply reinterpreted
//! against the new tile count.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{CELL_SHRINK_STEP, MIN_CELL_SIZE};

/// Square tile grid over a square pixel canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    canvas_size: u32,
    cell_size: u32,
    tile_count: i32,
}

impl Grid {
    pub fn new(canvas_size: u32, cell_size: u32) -> Self {
        Self {
            canvas_size,
            cell_size,
            tile_count: (canvas_size / cell_size) as i32,
        }
    }

    /// Cell edge length in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Tiles per axis.
    pub fn tile_count(&self) -> i32 {
        self.tile_count
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.tile_count && pos.y < self.tile_count
    }

    /// Wrap a position onto the grid, modulo each axis independently.
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        pos.rem_euclid(IVec2::splat(self.tile_count))
    }

    /// Uniformly random tile. Performs no occupancy check.
    pub fn random_tile(&self, rng: &mut Pcg32) -> IVec2 {
        IVec2::new(
            rng.random_range(0..self.tile_count),
            rng.random_range(0..self.tile_count),
        )
    }

    /// Row-major iterator over every tile.
    pub fn cells(self) -> impl Iterator<Item = IVec2> {
        (0..self.tile_count)
            .flat_map(move |y| (0..self.tile_count).map(move |x| IVec2::new(x, y)))
    }

    /// Escalation regrid: smaller cells make the world feel bigger.
    ///
    /// Positions left out of bounds by the recompute stay where they are.
    pub fn shrink_cells(&mut self) {
        self.cell_size = (self.cell_size - CELL_SHRINK_STEP).max(MIN_CELL_SIZE);
        self.tile_count = (self.canvas_size / self.cell_size) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_tile_count_floors() {
        let grid = Grid::new(400, 25);
        assert_eq!(grid.tile_count(), 16);
        // 400 / 23 = 17.39..., floors to 17
        let grid = Grid::new(400, 23);
        assert_eq!(grid.tile_count(), 17);
    }

    #[test]
    fn test_shrink_respects_floor() {
        let mut grid = Grid::new(400, 18);
        grid.shrink_cells();
        assert_eq!(grid.cell_size(), 16);
        assert_eq!(grid.tile_count(), 25);

        // Already at the floor: no further change
        grid.shrink_cells();
        assert_eq!(grid.cell_size(), 16);
        assert_eq!(grid.tile_count(), 25);
    }

    #[test]
    fn test_shrink_grows_tile_count() {
        let mut grid = Grid::new(400, 25);
        grid.shrink_cells();
        assert_eq!(grid.cell_size(), 23);
        assert!(grid.tile_count() > 16);
    }

    #[test]
    fn test_wrap_each_axis() {
        let grid = Grid::new(400, 25);
        assert_eq!(grid.wrap(IVec2::new(16, 3)), IVec2::new(0, 3));
        assert_eq!(grid.wrap(IVec2::new(-1, 3)), IVec2::new(15, 3));
        assert_eq!(grid.wrap(IVec2::new(4, -1)), IVec2::new(4, 15));
        assert_eq!(grid.wrap(IVec2::new(4, 16)), IVec2::new(4, 0));
        assert_eq!(grid.wrap(IVec2::new(4, 7)), IVec2::new(4, 7));
    }

    #[test]
    fn test_contains() {
        let grid = Grid::new(400, 25);
        assert!(grid.contains(IVec2::new(0, 0)));
        assert!(grid.contains(IVec2::new(15, 15)));
        assert!(!grid.contains(IVec2::new(16, 0)));
        assert!(!grid.contains(IVec2::new(0, -1)));
    }

    #[test]
    fn test_random_tile_in_bounds() {
        let grid = Grid::new(400, 25);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(grid.contains(grid.random_tile(&mut rng)));
        }
    }

    #[test]
    fn test_cells_covers_grid() {
        let grid = Grid::new(100, 25);
        let cells: Vec<IVec2> = grid.cells().collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], IVec2::new(0, 0));
        assert_eq!(cells[15], IVec2::new(3, 3));
    }
}
