//! Cell occupancy
//!
//! The grid owns which cell holds what. Its outer ring is made of boundary
//! cells that never change; every other cell is either empty or holds
//! exactly one entity.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::error::SimError;

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Fixed, non-traversable wall cell on the outer ring
    Boundary,
    Entity(EntityId),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, Cell::Boundary)
    }

    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Cell::Entity(id) => Some(*id),
            _ => None,
        }
    }
}

/// Row-major cell storage. `pos.x` is the row, `pos.y` the column.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid with its boundary ring already in place
    pub fn new(rows: u32, cols: u32) -> Result<Self, SimError> {
        if rows < 3 || cols < 3 {
            return Err(SimError::InvalidDimensions { rows, cols });
        }
        let mut cells = vec![Cell::Empty; rows as usize * cols as usize];
        for x in 0..rows {
            for y in 0..cols {
                if x == 0 || x == rows - 1 || y == 0 || y == cols - 1 {
                    cells[(x * cols + y) as usize] = Cell::Boundary;
                }
            }
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    fn index(&self, pos: IVec2) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.rows as i32 || pos.y >= self.cols as i32 {
            return None;
        }
        Some(pos.x as usize * self.cols as usize + pos.y as usize)
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        self.index(pos).is_some()
    }

    /// True for cells strictly inside the boundary ring
    pub fn is_interior(&self, pos: IVec2) -> bool {
        pos.x > 0 && pos.y > 0 && pos.x < self.rows as i32 - 1 && pos.y < self.cols as i32 - 1
    }

    /// Cell contents, `None` when `pos` is off the grid
    pub fn cell(&self, pos: IVec2) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn is_empty(&self, pos: IVec2) -> bool {
        self.cell(pos).is_some_and(|c| c.is_empty())
    }

    /// Off-grid positions count as boundary: nothing may ever move there
    pub fn is_boundary(&self, pos: IVec2) -> bool {
        self.cell(pos).is_none_or(|c| c.is_boundary())
    }

    /// Empty, or holding `me` (an entity never blocks itself)
    pub fn is_open_for(&self, pos: IVec2, me: EntityId) -> bool {
        match self.cell(pos) {
            Some(Cell::Empty) => true,
            Some(Cell::Entity(id)) => id == me,
            _ => false,
        }
    }

    /// Put `id` into an empty interior cell
    pub(crate) fn occupy(&mut self, pos: IVec2, id: EntityId) -> Result<(), SimError> {
        match self.index(pos) {
            Some(i) if self.is_interior(pos) && self.cells[i].is_empty() => {
                self.cells[i] = Cell::Entity(id);
                Ok(())
            }
            _ => Err(SimError::OccupiedOrInvalidPosition { x: pos.x, y: pos.y }),
        }
    }

    /// Clear an entity cell. Boundary cells are left untouched.
    pub(crate) fn vacate(&mut self, pos: IVec2) {
        if let Some(i) = self.index(pos) {
            if !self.cells[i].is_boundary() {
                self.cells[i] = Cell::Empty;
            }
        }
    }

    /// One row of cells, left to right, or `None` past the last row
    pub fn row(&self, x: u32) -> Option<&[Cell]> {
        if x >= self.rows {
            return None;
        }
        let start = (x * self.cols) as usize;
        Some(&self.cells[start..start + self.cols as usize])
    }

    /// All rows, top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols as usize)
    }

    /// Every cell with its position, row by row
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        let cols = self.cols as i32;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (IVec2::new(i as i32 / cols, i as i32 % cols), *c))
    }

    /// Empty interior cells in row-major order
    pub fn empty_interior(&self) -> Vec<IVec2> {
        self.iter()
            .filter(|(_, c)| c.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_ring() {
        let grid = Grid::new(4, 5).unwrap();
        for (pos, cell) in grid.iter() {
            let on_ring = pos.x == 0 || pos.x == 3 || pos.y == 0 || pos.y == 4;
            assert_eq!(cell.is_boundary(), on_ring, "cell {pos}");
        }
        assert_eq!(grid.empty_interior().len(), 2 * 3);
    }

    #[test]
    fn test_too_small() {
        assert_eq!(
            Grid::new(2, 10).unwrap_err(),
            SimError::InvalidDimensions { rows: 2, cols: 10 }
        );
    }

    #[test]
    fn test_off_grid_is_boundary() {
        let grid = Grid::new(5, 5).unwrap();
        assert!(grid.cell(IVec2::new(-1, 2)).is_none());
        assert!(grid.is_boundary(IVec2::new(-1, 2)));
        assert!(grid.is_boundary(IVec2::new(2, 5)));
        assert!(!grid.is_boundary(IVec2::new(2, 2)));
    }

    #[test]
    fn test_occupy_and_vacate() {
        let mut grid = Grid::new(5, 5).unwrap();
        let pos = IVec2::new(2, 3);
        grid.occupy(pos, EntityId(0)).unwrap();
        assert_eq!(grid.cell(pos), Some(Cell::Entity(EntityId(0))));
        assert!(grid.is_open_for(pos, EntityId(0)));
        assert!(!grid.is_open_for(pos, EntityId(1)));

        // Occupied, boundary and off-grid cells all refuse placement
        assert!(grid.occupy(pos, EntityId(1)).is_err());
        assert!(grid.occupy(IVec2::new(0, 2), EntityId(1)).is_err());
        assert!(grid.occupy(IVec2::new(9, 9), EntityId(1)).is_err());

        grid.vacate(pos);
        assert!(grid.is_empty(pos));

        grid.vacate(IVec2::new(0, 0));
        assert!(grid.is_boundary(IVec2::new(0, 0)));
    }

    #[test]
    fn test_row_slice() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(
            grid.row(1),
            Some(&[Cell::Boundary, Cell::Empty, Cell::Empty, Cell::Boundary][..])
        );
        assert_eq!(grid.row(grid.rows()), None);
        assert_eq!(grid.rows_iter().count(), grid.rows() as usize);
    }
}
