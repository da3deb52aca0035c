use super::BoardCell;
use crate::game_of_war::prelude::*;

impl Board {
    /// Gets the board cell at a given coordinate.
    pub(super) fn get(&self, coord: &Coord) -> RulesResult<BoardCell> {
        if self.in_bounds(coord) {
            Ok(self.cells.0[coord.row][coord.col])
        } else {
            Err(RulesError::CellOutOfBounds(*coord))
        }
    }
}

impl Board {
    /// Unchecked accessor into the grid; engine use only, after validation.
    pub(super) fn get_unchecked(&self, coord: &Coord) -> &BoardCell {
        unsafe {
            self.cells.0.get_unchecked(coord.row).get_unchecked(coord.col)
        }
    }

    /// Unchecked mutable reference into the grid; engine use only, after validation.
    pub(super) fn get_mut_unchecked(&mut self, coord: &Coord) -> &mut BoardCell {
        unsafe {
            self.cells.0.get_unchecked_mut(coord.row).get_unchecked_mut(coord.col)
        }
    }
}
