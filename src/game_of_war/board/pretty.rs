use itertools::Itertools;

use crate::game_of_war::prelude::*;

impl Board {
    /// Pretty-prints the board, one character per cell.
    pub fn pretty(&self) -> String {
        (0..self.rows()).map(|r| {
            (0..self.cols()).map(|c| {
                format!("{}", self.get_unchecked(&Coord::new(r, c)))
            }).join("")
        }).join("\n")
    }

    /// Renders one side's communications mask: '#' for cells with signal,
    /// '.' for dark ones.
    pub fn pretty_network(&self, side: Side) -> String {
        (0..self.rows()).map(|r| {
            (0..self.cols()).map(|c| {
                match self.is_online(&Coord::new(r, c), side) {
                    true => '#',
                    false => '.',
                }
            }).join("")
        }).join("\n")
    }
}
