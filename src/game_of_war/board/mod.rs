pub(crate) mod board_cell;
pub(crate) mod combat;
pub(crate) mod indexing;
pub(crate) mod moves;
pub(crate) mod network;
pub(crate) mod pretty;
pub(crate) mod setup;

use super::prelude::*;

use board_cell::BoardCell;
pub use combat::{CombatOutcome, CombatReport};
pub use moves::MoveOutcome;

/// The grid of cells on the board.
#[derive(Clone, Copy, Debug, Default)]
pub struct Grid(pub(crate) [[BoardCell; MAX_COLS]; MAX_ROWS]);

/// The full positional state of a game of war: terrain and occupancy per
/// cell, plus the derived communications masks for both sides.
///
/// Every mutating operation recomputes the communications masks before
/// returning, so readers always observe a consistent view. Turn bookkeeping
/// lives one level up, in [`crate::game_of_war::game::Game`].
#[derive(Clone, Debug)]
pub struct Board {
    /// Active dimensions; the backing grid is always MAX_ROWS x MAX_COLS.
    rows: usize,
    cols: usize,

    /// A grid of cells, each holding a terrain and possibly a unit.
    cells: Grid,

    /// Cells in communication, per side. Derived; never read stale.
    online: [CoordSet; 2],

    /// Rules options this board was built with.
    config: RulesConfig,
}

impl Board {
    /// Returns a new, empty, all-flat board of the given active size.
    pub fn empty(rows: usize, cols: usize, config: RulesConfig) -> RulesResult<Board> {
        if rows == 0 || cols == 0 || rows > MAX_ROWS || cols > MAX_COLS {
            return Err(RulesError::InvalidCoord(format!("{rows}x{cols} board")));
        }
        let mut b = Board {
            rows,
            cols,
            cells: Grid::default(),
            online: [CoordSet::default(); 2],
            config,
        };
        b.refresh_communications();
        Ok(b)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn config(&self) -> RulesConfig {
        self.config
    }

    /// Determines whether a coord lies on the active grid.
    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.in_bounds(self.rows, self.cols)
    }

    /// All coords of the active grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |r| (0..cols).map(move |c| Coord::new(r, c)))
    }

    /// Determines the terrain at a given coord.
    pub fn terrain(&self, coord: &Coord) -> RulesResult<Terrain> {
        self.get(coord).map(|v: BoardCell| v.terrain())
    }

    /// Determines the unit occupying a given coord, if any.
    pub fn unit(&self, coord: &Coord) -> RulesResult<Option<Unit>> {
        self.get(coord).map(|v: BoardCell| v.unit())
    }

    /// Places a unit on an unoccupied, passable cell.
    pub fn place(&mut self, coord: &Coord, unit: Unit) -> RulesResult<&mut Self> {
        let cell = self.get(coord)?;
        if !cell.terrain().passable() {
            return Err(RulesError::CellImpassable(*coord));
        }
        if cell.occupied() {
            return Err(RulesError::CellOccupied(*coord));
        }
        *self.get_mut_unchecked(coord) = cell.with_unit(Some(unit));
        self.refresh_communications();
        Ok(self)
    }

    /// Removes and returns the unit at a coord.
    pub fn remove(&mut self, coord: &Coord) -> RulesResult<Unit> {
        let cell = self.get(coord)?;
        let Some(unit) = cell.unit() else {
            return Err(RulesError::NoUnitAt(*coord));
        };
        *self.get_mut_unchecked(coord) = cell.with_unit(None);
        self.refresh_communications();
        Ok(unit)
    }

    /// Relocates a unit between two cells atomically. This is the engine's
    /// internal mutation primitive: callers validate first, and a violation
    /// here is an implementation bug, so it aborts.
    pub fn move_unit(&mut self, from: &Coord, to: &Coord) {
        assert!(self.in_bounds(from) && self.in_bounds(to), "move_unit out of bounds");
        let source = *self.get_unchecked(from);
        let target = *self.get_unchecked(to);
        let unit = source.unit().expect("move_unit from an empty cell");
        assert!(!target.occupied(), "move_unit onto an occupied cell");
        assert!(target.terrain().passable(), "move_unit onto impassable terrain");

        *self.get_mut_unchecked(from) = source.with_unit(None);
        *self.get_mut_unchecked(to) = target.with_unit(Some(unit));
        self.refresh_communications();
    }

    /// Rewrites the terrain at a coord. Refuses to bury a unit under a
    /// mountain; everything else goes.
    pub fn set_terrain(&mut self, coord: &Coord, terrain: Terrain) -> RulesResult<&mut Self> {
        let cell = self.get(coord)?;
        if cell.occupied() && !terrain.passable() {
            return Err(RulesError::CellOccupied(*coord));
        }
        *self.get_mut_unchecked(coord) = cell.with_terrain(terrain);
        self.refresh_communications();
        Ok(self)
    }

    /// Iterates the units of one side with their positions.
    pub fn units_of(&self, side: Side) -> impl Iterator<Item = (Coord, Unit)> {
        self.units().filter(move |(_, u)| u.side == side)
    }

    /// Iterates every unit on the board with its position.
    pub fn units(&self) -> impl Iterator<Item = (Coord, Unit)> {
        self.coords().filter_map(|c| self.get_unchecked(&c).unit().map(|u| (c, u)))
    }

    /// Whether the cell holds a unit hostile to the given side.
    pub fn is_enemy(&self, coord: &Coord, side: Side) -> bool {
        self.occupant(coord).is_some_and(|u| u.side != side)
    }

    /// Whether the cell holds a unit belonging to the given side.
    pub fn is_friendly(&self, coord: &Coord, side: Side) -> bool {
        self.occupant(coord).is_some_and(|u| u.side == side)
    }

    /// The unit at a coord, with out-of-bounds reading as empty.
    fn occupant(&self, coord: &Coord) -> Option<Unit> {
        self.get(coord).ok().and_then(|cell| cell.unit())
    }

    /// The arsenal cells still standing for a side.
    pub fn arsenals_of(&self, side: Side) -> Vec<Coord> {
        self.coords()
            .filter(|c| self.get_unchecked(c).terrain().is_arsenal_of(side))
            .collect()
    }

    pub fn arsenal_count(&self, side: Side) -> usize {
        self.arsenals_of(side).len()
    }

    /// Whether a cell is in communication for a side. With networks disabled
    /// every cell is.
    pub fn is_online(&self, coord: &Coord, side: Side) -> bool {
        if !self.config.networks_enabled {
            return true;
        }
        self.online[side.index()].contains(coord)
    }

    /// The communications mask of a side.
    pub fn communications(&self, side: Side) -> &CoordSet {
        &self.online[side.index()]
    }

    // effective stats, all derived from online status

    /// Attack contribution of the unit at a coord; 0 when offline or absent.
    pub fn effective_attack(&self, coord: &Coord) -> i32 {
        let Some(unit) = self.occupant(coord) else {
            return 0;
        };
        if self.is_online(coord, unit.side) {
            unit.kind.attack()
        } else {
            0
        }
    }

    /// Defense of the unit at a coord, as a target or as a supporter. An
    /// offline relay keeps its base defense; any other offline unit drops
    /// to 0. Terrain bonuses are the combat engine's concern, not this one's.
    pub fn effective_defense(&self, coord: &Coord) -> i32 {
        let Some(unit) = self.occupant(coord) else {
            return 0;
        };
        if self.is_online(coord, unit.side) || unit.kind.relay() {
            unit.kind.defense()
        } else {
            0
        }
    }

    /// Movement radius of the unit at a coord. Relays may always move;
    /// anything else is paralyzed while offline.
    pub fn effective_movement(&self, coord: &Coord) -> usize {
        let Some(unit) = self.occupant(coord) else {
            return 0;
        };
        if self.is_online(coord, unit.side) || unit.kind.relay() {
            unit.kind.movement()
        } else {
            0
        }
    }

    /// Firing range of the unit at a coord; 0 when offline.
    pub fn effective_range(&self, coord: &Coord) -> usize {
        let Some(unit) = self.occupant(coord) else {
            return 0;
        };
        if self.is_online(coord, unit.side) {
            unit.kind.range()
        } else {
            0
        }
    }
}
