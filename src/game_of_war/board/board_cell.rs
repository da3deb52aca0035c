use crate::game_of_war::prelude::*;

/// A cell on the board.
/// bits:
///     [00, 02]: terrain value
///     [03, 03]: occupied by unit
///     [04, 06]: unit kind
///     [07, 07]: unit side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardCell(u16);

impl BoardCell {
    const TERRAIN_OFFSET: usize = 0x00;
    const TERRAIN_EXTENT: usize = 0b111; // Flat Mountain Pass Fortress ArsenalN ArsenalS
    const UNIT_PRESENCE_OFFSET: usize = 0x03;
    const UNIT_PRESENCE_EXTENT: usize = 0b001; // Some None
    const UNIT_KIND_OFFSET: usize = 0x04;
    const UNIT_KIND_EXTENT: usize = 0b111; // I C K W R X
    const UNIT_SIDE_OFFSET: usize = 0x07;
    const UNIT_SIDE_EXTENT: usize = 0b001; // North South

    /// Determines the terrain of this cell.
    pub fn terrain(&self) -> Terrain {
        let v = self._extract(BoardCell::TERRAIN_OFFSET, BoardCell::TERRAIN_EXTENT);
        Terrain::from(v)
    }

    /// Determines the unit occupying this cell, if any.
    pub fn unit(&self) -> Option<Unit> {
        if self._unit_present() {
            let kind = UnitKind::from(self._extract(BoardCell::UNIT_KIND_OFFSET, BoardCell::UNIT_KIND_EXTENT));
            let side = Side::from(self._extract(BoardCell::UNIT_SIDE_OFFSET, BoardCell::UNIT_SIDE_EXTENT));
            Some(Unit { kind, side })
        } else {
            None
        }
    }

    /// Whether a unit stands on this cell.
    pub fn occupied(&self) -> bool {
        self._unit_present()
    }

    /// Produces a new board cell with the given terrain.
    pub fn with_terrain(&self, terrain: Terrain) -> BoardCell {
        self._with(
            BoardCell::TERRAIN_OFFSET,
            BoardCell::TERRAIN_EXTENT,
            terrain.pack(),
        )
    }

    /// Produces a new board cell with the given occupant.
    pub fn with_unit(&self, unit: Option<Unit>) -> BoardCell {
        if let Some(value) = unit {
            self._with(
                BoardCell::UNIT_PRESENCE_OFFSET,
                BoardCell::UNIT_PRESENCE_EXTENT,
                1,
            )
            ._with(
                BoardCell::UNIT_KIND_OFFSET,
                BoardCell::UNIT_KIND_EXTENT,
                value.kind as u8,
            )
            ._with(
                BoardCell::UNIT_SIDE_OFFSET,
                BoardCell::UNIT_SIDE_EXTENT,
                value.side as u8,
            )
        } else {
            self._with(
                BoardCell::UNIT_PRESENCE_OFFSET,
                BoardCell::UNIT_PRESENCE_EXTENT,
                0,
            )
        }
    }

    /// Determines whether or not there is a unit in this cell.
    fn _unit_present(&self) -> bool {
        let v = self._extract(
            BoardCell::UNIT_PRESENCE_OFFSET,
            BoardCell::UNIT_PRESENCE_EXTENT,
        );
        v == 1
    }

    /// Produces the value stored in the bits corresponding to a given offset and extent.
    fn _extract(&self, offset: usize, extent: usize) -> u8 {
        ((self.0 >> offset) & extent as u16) as u8
    }

    /// Produces a new BoardCell with the given value placed into the bits corresponding to the given offset and extent.
    fn _with(&self, offset: usize, extent: usize, value: u8) -> BoardCell {
        let mask: u16 = (extent << offset) as u16;
        let antimask = !mask;
        let v = ((value as u16) << offset) & mask;
        BoardCell((self.0 & antimask) | v)
    }
}

impl std::fmt::Display for BoardCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit() {
            Some(unit) => write!(f, "{}", unit.notate()),
            None => write!(f, "{}", self.terrain().notate()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_round_trips() {
        let terrains = [
            Terrain::Flat,
            Terrain::Mountain,
            Terrain::Pass,
            Terrain::Fortress,
            Terrain::Arsenal(Side::North),
            Terrain::Arsenal(Side::South),
        ];
        for terrain in terrains {
            let cell = BoardCell::default().with_terrain(terrain);
            assert_eq!(cell.terrain(), terrain);
            assert_eq!(cell.unit(), None);
        }
    }

    #[test]
    fn unit_round_trips_and_preserves_terrain() {
        for kind in UnitKind::all() {
            for side in Side::all() {
                let unit = Unit::new(kind, side);
                let cell = BoardCell::default()
                    .with_terrain(Terrain::Pass)
                    .with_unit(Some(unit));
                assert_eq!(cell.unit(), Some(unit));
                assert_eq!(cell.terrain(), Terrain::Pass);

                let cleared = cell.with_unit(None);
                assert_eq!(cleared.unit(), None);
                assert_eq!(cleared.terrain(), Terrain::Pass);
            }
        }
    }
}
