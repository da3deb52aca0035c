use crate::game_of_war::prelude::*;

// The standard map and deployment, described for North; South is North's
// point reflection. Each side fields 2 arsenals, 9 infantry, 4 cavalry, a
// cannon, a swift cannon, a relay, and a swift relay.

const NORTH_TERRAIN: &[(usize, usize, Terrain)] = &[
    (1, 3, Terrain::Arsenal(Side::North)),
    (1, 16, Terrain::Arsenal(Side::North)),
    // western range, pierced at (7, 4)
    (5, 4, Terrain::Mountain),
    (6, 4, Terrain::Mountain),
    (7, 4, Terrain::Pass),
    (8, 4, Terrain::Mountain),
    // eastern range, pierced at (5, 14)
    (4, 14, Terrain::Mountain),
    (5, 14, Terrain::Pass),
    (6, 14, Terrain::Mountain),
    (3, 6, Terrain::Fortress),
    (2, 12, Terrain::Fortress),
];

const NORTH_UNITS: &[(usize, usize, UnitKind)] = &[
    (2, 3, UnitKind::Cannon),
    (2, 4, UnitKind::Relay),
    (2, 15, UnitKind::SwiftRelay),
    (2, 16, UnitKind::SwiftCannon),
    (4, 2, UnitKind::Infantry),
    (4, 3, UnitKind::Infantry),
    (4, 4, UnitKind::Infantry),
    (2, 8, UnitKind::Infantry),
    (2, 9, UnitKind::Infantry),
    (2, 10, UnitKind::Infantry),
    (4, 15, UnitKind::Infantry),
    (4, 16, UnitKind::Infantry),
    (4, 17, UnitKind::Infantry),
    (5, 7, UnitKind::Cavalry),
    (5, 8, UnitKind::Cavalry),
    (5, 17, UnitKind::Cavalry),
    (5, 18, UnitKind::Cavalry),
];

fn mirrored(coord: Coord) -> Coord {
    Coord::new(MAX_ROWS - 1 - coord.row, MAX_COLS - 1 - coord.col)
}

impl Board {
    /// The full-size starting position.
    pub fn standard(config: RulesConfig) -> Board {
        let mut b = Board::empty(MAX_ROWS, MAX_COLS, config).expect("standard dimensions fit");

        for &(row, col, terrain) in NORTH_TERRAIN {
            let north = Coord::new(row, col);
            let south_terrain = match terrain {
                Terrain::Arsenal(_) => Terrain::Arsenal(Side::South),
                other => other,
            };
            b.set_terrain(&north, terrain).expect("standard terrain is consistent");
            b.set_terrain(&mirrored(north), south_terrain).expect("standard terrain is consistent");
        }

        for &(row, col, kind) in NORTH_UNITS {
            let north = Coord::new(row, col);
            b.place(&north, Unit::new(kind, Side::North)).expect("standard deployment is consistent");
            b.place(&mirrored(north), Unit::new(kind, Side::South)).expect("standard deployment is consistent");
        }

        b
    }
}
