use std::ops::Neg;
use crate::utils::prelude::*;

/// Backing dimensions of the grid; games may use any active size up to these.
pub const MAX_ROWS: usize = 20;
pub const MAX_COLS: usize = 25;

pub const MOVES_PER_TURN: usize = 5;
pub const ATTACKS_PER_TURN: usize = 1;

/// Attack contribution of a charging cavalry, replacing its base attack.
pub const CHARGE_ATTACK: i32 = 7;
/// At most this many consecutive cavalry stack a charge along one line.
pub const CHARGE_LIMIT: usize = 4;

// A side typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    North = 0,
    South = 1,
}

impl Side {
    /// Notates the side.
    pub fn notate(&self) -> String {
        match self {
            Side::North => "N",
            Side::South => "S"
        }.into()
    }

    /// Index into per-side tables.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parses into a side.
    pub fn parse(s: &str) -> Result<Side> {
        match s {
            "n" | "N" => Ok(Side::North),
            "s" | "S" => Ok(Side::South),
            _         => Err(anyhow!("invalid notation {s} for side"))
        }
    }

    /// Both sides, northern first.
    pub fn all() -> [Side; 2] {
        [Side::North, Side::South]
    }
}

impl Neg for Side {
    type Output = Side;
    fn neg(self) -> Self::Output {
        match self {
            Side::North => Side::South,
            Side::South => Side::North
        }
    }
}

impl From<u8> for Side {
    fn from(value: u8) -> Self {
        match value {
            0 => Side::North,
            1 => Side::South,
            _ => panic!("expected side value of 0-1, received {value}"),
        }
    }
}

// A unit typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitKind {
    Infantry = 0,
    Cavalry = 1,
    Cannon = 2,
    SwiftCannon = 3,
    Relay = 4,
    SwiftRelay = 5,
}

impl From<u8> for UnitKind {
    fn from(value: u8) -> Self {
        match value {
            0 => UnitKind::Infantry,
            1 => UnitKind::Cavalry,
            2 => UnitKind::Cannon,
            3 => UnitKind::SwiftCannon,
            4 => UnitKind::Relay,
            5 => UnitKind::SwiftRelay,
            _ => panic!("expected unit kind value of 0-5, received {value}"),
        }
    }
}

impl std::str::FromStr for UnitKind {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "I" | "i" => Ok(UnitKind::Infantry),
            "C" | "c" => Ok(UnitKind::Cavalry),
            "K" | "k" => Ok(UnitKind::Cannon),
            "W" | "w" => Ok(UnitKind::SwiftCannon),
            "R" | "r" => Ok(UnitKind::Relay),
            "X" | "x" => Ok(UnitKind::SwiftRelay),
            _         => Err(anyhow!("invalid notation {s} for unit kind"))
        }
    }
}

impl UnitKind {
    /// Base attack contribution along an open line.
    pub fn attack(&self) -> i32 {
        match self {
            UnitKind::Infantry    => 4,
            UnitKind::Cavalry     => 4,
            UnitKind::Cannon      => 5,
            UnitKind::SwiftCannon => 5,
            UnitKind::Relay       => 0,
            UnitKind::SwiftRelay  => 0,
        }
    }

    /// Base defense, both as a target and as a supporter.
    pub fn defense(&self) -> i32 {
        match self {
            UnitKind::Infantry    => 6,
            UnitKind::Cavalry     => 5,
            UnitKind::Cannon      => 8,
            UnitKind::SwiftCannon => 8,
            UnitKind::Relay       => 1,
            UnitKind::SwiftRelay  => 1,
        }
    }

    /// Base movement radius (Chebyshev).
    pub fn movement(&self) -> usize {
        match self {
            UnitKind::Infantry    => 1,
            UnitKind::Cavalry     => 2,
            UnitKind::Cannon      => 1,
            UnitKind::SwiftCannon => 2,
            UnitKind::Relay       => 1,
            UnitKind::SwiftRelay  => 2,
        }
    }

    /// Base firing range (Chebyshev).
    pub fn range(&self) -> usize {
        match self {
            UnitKind::Infantry    => 2,
            UnitKind::Cavalry     => 2,
            UnitKind::Cannon      => 3,
            UnitKind::SwiftCannon => 3,
            UnitKind::Relay       => 0,
            UnitKind::SwiftRelay  => 0,
        }
    }

    /// Mounted units ride; they are the radius-2 movers, and they halt early
    /// when a straight-line path leaves their communications.
    pub fn mounted(&self) -> bool {
        matches!(self, UnitKind::Cavalry | UnitKind::SwiftCannon | UnitKind::SwiftRelay)
    }

    /// Relays carry no weapons; they exist to extend communications.
    pub fn relay(&self) -> bool {
        matches!(self, UnitKind::Relay | UnitKind::SwiftRelay)
    }

    /// A combat unit is anything that is not a relay.
    pub fn combat(&self) -> bool {
        !self.relay()
    }

    /// Notates the unit kind; uppercase for North, lowercase for South.
    pub fn notate(&self, side: Side) -> char {
        let c = match self {
            UnitKind::Infantry    => 'I',
            UnitKind::Cavalry     => 'C',
            UnitKind::Cannon      => 'K',
            UnitKind::SwiftCannon => 'W',
            UnitKind::Relay       => 'R',
            UnitKind::SwiftRelay  => 'X',
        };
        match side {
            Side::North => c,
            Side::South => c.to_ascii_lowercase(),
        }
    }

    /// Gets the unit kinds in order.
    pub fn all() -> [UnitKind; 6] {
        [
            UnitKind::Infantry,
            UnitKind::Cavalry,
            UnitKind::Cannon,
            UnitKind::SwiftCannon,
            UnitKind::Relay,
            UnitKind::SwiftRelay,
        ]
    }
}

/// A unit on the board: a kind and an owner. Position is the cell that holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Unit {
    pub kind: UnitKind,
    pub side: Side,
}

impl Unit {
    pub fn new(kind: UnitKind, side: Side) -> Unit {
        Unit { kind, side }
    }

    pub fn notate(&self) -> char {
        self.kind.notate(self.side)
    }

    /// Parses a single unit letter; case carries the side.
    pub fn parse(c: char) -> Result<Unit> {
        let kind = c.to_string().parse::<UnitKind>()?;
        let side = if c.is_ascii_uppercase() { Side::North } else { Side::South };
        Ok(Unit { kind, side })
    }
}

// A terrain typing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    Flat,
    Mountain,
    Pass,
    Fortress,
    Arsenal(Side),
}

impl Terrain {
    /// Mountains cannot be entered or targeted.
    pub fn passable(&self) -> bool {
        !matches!(self, Terrain::Mountain)
    }

    /// Mountains are the only terrain that stops signal propagation.
    pub fn blocks_signal(&self) -> bool {
        matches!(self, Terrain::Mountain)
    }

    /// Defense granted to a unit targeted while occupying this terrain.
    pub fn defense_bonus(&self) -> i32 {
        match self {
            Terrain::Pass     => 2,
            Terrain::Fortress => 4,
            _                 => 0,
        }
    }

    pub fn is_arsenal(&self) -> bool {
        matches!(self, Terrain::Arsenal(_))
    }

    pub fn is_arsenal_of(&self, side: Side) -> bool {
        matches!(self, Terrain::Arsenal(s) if *s == side)
    }

    /// Notates unoccupied terrain.
    pub fn notate(&self) -> char {
        match self {
            Terrain::Flat                 => '_',
            Terrain::Mountain             => 'm',
            Terrain::Pass                 => 'p',
            Terrain::Fortress             => 'f',
            Terrain::Arsenal(Side::North) => 'A',
            Terrain::Arsenal(Side::South) => 'a',
        }
    }
}

impl From<u8> for Terrain {
    fn from(value: u8) -> Self {
        match value {
            0 => Terrain::Flat,
            1 => Terrain::Mountain,
            2 => Terrain::Pass,
            3 => Terrain::Fortress,
            4 => Terrain::Arsenal(Side::North),
            5 => Terrain::Arsenal(Side::South),
            _ => panic!("expected terrain value of 0-5, received {value}"),
        }
    }
}

impl Terrain {
    pub(crate) fn pack(&self) -> u8 {
        match self {
            Terrain::Flat                 => 0,
            Terrain::Mountain             => 1,
            Terrain::Pass                 => 2,
            Terrain::Fortress             => 3,
            Terrain::Arsenal(Side::North) => 4,
            Terrain::Arsenal(Side::South) => 5,
        }
    }
}
