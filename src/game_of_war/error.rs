use crate::game_of_war::coords::Coord;
use crate::game_of_war::game::Phase;

pub type RulesResult<T> = std::result::Result<T, RulesError>;

/// Every way a caller-supplied action can be rejected. Each engine operation
/// either succeeds, or returns one of these and leaves the state untouched.
/// Invariant violations are not represented here; those abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RulesError {
    // geometry
    CellOutOfBounds(Coord),
    InvalidCoord(String),

    // occupancy
    NoUnitAt(Coord),
    CellOccupied(Coord),
    CellImpassable(Coord),

    // ownership
    NotYourUnit(Coord),

    // movement
    AlreadyMoved(Coord),
    OutOfMoveBudget,
    OutOfRange { from: Coord, to: Coord },
    MovementBlocked { from: Coord, to: Coord },
    IllegalTerrain(Coord),
    OccupiedByFriendly(Coord),
    MustRetreatFirst(Coord),

    // combat
    TargetNotEnemy(Coord),
    NoLineToTarget(Coord),
    TargetOutOfRange(Coord),
    NoAttacksLeft,
    AlreadyAttacked,

    // phase
    WrongPhase { expected: Phase },
    TurnNotEndable,

    // parse
    MalformedKfen(String),
    BadMoveToken(String),
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::CellOutOfBounds(c) => write!(f, "cell {} is out of bounds", c.notate()),
            RulesError::InvalidCoord(s) => write!(f, "invalid coordinate {s}"),
            RulesError::NoUnitAt(c) => write!(f, "no unit at {}", c.notate()),
            RulesError::CellOccupied(c) => write!(f, "cell {} is occupied", c.notate()),
            RulesError::CellImpassable(c) => write!(f, "cell {} is impassable", c.notate()),
            RulesError::NotYourUnit(c) => write!(f, "unit at {} does not belong to the side to move", c.notate()),
            RulesError::AlreadyMoved(c) => write!(f, "unit at {} has already moved this turn", c.notate()),
            RulesError::OutOfMoveBudget => write!(f, "no moves left this turn"),
            RulesError::OutOfRange { from, to } => {
                write!(f, "{} is beyond the movement of the unit at {}", to.notate(), from.notate())
            }
            RulesError::MovementBlocked { from, to } => {
                write!(f, "mounted unit at {} must halt before {}", from.notate(), to.notate())
            }
            RulesError::IllegalTerrain(c) => write!(f, "terrain at {} cannot be entered", c.notate()),
            RulesError::OccupiedByFriendly(c) => write!(f, "cell {} holds a friendly unit", c.notate()),
            RulesError::MustRetreatFirst(c) => {
                write!(f, "the unit at {} must retreat before anything else happens", c.notate())
            }
            RulesError::TargetNotEnemy(c) => write!(f, "no enemy unit at {}", c.notate()),
            RulesError::NoLineToTarget(c) => write!(f, "no open line reaches {}", c.notate()),
            RulesError::TargetOutOfRange(c) => write!(f, "no attacker has {} in range", c.notate()),
            RulesError::NoAttacksLeft => write!(f, "the attack for this turn has been consumed"),
            RulesError::AlreadyAttacked => write!(f, "an attack has already been made this turn"),
            RulesError::WrongPhase { expected } => write!(f, "operation requires the {} phase", expected.notate()),
            RulesError::TurnNotEndable => write!(f, "the turn cannot end before the battle phase resolves"),
            RulesError::MalformedKfen(s) => write!(f, "malformed position string: {s}"),
            RulesError::BadMoveToken(s) => write!(f, "bad move token: {s}"),
        }
    }
}

impl std::error::Error for RulesError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_mention_the_cell() {
        let err = RulesError::NoUnitAt(Coord::new(0, 0));
        assert!(err.to_string().contains("A1"));
    }
}
