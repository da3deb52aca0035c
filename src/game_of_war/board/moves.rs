use crate::game_of_war::prelude::*;

/// What a completed move did beyond relocating the unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The destination was an enemy arsenal; it was razed to flat ground and
    /// the entry consumed the mover's attack for the turn.
    pub arsenal_razed: bool,
}

impl Board {
    /// Enumerates the legal destinations of the unit at a coord. Moves are
    /// jumps within the unit's effective Chebyshev radius; only the mounted
    /// early-stop rule looks at intervening cells.
    pub fn destinations(&self, from: &Coord) -> RulesResult<Vec<Coord>> {
        let Some(unit) = self.get(from)?.unit() else {
            return Err(RulesError::NoUnitAt(*from));
        };

        let radius = self.effective_movement(from) as isize;
        let mut out = vec![];
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let offset = OffsetCoord::new(dr, dc);
                if !(from + offset).in_bounds_signed(self.rows(), self.cols()) {
                    continue;
                }
                let to = (from + offset).coerce();
                if self.admissible(from, &to, &unit).is_ok() {
                    out.push(to);
                }
            }
        }
        Ok(out)
    }

    /// Validates a single move of the given side's unit, without applying it.
    pub fn validate_move(&self, from: &Coord, to: &Coord, side: Side) -> RulesResult<()> {
        let Some(unit) = self.get(from)?.unit() else {
            return Err(RulesError::NoUnitAt(*from));
        };
        if unit.side != side {
            return Err(RulesError::NotYourUnit(*from));
        }
        self.get(to)?;
        self.admissible(from, to, &unit)
    }

    /// The shared legality kernel behind enumeration and validation. Bounds
    /// and occupancy of `from` are the caller's business.
    fn admissible(&self, from: &Coord, to: &Coord, unit: &Unit) -> RulesResult<()> {
        let radius = self.effective_movement(from);
        if from.chebyshev(to) > radius || from == to {
            return Err(RulesError::OutOfRange { from: *from, to: *to });
        }

        let target = self.get_unchecked(to);
        match target.terrain() {
            Terrain::Mountain => return Err(RulesError::IllegalTerrain(*to)),
            // Arsenals are never a rest square: an enemy one is razed on
            // entry, a friendly one is simply off limits.
            Terrain::Arsenal(owner) if owner == unit.side => {
                return Err(RulesError::IllegalTerrain(*to));
            }
            _ => {}
        }
        if let Some(occupant) = target.unit() {
            return Err(match occupant.side == unit.side {
                true => RulesError::OccupiedByFriendly(*to),
                false => RulesError::CellOccupied(*to),
            });
        }

        if unit.kind.mounted() {
            self.check_mounted_path(from, to, unit.side)?;
        }
        Ok(())
    }

    /// The mounted early-stop rule: a rider leaving an online cell follows a
    /// straight line and halts on the first offline cell of it. Destinations
    /// past that cell, and unaligned (knight-shaped) offsets, are illegal.
    fn check_mounted_path(&self, from: &Coord, to: &Coord, side: Side) -> RulesResult<()> {
        let delta = to - from;
        if !delta.aligned() {
            return Err(RulesError::MovementBlocked { from: *from, to: *to });
        }
        if !self.is_online(from, side) {
            return Ok(());
        }

        let path = from.path_to(to).expect("aligned path exists");
        let first_offline = path.iter().position(|c| !self.is_online(c, side));
        match first_offline {
            None => Ok(()),
            Some(i) if i == path.len() - 1 => Ok(()),
            Some(_) => Err(RulesError::MovementBlocked { from: *from, to: *to }),
        }
    }

    /// Applies a pre-validated move, razing an entered enemy arsenal first
    /// so the mover lands on flat ground.
    pub(crate) fn apply_move(&mut self, from: &Coord, to: &Coord) -> MoveOutcome {
        let mover = self.get_unchecked(from).unit().expect("apply_move from an empty cell");
        let razed = match self.get_unchecked(to).terrain() {
            Terrain::Arsenal(owner) if owner != mover.side => {
                let target = *self.get_unchecked(to);
                *self.get_mut_unchecked(to) = target.with_terrain(Terrain::Flat);
                true
            }
            _ => false,
        };
        self.move_unit(from, to);
        MoveOutcome { arsenal_razed: razed }
    }
}
