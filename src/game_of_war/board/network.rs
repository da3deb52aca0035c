use crate::game_of_war::prelude::*;

/// The communications solver. A side's network starts at its arsenals,
/// radiates along the 8 directions, is relayed onward by its online relays,
/// and finally spills one king-step onto friendly units adjacent to online
/// friendly units. Mountains and enemy non-relay units stop a ray at the
/// blocking cell; enemy relays are transparent to it.
impl Board {
    /// Recomputes both sides' communications masks. Called by every board
    /// mutation before it returns.
    pub(crate) fn refresh_communications(&mut self) {
        for side in Side::all() {
            self.online[side.index()] = self.solve_network(side);
        }
    }

    /// Computes one side's communications mask from scratch. Pure in the
    /// board state and the rules config: no caches, no increments.
    pub(crate) fn solve_network(&self, side: Side) -> CoordSet {
        if !self.config().networks_enabled {
            return CoordSet::full(self.rows(), self.cols());
        }

        let units = self.units_of(side).collect::<Vec<_>>();

        // Seed with the arsenal rays.
        let mut signal = CoordSet::default();
        for arsenal in self.arsenals_of(side) {
            signal.insert(&arsenal);
            self.cast_rays(&arsenal, side, &mut signal);
        }

        // Alternate relay rebroadcasts and adjacency spill until neither
        // grows the network. Signal is monotone over a finite grid, and each
        // relay rebroadcasts at most once, so this terminates.
        let mut rebroadcast = CoordSet::default();
        let mut lit;
        loop {
            lit = self.adjacency_closure(&units, &signal);

            let mut cast = false;
            for (coord, _) in units.iter().filter(|(_, u)| u.kind.relay()) {
                if rebroadcast.contains(coord) {
                    continue;
                }
                let powered = signal.contains(coord)
                    || (self.config().relay_adjacency_rebroadcast && lit.contains(coord));
                if powered {
                    rebroadcast.insert(coord);
                    self.cast_rays(coord, side, &mut signal);
                    cast = true;
                }
            }
            if !cast {
                break;
            }
        }

        log::trace!(
            "{} network: {} cells with signal, {} units lit",
            side.notate(),
            signal.len(),
            lit.len()
        );
        signal.union(&lit)
    }

    /// Marks every cell of the 8 rays out of an origin, stopping each ray at
    /// (and excluding) the first blocking cell.
    fn cast_rays(&self, origin: &Coord, side: Side, signal: &mut CoordSet) {
        for direction in DIRECTIONS {
            for cell in origin.ray(direction, self.rows(), self.cols()) {
                if self.blocks_signal(&cell, side) {
                    break;
                }
                signal.insert(&cell);
            }
        }
    }

    /// Whether a cell stops the given side's rays: mountains do, and so does
    /// any enemy unit other than a relay.
    fn blocks_signal(&self, coord: &Coord, side: Side) -> bool {
        let cell = self.get_unchecked(coord);
        if cell.terrain().blocks_signal() {
            return true;
        }
        cell.unit().is_some_and(|u| u.side != side && !u.kind.relay())
    }

    /// The unit cells online given a signal mask: every unit sitting on
    /// signal, plus the transitive 8-adjacency closure over friendly units.
    fn adjacency_closure(&self, units: &[(Coord, Unit)], signal: &CoordSet) -> CoordSet {
        let mut lit = CoordSet::default();
        for (coord, _) in units {
            if signal.contains(coord) {
                lit.insert(coord);
            }
        }

        loop {
            let mut grew = false;
            for (coord, _) in units {
                if lit.contains(coord) {
                    continue;
                }
                if coord.neighbours(self.rows(), self.cols()).any(|n| lit.contains(&n)) {
                    lit.insert(coord);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }
        lit
    }
}
