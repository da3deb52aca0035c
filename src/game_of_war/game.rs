use crate::game_of_war::prelude::*;

/// The step within a turn: up to five moves, then a single attack (or pass).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Movement,
    Battle,
}

impl Phase {
    pub fn notate(&self) -> String {
        match self {
            Phase::Movement => "M",
            Phase::Battle => "B",
        }.into()
    }

    pub fn parse(s: &str) -> Result<Phase> {
        match s {
            "m" | "M" => Ok(Phase::Movement),
            "b" | "B" => Ok(Phase::Battle),
            _         => Err(anyhow!("invalid notation {s} for phase")),
        }
    }
}

/// Terminal state of the game, if any. The first terminal result latches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    NorthWins,
    SouthWins,
    Draw,
}

impl GameState {
    pub fn notate(&self) -> String {
        match self {
            GameState::Ongoing => "ongoing",
            GameState::NorthWins => "north",
            GameState::SouthWins => "south",
            GameState::Draw => "draw",
        }.into()
    }
}

/// How this turn's single attack was spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAttack {
    /// A declared attack against a target cell.
    Struck(Coord),
    /// An explicit pass.
    Passed,
    /// An arsenal-razing entry move; the entry is the attack.
    Entry(Coord),
}

/// A full game: a board plus the turn state machine over it.
///
/// Control flow per external action is always validate, mutate the board,
/// recompute communications, check victory, advance the machine. A failed
/// validation leaves everything untouched.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn_number: usize,
    side_to_move: Side,
    phase: Phase,
    /// Moves taken this turn as (from, to) pairs; destinations are what the
    /// moved-twice rule checks, so displacement cannot dodge it.
    moves_this_turn: Vec<(Coord, Coord)>,
    attack_this_turn: Option<TurnAttack>,
    /// Cells whose occupants were ordered to retreat, per owning side.
    pending_retreats: [CoordSet; 2],
    /// Destinations of retreats executed this turn; these units may support
    /// an attack but not legalize one.
    retreated_this_turn: CoordSet,
    initial_arsenals: [usize; 2],
    initial_relays: [usize; 2],
    surrendered: Option<Side>,
    state: GameState,
}

impl Game {
    /// Starts a game from an arbitrary board, North to move.
    pub fn new(board: Board) -> Game {
        let count_relays = |side: Side| {
            board.units_of(side).filter(|(_, u)| u.kind.relay()).count()
        };
        let mut game = Game {
            initial_arsenals: [board.arsenal_count(Side::North), board.arsenal_count(Side::South)],
            initial_relays: [count_relays(Side::North), count_relays(Side::South)],
            board,
            turn_number: 1,
            side_to_move: Side::North,
            phase: Phase::Movement,
            moves_this_turn: vec![],
            attack_this_turn: None,
            pending_retreats: [CoordSet::default(); 2],
            retreated_this_turn: CoordSet::default(),
            surrendered: None,
            state: GameState::Ongoing,
        };
        game.refresh_victory();
        game
    }

    /// Starts a game from the standard deployment.
    pub fn startpos(config: RulesConfig) -> Game {
        Game::new(Board::standard(config))
    }

    /// Rebuilds a game from decoded parts; notation use only.
    pub(crate) fn from_parts(
        board: Board,
        side_to_move: Side,
        phase: Phase,
        moves_this_turn: Vec<(Coord, Coord)>,
        attack_this_turn: Option<TurnAttack>,
    ) -> Game {
        let mut game = Game::new(board);
        game.side_to_move = side_to_move;
        game.phase = phase;
        game.moves_this_turn = moves_this_turn;
        game.attack_this_turn = attack_this_turn;
        game.refresh_victory();
        game
    }

    // accessors

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn_number(&self) -> usize {
        self.turn_number
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn moves_this_turn(&self) -> &[(Coord, Coord)] {
        &self.moves_this_turn
    }

    pub fn attacks_this_turn(&self) -> usize {
        self.attack_this_turn.is_some() as usize
    }

    pub fn attack_this_turn(&self) -> Option<TurnAttack> {
        self.attack_this_turn
    }

    /// Cells the given side must vacate before doing anything else.
    pub fn pending_retreats(&self, side: Side) -> &CoordSet {
        &self.pending_retreats[side.index()]
    }

    /// Destination cells of this turn's moves; a unit standing on one of
    /// these has spent its movement.
    fn moved_set(&self) -> CoordSet {
        self.moves_this_turn.iter().map(|(_, to)| to).collect()
    }

    // transitions

    /// Moves one unit of the side to move. While a retreat is pending, only
    /// the retreat itself is accepted. An arsenal-razing entry consumes the
    /// attack and jumps straight to the battle phase.
    pub fn make_move(&mut self, from: &Coord, to: &Coord) -> RulesResult<MoveOutcome> {
        if self.phase != Phase::Movement {
            return Err(RulesError::WrongPhase { expected: Phase::Movement });
        }

        let pending = self.pending_retreats[self.side_to_move.index()];
        if !pending.is_empty() {
            if !pending.contains(from) {
                let blocked = SetOps::iter(&pending).next().expect("pending set is non-empty");
                return Err(RulesError::MustRetreatFirst(blocked));
            }
            return self.make_retreat(from, to);
        }

        if self.moves_this_turn.len() >= MOVES_PER_TURN {
            return Err(RulesError::OutOfMoveBudget);
        }
        if self.moved_set().contains(from) {
            return Err(RulesError::AlreadyMoved(*from));
        }
        self.board.validate_move(from, to, self.side_to_move)?;

        let outcome = self.board.apply_move(from, to);
        self.moves_this_turn.push((*from, *to));
        if outcome.arsenal_razed {
            log::debug!(
                "{} razes the arsenal at {}; the entry is the turn's attack",
                self.side_to_move.notate(),
                to.notate()
            );
            self.phase = Phase::Battle;
            self.attack_this_turn = Some(TurnAttack::Entry(*to));
        }
        self.refresh_victory();
        Ok(outcome)
    }

    /// A forced one-step retreat. Ignores the unit's movement stats: even a
    /// paralyzed unit stumbles out of a lost melee.
    fn make_retreat(&mut self, from: &Coord, to: &Coord) -> RulesResult<MoveOutcome> {
        let target = self.board.terrain(to)?;
        if from.chebyshev(to) != 1 {
            return Err(RulesError::OutOfRange { from: *from, to: *to });
        }
        if !target.passable() || target.is_arsenal() {
            return Err(RulesError::IllegalTerrain(*to));
        }
        if let Some(occupant) = self.board.unit(to)? {
            return Err(match occupant.side == self.side_to_move {
                true => RulesError::OccupiedByFriendly(*to),
                false => RulesError::CellOccupied(*to),
            });
        }

        self.board.move_unit(from, to);
        self.pending_retreats[self.side_to_move.index()].remove(from);
        self.moves_this_turn.push((*from, *to));
        self.retreated_this_turn.insert(to);
        self.refresh_victory();
        Ok(MoveOutcome { arsenal_razed: false })
    }

    /// Ends the movement phase early (or at all); retreats must be done.
    pub fn switch_to_battle(&mut self) -> RulesResult<()> {
        if self.phase != Phase::Movement {
            return Err(RulesError::WrongPhase { expected: Phase::Movement });
        }
        let pending = self.pending_retreats[self.side_to_move.index()];
        if let Some(blocked) = SetOps::iter(&pending).next() {
            return Err(RulesError::MustRetreatFirst(blocked));
        }
        self.phase = Phase::Battle;
        Ok(())
    }

    /// Declares the turn's attack against an enemy-held cell.
    pub fn make_attack(&mut self, target: &Coord) -> RulesResult<CombatReport> {
        if self.phase != Phase::Battle {
            return Err(RulesError::WrongPhase { expected: Phase::Battle });
        }
        match self.attack_this_turn {
            Some(TurnAttack::Struck(_)) => return Err(RulesError::AlreadyAttacked),
            Some(_) => return Err(RulesError::NoAttacksLeft),
            None => {}
        }

        let report = self.board.combat_report(target, self.side_to_move)?;
        if report.initiators.iter().all(|c| self.retreated_this_turn.contains(c)) {
            return Err(RulesError::TargetOutOfRange(*target));
        }

        match report.outcome {
            CombatOutcome::Neutral => {}
            CombatOutcome::Retreat => {
                self.pending_retreats[(-self.side_to_move).index()].insert(target);
            }
            CombatOutcome::Capture => {
                let fallen = self.board.remove(target)?;
                log::debug!("{} at {} is captured", fallen.notate(), target.notate());
            }
        }
        self.attack_this_turn = Some(TurnAttack::Struck(*target));
        self.refresh_victory();
        Ok(report)
    }

    /// Declines the turn's attack. Succeeds as a no-op when the slot is
    /// already consumed, so "pass then end" always works.
    pub fn pass_attack(&mut self) -> RulesResult<()> {
        if self.phase != Phase::Battle {
            return Err(RulesError::WrongPhase { expected: Phase::Battle });
        }
        if self.attack_this_turn.is_none() {
            self.attack_this_turn = Some(TurnAttack::Passed);
        }
        Ok(())
    }

    /// Closes the turn: stuck retreaters of the incoming side are destroyed,
    /// the side to move flips, and the machine resets for movement.
    pub fn end_turn(&mut self) -> RulesResult<()> {
        if self.phase != Phase::Battle {
            return Err(RulesError::WrongPhase { expected: Phase::Battle });
        }
        if self.attack_this_turn.is_none() {
            return Err(RulesError::TurnNotEndable);
        }

        let next = -self.side_to_move;
        for cell in self.pending_retreats[next.index()].into_iter() {
            if self.retreat_options(&cell).is_empty() {
                let fallen = self.board.remove(&cell).expect("pending retreater exists");
                self.pending_retreats[next.index()].remove(&cell);
                log::debug!(
                    "{} at {} has nowhere to retreat and is destroyed",
                    fallen.notate(),
                    cell.notate()
                );
            }
        }

        if self.side_to_move == Side::South {
            self.turn_number += 1;
        }
        self.side_to_move = next;
        self.phase = Phase::Movement;
        self.moves_this_turn.clear();
        self.attack_this_turn = None;
        self.retreated_this_turn = CoordSet::default();
        self.board.refresh_communications();
        self.refresh_victory();
        Ok(())
    }

    /// External resignation signal.
    pub fn surrender(&mut self, side: Side) {
        self.surrendered = Some(side);
        self.refresh_victory();
    }

    // queries

    /// Where the unit at a cell may retreat to: adjacent, empty, passable,
    /// and not an arsenal.
    pub fn retreat_options(&self, from: &Coord) -> Vec<Coord> {
        from.neighbours(self.board.rows(), self.board.cols())
            .filter(|n| {
                let terrain = self.board.terrain(n).expect("neighbour in bounds");
                terrain.passable()
                    && !terrain.is_arsenal()
                    && self.board.unit(n).expect("neighbour in bounds").is_none()
            })
            .collect()
    }

    /// Every legal (from, to) move for the side to move, retreats included.
    pub fn legal_moves(&self) -> Vec<(Coord, Coord)> {
        if self.phase != Phase::Movement {
            return vec![];
        }

        let pending = self.pending_retreats[self.side_to_move.index()];
        if !pending.is_empty() {
            return pending
                .into_iter()
                .flat_map(|from| {
                    self.retreat_options(&from).into_iter().map(move |to| (from, to))
                })
                .collect();
        }

        if self.moves_this_turn.len() >= MOVES_PER_TURN {
            return vec![];
        }
        let moved = self.moved_set();
        self.board
            .units_of(self.side_to_move)
            .filter(|(from, _)| !moved.contains(from))
            .flat_map(|(from, _)| {
                self.board
                    .destinations(&from)
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Every cell the side to move could legally attack right now.
    pub fn legal_targets(&self) -> Vec<Coord> {
        if self.phase != Phase::Battle || self.attack_this_turn.is_some() {
            return vec![];
        }
        self.board
            .units_of(-self.side_to_move)
            .map(|(c, _)| c)
            .filter(|c| {
                self.board
                    .combat_report(c, self.side_to_move)
                    .is_ok_and(|r| !r.initiators.iter().all(|i| self.retreated_this_turn.contains(i)))
            })
            .collect()
    }

    // victory

    fn refresh_victory(&mut self) {
        if self.state != GameState::Ongoing {
            return;
        }
        let state = match (self.losing(Side::North), self.losing(Side::South)) {
            (true, true) => GameState::Draw,
            (true, false) => GameState::SouthWins,
            (false, true) => GameState::NorthWins,
            (false, false) => GameState::Ongoing,
        };
        if state != GameState::Ongoing {
            log::debug!("game over: {}", state.notate());
        }
        self.state = state;
    }

    /// A side has lost when it surrendered, lost every arsenal it started
    /// with, ran out of combat units, or lost all its relays with every
    /// surviving unit cut off.
    fn losing(&self, side: Side) -> bool {
        if self.surrendered == Some(side) {
            return true;
        }
        if self.initial_arsenals[side.index()] > 0 && self.board.arsenal_count(side) == 0 {
            return true;
        }

        let units = self.board.units_of(side).collect::<Vec<_>>();
        if !units.iter().any(|(_, u)| u.kind.combat()) {
            return true;
        }

        let relays = units.iter().filter(|(_, u)| u.kind.relay()).count();
        self.initial_relays[side.index()] > 0
            && relays == 0
            && units.iter().all(|(c, _)| !self.board.is_online(c, side))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn flat(rows: usize, cols: usize) -> Board {
        Board::empty(rows, cols, RulesConfig::default()).unwrap()
    }

    /// A quiet two-sided board so victory conditions stay out of the way.
    fn skirmish() -> Game {
        let mut b = flat(5, 5);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(4, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        b.place(&Coord::new(4, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        Game::new(b)
    }

    #[test]
    fn five_moves_then_the_budget_is_spent() {
        let mut b = flat(5, 7);
        for col in 0..6 {
            b.place(&Coord::new(2, col), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        }
        b.place(&Coord::new(4, 6), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);

        for col in 0..5 {
            g.make_move(&Coord::new(2, col), &Coord::new(3, col)).unwrap();
        }
        assert_eq!(
            g.make_move(&Coord::new(2, 5), &Coord::new(3, 5)).unwrap_err(),
            RulesError::OutOfMoveBudget
        );
    }

    #[test]
    fn a_unit_moves_once_per_turn() {
        let mut g = skirmish();
        g.make_move(&Coord::new(0, 0), &Coord::new(1, 0)).unwrap();
        assert_eq!(
            g.make_move(&Coord::new(1, 0), &Coord::new(2, 0)).unwrap_err(),
            RulesError::AlreadyMoved(Coord::new(1, 0))
        );
        // A different unit may still move.
        g.make_move(&Coord::new(0, 1), &Coord::new(1, 1)).unwrap();
    }

    #[test]
    fn phases_gate_the_operations() {
        let mut g = skirmish();
        assert_eq!(
            g.make_attack(&Coord::new(4, 4)).unwrap_err(),
            RulesError::WrongPhase { expected: Phase::Battle }
        );
        assert_eq!(g.end_turn().unwrap_err(), RulesError::WrongPhase { expected: Phase::Battle });

        g.switch_to_battle().unwrap();
        assert_eq!(
            g.make_move(&Coord::new(0, 0), &Coord::new(1, 0)).unwrap_err(),
            RulesError::WrongPhase { expected: Phase::Movement }
        );
        assert_eq!(g.end_turn().unwrap_err(), RulesError::TurnNotEndable);

        g.pass_attack().unwrap();
        g.end_turn().unwrap();
        assert_eq!(g.side_to_move(), Side::South);
        assert_eq!(g.phase(), Phase::Movement);
    }

    #[test]
    fn pass_and_end_only_advance_the_clock() {
        let mut g = skirmish();
        let before = g.board().pretty();

        g.switch_to_battle().unwrap();
        g.pass_attack().unwrap();
        g.end_turn().unwrap();
        assert_eq!(g.board().pretty(), before);
        assert_eq!(g.side_to_move(), Side::South);

        g.switch_to_battle().unwrap();
        g.pass_attack().unwrap();
        g.end_turn().unwrap();
        assert_eq!(g.board().pretty(), before);
        assert_eq!(g.side_to_move(), Side::North);
        assert_eq!(g.turn_number(), 2);
    }

    #[test]
    fn arsenal_entry_consumes_the_attack() {
        let mut b = flat(5, 5);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.set_terrain(&Coord::new(0, 1), Terrain::Arsenal(Side::South)).unwrap();
        let mut g = Game::new(b);

        let outcome = g.make_move(&Coord::new(0, 0), &Coord::new(0, 1)).unwrap();
        assert!(outcome.arsenal_razed);
        assert_eq!(g.board().terrain(&Coord::new(0, 1)).unwrap(), Terrain::Flat);
        assert_eq!(g.phase(), Phase::Battle);
        assert_eq!(g.attacks_this_turn(), 1);
        assert_eq!(g.moves_this_turn(), &[(Coord::new(0, 0), Coord::new(0, 1))]);

        // The slot is spent: passing is a tolerated no-op, attacking is not.
        g.pass_attack().unwrap();
        assert_eq!(g.make_attack(&Coord::new(4, 4)).unwrap_err(), RulesError::NoAttacksLeft);
        // The razed side had its only arsenal and no army: the game is over.
        assert_eq!(g.state(), GameState::NorthWins);
    }

    #[test]
    fn a_retreat_order_is_served_next_turn() {
        let mut b = flat(5, 5);
        // A lone charger against flat-ground infantry: 7 vs 6.
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);

        g.switch_to_battle().unwrap();
        let report = g.make_attack(&Coord::new(0, 3)).unwrap();
        assert_eq!(report.outcome, CombatOutcome::Retreat);
        assert!(g.pending_retreats(Side::South).contains(&Coord::new(0, 3)));
        g.end_turn().unwrap();

        // South may not do anything else first.
        assert_eq!(
            g.make_move(&Coord::new(0, 3), &Coord::new(2, 3)).unwrap_err(),
            RulesError::OutOfRange { from: Coord::new(0, 3), to: Coord::new(2, 3) }
        );
        assert_eq!(
            g.switch_to_battle().unwrap_err(),
            RulesError::MustRetreatFirst(Coord::new(0, 3))
        );

        g.make_move(&Coord::new(0, 3), &Coord::new(1, 3)).unwrap();
        assert!(g.pending_retreats(Side::South).is_empty());
        // The retreat spent the unit's move for the turn.
        assert_eq!(
            g.make_move(&Coord::new(1, 3), &Coord::new(2, 3)).unwrap_err(),
            RulesError::AlreadyMoved(Coord::new(1, 3))
        );
    }

    #[test]
    fn a_retreated_unit_cannot_legalize_the_attack() {
        let mut b = flat(5, 5);
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);

        g.switch_to_battle().unwrap();
        g.make_attack(&Coord::new(0, 3)).unwrap();
        g.end_turn().unwrap();

        // South retreats into contact with the cavalry.
        g.make_move(&Coord::new(0, 3), &Coord::new(1, 3)).unwrap();
        g.switch_to_battle().unwrap();
        // The retreated infantry is the only unit with the cavalry in
        // range, and it may not open the attack.
        assert_eq!(
            g.make_attack(&Coord::new(0, 2)).unwrap_err(),
            RulesError::TargetOutOfRange(Coord::new(0, 2))
        );
    }

    #[test]
    fn a_retreated_cavalry_still_counts_in_a_charge_chain() {
        let mut b = flat(5, 5);
        // Two infantry drive the pass-sheltered cavalry back: 4 + 4
        // against 5 + 2 is a retreat by exactly one.
        b.set_terrain(&Coord::new(2, 2), Terrain::Pass).unwrap();
        b.place(&Coord::new(2, 0), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(2, 1), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(2, 2), Unit::new(UnitKind::Cavalry, Side::South)).unwrap();
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Cavalry, Side::South)).unwrap();
        let mut g = Game::new(b);

        g.switch_to_battle().unwrap();
        assert_eq!(g.make_attack(&Coord::new(2, 2)).unwrap().outcome, CombatOutcome::Retreat);
        g.end_turn().unwrap();

        // The cavalry falls back into the head of a charge column, then the
        // column rides down the nearer infantry. The retreated link is a
        // listed threat and the fresh one behind it legalizes the attack.
        g.make_move(&Coord::new(2, 2), &Coord::new(1, 1)).unwrap();
        g.switch_to_battle().unwrap();
        let report = g.make_attack(&Coord::new(2, 1)).unwrap();
        assert_eq!((report.attack, report.defense), (14, 12));
        assert_eq!(report.outcome, CombatOutcome::Capture);

        let mut initiators = report.initiators.clone();
        initiators.sort();
        assert_eq!(initiators, vec![Coord::new(0, 1), Coord::new(1, 1)]);
    }

    #[test]
    fn a_cornered_retreater_is_destroyed() {
        let mut b = flat(5, 5);
        // The defender sits in the corner, walled in by mountains; the
        // cavalry holds the only open neighbour.
        b.set_terrain(&Coord::new(1, 0), Terrain::Mountain).unwrap();
        b.set_terrain(&Coord::new(1, 1), Terrain::Mountain).unwrap();
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        // Keep South alive for the victory check.
        b.place(&Coord::new(4, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);

        g.switch_to_battle().unwrap();
        let report = g.make_attack(&Coord::new(0, 0)).unwrap();
        assert_eq!(report.outcome, CombatOutcome::Retreat);
        g.end_turn().unwrap();

        assert_eq!(g.board().unit(&Coord::new(0, 0)).unwrap(), None);
        assert!(g.pending_retreats(Side::South).is_empty());
    }

    #[test]
    fn capture_removes_the_defender_immediately() {
        let mut b = flat(5, 5);
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        b.place(&Coord::new(4, 0), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);

        g.switch_to_battle().unwrap();
        let report = g.make_attack(&Coord::new(0, 3)).unwrap();
        assert_eq!((report.attack, report.defense), (8, 6));
        assert_eq!(report.outcome, CombatOutcome::Capture);
        assert_eq!(g.board().unit(&Coord::new(0, 3)).unwrap(), None);

        assert_eq!(g.make_attack(&Coord::new(4, 0)).unwrap_err(), RulesError::AlreadyAttacked);
    }

    #[test]
    fn victory_by_network_collapse() {
        let mut b = Board::empty(5, 5, RulesConfig::strict()).unwrap();
        b.set_terrain(&Coord::new(4, 0), Terrain::Arsenal(Side::North)).unwrap();
        b.place(&Coord::new(4, 1), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(2, 2), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        // South has no arsenal: everything southern is permanently offline,
        // but the side only falls once both relays are gone.
        b.place(&Coord::new(4, 2), Unit::new(UnitKind::Relay, Side::South)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::SwiftRelay, Side::South)).unwrap();
        b.place(&Coord::new(2, 0), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);
        assert_eq!(g.state(), GameState::Ongoing);

        // North captures the first relay (defense 1, offline).
        g.switch_to_battle().unwrap();
        assert_eq!(g.make_attack(&Coord::new(4, 2)).unwrap().outcome, CombatOutcome::Capture);
        g.end_turn().unwrap();
        assert_eq!(g.state(), GameState::Ongoing);

        // South shuffles and passes.
        g.switch_to_battle().unwrap();
        g.pass_attack().unwrap();
        g.end_turn().unwrap();

        // North captures the second relay; all surviving southern units are
        // offline, so the network has collapsed for good.
        g.switch_to_battle().unwrap();
        assert_eq!(g.make_attack(&Coord::new(0, 2)).unwrap().outcome, CombatOutcome::Capture);
        assert_eq!(g.state(), GameState::NorthWins);
    }

    #[test]
    fn losing_every_combat_unit_loses_the_game() {
        let mut b = flat(5, 5);
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        // South's entire army is one infantry.
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        let mut g = Game::new(b);

        g.switch_to_battle().unwrap();
        assert_eq!(g.make_attack(&Coord::new(0, 3)).unwrap().outcome, CombatOutcome::Capture);
        assert_eq!(g.state(), GameState::NorthWins);
    }

    #[test]
    fn surrender_is_terminal_and_latches() {
        let mut g = skirmish();
        g.surrender(Side::North);
        assert_eq!(g.state(), GameState::SouthWins);

        // Later events cannot reopen the game.
        g.surrender(Side::South);
        assert_eq!(g.state(), GameState::SouthWins);
    }

    #[test]
    fn legal_move_enumeration_respects_the_machine() {
        let mut g = skirmish();
        assert!(g.legal_moves().iter().all(|(from, _)| {
            g.board().unit(from).unwrap().unwrap().side == Side::North
        }));
        g.switch_to_battle().unwrap();
        assert!(g.legal_moves().is_empty());
        // Everything southern is out of range across the board.
        assert!(g.legal_targets().is_empty());
    }
}
