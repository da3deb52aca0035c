use crate::game_of_war::prelude::*;

/// What an attack resolution did to the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Attack did not exceed defense; nothing happens.
    Neutral,
    /// Attack exceeded defense by exactly one; the defender must vacate its
    /// cell at the start of its next turn or die.
    Retreat,
    /// Attack exceeded defense by two or more; the defender is destroyed.
    Capture,
}

/// A fully-tallied attack against one target cell. Produced before any
/// mutation so callers can inspect (or merely probe) the arithmetic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatReport {
    pub target: Coord,
    pub attack: i32,
    pub defense: i32,
    pub outcome: CombatOutcome,
    /// Attackers that individually hold the target in range on an open
    /// line; at least one is required for the attack to be declarable.
    pub initiators: Vec<Coord>,
}

impl Board {
    /// Tallies the attack of a side against an enemy unit. Does not mutate;
    /// the turn machine applies the outcome.
    pub fn combat_report(&self, target: &Coord, attacker: Side) -> RulesResult<CombatReport> {
        let cell = self.get(target)?;
        let Some(defender) = cell.unit() else {
            return Err(RulesError::TargetNotEnemy(*target));
        };
        if defender.side == attacker {
            return Err(RulesError::TargetNotEnemy(*target));
        }

        let (attack, initiators, line_reached) = self.attack_power(target, attacker);
        if initiators.is_empty() {
            return Err(match line_reached {
                false => RulesError::NoLineToTarget(*target),
                true => RulesError::TargetOutOfRange(*target),
            });
        }
        let defense = self.defense_power(target, defender.side);

        let outcome = match attack - defense {
            i32::MIN..=0 => CombatOutcome::Neutral,
            1 => CombatOutcome::Retreat,
            _ => CombatOutcome::Capture,
        };

        Ok(CombatReport { target: *target, attack, defense, outcome, initiators })
    }

    /// Sums attack contributions along the 8 lines out of the target.
    /// Friendly units fire through each other; an enemy unit or a mountain
    /// closes the line at its cell. Contributors need the target in range,
    /// except for a charging cavalry chain, which is pure shock: up to 4
    /// consecutive cavalry from the adjacent cell outward count 7 apiece.
    ///
    /// Returns the total, the in-range contributors, and whether any
    /// friendly unit sits on an open line at all.
    fn attack_power(&self, target: &Coord, side: Side) -> (i32, Vec<Coord>, bool) {
        let chargeable = self.get_unchecked(target).terrain().defense_bonus() == 0;
        let mut total = 0;
        let mut initiators = vec![];
        let mut line_reached = false;

        for direction in DIRECTIONS {
            let mut chain = 0usize;
            for (i, cell) in target.ray(direction, self.rows(), self.cols()).enumerate() {
                let distance = i + 1;
                if self.get_unchecked(&cell).terrain().blocks_signal() {
                    break;
                }
                let Some(unit) = self.get_unchecked(&cell).unit() else {
                    chain = CHARGE_LIMIT; // a gap ends any charge
                    continue;
                };
                if unit.side != side {
                    break;
                }
                line_reached = true;

                let charging = chargeable
                    && chain < CHARGE_LIMIT
                    && distance == chain + 1
                    && unit.kind == UnitKind::Cavalry
                    && self.get_unchecked(&cell).terrain() != Terrain::Fortress
                    && self.is_online(&cell, side);
                if charging {
                    chain += 1;
                    total += CHARGE_ATTACK;
                } else {
                    chain = CHARGE_LIMIT;
                    if self.effective_range(&cell) >= distance {
                        total += self.effective_attack(&cell);
                    }
                }
                // A charger past its range is still a real threat.
                if charging || self.effective_range(&cell) >= distance {
                    initiators.push(cell);
                }
            }
        }
        (total, initiators, line_reached)
    }

    /// Sums the defense of the target and its supporters. The target gets
    /// its terrain bonus; supporters never do, and need only an open line,
    /// not range. Offline relays still count their base defense.
    fn defense_power(&self, target: &Coord, side: Side) -> i32 {
        let mut total = self.effective_defense(target)
            + self.get_unchecked(target).terrain().defense_bonus();

        for direction in DIRECTIONS {
            for cell in target.ray(direction, self.rows(), self.cols()) {
                if self.get_unchecked(&cell).terrain().blocks_signal() {
                    break;
                }
                let Some(unit) = self.get_unchecked(&cell).unit() else {
                    continue;
                };
                if unit.side != side {
                    break;
                }
                total += self.effective_defense(&cell);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::super::Board;
    use crate::prelude::*;

    fn flat(rows: usize, cols: usize) -> Board {
        Board::empty(rows, cols, RulesConfig::default()).unwrap()
    }

    fn report(b: &Board, target: Coord) -> CombatReport {
        b.combat_report(&target, Side::North).unwrap()
    }

    #[test]
    fn four_charging_cavalry_stack_to_twenty_eight() {
        let mut b = flat(1, 5);
        for col in 0..4 {
            b.place(&Coord::new(0, col), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        }
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        let r = report(&b, Coord::new(0, 4));
        assert_eq!(r.attack, 28);
        assert_eq!(r.defense, 6);
        assert_eq!(r.outcome, CombatOutcome::Capture);
        // Every chain member counts as a threat, including the two riding
        // beyond their own firing range.
        let mut initiators = r.initiators.clone();
        initiators.sort();
        assert_eq!(
            initiators,
            vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3)]
        );
    }

    #[test]
    fn charge_chain_breaks_on_a_gap() {
        let mut b = flat(1, 6);
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        // A hole at (0,3), then more cavalry further out.
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 5), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // Adjacent cavalry charges for 7; the far one is past the gap and
        // past its range (distance 3 > 2), so it adds nothing.
        let r = report(&b, Coord::new(0, 5));
        assert_eq!(r.attack, 7);
    }

    #[test]
    fn charge_chain_breaks_on_a_non_cavalry_link() {
        let mut b = flat(1, 5);
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // 7 for the adjacent charger, 4 for the infantry behind it (distance
        // 2, in range); the third-rank cavalry lost its chain and its range
        // (3 > 2) covers nothing.
        let r = report(&b, Coord::new(0, 4));
        assert_eq!(r.attack, 11);
    }

    #[test]
    fn cavalry_in_a_fortress_cannot_charge() {
        let mut b = flat(1, 5);
        b.set_terrain(&Coord::new(0, 3), Terrain::Fortress).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // Fortress cavalry fires for its plain 4; the chain never forms, so
        // the second cavalry also fires plain (distance 2, in range).
        let r = report(&b, Coord::new(0, 4));
        assert_eq!(r.attack, 8);
    }

    #[test]
    fn cavalry_in_a_pass_charges_and_passes_the_chain() {
        let mut b = flat(1, 5);
        b.set_terrain(&Coord::new(0, 3), Terrain::Pass).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        let r = report(&b, Coord::new(0, 4));
        assert_eq!(r.attack, 14);
    }

    #[test]
    fn no_charge_against_a_sheltered_target() {
        let mut b = flat(1, 5);
        b.set_terrain(&Coord::new(0, 4), Terrain::Pass).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // Plain cavalry fire (4) against infantry 6 + pass bonus 2.
        let r = report(&b, Coord::new(0, 4));
        assert_eq!(r.attack, 4);
        assert_eq!(r.defense, 8);
        assert_eq!(r.outcome, CombatOutcome::Neutral);
    }

    #[test]
    fn enemy_units_close_the_line_friendlies_do_not() {
        let mut b = flat(1, 6);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // Cannon fires over the friendly infantry: 5 (distance 3) + 4.
        let r = report(&b, Coord::new(0, 3));
        assert_eq!(r.attack, 9);

        // An enemy screen in between closes the line at its cell; the
        // cannon behind it never reaches (0,3).
        let mut b = flat(1, 6);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        assert_eq!(
            b.combat_report(&Coord::new(0, 3), Side::North).unwrap_err(),
            RulesError::NoLineToTarget(Coord::new(0, 3))
        );
    }

    #[test]
    fn mountains_close_fire_lines() {
        let mut b = flat(1, 5);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.set_terrain(&Coord::new(0, 1), Terrain::Mountain).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        assert_eq!(
            b.combat_report(&Coord::new(0, 2), Side::North).unwrap_err(),
            RulesError::NoLineToTarget(Coord::new(0, 2))
        );
    }

    #[test]
    fn out_of_range_attacker_on_an_open_line() {
        let mut b = flat(1, 5);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // Distance 4 against range 2: the line is open but empty of threat.
        assert_eq!(
            b.combat_report(&Coord::new(0, 4), Side::North).unwrap_err(),
            RulesError::TargetOutOfRange(Coord::new(0, 4))
        );
    }

    #[test]
    fn supporters_add_defense_without_a_range_requirement() {
        let mut b = flat(1, 7);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.place(&Coord::new(0, 1), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        // A far supporter and an adjacent relay behind the target.
        b.place(&Coord::new(0, 6), Unit::new(UnitKind::Cannon, Side::South)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Relay, Side::South)).unwrap();

        let r = report(&b, Coord::new(0, 3));
        // Attack: cannon at distance 3 (5) + cannon at distance 2 (5).
        assert_eq!(r.attack, 10);
        // Defense: infantry 6 + relay 1 + distant cannon 8.
        assert_eq!(r.defense, 15);
        assert_eq!(r.outcome, CombatOutcome::Neutral);
    }

    #[test]
    fn retreat_at_exactly_one_over() {
        let mut b = flat(1, 5);
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cavalry, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        // A lone adjacent charger: 7 against 6.
        let r = report(&b, Coord::new(0, 3));
        assert_eq!((r.attack, r.defense), (7, 6));
        assert_eq!(r.outcome, CombatOutcome::Retreat);
    }

    #[test]
    fn fortress_shelters_the_target_but_not_supporters() {
        let mut b = flat(1, 6);
        b.set_terrain(&Coord::new(0, 3), Terrain::Fortress).unwrap();
        b.set_terrain(&Coord::new(0, 4), Terrain::Fortress).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.place(&Coord::new(0, 3), Unit::new(UnitKind::Infantry, Side::South)).unwrap();
        b.place(&Coord::new(0, 4), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        let r = report(&b, Coord::new(0, 3));
        // Target: 6 + 4 fortress. Supporter in the second fortress: 6, no bonus.
        assert_eq!(r.defense, 16);
    }

    #[test]
    fn offline_attackers_contribute_nothing() {
        let config = RulesConfig::strict();
        let mut b = Board::empty(5, 5, config).unwrap();
        // No northern arsenal: the cannon is offline, so the line is open
        // and in range but fires for zero.
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Cannon, Side::North)).unwrap();
        b.place(&Coord::new(0, 2), Unit::new(UnitKind::Infantry, Side::South)).unwrap();

        assert_eq!(
            b.combat_report(&Coord::new(0, 2), Side::North).unwrap_err(),
            RulesError::TargetOutOfRange(Coord::new(0, 2))
        );
    }

    #[test]
    fn cannot_target_friends_or_empty_cells() {
        let mut b = flat(1, 5);
        b.place(&Coord::new(0, 0), Unit::new(UnitKind::Infantry, Side::North)).unwrap();
        assert_eq!(
            b.combat_report(&Coord::new(0, 0), Side::North).unwrap_err(),
            RulesError::TargetNotEnemy(Coord::new(0, 0))
        );
        assert_eq!(
            b.combat_report(&Coord::new(0, 1), Side::North).unwrap_err(),
            RulesError::TargetNotEnemy(Coord::new(0, 1))
        );
    }
}
