
use regex::Regex;

use crate::game_of_war::prelude::*;

/// A parsed position string. Syntax only: the cell rows, the side to move,
/// the phase, and the turn's actions so far, ready to be replayed onto a
/// fresh board. Semantic checks happen when a [`Game`] is built from it.
///
/// Format: `<row1>/<row2>/.../<rowH>/<turn>/<phase>/<actions>` where a row
/// encodes cells as `_ m p f`, arsenal letters `A a`, bare unit letters on
/// flat ground, `(L)` on a pass, and `[L]` inside a fortress.
#[derive(Clone, Debug)]
pub struct PositionString {
    pub repr: String,
    pub cells: Vec<Vec<(Terrain, Option<Unit>)>>,
    pub side_to_move: Side,
    pub phase: Phase,
    pub moves: Vec<(Coord, Coord)>,
    pub attack: Option<TurnAttack>,
}

fn _parse_row(row: &str) -> RulesResult<Vec<(Terrain, Option<Unit>)>> {
    let malformed = |what: &str| RulesError::MalformedKfen(format!("{what} in row {row}"));

    let mut cells = vec![];
    let mut chars = row.chars();
    while let Some(c) = chars.next() {
        let cell = match c {
            '_' => (Terrain::Flat, None),
            'm' => (Terrain::Mountain, None),
            'p' => (Terrain::Pass, None),
            'f' => (Terrain::Fortress, None),
            'A' => (Terrain::Arsenal(Side::North), None),
            'a' => (Terrain::Arsenal(Side::South), None),
            '(' | '[' => {
                let letter = chars.next().ok_or_else(|| malformed("dangling bracket"))?;
                let unit = Unit::parse(letter).map_err(|_| malformed("bad unit letter"))?;
                let closer = chars.next().ok_or_else(|| malformed("unclosed bracket"))?;
                match (c, closer) {
                    ('(', ')') => (Terrain::Pass, Some(unit)),
                    ('[', ']') => (Terrain::Fortress, Some(unit)),
                    _ => return Err(malformed("mismatched bracket")),
                }
            }
            letter => {
                let unit = Unit::parse(letter).map_err(|_| malformed("bad cell character"))?;
                (Terrain::Flat, Some(unit))
            }
        };
        cells.push(cell);
    }
    if cells.is_empty() {
        return Err(malformed("empty row"));
    }
    Ok(cells)
}

fn _parse_moves(field: &str) -> RulesResult<Vec<(Coord, Coord)>> {
    let malformed = |what: &str| RulesError::MalformedKfen(format!("{what} in actions {field}"));

    let Some(inner) = field.strip_prefix('[').and_then(|f| f.strip_suffix(']')) else {
        return Err(malformed("movement actions must be bracketed"));
    };
    let pattern = Regex::new(r"\((?<from>[A-Za-z]+[0-9]+),(?<to>[A-Za-z]+[0-9]+)\)")
        .expect("static pattern compiles");

    // Missing entries between commas are tolerated: `[,(A1,B2),]` is three
    // slots, two of them blank. Anything that is neither a pair nor a
    // separator is an error.
    let leftover = pattern.replace_all(inner, "");
    if !leftover.chars().all(|c| c == ',' || c.is_whitespace()) {
        return Err(malformed("unparseable move pair"));
    }

    let mut moves = vec![];
    for captures in pattern.captures_iter(inner) {
        let from = captures["from"].parse::<Coord>().map_err(|_| malformed("bad coordinate"))?;
        let to = captures["to"].parse::<Coord>().map_err(|_| malformed("bad coordinate"))?;
        moves.push((from, to));
    }
    if moves.len() > MOVES_PER_TURN {
        return Err(malformed("more than five moves"));
    }
    Ok(moves)
}

impl std::str::FromStr for PositionString {
    type Err = RulesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = |what: &str| RulesError::MalformedKfen(what.into());

        let fields = s.trim().split('/').collect::<Vec<&str>>();
        if fields.len() < 4 {
            return Err(malformed("expected rows, turn, phase, and actions"));
        }
        let (rows, tail) = fields.split_at(fields.len() - 3);

        let cells = rows.iter().map(|row| _parse_row(row)).collect::<RulesResult<Vec<_>>>()?;
        let cols = cells[0].len();
        if cells.iter().any(|row| row.len() != cols) {
            return Err(malformed("ragged rows"));
        }
        if cells.len() > MAX_ROWS || cols > MAX_COLS {
            return Err(malformed("board too large"));
        }

        let side_to_move = Side::parse(tail[0]).map_err(|_| malformed("bad turn field"))?;
        let phase = Phase::parse(tail[1]).map_err(|_| malformed("bad phase field"))?;

        let (moves, attack) = match phase {
            Phase::Movement => (_parse_moves(tail[2])?, None),
            Phase::Battle => {
                let attack = match tail[2] {
                    "" => None,
                    "pass" => Some(TurnAttack::Passed),
                    coord => {
                        let target = coord
                            .parse::<Coord>()
                            .map_err(|_| malformed("bad battle target"))?;
                        Some(TurnAttack::Struck(target))
                    }
                };
                (vec![], attack)
            }
        };

        Ok(PositionString { repr: s.to_owned(), cells, side_to_move, phase, moves, attack })
    }
}

impl Game {
    /// Parses a position string into a playable game under the given rules.
    pub fn decode(s: &str, config: RulesConfig) -> RulesResult<Game> {
        let position = s.parse::<PositionString>()?;
        let rows = position.cells.len();
        let cols = position.cells[0].len();

        let mut board = Board::empty(rows, cols, config)?;
        for (r, row) in position.cells.iter().enumerate() {
            for (c, &(terrain, unit)) in row.iter().enumerate() {
                let coord = Coord::new(r, c);
                if terrain != Terrain::Flat {
                    board.set_terrain(&coord, terrain)?;
                }
                if let Some(unit) = unit {
                    board.place(&coord, unit)?;
                }
            }
        }

        for (from, to) in &position.moves {
            if !board.in_bounds(from) || !board.in_bounds(to) {
                return Err(RulesError::MalformedKfen(format!(
                    "action off the board: ({},{})",
                    from.notate(),
                    to.notate()
                )));
            }
        }

        Ok(Game::from_parts(
            board,
            position.side_to_move,
            position.phase,
            position.moves,
            position.attack,
        ))
    }

    /// Encodes the game as a position string. Inverse of [`Game::decode`]
    /// up to the arsenal-entry attack, which reads back as a pass: both
    /// mean the slot is spent.
    pub fn notate(&self) -> String {
        let mut fragments = vec![];
        for r in 0..self.board().rows() {
            let mut row = String::new();
            for c in 0..self.board().cols() {
                let coord = Coord::new(r, c);
                let terrain = self.board().terrain(&coord).expect("active cell");
                match (self.board().unit(&coord).expect("active cell"), terrain) {
                    (None, t) => row.push(t.notate()),
                    (Some(u), Terrain::Pass) => {
                        row.push('(');
                        row.push(u.notate());
                        row.push(')');
                    }
                    (Some(u), Terrain::Fortress) => {
                        row.push('[');
                        row.push(u.notate());
                        row.push(']');
                    }
                    (Some(u), _) => row.push(u.notate()),
                }
            }
            fragments.push(row);
        }

        fragments.push(self.side_to_move().notate());
        fragments.push(self.phase().notate());
        fragments.push(match self.phase() {
            Phase::Movement => {
                let pairs = self
                    .moves_this_turn()
                    .iter()
                    .map(|(from, to)| format!("({},{})", from.notate(), to.notate()))
                    .collect::<Vec<_>>();
                format!("[{}]", pairs.join(","))
            }
            Phase::Battle => match self.attack_this_turn() {
                None => String::new(),
                Some(TurnAttack::Struck(target)) => target.notate(),
                Some(TurnAttack::Passed) | Some(TurnAttack::Entry(_)) => "pass".into(),
            },
        });
        fragments.join("/")
    }
}

/// A from-to move token as the control protocol speaks it: two concatenated
/// spreadsheet coordinates, `A1B1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveToken {
    pub from: Coord,
    pub to: Coord,
}

impl MoveToken {
    pub fn notate(&self) -> String {
        format!("{}{}", self.from.notate(), self.to.notate())
    }
}

impl std::str::FromStr for MoveToken {
    type Err = RulesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let pattern = Regex::new(r"^(?<from>[A-Za-z]+[0-9]+)(?<to>[A-Za-z]+[0-9]+)$")
            .expect("static pattern compiles");
        let Some(captures) = pattern.captures(s) else {
            return Err(RulesError::BadMoveToken(s.to_owned()));
        };
        let from = captures["from"]
            .parse::<Coord>()
            .map_err(|_| RulesError::BadMoveToken(s.to_owned()))?;
        let to = captures["to"]
            .parse::<Coord>()
            .map_err(|_| RulesError::BadMoveToken(s.to_owned()))?;
        Ok(MoveToken { from, to })
    }
}
