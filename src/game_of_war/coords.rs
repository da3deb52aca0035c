use crate::game_of_war::prelude::*;

/// Simple board coordinate; bounded by the active grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl std::str::FromStr for Coord {
    type Err = Error;

    /// Parses spreadsheet notation: column letters then a 1-indexed row
    /// number, "A1" being the top-left cell.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let split = s.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(anyhow!("expected spreadsheet notation for Coord; received {s}"));
        }
        let col = parse_column(letters)?;
        let row = digits.parse::<usize>()?;
        if row == 0 {
            return Err(anyhow!("row numbers are 1-indexed; received {s}"));
        }
        Ok(Coord { row: row - 1, col })
    }
}

impl Coord {
    /// Constructs a new coord.
    pub fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    /// Determines whether or not the coord is inside an active grid.
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// The canonical notation of the coord is its spreadsheet form.
    pub fn notate(&self) -> String {
        format!("{}{}", column_letters(self.col), self.row + 1)
    }

    /// Gets the Chebyshev (king-move) distance between the two coords.
    pub fn chebyshev(&self, other: &Coord) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// The up-to-8 in-bounds neighbours of this coord.
    pub fn neighbours(&self, rows: usize, cols: usize) -> impl Iterator<Item = Coord> {
        let origin = OffsetCoord::from(self);
        DIRECTIONS.iter().filter_map(move |offset| {
            let candidate = origin + offset;
            candidate.in_bounds_signed(rows, cols).then(|| candidate.coerce())
        })
    }

    /// A lazy walk away from this coord in one direction, excluding the
    /// origin, terminating at the edge of the active grid.
    pub fn ray(&self, direction: OffsetCoord, rows: usize, cols: usize) -> Ray {
        Ray {
            current: OffsetCoord::from(self),
            step: direction,
            rows,
            cols,
        }
    }

    /// The straight-line path from this coord to another, excluding the
    /// origin and including the destination. Only defined when the two are
    /// aligned on a rank, file, or diagonal.
    pub fn path_to(&self, other: &Coord) -> Option<Vec<Coord>> {
        let delta = other - self;
        if delta.rows == 0 && delta.cols == 0 {
            return Some(vec![]);
        }
        if !(delta.rows == 0 || delta.cols == 0 || delta.rows.abs() == delta.cols.abs()) {
            return None;
        }
        let step = OffsetCoord::new(delta.rows.signum(), delta.cols.signum());
        let steps = delta.rows.abs().max(delta.cols.abs()) as usize;
        let mut cells = Vec::with_capacity(steps);
        let mut current = OffsetCoord::from(self);
        for _ in 0..steps {
            current = current + step;
            cells.push(current.coerce());
        }
        Some(cells)
    }
}

// Simple offset pair that can be used to calculate neighbours and rays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetCoord {
    pub rows: isize,
    pub cols: isize,
}

/// Offsets that turn a coordinate into one of its 8 neighbours; these are
/// also the ray directions for communications, fire lines, and charges.
pub static DIRECTIONS: [OffsetCoord; 8] = [
    OffsetCoord { rows: -1, cols: -1 },
    OffsetCoord { rows: -1, cols: 0 },
    OffsetCoord { rows: -1, cols: 1 },
    OffsetCoord { rows: 0, cols: -1 },
    OffsetCoord { rows: 0, cols: 1 },
    OffsetCoord { rows: 1, cols: -1 },
    OffsetCoord { rows: 1, cols: 0 },
    OffsetCoord { rows: 1, cols: 1 },
];

impl OffsetCoord {
    /// Coerces the offset into a coordinate unchecked.
    pub fn coerce(&self) -> Coord {
        Coord {
            row: self.rows as usize,
            col: self.cols as usize,
        }
    }

    /// Determines whether or not the offset lies inside an active grid.
    pub fn in_bounds_signed(&self, rows: usize, cols: usize) -> bool {
        0 <= self.rows && self.rows < rows as isize && 0 <= self.cols && self.cols < cols as isize
    }

    /// The Chebyshev distance between two offsets.
    pub fn chebyshev(&self, other: OffsetCoord) -> usize {
        self.rows.abs_diff(other.rows).max(self.cols.abs_diff(other.cols))
    }

    /// Whether the offset is aligned on a rank, file, or diagonal from zero.
    pub fn aligned(&self) -> bool {
        self.rows == 0 || self.cols == 0 || self.rows.abs() == self.cols.abs()
    }

    /// Constructs a new offset coord.
    pub fn new(rows: isize, cols: isize) -> OffsetCoord {
        OffsetCoord { rows, cols }
    }
}

/// Lazy ray iterator produced by [`Coord::ray`].
pub struct Ray {
    current: OffsetCoord,
    step: OffsetCoord,
    rows: usize,
    cols: usize,
}

impl Iterator for Ray {
    type Item = Coord;
    fn next(&mut self) -> Option<Self::Item> {
        self.current = self.current + self.step;
        self.current
            .in_bounds_signed(self.rows, self.cols)
            .then(|| self.current.coerce())
    }
}

/// Encodes a 0-indexed column as spreadsheet letters: A..Z, AA, AB, ...
/// (bijective base 26; there is no zero digit).
pub fn column_letters(col: usize) -> String {
    let mut value = col + 1;
    let mut letters = Vec::new();
    while value > 0 {
        value -= 1;
        letters.push(b'A' + (value % 26) as u8);
        value /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

/// Decodes spreadsheet column letters into a 0-indexed column.
pub fn parse_column(letters: &str) -> Result<usize> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(anyhow!("invalid column letters {letters}"));
    }
    let value = letters.chars().fold(0usize, |acc, c| {
        acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1)
    });
    Ok(value - 1)
}

// C -> OC

impl From<Coord> for OffsetCoord {
    fn from(value: Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

impl From<&Coord> for OffsetCoord {
    fn from(value: &Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

// OC + OC

impl Add<&OffsetCoord> for &OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        OffsetCoord {
            rows: self.rows + rhs.rows,
            cols: self.cols + rhs.cols,
        }
    }
}

impl Add<OffsetCoord> for &OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        self + &rhs
    }
}

impl Add<&OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        &self + rhs
    }
}

impl Add<OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        &self + &rhs
    }
}

// C + OC

impl Add<&OffsetCoord> for &Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        OffsetCoord::from(self) + rhs
    }
}

impl Add<OffsetCoord> for &Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        self + &rhs
    }
}

impl Add<&OffsetCoord> for Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        &self + rhs
    }
}

impl Add<OffsetCoord> for Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        &self + &rhs
    }
}

// C - C

impl Sub<&Coord> for &Coord {
    type Output = OffsetCoord;
    fn sub(self, rhs: &Coord) -> Self::Output {
        OffsetCoord::from(self) - OffsetCoord::from(rhs)
    }
}

impl Sub<Coord> for &Coord {
    type Output = OffsetCoord;
    fn sub(self, rhs: Coord) -> Self::Output {
        self - &rhs
    }
}

impl Sub<&Coord> for Coord {
    type Output = OffsetCoord;
    fn sub(self, rhs: &Coord) -> Self::Output {
        &self - rhs
    }
}

impl Sub<Coord> for Coord {
    type Output = OffsetCoord;
    fn sub(self, rhs: Coord) -> Self::Output {
        &self - &rhs
    }
}

// OC - OC

impl Sub<&OffsetCoord> for &OffsetCoord {
    type Output = OffsetCoord;
    fn sub(self, rhs: &OffsetCoord) -> Self::Output {
        OffsetCoord {
            rows: self.rows - rhs.rows,
            cols: self.cols - rhs.cols,
        }
    }
}

impl Sub<OffsetCoord> for &OffsetCoord {
    type Output = OffsetCoord;
    fn sub(self, rhs: OffsetCoord) -> Self::Output {
        self - &rhs
    }
}

impl Sub<OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn sub(self, rhs: OffsetCoord) -> Self::Output {
        &self - &rhs
    }
}

impl Sub<&OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn sub(self, rhs: &OffsetCoord) -> Self::Output {
        &self - rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_round_trip() {
        assert_eq!(Coord::new(0, 0).notate(), "A1");
        assert_eq!(Coord::new(19, 24).notate(), "Y20");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");

        for coord in [Coord::new(0, 0), Coord::new(4, 2), Coord::new(19, 24), Coord::new(9, 26)] {
            assert_eq!(coord.notate().parse::<Coord>().unwrap(), coord);
        }
    }

    #[test]
    fn spreadsheet_rejects_garbage() {
        assert!("".parse::<Coord>().is_err());
        assert!("A0".parse::<Coord>().is_err());
        assert!("11".parse::<Coord>().is_err());
        assert!("A".parse::<Coord>().is_err());
        assert!("A1B".parse::<Coord>().is_err());
    }

    #[test]
    fn neighbours_are_clipped_at_edges() {
        let corner = Coord::new(0, 0).neighbours(5, 5).collect::<Vec<_>>();
        assert_eq!(corner.len(), 3);
        let middle = Coord::new(2, 2).neighbours(5, 5).collect::<Vec<_>>();
        assert_eq!(middle.len(), 8);
    }

    #[test]
    fn rays_walk_to_the_edge() {
        let east = Coord::new(0, 0)
            .ray(OffsetCoord::new(0, 1), 5, 5)
            .collect::<Vec<_>>();
        assert_eq!(east, vec![Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3), Coord::new(0, 4)]);

        let diagonal = Coord::new(2, 2)
            .ray(OffsetCoord::new(-1, -1), 5, 5)
            .collect::<Vec<_>>();
        assert_eq!(diagonal, vec![Coord::new(1, 1), Coord::new(0, 0)]);
    }

    #[test]
    fn aligned_paths_only() {
        let from = Coord::new(2, 2);
        assert_eq!(
            from.path_to(&Coord::new(2, 4)),
            Some(vec![Coord::new(2, 3), Coord::new(2, 4)])
        );
        assert_eq!(
            from.path_to(&Coord::new(0, 0)),
            Some(vec![Coord::new(1, 1), Coord::new(0, 0)])
        );
        assert_eq!(from.path_to(&Coord::new(3, 4)), None);
    }

    #[test]
    fn chebyshev_metric() {
        assert_eq!(Coord::new(0, 0).chebyshev(&Coord::new(2, 1)), 2);
        assert_eq!(Coord::new(3, 3).chebyshev(&Coord::new(3, 3)), 0);
        assert_eq!(Coord::new(0, 4).chebyshev(&Coord::new(4, 0)), 4);
    }
}
