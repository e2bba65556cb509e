use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use crate::error::{BoardKind, PuzzleError};

/// Largest number of cells a board may have; tile labels are bytes.
pub const MAX_CELLS: usize = u8::MAX as usize;

/// Direction in which the blank travels during one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

/// Expansion order of the searches. Changing it changes which of several
/// equally short routes the exhaustive search returns.
pub const EXPANSION_ORDER: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

impl Move {
    /// `(row, column)` delta of the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Left => (0, -1),
            Move::Down => (1, 0),
            Move::Right => (0, 1),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Move::Up => 'U',
            Move::Left => 'L',
            Move::Down => 'D',
            Move::Right => 'R',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One arrangement of tiles, stored row-major. The blank is the single zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: Box<[u8]>,
    blank: usize,
}

impl Board {
    /// `blank` must be the index of the zero in `tiles`.
    pub(crate) fn new(tiles: Box<[u8]>, blank: usize) -> Self {
        debug_assert_eq!(tiles[blank], 0);
        Self { tiles, blank }
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Linear index of the blank.
    pub fn blank(&self) -> usize {
        self.blank
    }

    /// Moves the tile at `target` into the blank.
    pub fn slide(&self, target: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles[self.blank] = tiles[target];
        tiles[target] = 0;
        Board {
            tiles,
            blank: target,
        }
    }

    /// Linear index of `tile`, if present.
    pub fn position(&self, tile: u8) -> Option<usize> {
        self.tiles.iter().position(|&t| t == tile)
    }
}

// Only the tile bytes feed the hasher so the fingerprint is a pure function
// of the board content.
impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.tiles);
    }
}

impl Index<usize> for Board {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tiles[index]
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tiles.serialize(serializer)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

/// A single legal slide: the blank at `blank` swaps with the tile at `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub direction: Move,
    pub blank: usize,
    pub target: usize,
}

/// An immutable puzzle: board dimensions plus start and goal arrangements.
#[derive(Debug, Clone)]
pub struct Puzzle {
    rows: usize,
    columns: usize,
    start: Board,
    goal: Board,
}

impl Puzzle {
    pub fn new(rows: usize, columns: usize, from: &[u8], to: &[u8]) -> Result<Self, PuzzleError> {
        let size = check_dimensions(rows, columns)?;
        let start = validate_board(BoardKind::Start, from, size)?;
        let goal = validate_board(BoardKind::Goal, to, size)?;

        Ok(Self {
            rows,
            columns,
            start,
            goal,
        })
    }

    /// A random puzzle whose goal is the canonical board and whose start is
    /// guaranteed to be solvable.
    pub fn scramble<R: Rng>(
        rows: usize,
        columns: usize,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let size = check_dimensions(rows, columns)?;
        let goal = canonical_goal(size);

        if rows == 1 || columns == 1 {
            // Tiles cannot pass each other on a line, only the blank can move.
            let mut from: Vec<u8> = goal.iter().copied().filter(|&t| t != 0).collect();
            let blank = rng.gen_range(0..=from.len());
            from.insert(blank, 0);
            return Self::new(rows, columns, &from, &goal);
        }

        let mut from = goal.clone();
        loop {
            from.shuffle(rng);
            let puzzle = Self::new(rows, columns, &from, &goal)?;
            if puzzle.solvable() {
                return Ok(puzzle);
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    pub fn is_goal(&self, board: &Board) -> bool {
        *board == self.goal
    }

    /// `(row, column)` of a linear index.
    pub fn coordinates(&self, position: usize) -> (usize, usize) {
        (position / self.columns, position % self.columns)
    }

    /// Whether the goal is reachable from the start.
    ///
    /// On boards with at least two rows and columns a slide preserves the
    /// parity of `inversions + (columns - 1) * blank_row`, and two boards of
    /// equal parity are always connected. On a single row or column the
    /// tiles keep their relative order forever.
    pub fn solvable(&self) -> bool {
        if self.rows == 1 || self.columns == 1 {
            let start = self.start.tiles().iter().filter(|&&t| t != 0);
            let goal = self.goal.tiles().iter().filter(|&&t| t != 0);
            return start.eq(goal);
        }

        self.parity(&self.start) == self.parity(&self.goal)
    }

    fn parity(&self, board: &Board) -> usize {
        let (row, _) = self.coordinates(board.blank());
        (count_inversions(board.tiles()) + (self.columns - 1) * (row + 1)) % 2
    }

    /// The target cell of sliding the blank of `board` in `direction`.
    pub fn slide_target(&self, board: &Board, direction: Move) -> Option<usize> {
        let (row, column) = self.coordinates(board.blank());
        let (dr, dc) = direction.as_offset();

        let new_row = row as isize + dr;
        let new_column = column as isize + dc;

        if new_row >= 0
            && new_row < self.rows as isize
            && new_column >= 0
            && new_column < self.columns as isize
        {
            Some(new_row as usize * self.columns + new_column as usize)
        } else {
            None
        }
    }

    /// Legal slides from `board`, in `EXPANSION_ORDER`.
    pub fn neighbors<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Slide> + 'a {
        EXPANSION_ORDER.into_iter().filter_map(move |direction| {
            self.slide_target(board, direction).map(|target| Slide {
                direction,
                blank: board.blank(),
                target,
            })
        })
    }

    pub fn try_move(&self, board: &Board, direction: Move) -> Option<Board> {
        self.slide_target(board, direction)
            .map(|target| board.slide(target))
    }

    /// Sum of the grid distances between every misplaced tile and its goal
    /// cell. The blank is not counted.
    pub fn heuristic(&self, board: &Board) -> usize {
        self.goal
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(i, &tile)| tile != 0 && board[i] != tile)
            .map(|(i, &tile)| {
                board
                    .position(tile)
                    .map_or(0, |current| self.distance(i, current))
            })
            .sum()
    }

    fn distance(&self, a: usize, b: usize) -> usize {
        let (row_a, column_a) = self.coordinates(a);
        let (row_b, column_b) = self.coordinates(b);
        row_a.abs_diff(row_b) + column_a.abs_diff(column_b)
    }
}

/// Tiles `1..size` in order with the blank in the last cell.
pub fn canonical_goal(size: usize) -> Vec<u8> {
    (1..size)
        .map(|tile| tile as u8)
        .chain(std::iter::once(0))
        .collect()
}

fn check_dimensions(rows: usize, columns: usize) -> Result<usize, PuzzleError> {
    if rows == 0 || columns == 0 {
        return Err(PuzzleError::ZeroDimension { rows, columns });
    }
    let cells = rows.saturating_mul(columns);
    if cells > MAX_CELLS {
        return Err(PuzzleError::TooLarge { cells });
    }
    Ok(cells)
}

fn validate_board(which: BoardKind, tiles: &[u8], size: usize) -> Result<Board, PuzzleError> {
    if tiles.len() != size {
        return Err(PuzzleError::WrongLength {
            which,
            expected: size,
            actual: tiles.len(),
        });
    }

    let mut seen = [false; MAX_CELLS + 1];
    for &value in tiles {
        if usize::from(value) >= size || seen[usize::from(value)] {
            return Err(PuzzleError::NotAPermutation { which, size, value });
        }
        seen[usize::from(value)] = true;
    }

    // Every label 0..size was seen exactly once, so the blank exists.
    let blank = tiles.iter().position(|&t| t == 0).unwrap_or_default();
    Ok(Board::new(tiles.into(), blank))
}

fn count_inversions(tiles: &[u8]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn puzzle(rows: usize, columns: usize, from: &[u8], to: &[u8]) -> Puzzle {
        Puzzle::new(rows, columns, from, to).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert_eq!(
            Puzzle::new(0, 3, &[], &[]).unwrap_err(),
            PuzzleError::ZeroDimension {
                rows: 0,
                columns: 3
            }
        );
        assert_eq!(
            Puzzle::new(16, 16, &[], &[]).unwrap_err(),
            PuzzleError::TooLarge { cells: 256 }
        );
    }

    #[test]
    fn test_rejects_non_permutations() {
        let goal = [1, 2, 3, 0];
        assert_eq!(
            Puzzle::new(2, 2, &[1, 2, 3], &goal).unwrap_err(),
            PuzzleError::WrongLength {
                which: BoardKind::Start,
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            Puzzle::new(2, 2, &[1, 1, 3, 0], &goal).unwrap_err(),
            PuzzleError::NotAPermutation {
                which: BoardKind::Start,
                size: 4,
                value: 1
            }
        );
        // Two blanks.
        assert!(matches!(
            Puzzle::new(2, 2, &goal, &[0, 2, 3, 0]),
            Err(PuzzleError::NotAPermutation {
                which: BoardKind::Goal,
                value: 0,
                ..
            })
        ));
        assert!(matches!(
            Puzzle::new(2, 2, &[1, 2, 4, 0], &goal),
            Err(PuzzleError::NotAPermutation { value: 4, .. })
        ));
    }

    #[test]
    fn test_canonical_goal() {
        assert_eq!(canonical_goal(4), vec![1, 2, 3, 0]);
        assert_eq!(canonical_goal(1), vec![0]);
    }

    #[test]
    fn test_count_inversions_ignores_blank() {
        assert_eq!(count_inversions(&[1, 2, 3, 4, 5, 6, 7, 0, 8]), 0);
        assert_eq!(count_inversions(&[1, 2, 3, 4, 5, 6, 8, 7, 0]), 1);
        assert_eq!(count_inversions(&[0, 8, 1, 2, 4, 7, 3, 6, 5]), 12);
    }

    #[test]
    fn test_solvable() {
        let goal = [1, 2, 3, 4, 5, 6, 7, 8, 0];
        assert!(puzzle(3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 8], &goal).solvable());
        assert!(puzzle(3, 3, &[1, 2, 3, 4, 5, 0, 7, 8, 6], &goal).solvable());
        assert!(puzzle(3, 3, &[0, 8, 1, 2, 4, 7, 3, 6, 5], &goal).solvable());
        assert!(!puzzle(3, 3, &[1, 2, 3, 4, 5, 6, 8, 7, 0], &goal).solvable());

        let goal = [1, 2, 3, 0];
        assert!(puzzle(2, 2, &[0, 1, 3, 2], &goal).solvable());
        assert!(!puzzle(2, 2, &[2, 1, 3, 0], &goal).solvable());
    }

    #[test]
    fn test_solvable_depends_only_on_parity() {
        // Relabelling both boards the same way keeps the verdict.
        let a = puzzle(2, 3, &[1, 2, 0, 4, 5, 3], &[1, 2, 3, 4, 5, 0]);
        let b = puzzle(2, 3, &[5, 4, 0, 2, 1, 3], &[5, 4, 3, 2, 1, 0]);
        assert!(a.solvable());
        assert!(b.solvable());
    }

    #[test]
    fn test_solvable_single_line() {
        assert!(puzzle(1, 3, &[1, 0, 2], &[1, 2, 0]).solvable());
        assert!(puzzle(3, 1, &[0, 1, 2], &[1, 2, 0]).solvable());
        // Same inversion parity, different tile order.
        assert!(!puzzle(1, 4, &[2, 3, 1, 0], &[1, 2, 3, 0]).solvable());
        assert!(!puzzle(1, 3, &[2, 1, 0], &[1, 2, 0]).solvable());
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let p = puzzle(3, 3, &[1, 2, 3, 4, 0, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        let slides: Vec<(Move, usize)> = p
            .neighbors(p.start())
            .map(|s| (s.direction, s.target))
            .collect();
        assert_eq!(
            slides,
            vec![(Move::Left, 3), (Move::Right, 5), (Move::Up, 1), (Move::Down, 7)]
        );

        let corner: Vec<Move> = p.neighbors(p.goal()).map(|s| s.direction).collect();
        assert_eq!(corner, vec![Move::Left, Move::Up]);
    }

    #[test]
    fn test_neighbors_on_rectangular_board() {
        // Two rows, three columns: the cell below index 2 is index 5.
        let p = puzzle(2, 3, &[1, 2, 0, 4, 5, 3], &[1, 2, 3, 4, 5, 0]);
        let next = p.try_move(p.start(), Move::Down).unwrap();
        assert_eq!(next, *p.goal());
        assert!(p.try_move(p.start(), Move::Right).is_none());
        assert!(p.try_move(p.start(), Move::Up).is_none());
    }

    #[test]
    fn test_heuristic() {
        let goal = [1, 2, 3, 4, 5, 6, 7, 8, 0];
        let p = puzzle(3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 8], &goal);
        assert_eq!(p.heuristic(p.start()), 1);
        assert_eq!(p.heuristic(p.goal()), 0);

        let p = puzzle(3, 3, &[8, 2, 3, 4, 5, 6, 7, 1, 0], &goal);
        assert_eq!(p.heuristic(p.start()), 6);
    }

    #[test]
    fn test_slides_are_reversible() {
        let p = puzzle(3, 3, &[1, 2, 3, 4, 0, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        for direction in EXPANSION_ORDER {
            let moved = p.try_move(p.start(), direction).unwrap();
            assert_ne!(moved, *p.start());
            // Sliding the tile back into the old blank cell undoes the move.
            assert_eq!(moved.slide(p.start().blank()), *p.start());
        }
    }

    #[test]
    fn test_move_names() {
        let names: Vec<String> = EXPANSION_ORDER.iter().map(Move::to_string).collect();
        assert_eq!(names, ["Left", "Right", "Up", "Down"]);
        for direction in EXPANSION_ORDER {
            assert!(direction.name().starts_with(direction.symbol()));
        }
    }

    #[test]
    fn test_scramble_is_solvable() {
        let mut rng = StdRng::seed_from_u64(7);
        for (rows, columns) in [(3, 3), (4, 4), (2, 5), (1, 6), (5, 1)] {
            let p = Puzzle::scramble(rows, columns, &mut rng).unwrap();
            assert_eq!(p.goal().tiles(), canonical_goal(rows * columns).as_slice());
            assert!(p.solvable());
        }
    }
}
