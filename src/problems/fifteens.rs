use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// Widest supported board. `16 * 16 - 1 == 255` still fits a `u8` tile.
pub const MAX_WIDTH: usize = 16;

/// A sliding-tile board.
///
/// Row-major cells holding each value `0..w*w` exactly once, `0` being
/// the blank. The whole board is the search state; the classic 15-puzzle
/// fits inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileState {
    pub(crate) cells: SmallVec<[u8; 16]>,
}
impl State for TileState {}

impl TileState {
    /// The solved board: `1, 2, .., w*w-1` with the blank last.
    pub fn solved(width: usize) -> Self {
        debug_assert!(width > 0 && width <= MAX_WIDTH);
        let n = width * width;
        let mut cells = SmallVec::with_capacity(n);
        for v in 1..n {
            cells.push(v as u8);
        }
        cells.push(0);
        Self { cells }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.cells.len().isqrt()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Index of the blank cell.
    pub(crate) fn blank(&self) -> usize {
        match self.cells.iter().position(|&v| v == 0) {
            Some(i) => i,
            None => unreachable!("Every board holds exactly one blank"),
        }
    }

    /// The board with cells `i` and `j` swapped.
    pub(crate) fn with_swap(&self, i: usize, j: usize) -> Self {
        let mut cells = self.cells.clone();
        cells.swap(i, j);
        Self { cells }
    }
}

impl std::fmt::Display for TileState {
    /// Fixed-width rendering: right-aligned tile numbers, the blank as
    /// spaces.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let w = self.width();
        let cell_width = ((w * w - 1).max(1).ilog10() + 1) as usize;
        for row in self.cells.chunks(w) {
            for &v in row {
                if v == 0 {
                    write!(f, " {:>cell_width$}", "")?;
                } else {
                    write!(f, " {v:>cell_width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The direction the blank travels.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum TileMove {
    #[display("←")]
    Left,
    #[display("→")]
    Right,
    #[display("↑")]
    Up,
    #[display("↓")]
    Down,
}
impl Action for TileMove {}

/// Column shifts before row shifts, matching the expansion order of the
/// board's move enumeration.
const ALL_MOVES: [TileMove; 4] = [TileMove::Left, TileMove::Right, TileMove::Up, TileMove::Down];

pub type TileCost = u32;

#[derive(Copy, Clone, Debug)]
pub struct TileSpace {
    pub(crate) width: usize,
}

impl TileSpace {
    pub fn new(width: usize) -> Self {
        debug_assert!(width > 0 && width <= MAX_WIDTH);
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl Space<TileState, TileMove, TileCost> for TileSpace {
    /// Slides the blank one cell, swapping it with the tile there.
    fn apply(&self, s: &TileState, a: &TileMove) -> Option<TileState> {
        let w = self.width;
        let blank = s.blank();
        let (row, col) = (blank / w, blank % w);

        let target = match a {
            TileMove::Left => (col > 0).then(|| blank - 1),
            TileMove::Right => (col + 1 < w).then(|| blank + 1),
            TileMove::Up => (row > 0).then(|| blank - w),
            TileMove::Down => (row + 1 < w).then(|| blank + w),
        }?;

        Some(s.with_swap(blank, target))
    }

    fn neighbours(&self, s: &TileState) -> Vec<(TileState, TileMove)> {
        let mut v = Vec::with_capacity(4);
        for a in ALL_MOVES {
            if let Some(child) = self.apply(s, &a) {
                v.push((child, a));
            }
        }
        v
    }

    fn valid(&self, s: &TileState) -> bool {
        let n = self.width * self.width;
        if s.cells.len() != n {
            return false;
        }
        let mut seen = [false; MAX_WIDTH * MAX_WIDTH];
        for &v in &s.cells {
            if (v as usize) >= n || seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        true
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid tile '{0}'")]
    InvalidToken(String),
    #[error("{0} cells do not form a square board")]
    NotSquare(usize),
    #[error("Board width {0} exceeds the supported maximum of {MAX_WIDTH}")]
    TooWide(usize),
    #[error("Tile {0} is out of range for a {1}x{1} board")]
    OutOfRange(usize, usize),
    #[error("Duplicate tile {0}")]
    DuplicateTile(usize),
}

/// A sliding-tile instance: a fixed board size and the scrambled root.
#[derive(Clone, Debug)]
pub struct TileProblem {
    space: TileSpace,
    root: TileState,
}

impl TileProblem {
    pub fn new(root: TileState) -> Self {
        let space = TileSpace::new(root.width());
        debug_assert!(space.valid(&root));
        Self { space, root }
    }

    /// A random walk of `steps` blank moves away from the solved board.
    ///
    /// Steps may undo each other, so the optimal solution is at most
    /// `steps` moves.
    pub fn scrambled<R: rand::Rng>(width: usize, steps: usize, r: &mut R) -> Self {
        let space = TileSpace::new(width);
        let mut state = TileState::solved(width);
        for _ in 0..steps {
            let mut neighbours = space.neighbours(&state);
            let pick = r.random_range(0..neighbours.len());
            (state, _) = neighbours.swap_remove(pick);
        }
        Self { space, root: state }
    }
}

impl Problem<TileSpace, TileState, TileMove, TileCost> for TileProblem {
    fn space(&self) -> &TileSpace {
        &self.space
    }
    fn root(&self) -> &TileState {
        &self.root
    }

    /// The grid reads `1, 2, .., w*w-1` row-major with the blank last.
    fn is_goal(&self, s: &TileState) -> bool {
        let n = s.cells.len();
        s.cells
            .iter()
            .enumerate()
            .all(|(i, &v)| v as usize == if i + 1 == n { 0 } else { i + 1 })
    }
}

impl std::convert::TryFrom<&str> for TileProblem {
    type Error = TileParseError;

    /// Parses a whitespace-and-newline delimited grid of tile values.
    ///
    /// The grid must be square and contain each value `0..w*w` exactly
    /// once; anything else is rejected eagerly.
    fn try_from(input: &str) -> Result<Self, Self::Error> {
        let mut values = Vec::new();
        for token in input.split_whitespace() {
            let v: usize = token
                .parse()
                .map_err(|_| TileParseError::InvalidToken(token.to_string()))?;
            values.push(v);
        }
        if values.is_empty() {
            return Err(TileParseError::EmptyInput);
        }

        let width = values.len().isqrt();
        if width * width != values.len() {
            return Err(TileParseError::NotSquare(values.len()));
        }
        if width > MAX_WIDTH {
            return Err(TileParseError::TooWide(width));
        }

        let n = values.len();
        let mut seen = vec![false; n];
        let mut cells = SmallVec::with_capacity(n);
        for v in values {
            if v >= n {
                return Err(TileParseError::OutOfRange(v, width));
            }
            if seen[v] {
                return Err(TileParseError::DuplicateTile(v));
            }
            seen[v] = true;
            cells.push(v as u8);
        }

        Ok(Self {
            space: TileSpace::new(width),
            root: TileState { cells },
        })
    }
}

impl std::fmt::Display for TileProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "TileProblem({0}x{0}):", self.space.width)?;
        write!(f, "{}", self.root)
    }
}

/// Sum over non-blank tiles of the row and column distance to each
/// tile's goal cell.
///
/// Admissible: every move changes one tile's distance by exactly one.
#[derive(Debug)]
pub struct TileHeuristicManhattan;

impl Heuristic<TileProblem, TileSpace, TileState, TileMove, TileCost> for TileHeuristicManhattan {
    fn h(_p: &TileProblem, s: &TileState) -> TileCost {
        let w = s.width();
        let mut h = 0u32;
        for (i, &v) in s.cells.iter().enumerate() {
            if v == 0 {
                continue;
            }
            // Tile v rests at row (v-1)/w, column (v-1)%w.
            let goal = v as usize - 1;
            h += ((i / w).abs_diff(goal / w) + (i % w).abs_diff(goal % w)) as u32;
        }
        h
    }
}
