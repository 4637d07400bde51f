use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problem::Problem;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// A partial superqueens assignment.
///
/// `rows[c]` is the row of the queen in column `c`; columns fill left to
/// right, so the number of placed queens is `rows.len()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueensState {
    pub(crate) rows: SmallVec<[u8; 16]>,
}
impl State for QueensState {}

impl QueensState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[u8] {
        &self.rows
    }

    /// Number of queens placed; also the next column to fill.
    #[inline(always)]
    pub fn placed(&self) -> usize {
        self.rows.len()
    }

    /// The assignment extended with a queen at `row` in the next column.
    pub(crate) fn with_queen(&self, row: u8) -> Self {
        let mut rows = self.rows.clone();
        rows.push(row);
        Self { rows }
    }
}

/// Places a queen in the next open column, at the carried row.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display("Q@{_0}")]
pub struct QueensMove(pub u8);
impl Action for QueensMove {}

pub type QueensCost = u32;

/// An `n x n` board under the extended attack rule.
///
/// A queen at `(r0, c0)` attacks row `r0` in every later column `c`,
/// plus the two widened diagonals `r0 + (c - c0)` and `r0 - (c - c0)`.
#[derive(Copy, Clone, Debug)]
pub struct QueensSpace {
    pub(crate) n: u8,
}

impl QueensSpace {
    pub fn new(n: u8) -> Self {
        debug_assert!(n > 0);
        Self { n }
    }

    pub fn n(&self) -> u8 {
        self.n
    }

    /// Whether a queen placed at `row` in the next open column is
    /// attacked by any queen already on the board.
    fn attacked(&self, s: &QueensState, row: u8) -> bool {
        let col = s.placed() as i32;
        let row = row as i32;
        s.rows.iter().enumerate().any(|(c0, &r0)| {
            let delta = col - c0 as i32;
            let r0 = r0 as i32;
            r0 == row || r0 + delta == row || r0 - delta == row
        })
    }

    /// Renders the (possibly partial) assignment as a marker grid.
    pub fn render(&self, s: &QueensState) -> String {
        let n = self.n as usize;
        let mut grid = vec![vec![" . "; n]; n];
        for (c, &r) in s.rows.iter().enumerate() {
            grid[r as usize][c] = " Q ";
        }
        grid.into_iter()
            .map(|row| row.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Space<QueensState, QueensMove, QueensCost> for QueensSpace {
    fn apply(&self, s: &QueensState, a: &QueensMove) -> Option<QueensState> {
        let QueensMove(row) = *a;
        if s.placed() >= self.n as usize || row >= self.n {
            return None;
        }
        if self.attacked(s, row) {
            return None;
        }
        Some(s.with_queen(row))
    }

    /// One child per unattacked row of the next column, ascending.
    fn neighbours(&self, s: &QueensState) -> Vec<(QueensState, QueensMove)> {
        if s.placed() >= self.n as usize {
            return vec![];
        }
        (0..self.n)
            .filter(|&row| !self.attacked(s, row))
            .map(|row| (s.with_queen(row), QueensMove(row)))
            .collect()
    }

    fn valid(&self, s: &QueensState) -> bool {
        s.placed() <= self.n as usize && s.rows.iter().all(|&r| r < self.n)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueensProblemError {
    #[error("Board size must be positive")]
    ZeroSize,
}

/// A superqueens instance: place `n` mutually non-attacking queens,
/// starting from the empty board.
#[derive(Clone, Debug)]
pub struct QueensProblem {
    space: QueensSpace,
    root: QueensState,
}

impl QueensProblem {
    pub fn new(n: u8) -> Result<Self, QueensProblemError> {
        if n == 0 {
            return Err(QueensProblemError::ZeroSize);
        }
        Ok(Self {
            space: QueensSpace::new(n),
            root: QueensState::empty(),
        })
    }
}

impl Problem<QueensSpace, QueensState, QueensMove, QueensCost> for QueensProblem {
    fn space(&self) -> &QueensSpace {
        &self.space
    }
    fn root(&self) -> &QueensState {
        &self.root
    }

    /// All `n` queens placed on distinct rows. Column distinctness holds
    /// by construction.
    fn is_goal(&self, s: &QueensState) -> bool {
        if s.placed() != self.space.n as usize {
            return false;
        }
        let mut seen = [false; 256];
        s.rows.iter().all(|&r| {
            let fresh = !seen[r as usize];
            seen[r as usize] = true;
            fresh
        })
    }
}

impl std::fmt::Display for QueensProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "QueensProblem({0}x{0}):", self.space.n)?;
        write!(f, "{}", self.space.render(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_an_empty_board() {
        assert_eq!(
            QueensProblem::new(0).unwrap_err(),
            QueensProblemError::ZeroSize
        );
    }

    #[test]
    fn first_column_is_unrestricted() {
        let p = QueensProblem::new(4).unwrap();
        let ns = p.space().neighbours(p.root());
        assert_eq!(ns.len(), 4);
        let rows: Vec<u8> = ns.iter().map(|(_, QueensMove(r))| *r).collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
    }

    #[test]
    fn a_placed_queen_forbids_row_and_both_diagonals() {
        let space = QueensSpace::new(5);
        let s = QueensState::empty().with_queen(2);

        // Column 1 with a queen at (2, 0): forbidden rows are 2 (row),
        // 3 and 1 (diagonals at delta 1).
        let ns = space.neighbours(&s);
        let rows: Vec<u8> = ns.iter().map(|(_, QueensMove(r))| *r).collect();
        assert_eq!(rows, vec![0, 4]);

        // Two columns out, the first queen's diagonals widen to 0 and 4;
        // only row 3 survives both queens.
        let far = s.with_queen(0);
        assert!(space.attacked(&far, 4));
        assert!(space.attacked(&far, 0));
        assert!(!space.attacked(&far, 3));
    }

    #[test]
    fn apply_rejects_attacked_and_out_of_range_rows() {
        let space = QueensSpace::new(4);
        let s = QueensState::empty().with_queen(0);

        assert_eq!(space.apply(&s, &QueensMove(0)), None);
        assert_eq!(space.apply(&s, &QueensMove(1)), None);
        assert_eq!(space.apply(&s, &QueensMove(9)), None);
        assert_eq!(
            space.apply(&s, &QueensMove(2)),
            Some(QueensState::empty().with_queen(0).with_queen(2))
        );
    }

    #[test]
    fn goal_needs_all_queens_on_distinct_rows() {
        let p = QueensProblem::new(2).unwrap();
        assert!(!p.is_goal(p.root()));
        assert!(!p.is_goal(&QueensState::empty().with_queen(1)));
        assert!(p.is_goal(&QueensState::empty().with_queen(1).with_queen(0)));
    }

    #[test]
    fn renders_queen_markers() {
        let p = QueensProblem::new(2).unwrap();
        let s = QueensState::empty().with_queen(1);
        assert_eq!(p.space().render(&s), " .  . \n Q  . ");
    }
}
