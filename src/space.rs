use std::fmt::Debug;
use std::hash::Hash;

use num_traits::SaturatingAdd;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}

/// A canonical snapshot of a problem configuration.
///
/// Equality and hashing over `State` values are the sole mechanism for
/// duplicate detection during search, so two states must compare equal
/// iff they describe equivalent search configurations. Path cost and
/// parentage are deliberately excluded.
pub trait State: Clone + Debug + PartialEq + Eq + Hash {}

pub trait Cost:
    Copy
    + Clone
    + Debug
    + std::fmt::Display
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + SaturatingAdd
    + num_traits::Zero
    + num_traits::One
    + num_traits::bounds::UpperBounded
    + std::ops::Add<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != Self::max_value()
    }
}

/// Unit step costs for both bundled problems.
impl Cost for u32 {}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "inspect", derive(Clone))]
pub struct Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub start: Option<St>,
    pub end: Option<St>,
    pub cost: C,
    pub actions: Vec<A>,
}

impl<St, A, C> Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            start: Some(start.clone()),
            end: Some(start),
            cost: C::zero(),
            actions: vec![],
        }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self {
            start: None,
            end: None,
            cost: C::zero(),
            actions: vec![],
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of moves along the path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Runs sanity checks
    #[inline(always)]
    pub fn seems_valid(&self) -> bool {
        self.start.is_some() == self.end.is_some() && self.cost.valid()
    }

    #[inline(always)]
    pub fn append(&mut self, last_action: (St, A), c: C) {
        let (s, a) = last_action;
        self.actions.push(a);
        self.end = Some(s);
        self.cost = self.cost.saturating_add(&c);
    }

    /// Reverses the Path, likely making it invalid.
    ///
    /// Useful when naturally reconstructing paths in reverse.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.actions.reverse();
    }
}

impl<St, A, C> std::fmt::Display for Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        debug_assert!(self.start.is_none() == self.end.is_none());

        match (&self.start, &self.end) {
            (Some(start), Some(end)) => {
                write!(
                    f,
                    "Path({}, {:?}:{:?}:{:?})",
                    self.cost,
                    start,
                    self.actions.iter().take(20).collect::<Vec<_>>(),
                    end
                )
            }
            (None, None) => write!(f, "Path()"),
            _ => unreachable!("Path::start and Path::end should both be Some or None"),
        }
    }
}

/// A transition model over states.
///
/// From any state we can enumerate the actions that lead to new states,
/// giving search a generic graph-like API.
pub trait Space<St, A, C>: Clone + std::fmt::Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Applies a single action, if legal in `s`.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// The step cost of taking `a` from `s`. Never zero.
    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }

    /// Expands a State.
    ///
    /// Eager and finite; the order is problem-defined but deterministic,
    /// which keeps search traces reproducible.
    fn neighbours(&self, s: &St) -> Vec<(St, A)>;

    /// Verify if a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn valid_path(&self, p: &Path<St, A, C>) -> bool {
        if let Some(start) = &p.start {
            let mut state: St = start.clone();
            for a in &p.actions {
                match self.apply(&state, a) {
                    Some(new_state) => state = new_state,
                    None => return false,
                }
            }
            if let Some(end) = &p.end {
                return *end == state;
            }
            false
        } else {
            // Empty paths are fine
            *p == Path::<St, A, C>::empty()
        }
    }

    /// Replays a path, returning every state visited from start to end.
    ///
    /// `None` if the path does not replay through `apply`.
    fn path_states(&self, p: &Path<St, A, C>) -> Option<Vec<St>> {
        let mut state = p.start.clone()?;
        let mut states = vec![state.clone()];
        for a in &p.actions {
            state = self.apply(&state, a)?;
            states.push(state.clone());
        }
        if *p.end.as_ref()? != state {
            return None;
        }
        Some(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A one-dimensional line where the only action is a unit step right.
    #[derive(Clone, Debug)]
    struct Line;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Step;
    impl Action for Step {}
    impl State for u8 {}

    impl Space<u8, Step, u32> for Line {
        fn apply(&self, s: &u8, _a: &Step) -> Option<u8> {
            s.checked_add(1)
        }
        fn neighbours(&self, s: &u8) -> Vec<(u8, Step)> {
            self.apply(s, &Step).map(|n| (n, Step)).into_iter().collect()
        }
        fn valid(&self, _s: &u8) -> bool {
            true
        }
    }

    #[test]
    fn path_append_and_reverse() {
        let mut p = Path::<u8, Step, u32>::new_from_start(2u8);
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);

        p.append((1u8, Step), 1);
        p.append((0u8, Step), 1);
        assert_eq!(p.start, Some(2u8));
        assert_eq!(p.end, Some(0u8));
        assert_eq!(p.cost, 2);

        p.reverse();
        assert_eq!(p.start, Some(0u8));
        assert_eq!(p.end, Some(2u8));
        assert_eq!(p.len(), 2);
        assert!(p.seems_valid());
    }

    #[test]
    fn empty_paths_are_valid() {
        let p = Path::<u8, Step, u32>::empty();
        assert!(Line.valid_path(&p));
    }

    #[test]
    fn replaying_a_path_yields_every_state() {
        let mut p = Path::<u8, Step, u32>::new_from_start(2u8);
        p.append((1u8, Step), 1);
        p.append((0u8, Step), 1);
        p.reverse();

        assert!(Line.valid_path(&p));
        assert_eq!(Line.path_states(&p), Some(vec![0u8, 1u8, 2u8]));
    }

    #[test]
    fn broken_paths_do_not_replay() {
        let mut p = Path::<u8, Step, u32>::new_from_start(0u8);
        p.append((7u8, Step), 1);
        p.reverse();

        assert!(!Line.valid_path(&p));
        assert_eq!(Line.path_states(&p), None);
    }
}
