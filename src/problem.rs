use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// A search problem: a transition model, a root state, and a goal test.
///
/// The engine only ever drives a problem through these three operations
/// (plus a `Heuristic`), so any state space that can answer them plugs
/// into the same search.
pub trait Problem<Sp, St, A, C>: std::fmt::Debug + Sized
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn root(&self) -> &St;

    /// Whether `s` is terminal. Must be a pure function of the state.
    fn is_goal(&self, s: &St) -> bool;
}

/// An instance-specific heuristic.
///
/// For optimality guarantees `h` must be admissible: it must never
/// overestimate the true remaining cost to a goal. The engine does not
/// enforce this; an overestimating heuristic silently degrades the
/// returned path from optimal to merely valid.
pub trait Heuristic<P, Sp, St, A, C>: std::fmt::Debug
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn h(_p: &P, _s: &St) -> C {
        C::zero()
    }
}

/// The uninformed heuristic: `h = 0` everywhere.
///
/// Degrades A* to uniform-cost search. Trivially admissible.
#[derive(Debug)]
pub struct ZeroHeuristic;

impl<P, Sp, St, A, C> Heuristic<P, Sp, St, A, C> for ZeroHeuristic
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
}
