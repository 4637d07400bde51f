//! Generic A* search over pluggable problems.
//!
//! A `Problem` bundles a transition model (`Space`), a root state, and a
//! goal test; a `Heuristic` ranks states by estimated remaining cost.
//! `AStarSearch` drives any such problem to a cheapest path or to a
//! definitive no-solution answer.

// Search space and problems
// -------------------------
pub mod problem;
pub mod search;
pub mod space;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod astar;
