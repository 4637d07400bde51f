use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

use nonmax::NonMaxUsize;
use rustc_hash::FxHashSet;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h.
///
/// Intuition around higher g-value might be slightly easier, but keeping the
/// raw h value helps to avoid recomputing it later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    h: C,
}

impl<C> AStarRank<C>
where
    C: Cost,
{
    pub fn new(g: C, h: C) -> Self {
        Self {
            f: g.saturating_add(&h),
            h,
        }
    }

    pub fn f(&self) -> C {
        self.f
    }
}

/// A frontier entry: the rank of a search tree node plus its arena index.
///
/// `seq` increases monotonically with every insertion, so equal-rank
/// entries pop in FIFO order and the whole pop order is deterministic.
///
/// `Ord` is reversed (`BinaryHeap` is a max-heap) so the heap pops the
/// minimum rank first.
#[derive(Debug)]
#[cfg_attr(feature = "inspect", derive(Clone))]
struct FrontierEntry<C>
where
    C: Cost,
{
    rank: AStarRank<C>,
    seq: u64,
    node_index: usize,
}

impl<C: Cost> PartialEq for FrontierEntry<C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}
impl<C: Cost> Eq for FrontierEntry<C> {}

impl<C: Cost> PartialOrd for FrontierEntry<C> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<C: Cost> Ord for FrontierEntry<C> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        (&other.rank, other.seq).cmp(&(&self.rank, self.seq))
    }
}

/// Counters kept by one search run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States expanded (moved into the evaluated set).
    pub expanded: usize,
    /// Nodes pushed onto the frontier, root included.
    pub generated: usize,
    /// Children and stale frontier duplicates discarded against the
    /// evaluated set.
    pub pruned: usize,
}

/// Best-first search over any `Problem`, ranked by `f = g + h`.
///
/// The frontier tolerates duplicate states: a reached state is pushed
/// unconditionally, without checking the frontier or improving an
/// existing entry's g. The evaluated set alone guarantees that no state
/// is ever expanded twice; stale duplicates are discarded when popped.
#[derive(Debug)]
pub struct AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<P, Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    search_tree: SearchTree<St, A, C>,

    /// The frontier: discovered but not yet expanded nodes.
    open: BinaryHeap<FrontierEntry<C>>,

    /// The "Closed Set": states already expanded. Grows monotonically.
    evaluated: FxHashSet<St>,

    /// Sequence number of the next frontier insertion.
    next_seq: u64,

    /// Expansions allowed before giving up, if bounded.
    expansion_limit: Option<usize>,

    stats: SearchStats,

    problem: P,

    _phantom_heuristic: PhantomData<H>,
    _phantom_space: PhantomData<Sp>,
    _phantom_action: PhantomData<A>,
}

impl<P, H, Sp, St, A, C> AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<P, Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: P) -> Self {
        let mut search = Self {
            search_tree: SearchTree::new(),
            open: BinaryHeap::new(),
            evaluated: FxHashSet::default(),
            next_seq: 0,
            expansion_limit: None,
            stats: SearchStats::default(),

            problem,

            _phantom_heuristic: PhantomData,
            _phantom_space: PhantomData,
            _phantom_action: PhantomData,
        };

        let root = search.problem.root().clone();
        let g: C = C::zero();
        let h: C = H::h(&search.problem, &root);
        let node_index = search
            .search_tree
            .push(SearchTreeNode::new_root(root, g));
        search.push_open(node_index, AStarRank::new(g, h));

        search
    }

    /// Caps the number of expansions; an exhausted budget reports
    /// no-solution even when the frontier is non-empty.
    #[must_use]
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the search to completion.
    ///
    /// Returns the root-to-goal path, or `None` when the frontier
    /// exhausts (or the expansion budget runs out). No-solution is a
    /// normal terminal outcome, not a fault.
    #[must_use]
    pub fn find_first(&mut self) -> Option<Path<St, A, C>> {
        while let Some(entry) = self.open.peek() {
            let node_index = entry.node_index;
            let state = self.search_tree[node_index].state().clone();

            // Goal-check before removal, so a root that is already a goal
            // returns immediately without ever being marked evaluated.
            if self.problem.is_goal(&state) {
                log::debug!(
                    "goal found after {} expansions ({} generated)",
                    self.stats.expanded,
                    self.stats.generated,
                );
                let path = self.search_tree.path(self.problem.space(), node_index);
                self.verify_path(&path);
                return Some(path);
            }

            self.open.pop();

            // A stale duplicate of an already expanded state. The
            // evaluated set is the only guard against re-expansion.
            if !self.evaluated.insert(state.clone()) {
                self.stats.pruned += 1;
                continue;
            }

            if let Some(limit) = self.expansion_limit {
                if self.stats.expanded >= limit {
                    log::debug!("expansion limit of {limit} reached, giving up");
                    return None;
                }
            }
            self.stats.expanded += 1;

            // Expand. Children already expanded are dropped; the rest
            // join the frontier unconditionally, so duplicate states may
            // coexist there until popped.
            let g: C = self.search_tree[node_index].g();
            let neighbours = self.problem.space().neighbours(&state);
            for (s, a) in neighbours {
                if self.evaluated.contains(&s) {
                    self.stats.pruned += 1;
                    continue;
                }

                let c: C = self.problem.space().cost(&state, &a);
                let child_g = g + c;
                let child_h = H::h(&self.problem, &s);
                let parent = (NonMaxUsize::new(node_index).unwrap(), a);
                let child_index = self
                    .search_tree
                    .push(SearchTreeNode::new_child(parent, s, child_g));
                self.push_open(child_index, AStarRank::new(child_g, child_h));
            }

            log::trace!(
                "expanded node {node_index} (|open|={}, |evaluated|={})",
                self.open.len(),
                self.evaluated.len(),
            );
        }

        None
    }

    #[inline(always)]
    #[must_use]
    pub fn is_evaluated(&self, s: &St) -> bool {
        self.evaluated.contains(s)
    }

    #[inline(always)]
    fn push_open(&mut self, node_index: usize, rank: AStarRank<C>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.open.push(FrontierEntry {
            rank,
            seq,
            node_index,
        });
        self.stats.generated += 1;
        // Every tree node gets exactly one frontier entry.
        debug_assert_eq!(self.next_seq as usize, self.search_tree.len());
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify_path(&self, _path: &Path<St, A, C>) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify_path(&self, path: &Path<St, A, C>) {
        debug_assert!(path.seems_valid());
        debug_assert!(
            self.problem.space().valid_path(path),
            "Returned paths must replay through Space::apply",
        );
    }
}
