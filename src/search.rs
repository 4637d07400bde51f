use nonmax::NonMaxUsize;

use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// One node of the search tree.
///
/// Never mutated once pushed; children only ever reference earlier
/// entries, so parent links form a tree rooted at the start node and
/// cannot cycle.
#[derive(Debug)]
#[cfg_attr(feature = "inspect", derive(Clone))]
pub struct SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) parent: Option<(NonMaxUsize, A)>,
    pub(crate) state: St,
    pub(crate) g: C,
}

impl<St, A, C> SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn new_root(state: St, g: C) -> Self {
        Self {
            parent: None,
            state,
            g,
        }
    }

    pub fn new_child(parent: (NonMaxUsize, A), state: St, g: C) -> Self {
        Self {
            parent: Some(parent),
            state,
            g,
        }
    }

    pub(crate) fn state(&self) -> &St {
        &self.state
    }

    pub fn g(&self) -> C {
        self.g
    }
}

/// All the Search Nodes. Naturally forms a Search Tree as each node may
/// have a parent Node.
///
/// Append-only; nodes are addressed by their insertion index and parent
/// links point backwards into the same arena.
#[derive(Debug)]
#[cfg_attr(feature = "inspect", derive(Clone))]
pub(crate) struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, node: SearchTreeNode<St, A, C>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reconstructs the root-to-node path by walking parent links and
    /// reversing.
    #[must_use]
    pub fn path<Sp: Space<St, A, C>>(&self, space: &Sp, mut node_index: usize) -> Path<St, A, C> {
        let end = &self[node_index];
        let mut path = Path::<St, A, C>::new_from_start(end.state().clone());

        while let Some((parent_index, a)) = self[node_index].parent {
            let parent = &self[parent_index.get()];
            let s = parent.state();
            let c: C = space.cost(s, &a);
            debug_assert!(c != C::zero());

            path.append((s.clone(), a), c);
            debug_assert!(node_index != parent_index.get());
            node_index = parent_index.get();
        }

        path.reverse();
        path
    }
}

impl<St, A, C> std::ops::Index<usize> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchTreeNode<St, A, C>;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::superqueens::QueensMove;
    use crate::problems::superqueens::QueensSpace;
    use crate::problems::superqueens::QueensState;

    #[test]
    fn path_walks_parent_links_back_to_the_root() {
        let space = QueensSpace::new(4);
        let root = QueensState::empty();
        let one = root.with_queen(1);
        let two = one.with_queen(3);

        let mut tree = SearchTree::new();
        let root_index = tree.push(SearchTreeNode::new_root(root.clone(), 0u32));
        let one_index = tree.push(SearchTreeNode::new_child(
            (NonMaxUsize::new(root_index).unwrap(), QueensMove(1)),
            one,
            1,
        ));
        let two_index = tree.push(SearchTreeNode::new_child(
            (NonMaxUsize::new(one_index).unwrap(), QueensMove(3)),
            two.clone(),
            2,
        ));

        let path = tree.path(&space, two_index);
        assert_eq!(path.start, Some(root));
        assert_eq!(path.end, Some(two));
        assert_eq!(path.actions, vec![QueensMove(1), QueensMove(3)]);
        assert_eq!(path.cost, 2);
        assert!(space.valid_path(&path));
    }

    #[test]
    fn path_of_a_root_is_a_single_state() {
        let space = QueensSpace::new(1);
        let mut tree = SearchTree::new();
        let root_index = tree.push(SearchTreeNode::new_root(QueensState::empty(), 0u32));

        let path = tree.path(&space, root_index);
        assert!(path.is_empty());
        assert_eq!(path.start, path.end);
        assert_eq!(path.cost, 0);
    }
}
