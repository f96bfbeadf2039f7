//! The reconstructed CASS tree
//!
//! A [`Tree`] owns the full node table (table order = preorder, with the
//! optional function-signature node first) and the ordered leaf list.
//! It is constructed atomically from one record and immutable afterwards.
//!
//! On construction the tree derives its leaf-range index: for every
//! structural node, the contiguous half-open interval of leaf positions
//! its subtree spans. Leaf ranges strictly nest along the tree, exactly
//! partition `[0, num_leaves)` at the root, and make "is leaf L inside
//! the subtree rooted at N" an O(1) question.

use crate::cass::config::Config;
use crate::cass::node::{Node, NodeId, NodeKind};

/// Half-open interval of leaf positions.
pub type LeafRange = (usize, usize);

/// One parsed CASS record.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    leaves: Vec<NodeId>,
    root: NodeId,
    function_signature: Option<NodeId>,
    leaf_ranges: Vec<LeafRange>,
    config: Config,
}

impl Tree {
    /// Assemble a tree from a fully built node table. The builder has
    /// already wired parents, children, and use-chains.
    pub(crate) fn new(
        nodes: Vec<Node>,
        leaves: Vec<NodeId>,
        root: NodeId,
        function_signature: Option<NodeId>,
        config: Config,
    ) -> Tree {
        let leaf_ranges = compute_leaf_ranges(&nodes, &leaves, root);
        Tree {
            nodes,
            leaves,
            root,
            function_signature,
            leaf_ranges,
            config,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Full node table, in declaration order (fun-sig first if present,
    /// then the structural tree in preorder).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf nodes in stable left-to-right order: exactly the nodes that
    /// are neither internal nor the function signature, in table order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The detached function-signature node, when the record carried one.
    pub fn function_signature(&self) -> Option<NodeId> {
        self.function_signature
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Half-open range of leaf positions spanned by `id`'s subtree.
    pub fn leaf_range(&self, id: NodeId) -> LeafRange {
        self.leaf_ranges[id.index()]
    }

    /// O(1) subtree-membership test: is the leaf at `leaf_position`
    /// inside the subtree rooted at `id`?
    pub fn spans(&self, id: NodeId, leaf_position: usize) -> bool {
        let (start, end) = self.leaf_range(id);
        start <= leaf_position && leaf_position < end
    }

    /// Structural nodes in preorder (the function signature excluded).
    /// Table order *is* preorder, so this is a plain index walk.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        (self.root.index()..self.nodes.len()).map(NodeId)
    }
}

/// Compute every structural node's leaf range without recursion.
///
/// Leaves get `(i, i + 1)` from their position in the leaf list. Internal
/// nodes span from their first child's start to their last child's end.
/// Walking the preorder table in reverse guarantees children are finished
/// before their parent is visited.
fn compute_leaf_ranges(nodes: &[Node], leaves: &[NodeId], root: NodeId) -> Vec<LeafRange> {
    let mut ranges = vec![(0, 0); nodes.len()];
    for (position, &id) in leaves.iter().enumerate() {
        ranges[id.index()] = (position, position + 1);
    }
    for index in (root.index()..nodes.len()).rev() {
        let node = &nodes[index];
        if node.kind == NodeKind::Internal {
            // Reconstruction guarantees at least one child.
            let first = node.children[0];
            let last = node.children[node.children.len() - 1];
            ranges[index] = (ranges[first.index()].0, ranges[last.index()].1);
        }
    }
    ranges
}
