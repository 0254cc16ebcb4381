//! Resolved interaction tree for the current render.
//!
//! Interactive nodes are recorded in an arena as the output is built, each
//! with the id of its nearest interactive parent. A parent is always pushed
//! before its children, so walking parent links terminates and the chain for
//! a gesture can be collected up front.

use std::fmt;
use std::str::FromStr;

use crate::interaction::NodeInteractions;

/// Index of an interactive node in an [`InteractionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(NodeId)
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    parent: Option<NodeId>,
    interactions: NodeInteractions,
}

/// Arena of the interactive nodes in the rendered output.
#[derive(Debug, Clone, Default)]
pub struct InteractionTree {
    nodes: Vec<TreeNode>,
}

impl InteractionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node. Called whenever the output is cleared.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record an interactive node.
    ///
    /// `parent` is the nearest ancestor that is itself interactive, or `None`
    /// if the node's parent element is not. A parent id that was not issued
    /// before this call is treated as `None`.
    pub fn push(&mut self, parent: Option<NodeId>, interactions: NodeInteractions) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = parent.filter(|parent| parent.index() < self.nodes.len());
        self.nodes.push(TreeNode {
            parent,
            interactions,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeInteractions> {
        self.nodes.get(id.index()).map(|node| &node.interactions)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|node| node.parent)
    }

    /// The chain from `from` up to its outermost interactive ancestor.
    ///
    /// Empty if `from` is not a node of this tree (e.g. left over from a
    /// previous render).
    pub fn ancestor_chain(&self, from: NodeId) -> Vec<&NodeInteractions> {
        let mut chain = Vec::new();
        let mut current = Some(from);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id.index()) else {
                break;
            };
            chain.push(&node.interactions);
            current = node.parent;
        }
        chain
    }
}
