//! Ordered node tree built from a decoded document.
//!
//! The tree is an arena: [`Tree`] owns every node in a `Vec`, and all links
//! between nodes are [`NodeId`] indices into it. [`Node`] is a copyable
//! handle pairing a tree reference with an id.
//!
//! Ids are handed out in pre-order while building, so id order is document
//! order and the root is always id 0.

mod builder;
mod key;
mod node;
mod render;

pub use builder::build;
pub use key::node_name;
pub use node::{Children, Node};

use crate::value::Scalar;

/// Index of a node within its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The document root.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena, which is also the pre-order position.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The synthetic root
    Document,
    /// A former map key or array slot
    Element,
    /// A scalar leaf
    Text,
}

/// Per-node storage.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) name: String,
    pub(crate) value: Option<Scalar>,
    pub(crate) depth: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind, name: String, value: Option<Scalar>, depth: usize) -> Self {
        NodeData {
            kind,
            name,
            value,
            depth,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// An immutable document tree.
///
/// `Tree` is `Send + Sync`; any number of readers may walk it concurrently.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub(crate) fn from_nodes(nodes: Vec<NodeData>) -> Self {
        debug_assert!(matches!(nodes.first(), Some(n) if n.kind == NodeKind::Document));
        Tree { nodes }
    }

    /// The document root.
    pub fn root(&self) -> Node<'_> {
        Node::new(self, NodeId::ROOT)
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then(|| Node::new(self, id))
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in document order, starting with the root.
    pub fn iter(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| Node::new(self, NodeId(i)))
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}
