//! XPath cursor over a CBOR node tree.

use core::cmp::Ordering;

use crate::tree::{Node, NodeId, NodeKind, Tree};
use crate::value::Scalar;
use crate::xpath::{Atomic, Navigator, NodeType};

/// A clonable cursor over a [`Tree`], positioned on one node at a time.
///
/// Clones are independent: moving one never moves another.
#[derive(Debug, Clone, Copy)]
pub struct CborNavigator<'a> {
    tree: &'a Tree,
    current: NodeId,
    origin: NodeId,
}

impl<'a> CborNavigator<'a> {
    /// Create a cursor positioned on `node`.
    pub fn new(node: Node<'a>) -> Self {
        CborNavigator {
            tree: node.tree(),
            current: node.id(),
            origin: node.id(),
        }
    }

    /// The node under the cursor.
    pub fn current(&self) -> Node<'a> {
        Node::new(self.tree, self.current)
    }

    /// Move back to the node the cursor was created on.
    pub fn reset(&mut self) {
        self.current = self.origin;
    }

    fn move_to(&mut self, node: Option<Node<'a>>) -> bool {
        match node {
            Some(node) => {
                self.current = node.id();
                true
            }
            None => false,
        }
    }
}

impl Navigator for CborNavigator<'_> {
    fn node_type(&self) -> NodeType {
        match self.current().kind() {
            NodeKind::Document => NodeType::Root,
            NodeKind::Element => NodeType::Element,
            NodeKind::Text => NodeType::Text,
        }
    }

    fn local_name(&self) -> &str {
        self.current().name()
    }

    fn value(&self) -> String {
        self.current().inner_text()
    }

    fn typed_value(&self) -> Option<Atomic> {
        self.current().content().and_then(Scalar::to_atomic)
    }

    fn move_to_root(&mut self) {
        self.current = NodeId::ROOT;
    }

    fn move_to_parent(&mut self) -> bool {
        let parent = self.current().parent();
        self.move_to(parent)
    }

    fn move_to_first_child(&mut self) -> bool {
        let child = self.current().first_child();
        self.move_to(child)
    }

    fn move_to_next(&mut self) -> bool {
        let next = self.current().next_sibling();
        self.move_to(next)
    }

    fn move_to_previous(&mut self) -> bool {
        let prev = self.current().prev_sibling();
        self.move_to(prev)
    }

    fn is_same_position(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.current == other.current
    }

    /// Ids are allocated in pre-order, so id order is document order.
    fn compare_position(&self, other: &Self) -> Ordering {
        self.current.cmp(&other.current)
    }
}
