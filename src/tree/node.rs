//! Node handles.

use core::fmt;

use super::{render, NodeData, NodeId, NodeKind, Tree};
use crate::value::Scalar;

/// A node in a [`Tree`].
///
/// Cheap to copy. Two handles are equal when they point at the same node of
/// the same tree.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn new(tree: &'a Tree, id: NodeId) -> Self {
        Node { tree, id }
    }

    fn data(&self) -> &'a NodeData {
        self.tree.data(self.id)
    }

    fn link(&self, id: Option<NodeId>) -> Option<Node<'a>> {
        id.map(|id| Node::new(self.tree, id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Element name, or the scalar rendition for text nodes. Empty for the root.
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// The decoded scalar of a text node; `None` for elements and the root.
    pub fn value(&self) -> Option<&'a Scalar> {
        self.data().value.as_ref()
    }

    /// Distance from the root.
    pub fn depth(&self) -> usize {
        self.data().depth
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.link(self.data().parent)
    }

    pub fn first_child(&self) -> Option<Node<'a>> {
        self.link(self.data().first_child)
    }

    pub fn last_child(&self) -> Option<Node<'a>> {
        self.link(self.data().last_child)
    }

    pub fn prev_sibling(&self) -> Option<Node<'a>> {
        self.link(self.data().prev_sibling)
    }

    pub fn next_sibling(&self) -> Option<Node<'a>> {
        self.link(self.data().next_sibling)
    }

    /// Iterate over direct children in document order.
    pub fn children(&self) -> Children<'a> {
        Children {
            next: self.first_child(),
        }
    }

    /// Collect direct children in document order.
    pub fn child_nodes(&self) -> Vec<Node<'a>> {
        self.children().collect()
    }

    /// Concatenated renditions of all text nodes at or below this node.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        if self.kind() == NodeKind::Text {
            out.push_str(self.name());
            return;
        }
        for child in self.children() {
            child.push_text(out);
        }
    }

    /// First direct child element with the given name.
    pub fn select_element(&self, name: &str) -> Option<Node<'a>> {
        self.children()
            .find(|child| child.kind() == NodeKind::Element && child.name() == name)
    }

    /// The scalar held by this node.
    ///
    /// For a text node this is its own value. For an element whose only child
    /// is a text node it is that child's value, so `id` in `{"id": 102}` reads
    /// as `102` directly.
    pub fn content(&self) -> Option<&'a Scalar> {
        match self.kind() {
            NodeKind::Text => self.value(),
            NodeKind::Element => {
                let child = self.first_child()?;
                if child.kind() == NodeKind::Text && child.next_sibling().is_none() {
                    child.value()
                } else {
                    None
                }
            }
            NodeKind::Document => None,
        }
    }

    /// Debug rendering as XML.
    ///
    /// The root renders as a complete document wrapped in `<root>`; any other
    /// node renders on its own. This is diagnostic output, not a re-encoding.
    /// Names and text have `&`, `<` and `>` escaped, but names are not
    /// otherwise checked: an empty key renders as `<>`.
    pub fn output_xml(&self) -> String {
        render::output_xml(*self)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.index())
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

/// Iterator over the children of a node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}
