//! Generic cursor trait for tree navigation.
//!
//! The evaluator never touches a concrete document type. Everything it needs
//! goes through this trait, so any tree that can move a cursor between
//! parent, first child and siblings can be queried.

use core::cmp::Ordering;

use super::value::Atomic;

/// The kind of node under a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The document root
    Root,
    /// A named element
    Element,
    /// A text leaf
    Text,
}

/// A stateful, clonable cursor over a node tree.
///
/// Cloning must produce an independent cursor: the evaluator clones before
/// every speculative move and expects the original to stay where it was.
pub trait Navigator: Clone {
    /// The kind of the current node.
    fn node_type(&self) -> NodeType;

    /// Local name of the current node.
    fn local_name(&self) -> &str;

    /// String-value of the current node.
    ///
    /// For elements and the root this is the concatenation of all descendant
    /// text, for text nodes the text itself.
    fn value(&self) -> String;

    /// Typed value of the current node, if it has one.
    ///
    /// Nodes with a typed value compare against numbers and booleans by
    /// value instead of through their string-value.
    fn typed_value(&self) -> Option<Atomic> {
        None
    }

    /// Move to the document root. Always succeeds.
    fn move_to_root(&mut self);

    /// Move to the parent. Returns `false` and stays put at the root.
    fn move_to_parent(&mut self) -> bool;

    /// Move to the first child. Returns `false` and stays put on leaves.
    fn move_to_first_child(&mut self) -> bool;

    /// Move to the next sibling. Returns `false` and stays put on the last one.
    fn move_to_next(&mut self) -> bool;

    /// Move to the previous sibling. Returns `false` and stays put on the first one.
    fn move_to_previous(&mut self) -> bool;

    /// Whether both cursors are on the same node (identity, not equality).
    fn is_same_position(&self, other: &Self) -> bool;

    /// Compare the document positions of two cursors over the same tree.
    ///
    /// The default walks both ancestor chains; implementations with a cheaper
    /// position key should override it.
    fn compare_position(&self, other: &Self) -> Ordering {
        if self.is_same_position(other) {
            return Ordering::Equal;
        }

        let left = ancestors_or_self(self);
        let right = ancestors_or_self(other);

        // Both chains start at the root; find where they diverge.
        let mut depth = 0;
        while depth < left.len()
            && depth < right.len()
            && left[depth].is_same_position(&right[depth])
        {
            depth += 1;
        }

        if depth == left.len() {
            // `self` is an ancestor of `other`
            return Ordering::Less;
        }
        if depth == right.len() {
            return Ordering::Greater;
        }

        let mut sibling = left[depth].clone();
        while sibling.move_to_next() {
            if sibling.is_same_position(&right[depth]) {
                return Ordering::Less;
            }
        }
        Ordering::Greater
    }
}

/// Ancestor-or-self chain, root first.
fn ancestors_or_self<N: Navigator>(nav: &N) -> Vec<N> {
    let mut chain = vec![nav.clone()];
    let mut cursor = nav.clone();
    while cursor.move_to_parent() {
        chain.push(cursor.clone());
    }
    chain.reverse();
    chain
}
