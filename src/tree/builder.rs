//! Tree construction from a decoded [`Value`].
//!
//! The builder tracks only a depth counter. Every new node is attached
//! relative to an anchor by comparing depths:
//!
//! - same depth: the node becomes the anchor's next sibling
//! - deeper: the node becomes the anchor's last child
//!
//! Map entries are sorted by derived name, so the resulting document order
//! never depends on decode order. A map value that is a sequence is
//! flattened: its items become same-named siblings under the map's anchor.

use log::debug;

use super::key::node_name;
use super::{NodeData, NodeId, NodeKind, Tree};
use crate::error::Result;
use crate::value::Value;

/// Name given to sequence items that have no enclosing key.
const DEFAULT_ELEMENT_NAME: &str = "element";

/// Build a node tree from a decoded value.
///
/// # Example
///
/// ```
/// use cborquery::{build, Value};
///
/// let value = Value::mapping([
///     ("tags", Value::sequence(["a".into(), "b".into()])),
///     ("id", Value::from(7)),
/// ]);
/// let tree = build(&value).unwrap();
/// let names: Vec<&str> = tree.root().children().map(|n| n.name()).collect();
/// assert_eq!(names, ["id", "tags", "tags"]);
/// ```
pub fn build(value: &Value) -> Result<Tree> {
    let mut builder = Builder::new();
    builder.place(NodeId::ROOT, value, "", 1)?;
    debug!("built tree with {} nodes", builder.nodes.len());
    Ok(Tree::from_nodes(builder.nodes))
}

struct Builder {
    nodes: Vec<NodeData>,
}

impl Builder {
    fn new() -> Self {
        Builder {
            nodes: vec![NodeData::new(NodeKind::Document, String::new(), None, 0)],
        }
    }

    /// Allocate a detached node. Ids are sequential, so allocation order is
    /// document order as long as parents are created before their content.
    fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    fn place(&mut self, anchor: NodeId, value: &Value, name: &str, depth: usize) -> Result<()> {
        match value {
            Value::Sequence(items) => {
                let name = if name.is_empty() {
                    DEFAULT_ELEMENT_NAME
                } else {
                    name
                };
                for item in items {
                    let element = self.create(NodeData::new(
                        NodeKind::Element,
                        name.to_string(),
                        None,
                        depth,
                    ));
                    self.attach(anchor, element);
                    self.place(element, item, "", depth + 1)?;
                }
            }

            Value::Mapping(entries) => {
                let mut named = entries
                    .iter()
                    .map(|(key, value)| Ok((node_name(key)?, value)))
                    .collect::<Result<Vec<_>>>()?;
                // Stable: duplicate names keep decode order
                named.sort_by(|a, b| a.0.cmp(&b.0));

                for (key, value) in named {
                    if let Value::Sequence(_) = value {
                        self.place(anchor, value, &key, depth)?;
                    } else {
                        let element =
                            self.create(NodeData::new(NodeKind::Element, key, None, depth));
                        self.place(element, value, "", depth + 1)?;
                        self.attach(anchor, element);
                    }
                }
            }

            Value::Scalar(scalar) => {
                let text = self.create(NodeData::new(
                    NodeKind::Text,
                    scalar.to_string(),
                    Some(scalar.clone()),
                    depth,
                ));
                self.attach(anchor, text);
            }
        }
        Ok(())
    }

    /// Link `node` relative to `anchor` according to their depths.
    fn attach(&mut self, anchor: NodeId, node: NodeId) {
        let anchor_depth = self.nodes[anchor.0].depth;
        let depth = self.nodes[node.0].depth;

        if depth == anchor_depth {
            debug_assert!(self.nodes[anchor.0].next_sibling.is_none());
            let parent = self.nodes[anchor.0].parent;
            self.nodes[anchor.0].next_sibling = Some(node);
            let data = &mut self.nodes[node.0];
            data.prev_sibling = Some(anchor);
            data.parent = parent;
            if let Some(parent) = parent {
                self.nodes[parent.0].last_child = Some(node);
            }
        } else if depth > anchor_depth {
            debug_assert_eq!(depth, anchor_depth + 1);
            match self.nodes[anchor.0].last_child {
                Some(last) => {
                    self.nodes[last.0].next_sibling = Some(node);
                    self.nodes[node.0].prev_sibling = Some(last);
                }
                None => self.nodes[anchor.0].first_child = Some(node),
            }
            self.nodes[anchor.0].last_child = Some(node);
            self.nodes[node.0].parent = Some(anchor);
        } else {
            debug_assert!(
                false,
                "cannot attach node at depth {} below anchor at depth {}",
                depth, anchor_depth
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::Scalar;

    fn names(tree: &Tree) -> Vec<String> {
        tree.root().children().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn test_top_level_scalar() {
        let tree = build(&Value::from(42)).unwrap();
        assert_eq!(tree.len(), 2);
        let text = tree.root().first_child().unwrap();
        assert_eq!(text.kind(), NodeKind::Text);
        assert_eq!(text.name(), "42");
        assert_eq!(text.value(), Some(&Scalar::Integer(42)));
        assert_eq!(text.depth(), 1);
    }

    #[test]
    fn test_top_level_sequence_uses_default_name() {
        let tree = build(&Value::sequence([Value::from(1), Value::from("x")])).unwrap();
        assert_eq!(names(&tree), vec!["element", "element"]);
        let second = tree.root().last_child().unwrap();
        assert_eq!(second.inner_text(), "x");
    }

    #[test]
    fn test_nested_sequence_items_use_default_name() {
        let value = Value::mapping([(
            "matrix",
            Value::sequence([Value::sequence([Value::from(1), Value::from(2)])]),
        )]);
        let tree = build(&value).unwrap();
        let row = tree.root().first_child().unwrap();
        assert_eq!(row.name(), "matrix");
        let cells: Vec<&str> = row.children().map(|n| n.name()).collect();
        assert_eq!(cells, vec!["element", "element"]);
        assert_eq!(row.children().next().unwrap().depth(), 2);
    }

    #[test]
    fn test_mapping_sorted_by_name() {
        let value = Value::mapping([
            ("zeta", Value::from(1)),
            ("Alpha", Value::from(2)),
            ("alpha", Value::from(3)),
        ]);
        let tree = build(&value).unwrap();
        // Byte-wise: uppercase sorts first
        assert_eq!(names(&tree), vec!["Alpha", "alpha", "zeta"]);
    }

    #[test]
    fn test_duplicate_names_keep_decode_order() {
        let value = Value::mapping([
            (Value::from("1"), Value::from("text")),
            (Value::from("a"), Value::from("x")),
            (Value::Scalar(Scalar::Bytes(b"1".to_vec())), Value::from("bytes")),
        ]);
        let tree = build(&value).unwrap();
        let texts: Vec<String> = tree.root().children().map(|n| n.inner_text()).collect();
        assert_eq!(texts, vec!["text", "bytes", "x"]);
    }

    #[test]
    fn test_sequence_value_is_flattened() {
        let value = Value::mapping([(
            "person",
            Value::mapping([
                ("phones", Value::sequence([Value::from("1"), Value::from("2")])),
                ("name", Value::from("Jo")),
            ]),
        )]);
        let tree = build(&value).unwrap();
        let person = tree.root().first_child().unwrap();
        let children: Vec<&str> = person.children().map(|n| n.name()).collect();
        assert_eq!(children, vec!["name", "phones", "phones"]);
        for child in person.children() {
            assert_eq!(child.parent(), Some(person));
            assert_eq!(child.depth(), person.depth() + 1);
        }
    }

    #[test]
    fn test_empty_sequence_value_adds_nothing() {
        let value = Value::mapping([("a", Value::sequence([])), ("b", Value::from(1))]);
        let tree = build(&value).unwrap();
        assert_eq!(names(&tree), vec!["b"]);
    }

    #[test]
    fn test_null_value_is_empty_text() {
        let tree = build(&Value::mapping([("email", Value::null())])).unwrap();
        let email = tree.root().first_child().unwrap();
        let text = email.first_child().unwrap();
        assert_eq!(text.kind(), NodeKind::Text);
        assert_eq!(text.name(), "");
        assert_eq!(text.value(), Some(&Scalar::Null));
    }

    #[test]
    fn test_unsupported_key_aborts_build() {
        let value = Value::mapping([(
            "outer",
            Value::Mapping(vec![(Value::null(), Value::from(1))]),
        )]);
        let err = build(&value).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKeyType { key_type: "null" }));
    }

    #[test]
    fn test_attach_same_depth_links_sibling() {
        let mut builder = Builder::new();
        let a = builder.create(NodeData::new(NodeKind::Element, "a".into(), None, 1));
        builder.attach(NodeId::ROOT, a);
        let b = builder.create(NodeData::new(NodeKind::Element, "b".into(), None, 1));
        builder.attach(a, b);

        let tree = Tree::from_nodes(builder.nodes);
        let root = tree.root();
        assert_eq!(root.first_child().map(|n| n.name()), Some("a"));
        assert_eq!(root.last_child().map(|n| n.name()), Some("b"));
        let b = root.last_child().unwrap();
        assert_eq!(b.parent(), Some(root));
        assert_eq!(b.prev_sibling().map(|n| n.name()), Some("a"));
    }

    #[test]
    fn test_depth_invariant() {
        let value = Value::mapping([
            ("a", Value::sequence([Value::mapping([("b", Value::sequence([Value::from(1)]))])])),
            ("c", Value::from(true)),
        ]);
        let tree = build(&value).unwrap();
        for node in tree.iter().skip(1) {
            let parent = node.parent().unwrap();
            assert_eq!(node.depth(), parent.depth() + 1);
        }
    }
}
