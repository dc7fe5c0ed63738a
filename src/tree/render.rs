//! XML debug rendering.

use super::{Node, NodeKind};

const XML_HEADER: &str = r#"<?xml version="1.0"?>"#;

pub(crate) fn output_xml(node: Node<'_>) -> String {
    let mut out = String::new();
    if node.kind() == NodeKind::Document {
        out.push_str(XML_HEADER);
        out.push_str("<root>");
        for child in node.children() {
            write_node(child, &mut out);
        }
        out.push_str("</root>");
    } else {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: Node<'_>, out: &mut String) {
    match node.kind() {
        NodeKind::Text => escape_into(node.name(), out),
        NodeKind::Element => {
            out.push('<');
            escape_into(node.name(), out);
            out.push('>');
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str("</");
            escape_into(node.name(), out);
            out.push('>');
        }
        NodeKind::Document => {
            for child in node.children() {
                write_node(child, out);
            }
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::build;
    use crate::value::Value;

    #[test]
    fn test_document() {
        let value = Value::mapping([
            ("tags", Value::sequence([Value::from("a"), Value::from("b")])),
            ("id", Value::from(1)),
        ]);
        let tree = build(&value).unwrap();
        assert_eq!(
            tree.root().output_xml(),
            r#"<?xml version="1.0"?><root><id>1</id><tags>a</tags><tags>b</tags></root>"#
        );
    }

    #[test]
    fn test_single_node() {
        let value = Value::mapping([("p", Value::mapping([("q", Value::from(2.5))]))]);
        let tree = build(&value).unwrap();
        let p = tree.root().first_child().unwrap();
        assert_eq!(p.output_xml(), "<p><q>2.5</q></p>");
        assert_eq!(p.first_child().unwrap().first_child().unwrap().output_xml(), "2.5");
    }

    #[test]
    fn test_escaping() {
        let tree = build(&Value::mapping([("expr", Value::from("a < b && c > d"))])).unwrap();
        assert_eq!(
            tree.root().output_xml(),
            r#"<?xml version="1.0"?><root><expr>a &lt; b &amp;&amp; c &gt; d</expr></root>"#
        );
    }

    #[test]
    fn test_escaped_element_names() {
        let tree = build(&Value::mapping([("a<b&c", Value::from(1))])).unwrap();
        assert_eq!(
            tree.root().first_child().unwrap().output_xml(),
            "<a&lt;b&amp;c>1</a&lt;b&amp;c>"
        );
    }

    #[test]
    fn test_empty_document() {
        let tree = build(&Value::sequence([])).unwrap();
        assert_eq!(tree.root().output_xml(), r#"<?xml version="1.0"?><root></root>"#);
    }
}
