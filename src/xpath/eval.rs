//! Generic expression evaluator for XPath queries.
//!
//! This module is document-agnostic: it works with any cursor implementing
//! the [`Navigator`] trait. Node-sets are kept in document order without
//! duplicates after every step, so positional predicates and the final result
//! never depend on the order in which axes were walked.

use super::expr::{Axis, CompareOp, Expr, Function, Literal, NodeTest, NumericOp, Step};
use super::navigator::{Navigator, NodeType};
use super::value::{node_atomic, node_number, Atomic, XValue};

/// Error that occurs during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }

    pub(crate) fn type_error(expected: &str, got: &str) -> Self {
        EvalError::new(format!("expected {}, got {}", expected, got))
    }
}

impl core::fmt::Display for EvalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// Evaluation context: the context node plus its position in the current node list.
struct Context<N> {
    node: N,
    position: usize,
    size: usize,
}

/// Evaluate an expression with `nav` as the context node.
pub(crate) fn evaluate<N: Navigator>(expr: &Expr, nav: N) -> Result<XValue<N>, EvalError> {
    let ctx = Context {
        node: nav,
        position: 1,
        size: 1,
    };
    eval(expr, &ctx)
}

fn eval<N: Navigator>(expr: &Expr, ctx: &Context<N>) -> Result<XValue<N>, EvalError> {
    match expr {
        Expr::Path(path) => {
            let mut start = ctx.node.clone();
            if path.absolute {
                start.move_to_root();
            }
            apply_steps(vec![start], &path.steps).map(XValue::NodeSet)
        }

        Expr::Filter {
            primary,
            predicates,
            steps,
        } => {
            let nodes = eval_nodes(primary, ctx)?;
            let nodes = apply_predicates(nodes, predicates)?;
            apply_steps(nodes, steps).map(XValue::NodeSet)
        }

        Expr::Union(left, right) => {
            let mut nodes = eval_nodes(left, ctx)?;
            nodes.extend(eval_nodes(right, ctx)?);
            Ok(XValue::NodeSet(document_order(nodes)))
        }

        Expr::Or(left, right) => {
            if eval(left, ctx)?.to_boolean() {
                return Ok(XValue::Boolean(true));
            }
            Ok(XValue::Boolean(eval(right, ctx)?.to_boolean()))
        }

        Expr::And(left, right) => {
            if !eval(left, ctx)?.to_boolean() {
                return Ok(XValue::Boolean(false));
            }
            Ok(XValue::Boolean(eval(right, ctx)?.to_boolean()))
        }

        Expr::Compare { op, left, right } => {
            let left = eval(left, ctx)?;
            let right = eval(right, ctx)?;
            Ok(XValue::Boolean(compare(*op, &left, &right)))
        }

        Expr::Numeric { op, left, right } => {
            let left = eval(left, ctx)?.to_number();
            let right = eval(right, ctx)?.to_number();
            let result = match op {
                NumericOp::Add => left + right,
                NumericOp::Sub => left - right,
                NumericOp::Mul => left * right,
                NumericOp::Div => left / right,
                // Truncating remainder, same as XPath `mod`
                NumericOp::Mod => left % right,
            };
            Ok(XValue::Number(result))
        }

        Expr::Negate(inner) => Ok(XValue::Number(-eval(inner, ctx)?.to_number())),

        Expr::Literal(Literal::Number(n)) => Ok(XValue::Number(*n)),
        Expr::Literal(Literal::String(s)) => Ok(XValue::String(s.clone())),

        Expr::Function(function) => eval_function(function, ctx),
    }
}

/// Evaluate and require a node-set.
fn eval_nodes<N: Navigator>(expr: &Expr, ctx: &Context<N>) -> Result<Vec<N>, EvalError> {
    match eval(expr, ctx)? {
        XValue::NodeSet(nodes) => Ok(nodes),
        other => Err(EvalError::type_error("node-set", other.type_name())),
    }
}

fn eval_string<N: Navigator>(expr: &Expr, ctx: &Context<N>) -> Result<String, EvalError> {
    Ok(eval(expr, ctx)?.to_xpath_string())
}

fn eval_number<N: Navigator>(expr: &Expr, ctx: &Context<N>) -> Result<f64, EvalError> {
    Ok(eval(expr, ctx)?.to_number())
}

/// String argument, defaulting to the context node's string-value.
fn eval_string_or_context<N: Navigator>(
    expr: &Option<Box<Expr>>,
    ctx: &Context<N>,
) -> Result<String, EvalError> {
    match expr {
        Some(expr) => eval_string(expr, ctx),
        None => Ok(ctx.node.value()),
    }
}

/// Sort into document order and drop duplicates.
fn document_order<N: Navigator>(mut nodes: Vec<N>) -> Vec<N> {
    nodes.sort_by(|a, b| a.compare_position(b));
    nodes.dedup_by(|a, b| a.is_same_position(b));
    nodes
}

/// Apply location steps to every node of a node-set.
fn apply_steps<N: Navigator>(mut nodes: Vec<N>, steps: &[Step]) -> Result<Vec<N>, EvalError> {
    for step in steps {
        // One context node yields a duplicate-free axis already in order
        let single = nodes.len() == 1;
        let mut next = Vec::new();
        for node in &nodes {
            let candidates: Vec<N> = axis_nodes(node, step.axis)
                .into_iter()
                .filter(|candidate| matches_test(candidate, &step.test))
                .collect();
            let mut selected = apply_predicates(candidates, &step.predicates)?;
            if step.axis.is_reverse() {
                selected.reverse();
            }
            next.extend(selected);
        }
        nodes = if single { next } else { document_order(next) };
    }
    Ok(nodes)
}

/// Filter a node list by each predicate in turn, renumbering positions after each.
fn apply_predicates<N: Navigator>(
    mut nodes: Vec<N>,
    predicates: &[Expr],
) -> Result<Vec<N>, EvalError> {
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (index, node) in nodes.into_iter().enumerate() {
            let ctx = Context {
                node,
                position: index + 1,
                size,
            };
            let holds = match eval(predicate, &ctx)? {
                // A numeric predicate is shorthand for `position() = n`
                XValue::Number(n) => n == ctx.position as f64,
                other => other.to_boolean(),
            };
            if holds {
                kept.push(ctx.node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}

fn matches_test<N: Navigator>(node: &N, test: &NodeTest) -> bool {
    match test {
        NodeTest::Node => true,
        NodeTest::Text => node.node_type() == NodeType::Text,
        NodeTest::Wildcard => node.node_type() == NodeType::Element,
        NodeTest::Name(name) => node.node_type() == NodeType::Element && node.local_name() == name,
    }
}

/// Nodes along `axis`, in proximity order (reverse document order for reverse axes).
fn axis_nodes<N: Navigator>(node: &N, axis: Axis) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::Child => {
            let mut child = node.clone();
            if child.move_to_first_child() {
                out.push(child.clone());
                while child.move_to_next() {
                    out.push(child.clone());
                }
            }
        }
        Axis::Descendant => push_descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node.clone());
            push_descendants(node, &mut out);
        }
        Axis::Parent => {
            let mut parent = node.clone();
            if parent.move_to_parent() {
                out.push(parent);
            }
        }
        Axis::Ancestor => push_ancestors(node, &mut out),
        Axis::AncestorOrSelf => {
            out.push(node.clone());
            push_ancestors(node, &mut out);
        }
        Axis::FollowingSibling => {
            let mut sibling = node.clone();
            while sibling.move_to_next() {
                out.push(sibling.clone());
            }
        }
        Axis::PrecedingSibling => {
            let mut sibling = node.clone();
            while sibling.move_to_previous() {
                out.push(sibling.clone());
            }
        }
        Axis::Following => {
            let mut cursor = node.clone();
            loop {
                while cursor.move_to_next() {
                    out.push(cursor.clone());
                    push_descendants(&cursor, &mut out);
                }
                if !cursor.move_to_parent() {
                    break;
                }
            }
        }
        Axis::Preceding => {
            // Ancestors are skipped: only the siblings before each of them count
            let mut cursor = node.clone();
            loop {
                while cursor.move_to_previous() {
                    let mut subtree = vec![cursor.clone()];
                    push_descendants(&cursor, &mut subtree);
                    out.extend(subtree.into_iter().rev());
                }
                if !cursor.move_to_parent() {
                    break;
                }
            }
        }
        Axis::SelfAxis => out.push(node.clone()),
        Axis::Attribute => {}
    }
    out
}

/// All descendants of `node` in document order.
fn push_descendants<N: Navigator>(node: &N, out: &mut Vec<N>) {
    let mut child = node.clone();
    if !child.move_to_first_child() {
        return;
    }
    loop {
        out.push(child.clone());
        push_descendants(&child, out);
        if !child.move_to_next() {
            break;
        }
    }
}

/// Ancestors of `node`, nearest first.
fn push_ancestors<N: Navigator>(node: &N, out: &mut Vec<N>) {
    let mut ancestor = node.clone();
    while ancestor.move_to_parent() {
        out.push(ancestor.clone());
    }
}

fn to_atomic<N: Navigator>(value: &XValue<N>) -> Atomic {
    match value {
        XValue::Boolean(b) => Atomic::Boolean(*b),
        XValue::Number(n) => Atomic::Number(*n),
        XValue::String(s) => Atomic::String(s.clone()),
        XValue::NodeSet(_) => Atomic::String(value.to_xpath_string()),
    }
}

/// XPath comparison with existential semantics over node-sets.
fn compare<N: Navigator>(op: CompareOp, left: &XValue<N>, right: &XValue<N>) -> bool {
    match (left, right) {
        (XValue::NodeSet(left), XValue::NodeSet(right)) => left.iter().any(|l| {
            let l = node_atomic(l);
            right.iter().any(|r| compare_atomics(op, &l, &node_atomic(r)))
        }),
        (XValue::NodeSet(nodes), XValue::Boolean(b)) if nodes.is_empty() => {
            compare_atomics(op, &Atomic::Boolean(false), &Atomic::Boolean(*b))
        }
        (XValue::Boolean(b), XValue::NodeSet(nodes)) if nodes.is_empty() => {
            compare_atomics(op, &Atomic::Boolean(*b), &Atomic::Boolean(false))
        }
        (XValue::NodeSet(nodes), other) => {
            let other = to_atomic(other);
            nodes
                .iter()
                .any(|node| compare_atomics(op, &node_atomic(node), &other))
        }
        (other, XValue::NodeSet(nodes)) => {
            let other = to_atomic(other);
            nodes
                .iter()
                .any(|node| compare_atomics(op, &other, &node_atomic(node)))
        }
        _ => compare_atomics(op, &to_atomic(left), &to_atomic(right)),
    }
}

fn compare_atomics(op: CompareOp, left: &Atomic, right: &Atomic) -> bool {
    match op {
        CompareOp::Eq | CompareOp::Ne => {
            let equal = match (left, right) {
                (Atomic::Boolean(_), _) | (_, Atomic::Boolean(_)) => {
                    left.to_boolean() == right.to_boolean()
                }
                (Atomic::Number(_), _) | (_, Atomic::Number(_)) => {
                    left.to_number() == right.to_number()
                }
                _ => left.to_xpath_string() == right.to_xpath_string(),
            };
            (op == CompareOp::Eq) == equal
        }
        CompareOp::Lt => left.to_number() < right.to_number(),
        CompareOp::Le => left.to_number() <= right.to_number(),
        CompareOp::Gt => left.to_number() > right.to_number(),
        CompareOp::Ge => left.to_number() >= right.to_number(),
    }
}

/// XPath `round()`: halves round towards positive infinity.
fn round_half_up(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() {
        n
    } else {
        (n + 0.5).floor()
    }
}

/// Name of the first node of an optional node-set argument, or of the context node.
fn node_name<N: Navigator>(
    arg: &Option<Box<Expr>>,
    ctx: &Context<N>,
) -> Result<String, EvalError> {
    let node = match arg {
        Some(expr) => match eval_nodes(expr, ctx)?.into_iter().next() {
            Some(node) => node,
            None => return Ok(String::new()),
        },
        None => ctx.node.clone(),
    };
    Ok(match node.node_type() {
        NodeType::Element => node.local_name().to_string(),
        NodeType::Root | NodeType::Text => String::new(),
    })
}

fn eval_function<N: Navigator>(
    function: &Function,
    ctx: &Context<N>,
) -> Result<XValue<N>, EvalError> {
    let value = match function {
        Function::Last => XValue::Number(ctx.size as f64),
        Function::Position => XValue::Number(ctx.position as f64),
        Function::Count(arg) => XValue::Number(eval_nodes(arg, ctx)?.len() as f64),
        Function::Name(arg) | Function::LocalName(arg) => XValue::String(node_name(arg, ctx)?),

        Function::String(arg) => XValue::String(eval_string_or_context(arg, ctx)?),
        Function::Concat(args) => {
            let mut result = String::new();
            for arg in args {
                result.push_str(&eval_string(arg, ctx)?);
            }
            XValue::String(result)
        }
        Function::Contains(haystack, needle) => {
            XValue::Boolean(eval_string(haystack, ctx)?.contains(&eval_string(needle, ctx)?))
        }
        Function::StartsWith(s, prefix) => {
            XValue::Boolean(eval_string(s, ctx)?.starts_with(&eval_string(prefix, ctx)?))
        }
        Function::EndsWith(s, suffix) => {
            XValue::Boolean(eval_string(s, ctx)?.ends_with(&eval_string(suffix, ctx)?))
        }
        Function::SubstringBefore(s, sep) => {
            let s = eval_string(s, ctx)?;
            let sep = eval_string(sep, ctx)?;
            XValue::String(
                s.find(&sep)
                    .map(|i| s[..i].to_string())
                    .unwrap_or_default(),
            )
        }
        Function::SubstringAfter(s, sep) => {
            let s = eval_string(s, ctx)?;
            let sep = eval_string(sep, ctx)?;
            XValue::String(
                s.find(&sep)
                    .map(|i| s[i + sep.len()..].to_string())
                    .unwrap_or_default(),
            )
        }
        Function::Substring(s, start, length) => {
            let s = eval_string(s, ctx)?;
            let start = round_half_up(eval_number(start, ctx)?);
            let end = match length {
                Some(length) => start + round_half_up(eval_number(length, ctx)?),
                None => f64::INFINITY,
            };
            // Character positions are 1-based; NaN bounds select nothing
            let result = s
                .chars()
                .enumerate()
                .filter(|(i, _)| {
                    let p = (*i + 1) as f64;
                    p >= start && p < end
                })
                .map(|(_, c)| c)
                .collect();
            XValue::String(result)
        }
        Function::StringLength(arg) => {
            XValue::Number(eval_string_or_context(arg, ctx)?.chars().count() as f64)
        }
        Function::NormalizeSpace(arg) => {
            let s = eval_string_or_context(arg, ctx)?;
            XValue::String(s.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        Function::Translate(s, from, to) => {
            let s = eval_string(s, ctx)?;
            let from: Vec<char> = eval_string(from, ctx)?.chars().collect();
            let to: Vec<char> = eval_string(to, ctx)?.chars().collect();
            let result = s
                .chars()
                .filter_map(|c| match from.iter().position(|&f| f == c) {
                    Some(i) => to.get(i).copied(),
                    None => Some(c),
                })
                .collect();
            XValue::String(result)
        }

        Function::Not(arg) => XValue::Boolean(!eval(arg, ctx)?.to_boolean()),
        Function::True => XValue::Boolean(true),
        Function::False => XValue::Boolean(false),
        Function::Boolean(arg) => XValue::Boolean(eval(arg, ctx)?.to_boolean()),

        Function::Number(arg) => XValue::Number(match arg {
            Some(arg) => eval_number(arg, ctx)?,
            None => node_number(&ctx.node),
        }),
        Function::Sum(arg) => {
            XValue::Number(eval_nodes(arg, ctx)?.iter().map(node_number).sum())
        }
        Function::Floor(arg) => XValue::Number(eval_number(arg, ctx)?.floor()),
        Function::Ceiling(arg) => XValue::Number(eval_number(arg, ctx)?.ceil()),
        Function::Round(arg) => XValue::Number(round_half_up(eval_number(arg, ctx)?)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xpath::parse;

    /// Minimal arena tree for exercising the evaluator without CBOR.
    #[derive(Debug)]
    struct Arena {
        nodes: Vec<TestNode>,
    }

    #[derive(Debug)]
    struct TestNode {
        name: &'static str,
        text: Option<&'static str>,
        parent: Option<usize>,
        children: Vec<usize>,
    }

    impl Arena {
        fn new() -> Self {
            Arena {
                nodes: vec![TestNode {
                    name: "",
                    text: None,
                    parent: None,
                    children: vec![],
                }],
            }
        }

        fn add(&mut self, parent: usize, name: &'static str, text: Option<&'static str>) -> usize {
            let id = self.nodes.len();
            self.nodes.push(TestNode {
                name,
                text,
                parent: Some(parent),
                children: vec![],
            });
            self.nodes[parent].children.push(id);
            id
        }

        fn element(&mut self, parent: usize, name: &'static str, text: &'static str) -> usize {
            let id = self.add(parent, name, None);
            self.add(id, "", Some(text));
            id
        }
    }

    #[derive(Clone, Debug)]
    struct TestNav<'a> {
        arena: &'a Arena,
        id: usize,
    }

    impl TestNav<'_> {
        fn sibling(&self, offset: isize) -> Option<usize> {
            let parent = self.arena.nodes[self.id].parent?;
            let siblings = &self.arena.nodes[parent].children;
            let index = siblings.iter().position(|&c| c == self.id)? as isize + offset;
            siblings.get(usize::try_from(index).ok()?).copied()
        }

        fn name(&self) -> &str {
            self.arena.nodes[self.id].name
        }
    }

    impl Navigator for TestNav<'_> {
        fn node_type(&self) -> NodeType {
            let node = &self.arena.nodes[self.id];
            if node.parent.is_none() {
                NodeType::Root
            } else if node.text.is_some() {
                NodeType::Text
            } else {
                NodeType::Element
            }
        }

        fn local_name(&self) -> &str {
            self.arena.nodes[self.id].name
        }

        fn value(&self) -> String {
            let node = &self.arena.nodes[self.id];
            match node.text {
                Some(text) => text.to_string(),
                None => node
                    .children
                    .iter()
                    .map(|&c| TestNav { arena: self.arena, id: c }.value())
                    .collect(),
            }
        }

        fn move_to_root(&mut self) {
            self.id = 0;
        }

        fn move_to_parent(&mut self) -> bool {
            match self.arena.nodes[self.id].parent {
                Some(parent) => {
                    self.id = parent;
                    true
                }
                None => false,
            }
        }

        fn move_to_first_child(&mut self) -> bool {
            match self.arena.nodes[self.id].children.first() {
                Some(&child) => {
                    self.id = child;
                    true
                }
                None => false,
            }
        }

        fn move_to_next(&mut self) -> bool {
            match self.sibling(1) {
                Some(id) => {
                    self.id = id;
                    true
                }
                None => false,
            }
        }

        fn move_to_previous(&mut self) -> bool {
            match self.sibling(-1) {
                Some(id) => {
                    self.id = id;
                    true
                }
                None => false,
            }
        }

        fn is_same_position(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    /// <root><a><b>1</b><b>2</b><c><b>3</b></c></a><d>x</d></root>
    fn sample() -> Arena {
        let mut arena = Arena::new();
        let a = arena.add(0, "a", None);
        arena.element(a, "b", "1");
        arena.element(a, "b", "2");
        let c = arena.add(a, "c", None);
        arena.element(c, "b", "3");
        arena.element(0, "d", "x");
        arena
    }

    fn select<'a>(arena: &'a Arena, query: &str) -> Vec<TestNav<'a>> {
        let expr = parse(query).unwrap();
        match evaluate(&expr, TestNav { arena, id: 0 }).unwrap() {
            XValue::NodeSet(nodes) => nodes,
            other => panic!("expected node-set, got {}", other.type_name()),
        }
    }

    fn values(nodes: &[TestNav<'_>]) -> Vec<String> {
        nodes.iter().map(|n| n.value()).collect()
    }

    fn scalar(arena: &Arena, query: &str) -> String {
        let expr = parse(query).unwrap();
        evaluate(&expr, TestNav { arena, id: 0 })
            .unwrap()
            .to_xpath_string()
    }

    #[test]
    fn test_child_and_descendant() {
        let arena = sample();
        assert_eq!(values(&select(&arena, "/a/b")), vec!["1", "2"]);
        assert_eq!(values(&select(&arena, "//b")), vec!["1", "2", "3"]);
        assert_eq!(values(&select(&arena, "/a/descendant::b")), vec!["1", "2", "3"]);
        assert_eq!(select(&arena, "/").len(), 1);
    }

    #[test]
    fn test_positional_predicates() {
        let arena = sample();
        // Per-parent position
        assert_eq!(values(&select(&arena, "//b[1]")), vec!["1", "3"]);
        assert_eq!(values(&select(&arena, "//b[last()]")), vec!["2", "3"]);
        // Position over the whole node-set
        assert_eq!(values(&select(&arena, "(//b)[last()]")), vec!["3"]);
        assert_eq!(values(&select(&arena, "(//b)[position() > 1]")), vec!["2", "3"]);
    }

    #[test]
    fn test_reverse_axes_use_proximity_positions() {
        let arena = sample();
        let nodes = select(&arena, "/a/c/preceding-sibling::*[1]");
        assert_eq!(values(&nodes), vec!["2"]);

        let nodes = select(&arena, "//c/b/ancestor::*");
        let names: Vec<&str> = nodes.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a", "c"]); // result is still in document order

        let nodes = select(&arena, "//c/b/ancestor::*[1]");
        assert_eq!(nodes[0].name(), "c");
    }

    #[test]
    fn test_following_and_preceding() {
        let arena = sample();
        let nodes = select(&arena, "/a/b[2]/following::*");
        let names: Vec<&str> = nodes.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["c", "b", "d"]);

        let nodes = select(&arena, "/d/preceding::b");
        assert_eq!(values(&nodes), vec!["1", "2", "3"]);
        // Ancestors are not preceding nodes
        assert!(select(&arena, "//c/b/preceding::c").is_empty());
    }

    #[test]
    fn test_union_is_deduplicated_and_ordered() {
        let arena = sample();
        let nodes = select(&arena, "/d | //b | /a/b[1]");
        assert_eq!(values(&nodes), vec!["1", "2", "3", "x"]);
    }

    #[test]
    fn test_text_and_node_tests() {
        let arena = sample();
        assert_eq!(values(&select(&arena, "//b/text()")), vec!["1", "2", "3"]);
        assert_eq!(select(&arena, "/a/node()").len(), 3);
        assert!(select(&arena, "/a/@id").is_empty());
    }

    #[test]
    fn test_comparisons() {
        let arena = sample();
        assert_eq!(values(&select(&arena, "//b[. > 1]")), vec!["2", "3"]);
        assert_eq!(values(&select(&arena, "/a[b = 2]/c/b")), vec!["3"]);
        assert_eq!(scalar(&arena, "/a/b = '1'"), "true");
        assert_eq!(scalar(&arena, "/a/b != /a/b"), "true"); // existential
        assert_eq!(scalar(&arena, "/missing = false()"), "true");
        assert_eq!(scalar(&arena, "/d < 1"), "false"); // NaN
    }

    #[test]
    fn test_functions() {
        let arena = sample();
        assert_eq!(scalar(&arena, "count(//b)"), "3");
        assert_eq!(scalar(&arena, "sum(//b)"), "6");
        assert_eq!(scalar(&arena, "name(/a/c)"), "c");
        assert_eq!(scalar(&arena, "name(/a/b/text())"), "");
        assert_eq!(scalar(&arena, "string(/a)"), "123");
        assert_eq!(scalar(&arena, "concat('a', 1, true())"), "a1true");
        assert_eq!(scalar(&arena, "substring('12345', 1.5, 2.6)"), "234");
        assert_eq!(scalar(&arena, "substring('12345', 0 div 0, 3)"), "");
        assert_eq!(scalar(&arena, "substring-before('1999/04/01', '/')"), "1999");
        assert_eq!(scalar(&arena, "substring-after('1999/04/01', '/')"), "04/01");
        assert_eq!(scalar(&arena, "normalize-space('  a   b ')"), "a b");
        assert_eq!(scalar(&arena, "translate('--aaa--', 'abc-', 'ABC')"), "AAA");
        assert_eq!(scalar(&arena, "string-length('héllo')"), "5");
        assert_eq!(scalar(&arena, "round(2.5)"), "3");
        assert_eq!(scalar(&arena, "round(-2.5)"), "-2");
        assert_eq!(scalar(&arena, "floor(-1.5) + ceiling(1.2)"), "0");
        assert_eq!(scalar(&arena, "7 mod 3 + 1 div 2"), "1.5");
        assert_eq!(scalar(&arena, "starts-with('abc', 'ab') and ends-with('abc', 'bc')"), "true");
        assert_eq!(scalar(&arena, "not(/missing) or false()"), "true");
    }

    #[test]
    fn test_type_errors() {
        let arena = sample();
        let expr = parse("count('abc')").unwrap();
        let err = evaluate(&expr, TestNav { arena: &arena, id: 0 }).unwrap_err();
        assert_eq!(err.message, "expected node-set, got string");

        let expr = parse("(1)[1]").unwrap();
        assert!(evaluate(&expr, TestNav { arena: &arena, id: 0 }).is_err());
    }

    #[test]
    fn test_default_compare_position() {
        let arena = sample();
        let all = select(&arena, "//node()");
        for (i, left) in all.iter().enumerate() {
            for (j, right) in all.iter().enumerate() {
                assert_eq!(left.compare_position(right), i.cmp(&j));
            }
        }
    }
}
