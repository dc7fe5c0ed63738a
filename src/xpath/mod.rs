//! XPath 1.0 path expressions over any navigable node tree.
//!
//! This module is document-agnostic: it parses an expression into an AST and
//! evaluates it against any cursor implementing [`Navigator`]. The CBOR tree
//! adapter lives in [`crate::navigator`].
//!
//! # Supported Syntax
//!
//! | Expression | Meaning |
//! |------------|---------|
//! | `/a/b` | Absolute child path |
//! | `a/b` | Path relative to the context node |
//! | `//b` | `b` anywhere below the root |
//! | `.`, `..` | Self, parent |
//! | `*` | Any element |
//! | `text()`, `node()` | Text nodes, any node |
//! | `axis::test` | Explicit axis (`ancestor`, `following-sibling`, ...) |
//! | `a[2]`, `a[last()]` | Positional predicate |
//! | `a[b > 18]` | Boolean predicate |
//! | `(//a)[1]` | Filter expression |
//! | `a \| b` | Union |
//! | `and`, `or`, `=`, `!=`, `<`, `<=`, `>`, `>=` | Logic and comparison |
//! | `+`, `-`, `*`, `div`, `mod` | Arithmetic |
//! | `count(x)`, `contains(a, b)`, ... | Core function library |
//!
//! # Example
//!
//! ```
//! use cborquery::xpath::XPath;
//! use cborquery::{build, CborNavigator, Value};
//!
//! let value = Value::mapping([("name", Value::from("Alice"))]);
//! let tree = build(&value).unwrap();
//!
//! let xpath = XPath::compile("/name").unwrap();
//! let nodes = xpath.select(CborNavigator::new(tree.root())).unwrap();
//! assert_eq!(nodes.len(), 1);
//! assert_eq!(nodes[0].current().inner_text(), "Alice");
//! ```

mod eval;
mod expr;
mod navigator;
mod parser;
mod value;

pub use eval::EvalError;
pub use expr::{Axis, CompareOp, Expr, Function, Literal, LocationPath, NodeTest, NumericOp, Step};
pub use navigator::{Navigator, NodeType};
pub use parser::{parse, ParseError};
pub use value::{Atomic, XValue};

/// A compiled XPath expression.
///
/// Compiling is the expensive part; a compiled expression is immutable and
/// can be shared between threads and evaluated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    source: String,
    expr: Expr,
}

impl XPath {
    /// Parse `source` into a reusable expression.
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        let expr = parse(source)?;
        Ok(XPath {
            source: source.to_string(),
            expr,
        })
    }

    /// The expression text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate with `nav` as the context node.
    pub fn evaluate<N: Navigator>(&self, nav: N) -> Result<XValue<N>, EvalError> {
        eval::evaluate(&self.expr, nav)
    }

    /// Evaluate and require a node-set result, returned in document order.
    pub fn select<N: Navigator>(&self, nav: N) -> Result<Vec<N>, EvalError> {
        match self.evaluate(nav)? {
            XValue::NodeSet(nodes) => Ok(nodes),
            other => Err(EvalError::type_error("node-set", other.type_name())),
        }
    }
}

impl core::fmt::Display for XPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.source)
    }
}
