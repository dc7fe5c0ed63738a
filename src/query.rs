//! Query entry points.
//!
//! [`QueryEngine`] compiles expression text (through its cache when enabled)
//! and evaluates it with a [`CborNavigator`] positioned on the given node.
//! The free functions use a lazily created process-wide engine with the
//! default configuration.

use core::fmt;
use std::sync::{Arc, OnceLock};

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cache::ExpressionCache;
use crate::error::{Error, Result};
use crate::navigator::CborNavigator;
use crate::tree::Node;
use crate::xpath::{Atomic, XPath, XValue};

/// Configuration for a [`QueryEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueryConfig {
    /// Keep compiled expressions for reuse (default: true)
    pub cache_expressions: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_expressions: true,
        }
    }
}

/// Result of [`QueryEngine::evaluate`]: any XPath value type.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated<'a> {
    /// Matching nodes in document order
    Nodes(Vec<Node<'a>>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl<'a> From<XValue<CborNavigator<'a>>> for Evaluated<'a> {
    fn from(value: XValue<CborNavigator<'a>>) -> Self {
        match value {
            XValue::NodeSet(navs) => Evaluated::Nodes(navs.iter().map(|n| n.current()).collect()),
            XValue::Boolean(b) => Evaluated::Boolean(b),
            XValue::Number(n) => Evaluated::Number(n),
            XValue::String(s) => Evaluated::String(s),
        }
    }
}

/// XPath string conversion; a node list shows its first node's text.
impl fmt::Display for Evaluated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluated::Nodes(nodes) => match nodes.first() {
                Some(node) => f.write_str(&node.inner_text()),
                None => Ok(()),
            },
            Evaluated::Boolean(b) => write!(f, "{}", b),
            Evaluated::Number(n) => f.write_str(&Atomic::Number(*n).to_xpath_string()),
            Evaluated::String(s) => f.write_str(s),
        }
    }
}

/// Compiles and runs queries against node trees.
///
/// # Example
///
/// ```
/// use cborquery::{build, QueryConfig, QueryEngine, Value};
///
/// let value = Value::mapping([
///     ("people", Value::sequence([
///         Value::mapping([("name", Value::from("Ann")), ("age", Value::from(31))]),
///         Value::mapping([("name", Value::from("Bob")), ("age", Value::from(12))]),
///     ])),
/// ]);
/// let tree = build(&value).unwrap();
///
/// let engine = QueryEngine::new(QueryConfig::default());
/// let adults = engine.query_all(tree.root(), "/people[age > 18]/name").unwrap();
/// assert_eq!(adults.len(), 1);
/// assert_eq!(adults[0].inner_text(), "Ann");
/// ```
#[derive(Debug, Default)]
pub struct QueryEngine {
    config: QueryConfig,
    cache: ExpressionCache,
}

impl QueryEngine {
    pub fn new(config: QueryConfig) -> Self {
        QueryEngine {
            config,
            cache: ExpressionCache::new(),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The engine's expression cache. Stays empty when caching is disabled.
    pub fn cache(&self) -> &ExpressionCache {
        &self.cache
    }

    /// Compile `text`, reusing a cached expression when caching is enabled.
    pub fn compile(&self, text: &str) -> Result<Arc<XPath>> {
        let compiled = if self.config.cache_expressions {
            self.cache.get_or_compile(text)
        } else {
            XPath::compile(text).map(Arc::new)
        };
        compiled.map_err(|source| Error::InvalidExpression {
            expression: text.to_string(),
            source,
        })
    }

    /// All nodes matching `text`, evaluated relative to `node`, in document order.
    ///
    /// Fails with [`Error::Evaluation`] when the expression does not produce
    /// a node-set.
    pub fn query_all<'a>(&self, node: Node<'a>, text: &str) -> Result<Vec<Node<'a>>> {
        let xpath = self.compile(text)?;
        let navs = xpath
            .select(CborNavigator::new(node))
            .map_err(|source| Error::Evaluation {
                expression: text.to_string(),
                source,
            })?;
        trace!("query {} matched {} nodes", text, navs.len());
        Ok(navs.iter().map(|n| n.current()).collect())
    }

    /// The first match in document order, if any.
    pub fn query_first<'a>(&self, node: Node<'a>, text: &str) -> Result<Option<Node<'a>>> {
        let xpath = self.compile(text)?;
        let navs = xpath
            .select(CborNavigator::new(node))
            .map_err(|source| Error::Evaluation {
                expression: text.to_string(),
                source,
            })?;
        Ok(navs.first().map(|n| n.current()))
    }

    /// Evaluate an expression of any result type relative to `node`.
    pub fn evaluate<'a>(&self, node: Node<'a>, text: &str) -> Result<Evaluated<'a>> {
        let xpath = self.compile(text)?;
        let value = xpath
            .evaluate(CborNavigator::new(node))
            .map_err(|source| Error::Evaluation {
                expression: text.to_string(),
                source,
            })?;
        Ok(value.into())
    }
}

fn default_engine() -> &'static QueryEngine {
    static ENGINE: OnceLock<QueryEngine> = OnceLock::new();
    ENGINE.get_or_init(QueryEngine::default)
}

/// [`QueryEngine::query_all`] on the default engine.
pub fn query_all<'a>(node: Node<'a>, text: &str) -> Result<Vec<Node<'a>>> {
    default_engine().query_all(node, text)
}

/// [`QueryEngine::query_first`] on the default engine.
pub fn query_first<'a>(node: Node<'a>, text: &str) -> Result<Option<Node<'a>>> {
    default_engine().query_first(node, text)
}

/// [`QueryEngine::evaluate`] on the default engine.
pub fn evaluate<'a>(node: Node<'a>, text: &str) -> Result<Evaluated<'a>> {
    default_engine().evaluate(node, text)
}
