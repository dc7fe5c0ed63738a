//! # cborquery
//!
//! XPath queries over CBOR documents.
//!
//! A CBOR document is decoded once into an ordered node tree: map keys become
//! element names, array items become repeated elements, and scalars become
//! text leaves. The tree can then be queried any number of times with XPath
//! 1.0 expressions.
//!
//! ## Quick Start
//!
//! ```
//! use cborquery::{build, query_all, query_first, Value};
//!
//! let value = Value::mapping([
//!     ("people", Value::sequence([
//!         Value::mapping([("name", Value::from("John Doe")), ("id", Value::from(101))]),
//!         Value::mapping([("name", Value::from("Jane Doe")), ("id", Value::from(102))]),
//!     ])),
//!     ("tags", Value::sequence(["home".into(), "friends".into()])),
//! ]);
//! let tree = build(&value).unwrap();
//!
//! let names = query_all(tree.root(), "//people/name").unwrap();
//! assert_eq!(names.len(), 2);
//! assert_eq!(names[1].inner_text(), "Jane Doe");
//!
//! let id = query_first(tree.root(), "/people[name = 'Jane Doe']/id").unwrap().unwrap();
//! assert_eq!(id.content().map(|s| s.to_string()), Some("102".to_string()));
//! ```
//!
//! ## Tree shape
//!
//! | Input | Tree |
//! |-------|------|
//! | `{"a": 1}` | `<a>1</a>` |
//! | `{"a": [1, 2]}` | `<a>1</a><a>2</a>` (flattened) |
//! | `[1, 2]` at top level | `<element>1</element><element>2</element>` |
//! | `{1: "x", 2.5: "y"}` | `<n1>x</n1><n2.5>y</n2.5>` |
//!
//! Map entries are ordered by their derived names, so document order never
//! depends on encoding order.
//!
//! ## Features
//!
//! - `serde` - Serialize/Deserialize for [`QueryConfig`]
//! - `cli` - The `cborquery` command-line tool

pub mod cache;
pub mod decode;
mod error;
pub mod navigator;
pub mod query;
pub mod tree;
pub mod value;
pub mod xpath;

pub use cache::ExpressionCache;
pub use decode::{decode, parse_reader, parse_slice};
pub use error::{Error, Result};
pub use navigator::CborNavigator;
pub use query::{evaluate, query_all, query_first, Evaluated, QueryConfig, QueryEngine};
pub use tree::{build, node_name, Node, NodeId, NodeKind, Tree};
pub use value::{Scalar, Value};
