//! Decoded document values.
//!
//! [`Value`] is the closed variant the tree builder consumes. It is produced
//! from CBOR by [`crate::decode`] or built directly with the constructors and
//! `From` impls below.

use core::fmt;

use crate::xpath::Atomic;

/// A decoded document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Ordered list of values
    Sequence(Vec<Value>),
    /// Key-value pairs in decode order
    Mapping(Vec<(Value, Value)>),
    /// Leaf value
    Scalar(Scalar),
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// The null scalar.
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Build a mapping from key-value pairs, keeping their order.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a sequence from values.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Sequence(items.into_iter().collect())
    }

    /// Get the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Scalar(s) => s.type_name(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl Scalar {
    /// Get the type name of this scalar.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
            Scalar::Bytes(_) => "bytes",
        }
    }

    /// The typed value this scalar contributes to query comparisons.
    ///
    /// Null has none; byte strings compare as their UTF-8 text.
    pub fn to_atomic(&self) -> Option<Atomic> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(Atomic::Boolean(*b)),
            Scalar::Integer(i) => Some(Atomic::Number(*i as f64)),
            Scalar::Float(f) => Some(Atomic::Number(*f)),
            Scalar::Text(s) => Some(Atomic::String(s.clone())),
            Scalar::Bytes(b) => Some(Atomic::String(String::from_utf8_lossy(b).into_owned())),
        }
    }
}

/// The string rendition used for text node names and string-values.
///
/// Null renders as the empty string.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Text(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Text(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Scalar(Scalar::Integer(i128::from(i)))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);
