//! Error types for decoding, tree construction and querying.

use crate::xpath::{EvalError, ParseError};

/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not well-formed CBOR, or holds an item with no value mapping.
    #[error("CBOR decode error: {0}")]
    Decode(String),

    /// A map key cannot be turned into a node name.
    #[error("unsupported map key type: {key_type}")]
    UnsupportedKeyType { key_type: &'static str },

    /// The query text does not compile.
    #[error("invalid expression '{expression}': {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: ParseError,
    },

    /// The query compiled but could not be evaluated as requested.
    #[error("cannot evaluate '{expression}': {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvalError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
