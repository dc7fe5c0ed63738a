//! CBOR input.
//!
//! Bytes are decoded with `ciborium` into its dynamic value, then converted
//! into the closed [`Value`] variant the tree builder consumes. Semantic tags
//! are unwrapped to their content.

use std::io::{ErrorKind, Read};

use ciborium::value::Value as CborValue;

use crate::error::{Error, Result};
use crate::tree::{build, Tree};
use crate::value::{Scalar, Value};

impl TryFrom<CborValue> for Value {
    type Error = Error;

    fn try_from(value: CborValue) -> Result<Self> {
        Ok(match value {
            CborValue::Null => Value::Scalar(Scalar::Null),
            CborValue::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            CborValue::Integer(i) => Value::Scalar(Scalar::Integer(i128::from(i))),
            CborValue::Float(f) => Value::Scalar(Scalar::Float(f)),
            CborValue::Text(s) => Value::Scalar(Scalar::Text(s)),
            CborValue::Bytes(b) => Value::Scalar(Scalar::Bytes(b)),
            CborValue::Tag(_, inner) => Value::try_from(*inner)?,
            CborValue::Array(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_>>()?,
            ),
            CborValue::Map(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((Value::try_from(k)?, Value::try_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
            #[allow(unreachable_patterns)]
            other => return Err(Error::Decode(format!("unsupported CBOR item: {:?}", other))),
        })
    }
}

/// Decode a single CBOR item into a [`Value`].
///
/// The input must hold exactly one item: truncated input and bytes left over
/// after the item are both [`Error::Decode`].
pub fn decode<R: Read>(mut reader: R) -> Result<Value> {
    let cbor: CborValue = ciborium::de::from_reader(&mut reader).map_err(|err| match err {
        ciborium::de::Error::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
            Error::Decode("unexpected end of input".to_string())
        }
        ciborium::de::Error::Io(io) => Error::Io(io),
        other => Error::Decode(other.to_string()),
    })?;
    ensure_exhausted(&mut reader)?;
    Value::try_from(cbor)
}

fn ensure_exhausted<R: Read>(reader: &mut R) -> Result<()> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(()),
            Ok(_) => return Err(Error::Decode("trailing data after CBOR item".to_string())),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Io(err)),
        }
    }
}

/// Decode CBOR bytes and build the node tree.
///
/// # Example
///
/// ```
/// // {"name": "Alice"}
/// let bytes = [0xa1, 0x64, b'n', b'a', b'm', b'e', 0x65, b'A', b'l', b'i', b'c', b'e'];
/// let tree = cborquery::parse_slice(&bytes).unwrap();
/// let name = cborquery::query_first(tree.root(), "/name").unwrap().unwrap();
/// assert_eq!(name.inner_text(), "Alice");
/// ```
pub fn parse_slice(bytes: &[u8]) -> Result<Tree> {
    parse_reader(bytes)
}

/// Read a CBOR document from `reader` and build the node tree.
pub fn parse_reader<R: Read>(reader: R) -> Result<Tree> {
    let value = decode(reader)?;
    build(&value)
}
