//! Map key to node name conversion.

use crate::error::{Error, Result};
use crate::value::{Scalar, Value};

/// Derive the element name for a map key.
///
/// | Key | Name |
/// |-----|------|
/// | text | the text itself |
/// | bytes | UTF-8 decoding, lossy |
/// | boolean | `true` / `false` |
/// | integer, float | `n` + decimal form: `n1`, `n-7`, `n3.14`, `n2` for `2.0` |
///
/// Numeric names always start with a letter, so they work as name tests in
/// path expressions. Null, sequence and mapping keys are rejected.
pub fn node_name(key: &Value) -> Result<String> {
    let scalar = match key {
        Value::Scalar(scalar) => scalar,
        other => {
            return Err(Error::UnsupportedKeyType {
                key_type: other.type_name(),
            })
        }
    };

    match scalar {
        Scalar::Text(s) => Ok(s.clone()),
        Scalar::Bytes(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        Scalar::Bool(b) => Ok(b.to_string()),
        Scalar::Integer(i) => Ok(format!("n{}", i)),
        Scalar::Float(f) => Ok(format!("n{}", f)),
        Scalar::Null => Err(Error::UnsupportedKeyType { key_type: "null" }),
    }
}
