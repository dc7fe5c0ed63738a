//! XPath result values and the conversions between them.

use super::navigator::Navigator;

/// A typed scalar attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Atomic {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Atomic {
    /// XPath `boolean()` conversion.
    pub fn to_boolean(&self) -> bool {
        match self {
            Atomic::Boolean(b) => *b,
            Atomic::Number(n) => number_to_boolean(*n),
            Atomic::String(s) => !s.is_empty(),
        }
    }

    /// XPath `number()` conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Atomic::Boolean(b) => boolean_to_number(*b),
            Atomic::Number(n) => *n,
            Atomic::String(s) => string_to_number(s),
        }
    }

    /// XPath `string()` conversion.
    pub fn to_xpath_string(&self) -> String {
        match self {
            Atomic::Boolean(b) => b.to_string(),
            Atomic::Number(n) => number_to_string(*n),
            Atomic::String(s) => s.clone(),
        }
    }
}

/// The result of evaluating an expression.
#[derive(Debug, Clone)]
pub enum XValue<N> {
    /// Nodes in document order, without duplicates
    NodeSet(Vec<N>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl<N: Navigator> XValue<N> {
    /// Get the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            XValue::NodeSet(_) => "node-set",
            XValue::Boolean(_) => "boolean",
            XValue::Number(_) => "number",
            XValue::String(_) => "string",
        }
    }

    /// XPath `boolean()` conversion.
    pub fn to_boolean(&self) -> bool {
        match self {
            XValue::NodeSet(nodes) => !nodes.is_empty(),
            XValue::Boolean(b) => *b,
            XValue::Number(n) => number_to_boolean(*n),
            XValue::String(s) => !s.is_empty(),
        }
    }

    /// XPath `number()` conversion. A node-set converts through its first node.
    pub fn to_number(&self) -> f64 {
        match self {
            XValue::NodeSet(nodes) => nodes.first().map_or(f64::NAN, node_number),
            XValue::Boolean(b) => boolean_to_number(*b),
            XValue::Number(n) => *n,
            XValue::String(s) => string_to_number(s),
        }
    }

    /// XPath `string()` conversion. A node-set converts through its first node.
    pub fn to_xpath_string(&self) -> String {
        match self {
            XValue::NodeSet(nodes) => nodes.first().map(|n| n.value()).unwrap_or_default(),
            XValue::Boolean(b) => b.to_string(),
            XValue::Number(n) => number_to_string(*n),
            XValue::String(s) => s.clone(),
        }
    }
}

/// The atomic a node contributes to comparisons.
pub(crate) fn node_atomic<N: Navigator>(node: &N) -> Atomic {
    node.typed_value()
        .unwrap_or_else(|| Atomic::String(node.value()))
}

/// Numeric value of a node, preferring its typed value.
pub(crate) fn node_number<N: Navigator>(node: &N) -> f64 {
    node_atomic(node).to_number()
}

fn number_to_boolean(n: f64) -> bool {
    n != 0.0 && !n.is_nan()
}

fn boolean_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Parse a string as an XPath number.
///
/// Accepts optional surrounding whitespace, an optional leading minus and
/// digits with at most one decimal point. Anything else is NaN.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);

    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return f64::NAN,
        }
    }
    if !seen_digit {
        return f64::NAN;
    }

    trimmed.parse().unwrap_or(f64::NAN)
}

/// Format a number the XPath way: integers without a fraction, no exponent.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".into()
        } else {
            "-Infinity".into()
        }
    } else if n == 0.0 {
        // Covers negative zero
        "0".into()
    } else {
        format!("{}", n)
    }
}
