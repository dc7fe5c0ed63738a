//! Expression AST for XPath queries.

/// An XPath expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Location path: `/a/b`, `a//b`, `.`
    Path(LocationPath),

    /// Filter expression with an optional trailing path: `(//a)[1]/b`
    Filter {
        primary: Box<Expr>,
        predicates: Vec<Expr>,
        steps: Vec<Step>,
    },

    /// Union of two node-sets: `a | b`
    Union(Box<Expr>, Box<Expr>),

    /// Boolean OR: `a or b`
    Or(Box<Expr>, Box<Expr>),

    /// Boolean AND: `a and b`
    And(Box<Expr>, Box<Expr>),

    /// Comparison: `a = b`, `a < b`, ...
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Arithmetic: `a + b`, `a div b`, ...
    Numeric {
        op: NumericOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary minus: `-a`
    Negate(Box<Expr>),

    /// String or number literal
    Literal(Literal),

    /// Core library function call
    Function(Function),
}

impl Expr {
    /// Build a left-leaning union from a list of operands.
    pub(crate) fn union(mut exprs: Vec<Expr>) -> Expr {
        let first = exprs.remove(0);
        exprs
            .into_iter()
            .fold(first, |acc, e| Expr::Union(Box::new(acc), Box::new(e)))
    }
}

/// A sequence of steps, optionally anchored at the document root.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    pub absolute: bool,
    pub steps: Vec<Step>,
}

/// One location step: `axis::test[predicate]...`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    pub(crate) fn new(axis: Axis, test: NodeTest) -> Self {
        Step {
            axis,
            test,
            predicates: Vec::new(),
        }
    }

    /// The `descendant-or-self::node()` step that `//` abbreviates.
    pub(crate) fn descendant_or_self() -> Self {
        Step::new(Axis::DescendantOrSelf, NodeTest::Node)
    }
}

/// Navigation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    SelfAxis,
    Attribute,
}

impl Axis {
    pub(crate) fn from_name(name: &str) -> Option<Axis> {
        Some(match name {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "following" => Axis::Following,
            "preceding" => Axis::Preceding,
            "self" => Axis::SelfAxis,
            "attribute" => Axis::Attribute,
            _ => return None,
        })
    }

    /// Reverse axes number their positions from the context node outwards.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent
                | Axis::Ancestor
                | Axis::AncestorOrSelf
                | Axis::PrecedingSibling
                | Axis::Preceding
        )
    }
}

/// Node tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Element with the given local name
    Name(String),
    /// `*` - any element
    Wildcard,
    /// `node()` - any node
    Node,
    /// `text()` - text nodes
    Text,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

/// Core function library calls, resolved at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    // Node-set functions
    /// `last()`
    Last,
    /// `position()`
    Position,
    /// `count(node-set)`
    Count(Box<Expr>),
    /// `name(node-set?)`
    Name(Option<Box<Expr>>),
    /// `local-name(node-set?)`
    LocalName(Option<Box<Expr>>),

    // String functions
    /// `string(object?)`
    String(Option<Box<Expr>>),
    /// `concat(string, string, string*)`
    Concat(Vec<Expr>),
    /// `contains(string, string)`
    Contains(Box<Expr>, Box<Expr>),
    /// `starts-with(string, string)`
    StartsWith(Box<Expr>, Box<Expr>),
    /// `ends-with(string, string)`
    EndsWith(Box<Expr>, Box<Expr>),
    /// `substring-before(string, string)`
    SubstringBefore(Box<Expr>, Box<Expr>),
    /// `substring-after(string, string)`
    SubstringAfter(Box<Expr>, Box<Expr>),
    /// `substring(string, number, number?)`
    Substring(Box<Expr>, Box<Expr>, Option<Box<Expr>>),
    /// `string-length(string?)`
    StringLength(Option<Box<Expr>>),
    /// `normalize-space(string?)`
    NormalizeSpace(Option<Box<Expr>>),
    /// `translate(string, string, string)`
    Translate(Box<Expr>, Box<Expr>, Box<Expr>),

    // Boolean functions
    /// `not(boolean)`
    Not(Box<Expr>),
    /// `true()`
    True,
    /// `false()`
    False,
    /// `boolean(object)`
    Boolean(Box<Expr>),

    // Number functions
    /// `number(object?)`
    Number(Option<Box<Expr>>),
    /// `sum(node-set)`
    Sum(Box<Expr>),
    /// `floor(number)`
    Floor(Box<Expr>),
    /// `ceiling(number)`
    Ceiling(Box<Expr>),
    /// `round(number)`
    Round(Box<Expr>),
}
