//! Parser for XPath 1.0 expressions.
//!
//! Recursive descent, one function per precedence level:
//! - `or`
//! - `and`
//! - `=`, `!=`
//! - `<`, `<=`, `>`, `>=`
//! - `+`, `-`
//! - `*`, `div`, `mod`
//! - unary `-`
//! - `|`
//! - location paths and filter expressions
//!
//! Operator names and `*` are disambiguated by position: after a complete
//! operand they are operators, at the start of a step they are name tests.

use super::expr::{
    Axis, CompareOp, Expr, Function, Literal, LocationPath, NodeTest, NumericOp, Step,
};

/// Error that occurs during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Deepest nesting of sub-expressions and unary minus the parser accepts.
const MAX_NESTING: usize = 64;

/// Parser state.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            pos: 0,
            depth: 0,
        }
    }

    /// Run `f` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new("expression nested too deeply", self.pos));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peek at the character after the current one.
    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Peek at the next n bytes.
    fn peek_str(&self, n: usize) -> &str {
        let end = (self.pos + n).min(self.input.len());
        self.input.get(self.pos..end).unwrap_or("")
    }

    /// Consume and return the current character.
    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace.
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Check if we're at the end of input.
    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Consume a specific character or return error.
    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.next();
                Ok(())
            }
            Some(c) => Err(ParseError::new(
                format!("expected '{}', found '{}'", expected, c),
                self.pos,
            )),
            None => Err(ParseError::new(
                format!("expected '{}', found end of input", expected),
                self.pos,
            )),
        }
    }

    /// Check if current position matches an operator name (not followed by a name char).
    fn matches_keyword(&self, keyword: &str) -> bool {
        if !self.input[self.pos..].starts_with(keyword) {
            return false;
        }
        let after = self.pos + keyword.len();
        !matches!(self.input[after..].chars().next(), Some(c) if is_name_char(c))
    }

    /// Consume a keyword.
    fn consume_keyword(&mut self, keyword: &str) {
        self.pos += keyword.len();
    }

    /// Parse an NCName.
    fn parse_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;

        match self.peek() {
            Some(c) if is_name_start(c) => {
                self.next();
            }
            Some(c) => {
                return Err(ParseError::new(
                    format!("expected name, found '{}'", c),
                    self.pos,
                ));
            }
            None => {
                return Err(ParseError::new("expected name, found end of input", self.pos));
            }
        }

        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.next();
            } else {
                break;
            }
        }

        Ok(self.input[start..self.pos].to_string())
    }

    /// Look past a name (and whitespace) without consuming anything.
    fn char_after_name(&mut self) -> Option<char> {
        let start = self.pos;
        let found = match self.parse_name() {
            Ok(_) => {
                self.skip_ws();
                self.peek()
            }
            Err(_) => None,
        };
        self.pos = start;
        found
    }

    /// Parse a number literal: `12`, `1.5`, `.5`
    fn parse_number_literal(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.next();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            self.next();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.next();
                } else {
                    break;
                }
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map_err(|_| ParseError::new("invalid number", start))
    }

    /// Parse a string literal delimited by `"` or `'`. XPath has no escapes.
    fn parse_string_literal(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let quote = match self.next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(ParseError::new("expected string literal", start)),
        };

        let body_start = self.pos;
        loop {
            match self.next() {
                Some(c) if c == quote => break,
                Some(_) => {}
                None => return Err(ParseError::new("unterminated string", start)),
            }
        }

        Ok(self.input[body_start..self.pos - quote.len_utf8()].to_string())
    }

    /// Parse a primary expression: parenthesized, literal or function call.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();

        match self.peek() {
            Some('(') => {
                self.next();
                let inner = self.parse_expr()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some('"' | '\'') => Ok(Expr::Literal(Literal::String(
                self.parse_string_literal()?,
            ))),
            Some(c) if c.is_ascii_digit() || c == '.' => Ok(Expr::Literal(Literal::Number(
                self.parse_number_literal()?,
            ))),
            Some('$') => Err(ParseError::new("variables are not supported", self.pos)),
            Some(c) if is_name_start(c) => self.parse_function_call(),
            Some(c) => Err(ParseError::new(
                format!("unexpected character '{}'", c),
                self.pos,
            )),
            None => Err(ParseError::new(
                "expected expression, found end of input",
                self.pos,
            )),
        }
    }

    /// Parse `name(args...)` and resolve it against the function library.
    fn parse_function_call(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        let name = self.parse_name()?;
        self.expect('(')?;
        self.skip_ws();

        let mut args = Vec::new();
        if self.peek() == Some(')') {
            self.next();
        } else {
            loop {
                args.push(self.parse_expr()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => {
                        self.next();
                    }
                    _ => break,
                }
            }
            self.expect(')')?;
        }

        resolve_function(&name, args, start).map(Expr::Function)
    }

    /// Parse zero or more `[predicate]` suffixes.
    fn parse_predicates(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut predicates = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() != Some('[') {
                break;
            }
            self.next();
            predicates.push(self.parse_expr()?);
            self.expect(']')?;
        }
        Ok(predicates)
    }

    /// Parse a single location step.
    fn parse_step(&mut self) -> Result<Step, ParseError> {
        self.skip_ws();

        if self.peek_str(2) == ".." {
            self.pos += 2;
            return Ok(Step::new(Axis::Parent, NodeTest::Node));
        }
        if self.peek() == Some('.') {
            self.next();
            return Ok(Step::new(Axis::SelfAxis, NodeTest::Node));
        }

        let axis = self.parse_axis()?;
        let test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    /// Parse `@` or `name::`, defaulting to the child axis.
    fn parse_axis(&mut self) -> Result<Axis, ParseError> {
        if self.peek() == Some('@') {
            self.next();
            return Ok(Axis::Attribute);
        }

        let start = self.pos;
        if matches!(self.peek(), Some(c) if is_name_start(c)) {
            let name = self.parse_name()?;
            self.skip_ws();
            if self.peek_str(2) == "::" {
                self.pos += 2;
                return Axis::from_name(&name)
                    .ok_or_else(|| ParseError::new(format!("unknown axis '{}'", name), start));
            }
            self.pos = start;
        }

        Ok(Axis::Child)
    }

    /// Parse a node test: `*`, `name`, `node()`, `text()`.
    fn parse_node_test(&mut self) -> Result<NodeTest, ParseError> {
        self.skip_ws();

        if self.peek() == Some('*') {
            self.next();
            return Ok(NodeTest::Wildcard);
        }

        let start = self.pos;
        let name = self.parse_name()?;

        if self.peek() == Some(':') && self.peek_second() != Some(':') {
            return Err(ParseError::new(
                "namespace prefixes are not supported",
                self.pos,
            ));
        }

        let mut lookahead = Parser {
            input: self.input,
            pos: self.pos,
            depth: self.depth,
        };
        lookahead.skip_ws();
        if lookahead.peek() != Some('(') {
            return Ok(NodeTest::Name(name));
        }

        let test = match name.as_str() {
            "node" => NodeTest::Node,
            "text" => NodeTest::Text,
            "comment" | "processing-instruction" => {
                return Err(ParseError::new(
                    format!("node type '{}()' is not supported", name),
                    start,
                ));
            }
            _ => {
                return Err(ParseError::new(
                    format!("'{}' is not a node type", name),
                    start,
                ));
            }
        };
        self.expect('(')?;
        self.expect(')')?;
        Ok(test)
    }

    /// Parse steps separated by `/` or `//`.
    fn parse_relative_path(&mut self, steps: &mut Vec<Step>) -> Result<(), ParseError> {
        steps.push(self.parse_step()?);
        self.parse_path_tail(steps)
    }

    /// Parse any `/step` or `//step` continuations.
    fn parse_path_tail(&mut self, steps: &mut Vec<Step>) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            if self.peek_str(2) == "//" {
                self.pos += 2;
                steps.push(Step::descendant_or_self());
                steps.push(self.parse_step()?);
            } else if self.peek() == Some('/') {
                self.next();
                steps.push(self.parse_step()?);
            } else {
                return Ok(());
            }
        }
    }

    /// Whether a step can start at the current position.
    fn at_step_start(&self) -> bool {
        matches!(self.peek(), Some(c) if is_name_start(c) || c == '*' || c == '@' || c == '.')
    }

    /// Parse a location path, absolute or relative.
    fn parse_location_path(&mut self) -> Result<Expr, ParseError> {
        let mut steps = Vec::new();
        let absolute;

        if self.peek_str(2) == "//" {
            self.pos += 2;
            absolute = true;
            steps.push(Step::descendant_or_self());
            self.parse_relative_path(&mut steps)?;
        } else if self.peek() == Some('/') {
            self.next();
            absolute = true;
            self.skip_ws();
            // A lone `/` selects the root
            if self.at_step_start() {
                self.parse_relative_path(&mut steps)?;
            }
        } else {
            absolute = false;
            self.parse_relative_path(&mut steps)?;
        }

        Ok(Expr::Path(LocationPath { absolute, steps }))
    }

    /// Parse a filter expression: `primary[pred]...` with an optional path tail.
    fn parse_filter_expr(&mut self) -> Result<Expr, ParseError> {
        let primary = self.parse_primary()?;
        let predicates = self.parse_predicates()?;
        let mut steps = Vec::new();
        self.parse_path_tail(&mut steps)?;

        if predicates.is_empty() && steps.is_empty() {
            return Ok(primary);
        }
        Ok(Expr::Filter {
            primary: Box::new(primary),
            predicates,
            steps,
        })
    }

    /// Parse a path expression, deciding between location path and filter.
    fn parse_path_expr(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();

        match self.peek() {
            Some('/') => self.parse_location_path(),
            Some('(' | '"' | '\'' | '$') => self.parse_filter_expr(),
            Some(c) if c.is_ascii_digit() => self.parse_filter_expr(),
            Some('.') => {
                if matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
                    self.parse_filter_expr()
                } else {
                    self.parse_location_path()
                }
            }
            Some(c) if is_name_start(c) => {
                // `name(` is a function call unless the name is a node type
                let start = self.pos;
                let name = self.parse_name()?;
                self.pos = start;
                let is_call = self.char_after_name() == Some('(')
                    && !matches!(
                        name.as_str(),
                        "node" | "text" | "comment" | "processing-instruction"
                    );
                if is_call {
                    self.parse_filter_expr()
                } else {
                    self.parse_location_path()
                }
            }
            Some('*' | '@') => self.parse_location_path(),
            Some(c) => Err(ParseError::new(
                format!("unexpected character '{}'", c),
                self.pos,
            )),
            None => Err(ParseError::new(
                "expected expression, found end of input",
                self.pos,
            )),
        }
    }

    /// Parse union expressions: `path | path`
    fn parse_union(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_path_expr()?;
        self.skip_ws();

        if self.peek() != Some('|') {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.peek() == Some('|') {
            self.next();
            exprs.push(self.parse_path_expr()?);
            self.skip_ws();
        }

        Ok(Expr::union(exprs))
    }

    /// Parse unary minus: `-expr`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        if self.peek() == Some('-') {
            self.next();
            let inner = self.nested(Self::parse_unary)?;
            return Ok(Expr::Negate(Box::new(inner)));
        }
        self.parse_union()
    }

    /// Parse multiplicative expressions: `*`, `div`, `mod`
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            self.skip_ws();
            let op = if self.peek() == Some('*') {
                self.next();
                NumericOp::Mul
            } else if self.matches_keyword("div") {
                self.consume_keyword("div");
                NumericOp::Div
            } else if self.matches_keyword("mod") {
                self.consume_keyword("mod");
                NumericOp::Mod
            } else {
                break;
            };
            let right = self.parse_unary()?;
            left = Expr::Numeric {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse additive expressions: `+`, `-`
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            self.skip_ws();
            let op = match self.peek() {
                Some('+') => NumericOp::Add,
                Some('-') => NumericOp::Sub,
                _ => break,
            };
            self.next();
            let right = self.parse_multiplicative()?;
            left = Expr::Numeric {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse relational expressions: `<`, `<=`, `>`, `>=`
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            self.skip_ws();
            let rest = &self.input[self.pos..];
            let op = if rest.starts_with("<=") {
                CompareOp::Le
            } else if rest.starts_with(">=") {
                CompareOp::Ge
            } else if rest.starts_with('<') {
                CompareOp::Lt
            } else if rest.starts_with('>') {
                CompareOp::Gt
            } else {
                break;
            };
            match op {
                CompareOp::Le | CompareOp::Ge => self.pos += 2,
                _ => self.pos += 1,
            }
            let right = self.parse_additive()?;
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse equality expressions: `=`, `!=`
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            self.skip_ws();
            let op = if self.peek_str(2) == "!=" {
                self.pos += 2;
                CompareOp::Ne
            } else if self.peek() == Some('=') {
                self.next();
                CompareOp::Eq
            } else {
                break;
            };
            let right = self.parse_relational()?;
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse `and` expressions: `expr and expr`
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        loop {
            self.skip_ws();
            if !self.matches_keyword("and") {
                break;
            }
            self.consume_keyword("and");
            let right = self.parse_equality()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parse `or` expressions: `expr or expr`
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        loop {
            self.skip_ws();
            if !self.matches_keyword("or") {
                break;
            }
            self.consume_keyword("or");
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parse a complete expression. Parentheses, predicates and function
    /// arguments all come back through here.
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_or)
    }
}

/// Check a call's argument count against the function's signature.
fn check_arity(
    name: &str,
    args: &[Expr],
    min: usize,
    max: usize,
    position: usize,
) -> Result<(), ParseError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(ParseError::new(
            format!(
                "function '{}' expects {} argument(s), got {}",
                name,
                expected,
                args.len()
            ),
            position,
        ));
    }
    Ok(())
}

/// Map a function name and its arguments to a library function.
fn resolve_function(name: &str, args: Vec<Expr>, position: usize) -> Result<Function, ParseError> {
    let (min, max) = match name {
        "last" | "position" | "true" | "false" => (0, 0),
        "count" | "not" | "boolean" | "sum" | "floor" | "ceiling" | "round" => (1, 1),
        "name" | "local-name" | "string" | "string-length" | "normalize-space" | "number" => {
            (0, 1)
        }
        "contains" | "starts-with" | "ends-with" | "substring-before" | "substring-after" => {
            (2, 2)
        }
        "substring" => (2, 3),
        "translate" => (3, 3),
        "concat" => (2, usize::MAX),
        _ => {
            return Err(ParseError::new(
                format!("unknown function '{}'", name),
                position,
            ));
        }
    };
    check_arity(name, &args, min, max, position)?;

    if name == "concat" {
        return Ok(Function::Concat(args));
    }

    let mut args = args.into_iter().map(Box::new);
    let mut arg = || args.next().ok_or_else(|| ParseError::new("missing argument", position));

    Ok(match name {
        "last" => Function::Last,
        "position" => Function::Position,
        "true" => Function::True,
        "false" => Function::False,
        "count" => Function::Count(arg()?),
        "not" => Function::Not(arg()?),
        "boolean" => Function::Boolean(arg()?),
        "sum" => Function::Sum(arg()?),
        "floor" => Function::Floor(arg()?),
        "ceiling" => Function::Ceiling(arg()?),
        "round" => Function::Round(arg()?),
        "name" => Function::Name(arg().ok()),
        "local-name" => Function::LocalName(arg().ok()),
        "string" => Function::String(arg().ok()),
        "string-length" => Function::StringLength(arg().ok()),
        "normalize-space" => Function::NormalizeSpace(arg().ok()),
        "number" => Function::Number(arg().ok()),
        "contains" => Function::Contains(arg()?, arg()?),
        "starts-with" => Function::StartsWith(arg()?, arg()?),
        "ends-with" => Function::EndsWith(arg()?, arg()?),
        "substring-before" => Function::SubstringBefore(arg()?, arg()?),
        "substring-after" => Function::SubstringAfter(arg()?, arg()?),
        "substring" => Function::Substring(arg()?, arg()?, arg().ok()),
        "translate" => Function::Translate(arg()?, arg()?, arg()?),
        _ => unreachable!("function names are checked above"),
    })
}

/// Parse an XPath expression string into an AST.
///
/// # Examples
///
/// ```
/// use cborquery::xpath::parse;
///
/// // Absolute path
/// let expr = parse("/people/name").unwrap();
///
/// // Anywhere in the document
/// let expr = parse("//phones[last()]/number").unwrap();
///
/// // Predicates and functions
/// let expr = parse("/people[not(email) and age > 18]").unwrap();
/// ```
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(input);
    let expr = parser.parse_expr()?;

    // Ensure we consumed all input
    parser.skip_ws();
    if let Some(c) = parser.peek() {
        return Err(ParseError::new(
            format!("unexpected character '{}'", c),
            parser.pos,
        ));
    }
    debug_assert!(parser.is_eof());

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(expr: &Expr) -> &[Step] {
        match expr {
            Expr::Path(path) => &path.steps,
            other => panic!("expected a location path, got {:?}", other),
        }
    }

    #[test]
    fn test_absolute_path() {
        let expr = parse("/people/name").unwrap();
        match &expr {
            Expr::Path(path) => assert!(path.absolute),
            _ => panic!("expected path"),
        }
        let steps = steps(&expr);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].axis, Axis::Child);
        assert_eq!(steps[0].test, NodeTest::Name("people".into()));
        assert_eq!(steps[1].test, NodeTest::Name("name".into()));
    }

    #[test]
    fn test_root_only() {
        let expr = parse("/").unwrap();
        assert_eq!(
            expr,
            Expr::Path(LocationPath {
                absolute: true,
                steps: vec![],
            })
        );
    }

    #[test]
    fn test_double_slash() {
        let expr = parse("//name").unwrap();
        let steps = steps(&expr);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], Step::descendant_or_self());
        assert_eq!(steps[1].test, NodeTest::Name("name".into()));

        let expr = parse("a//b").unwrap();
        assert_eq!(steps_len(&expr), 3);
    }

    fn steps_len(expr: &Expr) -> usize {
        steps(expr).len()
    }

    #[test]
    fn test_abbreviated_steps() {
        let expr = parse("../.").unwrap();
        let steps = steps(&expr);
        assert_eq!(steps[0].axis, Axis::Parent);
        assert_eq!(steps[1].axis, Axis::SelfAxis);

        let expr = parse("@id").unwrap();
        assert_eq!(steps_len(&expr), 1);
        assert_eq!(self::steps(&expr)[0].axis, Axis::Attribute);
    }

    #[test]
    fn test_explicit_axes() {
        let expr = parse("/AAA/BBB/ancestor::*").unwrap();
        let steps = steps(&expr);
        assert_eq!(steps[2].axis, Axis::Ancestor);
        assert_eq!(steps[2].test, NodeTest::Wildcard);

        let expr = parse("following-sibling :: node()").unwrap();
        assert_eq!(self::steps(&expr)[0].axis, Axis::FollowingSibling);
        assert_eq!(self::steps(&expr)[0].test, NodeTest::Node);

        assert!(parse("sideways::a").is_err());
    }

    #[test]
    fn test_names_with_dashes_and_dots() {
        let expr = parse("n3.14/first-name").unwrap();
        let steps = steps(&expr);
        assert_eq!(steps[0].test, NodeTest::Name("n3.14".into()));
        assert_eq!(steps[1].test, NodeTest::Name("first-name".into()));
    }

    #[test]
    fn test_predicates() {
        let expr = parse("/people[3]/name").unwrap();
        let steps = steps(&expr);
        assert_eq!(
            steps[0].predicates,
            vec![Expr::Literal(Literal::Number(3.0))]
        );

        let expr = parse("//phones[last()]").unwrap();
        assert_eq!(
            self::steps(&expr)[1].predicates,
            vec![Expr::Function(Function::Last)]
        );
    }

    #[test]
    fn test_function_vs_node_test() {
        let expr = parse("text()").unwrap();
        assert_eq!(steps(&expr)[0].test, NodeTest::Text);

        let expr = parse("count(//a)").unwrap();
        assert!(matches!(expr, Expr::Function(Function::Count(_))));

        let expr = parse("name() = 'people'").unwrap();
        assert!(matches!(expr, Expr::Compare { op: CompareOp::Eq, .. }));
    }

    #[test]
    fn test_star_disambiguation() {
        // Name test at step start, multiplication after an operand
        let expr = parse("* * 2").unwrap();
        match expr {
            Expr::Numeric {
                op: NumericOp::Mul,
                left,
                ..
            } => assert_eq!(steps(&left)[0].test, NodeTest::Wildcard),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_operator_names() {
        let expr = parse("div div mod").unwrap();
        match expr {
            Expr::Numeric {
                op: NumericOp::Div,
                left,
                right,
            } => {
                assert_eq!(steps(&left)[0].test, NodeTest::Name("div".into()));
                assert_eq!(steps(&right)[0].test, NodeTest::Name("mod".into()));
            }
            other => panic!("unexpected {:?}", other),
        }

        // `order` is a name, not `or` followed by `der`
        let expr = parse("a or order").unwrap();
        assert!(matches!(expr, Expr::Or(_, _)));
    }

    #[test]
    fn test_precedence() {
        let expr = parse("1 + 2 * 3 = 7 and true()").unwrap();
        match expr {
            Expr::And(left, _) => match *left {
                Expr::Compare { left, .. } => {
                    assert!(matches!(
                        *left,
                        Expr::Numeric {
                            op: NumericOp::Add,
                            ..
                        }
                    ));
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            parse("'it''s'").unwrap_err().message,
            "unexpected character '''"
        );
        assert_eq!(
            parse("\"it's\"").unwrap(),
            Expr::Literal(Literal::String("it's".into()))
        );
        assert_eq!(parse(".5").unwrap(), Expr::Literal(Literal::Number(0.5)));
        assert_eq!(parse("12").unwrap(), Expr::Literal(Literal::Number(12.0)));
        assert!(matches!(parse("-1").unwrap(), Expr::Negate(_)));
    }

    #[test]
    fn test_union_and_filter() {
        let expr = parse("a | b | c").unwrap();
        match expr {
            Expr::Union(left, _) => assert!(matches!(*left, Expr::Union(_, _))),
            other => panic!("unexpected {:?}", other),
        }

        let expr = parse("(//a)[1]/b").unwrap();
        match expr {
            Expr::Filter {
                predicates, steps, ..
            } => {
                assert_eq!(predicates.len(), 1);
                assert_eq!(steps.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_errors() {
        assert!(parse("").is_err());
        assert!(parse("/a[").is_err()); // unclosed predicate
        assert!(parse("/a]").is_err()); // stray bracket
        assert!(parse("'unterminated").is_err());
        assert!(parse("foo()").is_err()); // unknown function
        assert!(parse("count()").is_err()); // wrong arity
        assert!(parse("concat('a')").is_err());
        assert!(parse("$var").is_err());
        assert!(parse("ns:name").is_err());
        assert!(parse("comment()").is_err());
        assert!(parse("a +").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(32)).is_ok());

        let err = parse(&nested(10_000)).unwrap_err();
        assert_eq!(err.message, "expression nested too deeply");

        assert!(parse(&format!("{}1", "-".repeat(32))).is_ok());
        assert!(parse(&format!("{}1", "-".repeat(10_000))).is_err());
        assert!(parse(&format!("a{}", "[b".repeat(10_000))).is_err());
    }

    #[test]
    fn test_error_position() {
        let err = parse("/people[3").unwrap_err();
        assert_eq!(err.position, 9);
        assert!(err.to_string().starts_with("parse error at position 9"));
    }
}
