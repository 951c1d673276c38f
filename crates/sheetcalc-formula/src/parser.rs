//! Formula parser
//!
//! A recursive descent parser over the token list produced by
//! [`tokenize`](crate::lexer::tokenize).
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := number | cell | '(' expression ')' | function
//! function   := FUNCTION '(' cell ':' cell ')'
//! ```

use crate::ast::{BinaryOperator, CellRef, Node};
use crate::error::{ErrorKind, FormulaError, FormulaResult};
use crate::functions::RangeFunction;
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use crate::MAX_DEPTH;

/// Parse formula text (without the leading `=`) into an AST
///
/// # Example
/// ```rust
/// use sheetcalc_formula::{parse_formula, Node};
///
/// let ast = parse_formula("1+2*3").unwrap();
/// assert!(matches!(ast, Node::BinaryOp { .. }));
/// let ast = parse_formula("SUM(A1:A10)").unwrap();
/// assert!(matches!(ast, Node::Func { .. }));
/// ```
pub fn parse_formula(source: &str) -> FormulaResult<Node> {
    let tokens = tokenize(source)?;
    parse(&tokens)
}

/// Parse a token list into an AST
pub fn parse(tokens: &[Token]) -> FormulaResult<Node> {
    let mut parser = Parser::new(tokens);
    let (tree, _) = parser.parse_expression()?;

    // Make sure we consumed all input
    if let Some(token) = parser.peek() {
        let kind = if token.kind == TokenKind::ParenClose {
            ErrorKind::Parens
        } else {
            ErrorKind::UnexpectedToken
        };
        return Err(FormulaError::new(
            kind,
            format!("expected end of formula, got [{}]", token),
            token.clone(),
        ));
    }

    tracing::trace!(tree = %tree, "parsed formula");
    Ok(tree)
}

/// Subtree together with its depth; a leaf has depth 1
type Parsed = (Node, usize);

/// Formula parser
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Open parentheses around the current position
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    // === Expression parsing with precedence ===

    fn parse_expression(&mut self) -> FormulaResult<Parsed> {
        let (mut left, mut depth) = self.parse_term()?;

        while let Some(op) = self.peek_operator(&[BinaryOperator::Add, BinaryOperator::Subtract]) {
            let token = self.next_token("operator")?;
            let (right, right_depth) = self.parse_term()?;
            depth = deeper(depth.max(right_depth), token)?;
            left = binary(op, left, right);
        }

        Ok((left, depth))
    }

    fn parse_term(&mut self) -> FormulaResult<Parsed> {
        let (mut left, mut depth) = self.parse_factor()?;

        while let Some(op) =
            self.peek_operator(&[BinaryOperator::Multiply, BinaryOperator::Divide])
        {
            let token = self.next_token("operator")?;
            let (right, right_depth) = self.parse_factor()?;
            depth = deeper(depth.max(right_depth), token)?;
            left = binary(op, left, right);
        }

        Ok((left, depth))
    }

    fn parse_factor(&mut self) -> FormulaResult<Parsed> {
        let token = self.next_token("number, cell, function or '('")?;

        match token.kind {
            TokenKind::Number => Ok((
                Node::Number {
                    value: token.value.clone(),
                    span: token.span,
                },
                1,
            )),
            TokenKind::Cell => Ok((
                Node::Cell(CellRef::new(token.value.as_str(), token.span)),
                1,
            )),
            TokenKind::ParenOpen => {
                self.nesting += 1;
                if self.nesting > MAX_DEPTH {
                    return Err(too_deep(token));
                }
                let inner = self.parse_expression()?;
                self.expect(TokenKind::ParenClose, ErrorKind::Parens, "')'")?;
                self.nesting -= 1;
                Ok(inner)
            }
            TokenKind::Function => Ok((self.parse_function(token)?, 1)),
            _ => Err(unexpected(
                ErrorKind::UnexpectedToken,
                "number, cell, function or '('",
                token,
            )),
        }
    }

    fn parse_function(&mut self, name: &Token) -> FormulaResult<Node> {
        let function = RangeFunction::from_name(&name.value).ok_or_else(|| {
            FormulaError::new(
                ErrorKind::UnknownFunction,
                format!("expected [range function], got [{}]", name),
                name.clone(),
            )
        })?;

        self.expect(TokenKind::ParenOpen, ErrorKind::UnexpectedToken, "'('")?;

        let from = self.expect(TokenKind::Cell, ErrorKind::UnexpectedToken, "range")?;
        let colon = self.next_token("range")?;
        if !colon.is_operator(":") {
            return Err(unexpected(ErrorKind::UnexpectedToken, "range", colon));
        }
        let to = self.expect(TokenKind::Cell, ErrorKind::UnexpectedToken, "range")?;

        let close = self.expect(TokenKind::ParenClose, ErrorKind::Parens, "')'")?;

        Ok(Node::Func {
            function,
            name: name.value.clone(),
            span: name.span.union(close.span),
            from: CellRef::new(from.value.as_str(), from.span),
            to: CellRef::new(to.value.as_str(), to.span),
        })
    }

    // === Helper methods ===

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_operator(&self, accepted: &[BinaryOperator]) -> Option<BinaryOperator> {
        let token = self.peek()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        BinaryOperator::from_symbol(&token.value).filter(|op| accepted.contains(op))
    }

    /// Consume the next token; running out is `UNEXPECTED_TOKEN`
    fn next_token(&mut self, expected: &str) -> FormulaResult<&'a Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token)
            }
            None => {
                let end = Token::end_of_input(self.tokens.last().map_or(0, |t| t.span.end));
                Err(unexpected(ErrorKind::UnexpectedToken, expected, &end))
            }
        }
    }

    /// Consume a token of `kind`, failing with `on_mismatch` otherwise
    fn expect(
        &mut self,
        kind: TokenKind,
        on_mismatch: ErrorKind,
        expected: &str,
    ) -> FormulaResult<&'a Token> {
        let token = self.next_token(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(on_mismatch, expected, token))
        }
    }
}

fn binary(op: BinaryOperator, left: Node, right: Node) -> Node {
    Node::BinaryOp {
        op,
        span: left.span().union(right.span()),
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Depth of a new operator node over a child of depth `depth`
fn deeper(depth: usize, at: &Token) -> FormulaResult<usize> {
    let depth = depth + 1;
    if depth > MAX_DEPTH {
        Err(too_deep(at))
    } else {
        Ok(depth)
    }
}

fn too_deep(at: &Token) -> FormulaError {
    FormulaError::new(
        ErrorKind::NestingTooDeep,
        format!("formula nests deeper than {} levels at [{}]", MAX_DEPTH, at),
        at.clone(),
    )
}

fn unexpected(kind: ErrorKind, expected: &str, got: &Token) -> FormulaError {
    FormulaError::new(
        kind,
        format!("parser expected [{}], got [{}]", expected, got),
        got.clone(),
    )
}
