//! Formula Abstract Syntax Tree types

use crate::functions::RangeFunction;
use crate::token::{Span, Token, TokenKind};
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal, kept as written (`,` or `.` decimal separator)
    Number { value: String, span: Span },
    /// Single cell reference
    Cell(CellRef),
    /// Binary arithmetic operation
    BinaryOp {
        op: BinaryOperator,
        span: Span,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Range function call, e.g. `SUM(A1:B2)`
    Func {
        function: RangeFunction,
        /// Keyword as written
        name: String,
        span: Span,
        from: CellRef,
        to: CellRef,
    },
}

impl Node {
    /// Source span this node was parsed from
    pub fn span(&self) -> Span {
        match self {
            Node::Number { span, .. } => *span,
            Node::Cell(cell) => cell.span,
            Node::BinaryOp { span, .. } => *span,
            Node::Func { span, .. } => *span,
        }
    }

    /// Token carrying this node's text, used as diagnostic context when
    /// evaluation fails
    pub fn to_token(&self) -> Token {
        match self {
            Node::Number { value, span } => Token::new(TokenKind::Number, value.as_str(), *span),
            Node::Cell(cell) => cell.to_token(),
            Node::BinaryOp { op, span, .. } => Token::new(TokenKind::Operator, op.symbol(), *span),
            Node::Func { name, span, .. } => Token::new(TokenKind::Function, name.as_str(), *span),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number { value, .. } => write!(f, "{}", value),
            Node::Cell(cell) => write!(f, "{}", cell.value),
            Node::BinaryOp {
                op, left, right, ..
            } => write!(f, "({} {} {})", left, op, right),
            Node::Func { name, from, to, .. } => {
                write!(f, "{}({}:{})", name, from.value, to.value)
            }
        }
    }
}

/// Cell reference as written in the formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub value: String,
    pub span: Span,
}

impl CellRef {
    pub fn new<S: Into<String>>(value: S, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    pub fn to_token(&self) -> Token {
        Token::new(TokenKind::Cell, self.value.as_str(), self.span)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Operator for a token symbol; `:` is not arithmetic
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
