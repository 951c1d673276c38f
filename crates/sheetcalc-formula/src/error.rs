//! Formula error types

use crate::token::Token;
use std::fmt;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Tag identifying what went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Character that starts no token
    InvalidChar,
    /// Malformed numeric literal
    InvalidNumber,
    /// Malformed cell reference, or a referenced cell without a usable number
    InvalidCell,
    /// Bare word that is not a known function
    UnknownFunction,
    /// Token that does not fit the grammar at its position
    UnexpectedToken,
    /// Missing or unmatched closing parenthesis
    Parens,
    /// Division by zero
    DivideBy0,
    /// Edit would make a cell depend on itself
    CircularReference,
    /// Parentheses or operator chains nested past [`MAX_DEPTH`](crate::MAX_DEPTH)
    NestingTooDeep,
    /// Anything the typed pipeline did not anticipate
    UnknownError,
}

impl ErrorKind {
    /// Tag as shown to users
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidChar => "INVALID_CHAR",
            ErrorKind::InvalidNumber => "INVALID_NUMBER",
            ErrorKind::InvalidCell => "INVALID_CELL",
            ErrorKind::UnknownFunction => "UNKNOWN_FUNCTION",
            ErrorKind::UnexpectedToken => "UNEXPECTED_TOKEN",
            ErrorKind::Parens => "PARENS",
            ErrorKind::DivideBy0 => "DIVIDE_BY_0",
            ErrorKind::CircularReference => "CIRCULAR_REFERENCE",
            ErrorKind::NestingTooDeep => "NESTING_TOO_DEEP",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error raised by any stage of the formula pipeline
///
/// `token` is the diagnostic context: the offending token for tokenizer and
/// parser failures, or a token rebuilt from the AST node that failed during
/// evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {msg}")]
pub struct FormulaError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Human-readable description
    pub msg: String,
    /// Token the error points at, if any
    pub token: Option<Token>,
}

impl FormulaError {
    /// Create an error pointing at a token
    pub fn new<S: Into<String>>(kind: ErrorKind, msg: S, token: Token) -> Self {
        Self {
            kind,
            msg: msg.into(),
            token: Some(token),
        }
    }

    /// Create an error without positional context
    pub fn without_token<S: Into<String>>(kind: ErrorKind, msg: S) -> Self {
        Self {
            kind,
            msg: msg.into(),
            token: None,
        }
    }

    /// Text of the offending token, if any
    pub fn token_value(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.value.as_str())
    }
}
