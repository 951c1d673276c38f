//! Tokens and source spans

use std::fmt;

/// Half-open byte range into the formula source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty span at a position
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both
    pub fn union(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Token classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Cell,
    /// `+ - * /` and the range separator `:`
    Operator,
    ParenOpen,
    ParenClose,
    Function,
    /// Synthetic marker the parser reports when input runs out
    EndOfInput,
    /// Text that failed classification; only found in error payloads
    Invalid,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Cell => "cell",
            TokenKind::Operator => "operator",
            TokenKind::ParenOpen => "paren-open",
            TokenKind::ParenClose => "paren-close",
            TokenKind::Function => "function",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified, positioned piece of formula text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, value: S, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// End marker positioned at `pos`
    pub fn end_of_input(pos: usize) -> Self {
        Self::new(TokenKind::EndOfInput, "", Span::at(pos))
    }

    /// Check for an operator with the given symbol
    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == symbol
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "<end of input>"),
            _ => write!(f, "{}", self.value),
        }
    }
}
