//! Formula tokenizer
//!
//! Turns formula text (without the leading `=`) into a list of tokens.
//! Fails fast: the first invalid character or run aborts with an error
//! carrying the offending text and its span.
//!
//! ```text
//! "11*(2+3)"  ->  [11] [*] [(] [2] [+] [3] [)]
//! ```

use crate::error::{ErrorKind, FormulaError, FormulaResult};
use crate::matcher::{
    is_alphanumeric, is_cell_ref, is_delimiter, is_function, is_number, is_number_char,
    is_operator, is_whitespace, looks_like_cell, looks_like_word,
};
use crate::token::{Span, Token, TokenKind};

/// Tokenize a formula body
///
/// # Example
/// ```rust
/// use sheetcalc_formula::{tokenize, TokenKind};
///
/// let tokens = tokenize("SUM(A1:A2)*3").unwrap();
/// assert_eq!(tokens.len(), 8);
/// assert_eq!(tokens[0].kind, TokenKind::Function);
/// assert_eq!(tokens[2].value, "A1");
/// ```
pub fn tokenize(source: &str) -> FormulaResult<Vec<Token>> {
    let tokens = Lexer::new(source).run()?;
    tracing::trace!(count = tokens.len(), "tokenized formula");
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn run(mut self) -> FormulaResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek_char() {
            if is_whitespace(c) {
                self.advance();
                continue;
            }
            tokens.push(self.next_token(c)?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self, c: char) -> FormulaResult<Token> {
        let start = self.pos;

        if is_operator(c) {
            self.advance();
            return Ok(self.token(TokenKind::Operator, start));
        }
        if c == '(' {
            self.advance();
            return Ok(self.token(TokenKind::ParenOpen, start));
        }
        if c == ')' {
            self.advance();
            return Ok(self.token(TokenKind::ParenClose, start));
        }
        if is_number_char(c) {
            return self.scan_number(start);
        }
        if is_alphanumeric(c) {
            return self.scan_word(start);
        }

        self.advance();
        Err(self.error(ErrorKind::InvalidChar, "valid char", start))
    }

    fn scan_number(&mut self, start: usize) -> FormulaResult<Token> {
        self.advance_while(is_number_char);

        // "3a", "5$": keep the stray char in the payload
        if self.peek_char().is_some_and(|c| !is_delimiter(c)) {
            self.advance();
            return Err(self.error(ErrorKind::InvalidNumber, "number-symbol [0-9,.]", start));
        }

        // "12,3.", "."
        if !is_number(&self.input[start..self.pos]) {
            return Err(self.error(ErrorKind::InvalidNumber, "correctly formed number", start));
        }

        Ok(self.token(TokenKind::Number, start))
    }

    fn scan_word(&mut self, start: usize) -> FormulaResult<Token> {
        self.advance_while(is_alphanumeric);

        // "A_", "B2$"
        if self.peek_char().is_some_and(|c| !is_delimiter(c)) {
            self.advance();
            return Err(self.error(ErrorKind::InvalidCell, "cell reference", start));
        }

        let text = &self.input[start..self.pos];

        if is_cell_ref(text) {
            return Ok(self.token(TokenKind::Cell, start));
        }
        if is_function(text) {
            return Ok(self.token(TokenKind::Function, start));
        }

        // "A999" vs "foo"
        if looks_like_cell(text) {
            return Err(self.error(ErrorKind::InvalidCell, "valid cell reference", start));
        }
        if looks_like_word(text) {
            return Err(self.error(ErrorKind::UnknownFunction, "valid function reference", start));
        }

        // Every run starting with a letter is caught above.
        Err(self.error(ErrorKind::UnknownError, "valid token", start))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_while(&mut self, pred: fn(char) -> bool) {
        while self.peek_char().is_some_and(pred) {
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.input[start..self.pos], Span::new(start, self.pos))
    }

    fn error(&self, kind: ErrorKind, expected: &str, start: usize) -> FormulaError {
        let token = self.token(TokenKind::Invalid, start);
        FormulaError::new(
            kind,
            format!("tokenizer expected [{}], got [{}]", expected, token.value),
            token,
        )
    }
}
