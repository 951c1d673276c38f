//! Character and token-shape predicates used by the tokenizer
//!
//! ```text
//! operator  ::= '+' | '-' | '*' | '/' | ':'
//! number    ::= [0-9]+ ( ( ',' | '.' ) [0-9]+ )?
//! cell      ::= [a-zA-Z] [0-9] [0-9]?
//! function  ::= 'SUM' | 'MULT'            (case-insensitive)
//! ```

use crate::functions::RangeFunction;
use lazy_regex::regex_is_match;

/// Binary operators plus the range separator
pub const OPERATORS: [char; 5] = ['+', '-', '*', '/', ':'];

pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

pub fn is_paren(c: char) -> bool {
    c == '(' || c == ')'
}

/// Characters a numeric literal is built from
pub fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == ',' || c == '.'
}

pub fn is_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Characters that may legally end a number, cell or function name
pub fn is_delimiter(c: char) -> bool {
    is_operator(c) || is_paren(c) || is_whitespace(c)
}

/// Well-formed numeric literal, `,` or `.` as decimal separator
pub fn is_number(s: &str) -> bool {
    regex_is_match!(r"^[0-9]+([,.][0-9]+)?$", s)
}

/// One letter followed by one or two digits
pub fn is_cell_ref(s: &str) -> bool {
    regex_is_match!(r"^[a-zA-Z][0-9]{1,2}$", s)
}

/// Known function keyword
pub fn is_function(s: &str) -> bool {
    RangeFunction::from_name(s).is_some()
}

/// Letter followed by digits, whatever their count
pub fn looks_like_cell(s: &str) -> bool {
    regex_is_match!(r"^[a-zA-Z][0-9]+", s)
}

/// Starts like a word
pub fn looks_like_word(s: &str) -> bool {
    regex_is_match!(r"^[a-zA-Z]+", s)
}
