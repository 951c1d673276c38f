//! # sheetcalc-formula
//!
//! Formula pipeline for sheetcalc.
//!
//! This crate provides:
//! - Tokenizing (text → tokens)
//! - Parsing (tokens → AST)
//! - Interpretation (AST → number plus the cells it read)
//! - Dependency reconciliation and recalculation ordering
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{Cell, GridDimensions};
//! use sheetcalc_formula::{interpret, parse_formula, EvaluationContext};
//!
//! let cells = vec![Cell::number(10.0), Cell::number(20.0)];
//! let ctx = EvaluationContext::new(&cells, GridDimensions::default());
//! let eval = interpret(&parse_formula("SUM(A0:B0)*3").unwrap(), &ctx).unwrap();
//! assert_eq!(eval.result, 90.0);
//! assert_eq!(eval.dependencies, vec![0, 1]);
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod token;

pub use ast::{BinaryOperator, CellRef, Node};
pub use dependency::{
    diff_dependencies, evaluation_order, reconcile_dependencies, reconcile_in_place,
    recalc_order, referenced_cells, would_create_cycle, DependencyDiff, EvaluationOrder,
};
pub use error::{ErrorKind, FormulaError, FormulaResult};
pub use evaluator::{interpret, Evaluation, EvaluationContext};
pub use functions::RangeFunction;
pub use lexer::tokenize;
pub use parser::{parse, parse_formula};
pub use token::{Span, Token, TokenKind};

/// Deepest expression tree the parser builds or the evaluator walks
pub const MAX_DEPTH: usize = 256;
