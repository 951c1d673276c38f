//! # sheetcalc
//!
//! A small spreadsheet engine.
//!
//! Cells hold either a literal (number or text) or a formula starting with
//! `=`. Formulas support `+ - * /`, parentheses, cell references such as
//! `B7`, and the range functions `SUM` and `MULT` over `CELL:CELL` ranges.
//! Every edit returns a new [`Grid`] with the edited cell's dependents
//! recomputed.
//!
//! ## Features
//!
//! - Tokenizer and recursive descent parser with source spans on every node
//! - Interpreter that reports the cells each result was read from
//! - Dependency tracking stored on the cells themselves
//! - Circular references rejected at write time
//! - Optional `serde` support for grid snapshots
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc::prelude::*;
//!
//! let mut grid = Grid::new();
//! for (name, content) in [("A0", "10"), ("B0", "20"), ("C0", "30")] {
//!     grid = grid.update_cell_by_name(name, content).unwrap().grid;
//! }
//! let grid = grid.update_cell_by_name("A1", "=SUM(A0:C0)*3").unwrap().grid;
//! assert_eq!(grid.value("A1").unwrap(), &CellValue::Number(180.0));
//! ```

pub mod calculation;
pub mod prelude;

// Re-export calculation types
pub use calculation::{
    safe_eval, CalculationOptions, CellUpdate, CellUpdateError, DependentErrorPolicy, FailedCell,
    GridCalculationExt, RecalcReport,
};

// Re-export core types
pub use sheetcalc_core::{
    cell_name_from_index, get_cells_in_range, index_from_cell_name, Cell, CellAddress, CellRange,
    CellValue, Error, Grid, GridDimensions, Result, DEFAULT_COLS, DEFAULT_ROWS, MAX_COLS,
    MAX_ROWS,
};

// Re-export formula types
pub use sheetcalc_formula::{
    diff_dependencies, interpret, parse, parse_formula, recalc_order, reconcile_dependencies,
    reconcile_in_place, referenced_cells, tokenize, would_create_cycle, BinaryOperator, CellRef,
    DependencyDiff, ErrorKind, Evaluation, EvaluationContext, FormulaError, FormulaResult, Node,
    RangeFunction, Span, Token, TokenKind, MAX_DEPTH,
};
