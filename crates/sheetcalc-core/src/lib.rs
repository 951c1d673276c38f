//! # sheetcalc-core
//!
//! Core data structures for the sheetcalc formula engine.
//!
//! This crate provides the fundamental types used throughout sheetcalc:
//! - [`Cell`] and [`CellValue`] - Cell content, displayed value and dependency edges
//! - [`CellAddress`] and [`CellRange`] - Cell naming and ranges
//! - [`Grid`] and [`GridDimensions`] - The row-major cell collection
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{Cell, CellValue, Grid};
//!
//! let grid = Grid::new();
//! let index = grid.index_of("B2").unwrap();
//! let grid = grid.with_cell(index, Cell::number(42.0)).unwrap();
//!
//! assert_eq!(grid.value("B2").unwrap(), &CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod dimensions;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use cell::{
    cell_name_from_index, get_cells_in_range, index_from_cell_name, Cell, CellAddress, CellRange,
    CellValue,
};
pub use dimensions::GridDimensions;
pub use error::{Error, Result};
pub use grid::Grid;

/// Column letters, preceded by one filler slot so a letter's position is
/// its 1-based column number
pub const COLUMN_ALPHABET: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum number of columns (one letter per column)
pub const MAX_COLS: u16 = (COLUMN_ALPHABET.len() - 1) as u16;

/// Maximum number of rows (rows are written with at most two digits)
pub const MAX_ROWS: u32 = 100;

/// Default number of rows in a new grid
pub const DEFAULT_ROWS: u32 = MAX_ROWS;

/// Default number of columns in a new grid
pub const DEFAULT_COLS: u16 = MAX_COLS;
