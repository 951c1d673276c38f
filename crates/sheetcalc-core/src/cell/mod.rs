//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Cell`] - A grid cell with content, value and dependency edges
//! - [`CellValue`] - The value displayed by a cell
//! - [`CellAddress`] - A cell's location (e.g., "A0")
//! - [`CellRange`] - A range of cells (e.g., "A0:F0")

mod address;
mod data;
mod value;

pub use address::{
    cell_name_from_index, get_cells_in_range, index_from_cell_name, CellAddress, CellRange,
};
pub use data::Cell;
pub use value::CellValue;
