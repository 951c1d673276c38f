//! Grid type

use crate::cell::{cell_name_from_index, index_from_cell_name, Cell, CellValue};
use crate::dimensions::GridDimensions;
use crate::error::{Error, Result};

/// A fixed-size grid of cells stored row-major
///
/// A `Grid` is a plain value: cloning it yields an independent snapshot.
/// Workflows that change cells take `&Grid` and hand back a new one, so the
/// caller decides when a snapshot becomes current.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid with the default dimensions
    pub fn new() -> Self {
        Self::with_dimensions(GridDimensions::default())
    }

    /// Create an empty grid with the given dimensions
    pub fn with_dimensions(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Cell::default(); dimensions.cell_count()],
        }
    }

    /// Wrap an existing cell collection
    pub fn from_cells(dimensions: GridDimensions, cells: Vec<Cell>) -> Result<Self> {
        if cells.len() != dimensions.cell_count() {
            return Err(Error::InvalidDimensions(format!(
                "{} cells do not fill a {}x{} grid",
                cells.len(),
                dimensions.rows,
                dimensions.cols
            )));
        }
        Ok(Self { dimensions, cells })
    }

    /// Get the grid dimensions
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to all cells; the cell count is fixed
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Consume the grid, returning its cells
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Cell Access ===

    /// Get a cell by flat index
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Get a mutable cell by flat index
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// Get a cell by name (e.g., "A0")
    pub fn cell_by_name(&self, name: &str) -> Result<&Cell> {
        let index = self.index_of(name)?;
        self.cells
            .get(index)
            .ok_or(Error::IndexOutOfBounds(index, self.cells.len()))
    }

    /// Get a cell's value by name
    pub fn value(&self, name: &str) -> Result<&CellValue> {
        Ok(&self.cell_by_name(name)?.value)
    }

    /// Flat index of a cell name in this grid
    pub fn index_of(&self, name: &str) -> Result<usize> {
        index_from_cell_name(name, self.dimensions)
    }

    /// Cell name of a flat index in this grid
    pub fn name_of(&self, index: usize) -> Result<String> {
        cell_name_from_index(index, self.dimensions)
    }

    /// Check that an index addresses a cell of this grid
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds(index, self.cells.len()))
        }
    }

    /// Return a copy of this grid with one cell replaced
    pub fn with_cell(&self, index: usize, cell: Cell) -> Result<Self> {
        self.check_index(index)?;
        let mut grid = self.clone();
        grid.cells[index] = cell;
        Ok(grid)
    }

    /// Iterate over cells with any content
    pub fn non_empty_cells(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.content.is_empty() || !cell.value.is_empty())
    }

    /// Iterate over cells holding a formula
    pub fn formula_cells(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_formula())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
