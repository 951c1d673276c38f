//! Grid dimensions

use crate::error::{Error, Result};
use crate::{DEFAULT_COLS, DEFAULT_ROWS, MAX_COLS, MAX_ROWS};

/// Size of a grid
///
/// Both bounds are limited by what a cell name can express: one column
/// letter and a row of at most two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub cols: u16,
}

impl GridDimensions {
    /// Create validated dimensions
    pub fn new(rows: u32, cols: u16) -> Result<Self> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(Error::InvalidDimensions(format!(
                "rows must be in 1..={}, got {}",
                MAX_ROWS, rows
            )));
        }
        if cols == 0 || cols > MAX_COLS {
            return Err(Error::InvalidDimensions(format!(
                "columns must be in 1..={}, got {}",
                MAX_COLS, cols
            )));
        }
        Ok(Self { rows, cols })
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let dims = GridDimensions::default();
        assert_eq!(dims.rows, 100);
        assert_eq!(dims.cols, 26);
        assert_eq!(dims.cell_count(), 2600);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(GridDimensions::new(0, 5).is_err());
        assert!(GridDimensions::new(5, 0).is_err());
        assert!(GridDimensions::new(101, 5).is_err());
        assert!(GridDimensions::new(5, 27).is_err());
        assert!(GridDimensions::new(100, 26).is_ok());
    }
}
