//! Cell address and range types

use crate::dimensions::GridDimensions;
use crate::error::{Error, Result};
use crate::{COLUMN_ALPHABET, MAX_COLS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A0", "b12")
///
/// Names are one column letter followed by one or two row digits. Rows are
/// 0-based *as written*: `A0` is the first cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., Z=25)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from its name
    ///
    /// # Examples
    /// ```
    /// use sheetcalc_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 1);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("b07").unwrap();
    /// assert_eq!(addr.row, 7);
    /// assert_eq!(addr.col, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();

        let letter = chars
            .next()
            .ok_or_else(|| Error::InvalidAddress("empty address".into()))?;
        let col = Self::letter_to_column(letter)?;

        let row_str = chars.as_str();
        if row_str.is_empty() || row_str.len() > 2 {
            return Err(Error::InvalidAddress(format!(
                "expected one or two row digits in '{}'",
                s
            )));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        Ok(Self { row, col })
    }

    /// Convert a column letter to its index (A = 0, Z = 25), case-insensitive
    ///
    /// The position is looked up in [`COLUMN_ALPHABET`], whose first slot is
    /// a filler, so the index is one less than the alphabet position.
    pub fn letter_to_column(letter: char) -> Result<u16> {
        let upper = letter.to_ascii_uppercase();
        match COLUMN_ALPHABET.find(upper) {
            Some(pos) if pos > 0 => Ok((pos - 1) as u16),
            _ => Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                letter
            ))),
        }
    }

    /// Convert a column index to its letter (0 = A, 25 = Z)
    pub fn column_to_letter(col: u16) -> Result<char> {
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        COLUMN_ALPHABET
            .chars()
            .nth(col as usize + 1)
            .ok_or(Error::ColumnOutOfBounds(col, MAX_COLS - 1))
    }

    /// Format as a cell name (`A0`, `C12`)
    pub fn to_a1_string(&self) -> String {
        match Self::column_to_letter(self.col) {
            Ok(letter) => format!("{}{}", letter, self.row),
            Err(_) => format!("?{}", self.row),
        }
    }

    /// Flat row-major index of this address within a grid
    pub fn to_index(&self, dims: GridDimensions) -> Result<usize> {
        if self.row >= dims.rows {
            return Err(Error::RowOutOfBounds(self.row, dims.rows.saturating_sub(1)));
        }
        if self.col >= dims.cols {
            return Err(Error::ColumnOutOfBounds(self.col, dims.cols.saturating_sub(1)));
        }
        Ok(self.row as usize * dims.cols as usize + self.col as usize)
    }

    /// Address of a flat row-major index within a grid
    pub fn from_index(index: usize, dims: GridDimensions) -> Result<Self> {
        if index >= dims.cell_count() {
            return Err(Error::IndexOutOfBounds(index, dims.cell_count()));
        }
        let cols = dims.cols as usize;
        Ok(Self {
            row: (index / cols) as u32,
            col: (index % cols) as u16,
        })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Resolve a cell name to its flat index
///
/// ```
/// use sheetcalc_core::{index_from_cell_name, GridDimensions};
///
/// let dims = GridDimensions::default();
/// assert_eq!(index_from_cell_name("A1", dims).unwrap(), 26);
/// assert_eq!(index_from_cell_name("B0", dims).unwrap(), 1);
/// ```
pub fn index_from_cell_name(name: &str, dims: GridDimensions) -> Result<usize> {
    CellAddress::parse(name)?.to_index(dims)
}

/// Name of the cell at a flat index
pub fn cell_name_from_index(index: usize, dims: GridDimensions) -> Result<String> {
    Ok(CellAddress::from_index(index, dims)?.to_a1_string())
}

/// All flat indices inside the rectangle spanned by two flat indices
///
/// Indices come back row by row. The endpoints may be given in any order;
/// when they sit on different rows the range wraps into the following rows
/// over the same columns.
pub fn get_cells_in_range(from: usize, to: usize, cols: usize) -> Vec<usize> {
    if cols == 0 {
        return Vec::new();
    }

    let (from_row, from_col) = (from / cols, from % cols);
    let (to_row, to_col) = (to / cols, to % cols);

    let (top, bottom) = (from_row.min(to_row), from_row.max(to_row));
    let (left, right) = (from_col.min(to_col), from_col.max(to_col));

    (top..=bottom)
        .flat_map(|row| (left..=right).map(move |col| row * cols + col))
        .collect()
}

/// A rectangular range of cells (e.g., "A0:F0")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        // Normalize so start is top-left and end is bottom-right
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Flat indices of every cell in the range, bounds-checked against the grid
    pub fn indices(&self, dims: GridDimensions) -> Result<Vec<usize>> {
        let from = self.start.to_index(dims)?;
        let to = self.end.to_index(dims)?;
        Ok(get_cells_in_range(from, to, dims.cols as usize))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_letter_to_column() {
        assert_eq!(CellAddress::letter_to_column('A').unwrap(), 0);
        assert_eq!(CellAddress::letter_to_column('b').unwrap(), 1);
        assert_eq!(CellAddress::letter_to_column('Z').unwrap(), 25);
        assert!(CellAddress::letter_to_column(' ').is_err());
        assert!(CellAddress::letter_to_column('1').is_err());
    }

    #[test]
    fn test_column_to_letter() {
        assert_eq!(CellAddress::column_to_letter(0).unwrap(), 'A');
        assert_eq!(CellAddress::column_to_letter(25).unwrap(), 'Z');
        assert!(CellAddress::column_to_letter(26).is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A0").unwrap();
        assert_eq!(addr, CellAddress::new(0, 0));

        let addr = CellAddress::parse("a01").unwrap();
        assert_eq!(addr, CellAddress::new(1, 0));

        let addr = CellAddress::parse("F99").unwrap();
        assert_eq!(addr, CellAddress::new(99, 5));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A001").is_err());
        assert!(CellAddress::parse("A999").is_err());
        assert!(CellAddress::parse("fA9").is_err());
        assert!(CellAddress::parse("AA1").is_err());
    }

    #[test]
    fn test_cell_name_to_index() {
        let dims = GridDimensions::default();
        assert_eq!(index_from_cell_name("A1", dims).unwrap(), 26);
        assert_eq!(index_from_cell_name("B0", dims).unwrap(), 1);
        assert_eq!(index_from_cell_name("a0", dims).unwrap(), 0);
        assert_eq!(index_from_cell_name("Z99", dims).unwrap(), 2599);
    }

    #[test]
    fn test_cell_name_out_of_bounds() {
        let dims = GridDimensions::new(5, 3).unwrap();
        assert_eq!(
            index_from_cell_name("D0", dims),
            Err(Error::ColumnOutOfBounds(3, 2))
        );
        assert_eq!(
            index_from_cell_name("A5", dims),
            Err(Error::RowOutOfBounds(5, 4))
        );
        assert!(cell_name_from_index(15, dims).is_err());
    }

    #[test]
    fn test_get_cells_in_range() {
        let cols = COLUMN_ALPHABET.len() - 1;

        assert_eq!(
            get_cells_in_range(0, 10, cols),
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
        );
        assert_eq!(get_cells_in_range(0, 0, cols), vec![0]);
        assert_eq!(get_cells_in_range(1, 28, cols), vec![1, 2, 27, 28]);
        // Reversed endpoints cover the same cells
        assert_eq!(get_cells_in_range(28, 1, cols), vec![1, 2, 27, 28]);
    }

    #[test]
    fn test_cell_range_normalizes() {
        let range = CellRange::new(CellAddress::new(1, 1), CellAddress::new(0, 0));
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(1, 1));
        assert_eq!(range.to_string(), "A0:B1");
        assert_eq!(range.indices(GridDimensions::default()).unwrap(), vec![0, 1, 26, 27]);
    }

    #[test]
    fn test_cell_range_indices_bounds() {
        let dims = GridDimensions::new(3, 3).unwrap();
        let range = CellRange::new("A0".parse().unwrap(), "B2".parse().unwrap());
        assert_eq!(range.indices(dims).unwrap(), vec![0, 1, 3, 4, 6, 7]);

        let range = CellRange::new(CellAddress::new(0, 0), CellAddress::new(3, 0));
        assert_eq!(range.indices(dims), Err(Error::RowOutOfBounds(3, 2)));
    }

    proptest! {
        #[test]
        fn name_index_roundtrip(rows in 1u32..=100, cols in 1u16..=26, seed in any::<usize>()) {
            let dims = GridDimensions::new(rows, cols).unwrap();
            let index = seed % dims.cell_count();
            let name = cell_name_from_index(index, dims).unwrap();
            prop_assert_eq!(index_from_cell_name(&name, dims).unwrap(), index);
        }
    }
}
