//! Grid cell with its dependency edges

use super::CellValue;

/// A single grid cell
///
/// `dependencies` lists the cells this cell's formula reads; `dependents`
/// lists the cells whose formulas read this one. Across a grid the two are
/// kept as transposes of each other. Both are ordered and free of
/// duplicates.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Raw user input
    pub content: String,
    /// What is displayed: the literal input or the result of the formula
    pub value: CellValue,
    /// Indices of cells used in this cell's formula
    pub dependencies: Vec<usize>,
    /// Indices of cells that reference this cell
    pub dependents: Vec<usize>,
}

impl Cell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell holding a plain number
    pub fn number(n: f64) -> Self {
        Self {
            content: CellValue::Number(n).to_string(),
            value: CellValue::Number(n),
            ..Self::default()
        }
    }

    /// Check whether the content is a formula
    pub fn is_formula(&self) -> bool {
        self.content.starts_with('=')
    }

    /// Record `index` as a dependent; returns false if it was already present
    pub fn add_dependent(&mut self, index: usize) -> bool {
        if self.dependents.contains(&index) {
            return false;
        }
        self.dependents.push(index);
        true
    }

    /// Drop `index` from the dependents; returns false if it was absent
    pub fn remove_dependent(&mut self, index: usize) -> bool {
        match self.dependents.iter().position(|&i| i == index) {
            Some(pos) => {
                self.dependents.remove(pos);
                true
            }
            None => false,
        }
    }
}
