//! Prelude module - common imports for sheetcalc users
//!
//! ```rust
//! use sheetcalc::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationOptions,
    Cell,
    CellUpdate,
    CellUpdateError,
    // Cell types
    CellValue,
    DependentErrorPolicy,
    // Error types
    Error,
    ErrorKind,
    FormulaError,
    // Main types
    Grid,
    // Extension traits
    GridCalculationExt,
    GridDimensions,
    Result,
};
