//! Grid calculation engine
//!
//! Applies cell edits to a [`Grid`], keeping the dependency graph stored on
//! the cells consistent and recomputing every formula that reads the edited
//! cell. Grids are never changed in place: each operation returns a new one.
//!
//! # Example
//!
//! ```rust
//! use sheetcalc::prelude::*;
//!
//! let grid = Grid::new();
//! let grid = grid.update_cell_by_name("A0", "10").unwrap().grid;
//! let grid = grid.update_cell_by_name("A1", "=A0*2").unwrap().grid;
//!
//! // Editing A0 recomputes A1
//! let update = grid.update_cell_by_name("A0", "21").unwrap();
//! assert_eq!(update.grid.value("A1").unwrap(), &CellValue::Number(42.0));
//! assert_eq!(update.recalculated, vec![26]);
//! ```

use crate::{
    interpret, parse_formula, recalc_order, reconcile_in_place, referenced_cells,
    would_create_cycle, CellValue, ErrorKind, Evaluation, EvaluationContext, FormulaError,
    FormulaResult, Grid,
};
use ahash::AHashMap;
use sheetcalc_formula::dependency::{evaluation_order, EvaluationOrder};
use sheetcalc_formula::matcher::is_number;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// What happens to a dependent cell whose formula fails during propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependentErrorPolicy {
    /// Blank the cell's value
    #[default]
    Clear,
    /// Leave the last computed value in place
    KeepPrevious,
}

/// Options for cell updates
#[derive(Debug, Clone)]
pub struct CalculationOptions {
    /// Recompute transitive dependents of the edited cell (default: true)
    pub propagate: bool,
    /// Handling of dependents that fail to evaluate (default: clear)
    pub on_dependent_error: DependentErrorPolicy,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            propagate: true,
            on_dependent_error: DependentErrorPolicy::Clear,
        }
    }
}

/// A formula that failed while recalculating other cells
#[derive(Debug, Clone, PartialEq)]
pub struct FailedCell {
    pub index: usize,
    pub error: FormulaError,
}

/// Outcome of a successful cell update
#[derive(Debug, Clone)]
pub struct CellUpdate {
    /// The grid after the edit and any propagation
    pub grid: Grid,
    /// Dependents that were recomputed, in evaluation order
    pub recalculated: Vec<usize>,
    /// Dependents whose formulas failed
    pub errors: Vec<FailedCell>,
}

/// Outcome of recalculating a whole grid
#[derive(Debug, Clone)]
pub struct RecalcReport {
    pub grid: Grid,
    /// Number of formulas evaluated successfully
    pub calculated: usize,
    pub errors: Vec<FailedCell>,
}

/// Errors rejecting a cell update
///
/// On any of these the caller's grid is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellUpdateError {
    /// The edited cell's formula failed
    #[error("cell #{index}: {source}")]
    Formula {
        index: usize,
        #[source]
        source: FormulaError,
    },

    /// The cell does not exist
    #[error(transparent)]
    Grid(#[from] sheetcalc_core::Error),
}

impl CellUpdateError {
    /// Formula error kind, if this is a formula failure
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CellUpdateError::Formula { source, .. } => Some(source.kind),
            CellUpdateError::Grid(_) => None,
        }
    }

    /// Index of the cell being edited, if known
    pub fn index(&self) -> Option<usize> {
        match self {
            CellUpdateError::Formula { index, .. } => Some(*index),
            CellUpdateError::Grid(_) => None,
        }
    }
}

/// Extension trait for Grid to add calculation methods
pub trait GridCalculationExt {
    /// Set a cell's content with default options
    fn update_cell(&self, index: usize, content: &str) -> Result<CellUpdate, CellUpdateError>;

    /// Set a cell's content with custom options
    fn update_cell_with_options(
        &self,
        index: usize,
        content: &str,
        options: &CalculationOptions,
    ) -> Result<CellUpdate, CellUpdateError>;

    /// Set a cell's content, addressing it by name (e.g. `"B3"`)
    fn update_cell_by_name(&self, name: &str, content: &str) -> Result<CellUpdate, CellUpdateError>;

    /// Re-evaluate every formula in dependency order
    ///
    /// Rebuilds values and dependency lists from cell contents alone, which
    /// makes it suitable for grids assembled without [`update_cell`].
    ///
    /// [`update_cell`]: GridCalculationExt::update_cell
    fn recalculate_all(&self) -> RecalcReport;
}

impl GridCalculationExt for Grid {
    fn update_cell(&self, index: usize, content: &str) -> Result<CellUpdate, CellUpdateError> {
        self.update_cell_with_options(index, content, &CalculationOptions::default())
    }

    fn update_cell_with_options(
        &self,
        index: usize,
        content: &str,
        options: &CalculationOptions,
    ) -> Result<CellUpdate, CellUpdateError> {
        self.check_index(index)?;
        tracing::debug!(index, content, "updating cell");

        let (value, dependencies) = match content.strip_prefix('=') {
            Some(body) => {
                let eval = evaluate_cell(self, index, body)
                    .map_err(|source| CellUpdateError::Formula { index, source })?;
                (CellValue::Number(eval.result), eval.dependencies)
            }
            None => (literal_value(content), Vec::new()),
        };

        let mut grid = self.clone();
        let cells = grid.cells_mut();
        let old = cells[index].dependencies.clone();
        reconcile_in_place(cells, index, &old, &dependencies);
        cells[index].content = content.to_string();
        cells[index].value = value;

        let mut update = CellUpdate {
            grid,
            recalculated: Vec::new(),
            errors: Vec::new(),
        };

        if options.propagate {
            let order = recalc_order(update.grid.cells(), index)
                .map_err(|source| CellUpdateError::Formula { index, source })?;
            for dependent in order {
                if let Err(error) = recalculate_cell(&mut update.grid, dependent, options) {
                    update.errors.push(FailedCell {
                        index: dependent,
                        error,
                    });
                }
                update.recalculated.push(dependent);
            }
        }

        Ok(update)
    }

    fn update_cell_by_name(&self, name: &str, content: &str) -> Result<CellUpdate, CellUpdateError> {
        let index = self.index_of(name)?;
        self.update_cell(index, content)
    }

    fn recalculate_all(&self) -> RecalcReport {
        let dimensions = self.dimensions();
        let mut grid = self.clone();
        let mut errors = Vec::new();
        let mut trees = AHashMap::new();
        let mut precedents = AHashMap::new();

        for (index, cell) in self.formula_cells() {
            let body = cell.content.strip_prefix('=').unwrap_or(&cell.content);
            match guarded(|| parse_formula(body)) {
                Ok(tree) => {
                    precedents.insert(index, referenced_cells(&tree, dimensions));
                    trees.insert(index, tree);
                }
                Err(error) => {
                    fail_cell(&mut grid, index, DependentErrorPolicy::Clear);
                    set_dependencies(&mut grid, index, &[]);
                    errors.push(FailedCell { index, error });
                }
            }
        }

        let EvaluationOrder { order, cyclic } = evaluation_order(&precedents);

        // cut cycles out of the graph so later edits can propagate
        for index in cyclic {
            fail_cell(&mut grid, index, DependentErrorPolicy::Clear);
            set_dependencies(&mut grid, index, &[]);
            errors.push(FailedCell {
                index,
                error: circular_reference(&grid, index),
            });
        }

        let mut calculated = 0;
        for index in order {
            let Some(tree) = trees.get(&index) else {
                continue;
            };
            let result = guarded(|| {
                interpret(tree, &EvaluationContext::new(grid.cells(), dimensions))
            });
            match result {
                Ok(eval) => {
                    store_result(&mut grid, index, eval);
                    calculated += 1;
                }
                Err(error) => {
                    fail_cell(&mut grid, index, DependentErrorPolicy::Clear);
                    if let Some(refs) = precedents.get(&index) {
                        set_dependencies(&mut grid, index, refs);
                    }
                    errors.push(FailedCell { index, error });
                }
            }
        }

        tracing::debug!(calculated, errors = errors.len(), "recalculated grid");
        RecalcReport {
            grid,
            calculated,
            errors,
        }
    }
}

/// Tokenize, parse and interpret a formula body, turning a panic anywhere in
/// the pipeline into `UNKNOWN_ERROR`
pub fn safe_eval(source: &str, ctx: &EvaluationContext) -> FormulaResult<Evaluation> {
    guarded(|| {
        let tree = parse_formula(source)?;
        interpret(&tree, ctx)
    })
}

/// Evaluate the formula for `index`, refusing formulas that would read the
/// cell back through its own dependents
fn evaluate_cell(grid: &Grid, index: usize, body: &str) -> FormulaResult<Evaluation> {
    guarded(|| {
        let tree = parse_formula(body)?;
        let refs = referenced_cells(&tree, grid.dimensions());
        if would_create_cycle(grid.cells(), index, &refs) {
            return Err(circular_reference(grid, index));
        }
        interpret(&tree, &EvaluationContext::new(grid.cells(), grid.dimensions()))
    })
}

/// Recompute one dependent in place
fn recalculate_cell(
    grid: &mut Grid,
    index: usize,
    options: &CalculationOptions,
) -> FormulaResult<()> {
    let Some(body) = grid
        .cell(index)
        .and_then(|cell| cell.content.strip_prefix('='))
        .map(str::to_owned)
    else {
        return Ok(());
    };

    let ctx = EvaluationContext::new(grid.cells(), grid.dimensions());
    match safe_eval(&body, &ctx) {
        Ok(eval) => {
            store_result(grid, index, eval);
            Ok(())
        }
        Err(error) => {
            tracing::warn!(index, error = %error, "dependent formula failed");
            fail_cell(grid, index, options.on_dependent_error);
            Err(error)
        }
    }
}

fn store_result(grid: &mut Grid, index: usize, eval: Evaluation) {
    set_dependencies(grid, index, &eval.dependencies);
    if let Some(cell) = grid.cell_mut(index) {
        cell.value = CellValue::Number(eval.result);
    }
}

fn set_dependencies(grid: &mut Grid, index: usize, dependencies: &[usize]) {
    let cells = grid.cells_mut();
    let old = cells
        .get(index)
        .map(|cell| cell.dependencies.clone())
        .unwrap_or_default();
    reconcile_in_place(cells, index, &old, dependencies);
}

fn fail_cell(grid: &mut Grid, index: usize, policy: DependentErrorPolicy) {
    if let (DependentErrorPolicy::Clear, Some(cell)) = (policy, grid.cell_mut(index)) {
        cell.value = CellValue::Empty;
    }
}

fn circular_reference(grid: &Grid, index: usize) -> FormulaError {
    let name = grid.name_of(index).unwrap_or_else(|_| format!("#{}", index));
    FormulaError::without_token(
        ErrorKind::CircularReference,
        format!("formula in {} would depend on itself", name),
    )
}

/// Value of non-formula content
fn literal_value(content: &str) -> CellValue {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        CellValue::Empty
    } else if is_number(trimmed) {
        trimmed
            .replace(',', ".")
            .parse()
            .map(CellValue::Number)
            .unwrap_or_else(|_| CellValue::text(content))
    } else {
        CellValue::text(content)
    }
}

fn guarded<T, F>(f: F) -> FormulaResult<T>
where
    F: FnOnce() -> FormulaResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::error!(panic = %msg, "formula evaluation panicked");
            Err(FormulaError::without_token(ErrorKind::UnknownError, msg))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "formula evaluation panicked".to_string()
    }
}
