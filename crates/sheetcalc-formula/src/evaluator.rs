//! Formula evaluator
//!
//! Walks a parsed tree against a read-only view of the grid, producing the
//! numeric result together with every cell index the result was read from.

use crate::ast::{BinaryOperator, CellRef, Node};
use crate::error::{ErrorKind, FormulaError, FormulaResult};
use crate::functions::RangeFunction;
use crate::token::Token;
use crate::MAX_DEPTH;
use ahash::AHashSet;
use sheetcalc_core::{index_from_cell_name, Cell, CellAddress, CellRange, CellValue, GridDimensions};

/// Context for formula evaluation
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Cells referenced by index
    pub cells: &'a [Cell],
    /// Dimensions used to resolve cell names
    pub dimensions: GridDimensions,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(cells: &'a [Cell], dimensions: GridDimensions) -> Self {
        Self { cells, dimensions }
    }

    /// Context with no cells; any reference fails
    pub fn empty() -> EvaluationContext<'static> {
        EvaluationContext {
            cells: &[],
            dimensions: GridDimensions::default(),
        }
    }

    fn resolve(&self, cell: &CellRef) -> FormulaResult<(usize, &'a Cell)> {
        let index = index_from_cell_name(&cell.value, self.dimensions).map_err(|e| {
            FormulaError::new(ErrorKind::InvalidCell, e.to_string(), cell.to_token())
        })?;
        match self.cells.get(index) {
            Some(found) => Ok((index, found)),
            None => Err(FormulaError::new(
                ErrorKind::InvalidCell,
                format!("cell [{}] is outside the grid", cell.value),
                cell.to_token(),
            )),
        }
    }

    /// Range spanned by two references, each checked against the dimensions
    fn range(&self, from: &CellRef, to: &CellRef) -> FormulaResult<CellRange> {
        let address = |cell: &CellRef| {
            CellAddress::parse(&cell.value)
                .and_then(|addr| addr.to_index(self.dimensions).map(|_| addr))
                .map_err(|e| {
                    FormulaError::new(ErrorKind::InvalidCell, e.to_string(), cell.to_token())
                })
        };
        Ok(CellRange::new(address(from)?, address(to)?))
    }
}

/// Result of evaluating a formula
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: f64,
    /// Indices read, first occurrence order, no duplicates
    pub dependencies: Vec<usize>,
}

/// Evaluate a parsed formula
///
/// # Example
/// ```rust
/// use sheetcalc_core::{Cell, GridDimensions};
/// use sheetcalc_formula::{interpret, parse_formula, EvaluationContext};
///
/// let cells = vec![Cell::number(0.0), Cell::number(1.0)];
/// let ctx = EvaluationContext::new(&cells, GridDimensions::default());
/// let tree = parse_formula("A0+B0").unwrap();
/// let eval = interpret(&tree, &ctx).unwrap();
/// assert_eq!(eval.result, 1.0);
/// assert_eq!(eval.dependencies, vec![0, 1]);
/// ```
pub fn interpret(tree: &Node, ctx: &EvaluationContext) -> FormulaResult<Evaluation> {
    let mut dependencies = Vec::new();
    let result = evaluate(tree, ctx, &mut dependencies, 1)?;

    let mut seen = AHashSet::with_capacity(dependencies.len());
    dependencies.retain(|index| seen.insert(*index));

    tracing::debug!(%tree, result, ?dependencies, "evaluated formula");
    Ok(Evaluation {
        result,
        dependencies,
    })
}

fn evaluate(
    node: &Node,
    ctx: &EvaluationContext,
    deps: &mut Vec<usize>,
    depth: usize,
) -> FormulaResult<f64> {
    if depth > MAX_DEPTH {
        return Err(FormulaError::new(
            ErrorKind::NestingTooDeep,
            format!("formula nests deeper than {} levels", MAX_DEPTH),
            node.to_token(),
        ));
    }

    match node {
        Node::Number { value, .. } => value.replace(',', ".").parse::<f64>().map_err(|_| {
            FormulaError::new(
                ErrorKind::InvalidNumber,
                format!("cannot read [{}] as a number", value),
                node.to_token(),
            )
        }),

        Node::Cell(cell) => {
            let (index, found) = ctx.resolve(cell)?;
            let value = found
                .value
                .as_number()
                .ok_or_else(|| not_a_number(index, found, &cell.value, cell.to_token()))?;
            deps.push(index);
            Ok(value)
        }

        Node::BinaryOp {
            op, left, right, ..
        } => {
            let left = evaluate(left, ctx, deps, depth + 1)?;
            let right = evaluate(right, ctx, deps, depth + 1)?;
            evaluate_binary_op(*op, left, right, node)
        }

        Node::Func {
            function, from, to, ..
        } => evaluate_function(*function, from, to, node, ctx, deps),
    }
}

fn evaluate_binary_op(op: BinaryOperator, left: f64, right: f64, node: &Node) -> FormulaResult<f64> {
    match op {
        BinaryOperator::Add => Ok(left + right),
        BinaryOperator::Subtract => Ok(left - right),
        BinaryOperator::Multiply => Ok(left * right),
        BinaryOperator::Divide => {
            if right == 0.0 {
                Err(FormulaError::new(
                    ErrorKind::DivideBy0,
                    format!("cannot divide {} by zero", left),
                    node.to_token(),
                ))
            } else {
                Ok(left / right)
            }
        }
    }
}

fn evaluate_function(
    function: RangeFunction,
    from: &CellRef,
    to: &CellRef,
    node: &Node,
    ctx: &EvaluationContext,
    deps: &mut Vec<usize>,
) -> FormulaResult<f64> {
    let range = ctx.range(from, to)?;
    let indices = range.indices(ctx.dimensions).map_err(|e| {
        FormulaError::new(ErrorKind::InvalidCell, e.to_string(), node.to_token())
    })?;

    // blanks are still recorded so filling them in later recalculates this
    let mut acc = function.identity();
    for index in indices {
        let Some(cell) = ctx.cells.get(index) else {
            return Err(FormulaError::new(
                ErrorKind::InvalidCell,
                format!("cell #{} of range [{}] is outside the grid", index, range),
                node.to_token(),
            ));
        };
        match &cell.value {
            CellValue::Empty => {}
            CellValue::Number(n) => acc = function.combine(acc, *n),
            CellValue::Text(_) => {
                return Err(not_a_number(index, cell, &node.to_string(), node.to_token()));
            }
        }
        deps.push(index);
    }

    Ok(acc)
}

fn not_a_number(index: usize, cell: &Cell, source: &str, token: Token) -> FormulaError {
    FormulaError::new(
        ErrorKind::InvalidCell,
        format!(
            "cell #{} referenced by [{}] holds {}, not a number",
            index,
            source,
            cell.value.type_name()
        ),
        token,
    )
}
