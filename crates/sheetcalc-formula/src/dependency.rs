//! Dependency tracking for formula calculation
//!
//! Cells carry their own adjacency lists: `dependencies` (cells a formula
//! reads) and `dependents` (cells whose formulas read this one). The two are
//! kept as transposes of each other by [`reconcile_dependencies`].

use crate::ast::{CellRef, Node};
use crate::error::{ErrorKind, FormulaError, FormulaResult};
use ahash::{AHashMap, AHashSet};
use sheetcalc_core::{index_from_cell_name, Cell, CellAddress, CellRange, GridDimensions};

/// Change between two dependency lists
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyDiff {
    /// In the old list only
    pub stale: Vec<usize>,
    /// In the new list only
    pub fresh: Vec<usize>,
}

impl DependencyDiff {
    pub fn is_empty(&self) -> bool {
        self.stale.is_empty() && self.fresh.is_empty()
    }
}

/// Compute `old - new` and `new - old`, keeping input order
pub fn diff_dependencies(old: &[usize], new: &[usize]) -> DependencyDiff {
    let old_set: AHashSet<usize> = old.iter().copied().collect();
    let new_set: AHashSet<usize> = new.iter().copied().collect();

    DependencyDiff {
        stale: old.iter().copied().filter(|i| !new_set.contains(i)).collect(),
        fresh: new.iter().copied().filter(|i| !old_set.contains(i)).collect(),
    }
}

/// Return a copy of `cells` with the dependency edges of `changed` moved
/// from `old` to `new`
pub fn reconcile_dependencies(
    cells: &[Cell],
    changed: usize,
    old: &[usize],
    new: &[usize],
) -> Vec<Cell> {
    let mut cells = cells.to_vec();
    reconcile_in_place(&mut cells, changed, old, new);
    cells
}

/// In-place form of [`reconcile_dependencies`], for callers that already
/// own a private copy
pub fn reconcile_in_place(cells: &mut [Cell], changed: usize, old: &[usize], new: &[usize]) {
    let diff = diff_dependencies(old, new);
    let len = cells.len();

    for &index in &diff.stale {
        match cells.get_mut(index) {
            Some(cell) => {
                if !cell.remove_dependent(changed) {
                    tracing::trace!(index, changed, "stale dependency had no back edge");
                }
            }
            None => tracing::warn!(index, len, "ignoring out-of-range stale dependency"),
        }
    }

    for &index in &diff.fresh {
        match cells.get_mut(index) {
            Some(cell) => {
                cell.add_dependent(changed);
            }
            None => tracing::warn!(index, len, "ignoring out-of-range fresh dependency"),
        }
    }

    match cells.get_mut(changed) {
        Some(cell) => cell.dependencies = new.to_vec(),
        None => tracing::warn!(index = changed, len, "ignoring out-of-range changed cell"),
    }

    if !diff.is_empty() {
        tracing::debug!(
            changed,
            stale = ?diff.stale,
            fresh = ?diff.fresh,
            "reconciled dependencies"
        );
    }
}

/// Whether giving `changed` the dependencies `new_deps` would close a cycle
///
/// True when `changed` reads itself, or when one of `new_deps` already
/// (transitively) reads `changed`.
pub fn would_create_cycle(cells: &[Cell], changed: usize, new_deps: &[usize]) -> bool {
    if new_deps.contains(&changed) {
        return true;
    }
    if new_deps.is_empty() {
        return false;
    }

    let targets: AHashSet<usize> = new_deps.iter().copied().collect();
    let mut visited = AHashSet::new();
    let mut stack = vec![changed];
    visited.insert(changed);

    while let Some(cell) = stack.pop() {
        for &dependent in dependents_of(cells, cell) {
            if targets.contains(&dependent) {
                return true;
            }
            if visited.insert(dependent) {
                stack.push(dependent);
            }
        }
    }

    false
}

/// All transitive dependents of `start` in recalculation order
///
/// Every cell appears after all the cells it reads. `start` itself is not
/// included. Fails with `CIRCULAR_REFERENCE` when the dependents graph
/// reachable from `start` contains a cycle.
pub fn recalc_order(cells: &[Cell], start: usize) -> FormulaResult<Vec<usize>> {
    let mut order = Vec::new();
    let mut visited = AHashSet::new();
    let mut in_stack = AHashSet::new();
    // (cell, position of the next dependent to visit)
    let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

    visited.insert(start);
    in_stack.insert(start);

    while let Some(&(cell, child)) = stack.last() {
        match dependents_of(cells, cell).get(child).copied() {
            Some(next) => {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if in_stack.contains(&next) {
                    return Err(FormulaError::without_token(
                        ErrorKind::CircularReference,
                        format!("cell #{} is part of a dependency cycle", next),
                    ));
                }
                if visited.insert(next) {
                    in_stack.insert(next);
                    stack.push((next, 0));
                }
            }
            None => {
                stack.pop();
                in_stack.remove(&cell);
                if cell != start {
                    order.push(cell);
                }
            }
        }
    }

    order.reverse();
    Ok(order)
}

/// Cell indices a formula tree refers to, without reading any values
///
/// Ranges contribute every cell they cover. References that do not resolve
/// within `dimensions` are skipped; evaluation reports them.
pub fn referenced_cells(tree: &Node, dimensions: GridDimensions) -> Vec<usize> {
    fn resolve(cell: &CellRef, dimensions: GridDimensions) -> Option<usize> {
        index_from_cell_name(&cell.value, dimensions).ok()
    }

    fn walk(node: &Node, dimensions: GridDimensions, out: &mut Vec<usize>) {
        match node {
            Node::Number { .. } => {}
            Node::Cell(cell) => out.extend(resolve(cell, dimensions)),
            Node::BinaryOp { left, right, .. } => {
                walk(left, dimensions, out);
                walk(right, dimensions, out);
            }
            Node::Func { from, to, .. } => {
                let indices = CellAddress::parse(&from.value).and_then(|start| {
                    let end = CellAddress::parse(&to.value)?;
                    CellRange::new(start, end).indices(dimensions)
                });
                if let Ok(indices) = indices {
                    out.extend(indices);
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(tree, dimensions, &mut out);
    let mut seen = AHashSet::with_capacity(out.len());
    out.retain(|index| seen.insert(*index));
    out
}

/// Evaluation order for a set of formula cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationOrder {
    /// Cells in an order where every formula comes after the formulas it reads
    pub order: Vec<usize>,
    /// Cells on a cycle, or reading a cell on one
    pub cyclic: Vec<usize>,
}

/// Order formula cells given what each one reads
///
/// `precedents` maps every formula cell to the cells it reads; reads of
/// cells that are not keys (plain values) impose no ordering.
pub fn evaluation_order(precedents: &AHashMap<usize, Vec<usize>>) -> EvaluationOrder {
    let mut pending: AHashMap<usize, usize> = AHashMap::with_capacity(precedents.len());
    let mut readers: AHashMap<usize, Vec<usize>> = AHashMap::new();

    for (&cell, reads) in precedents {
        let mut count = 0;
        for &read in reads {
            if precedents.contains_key(&read) {
                count += 1;
                readers.entry(read).or_default().push(cell);
            }
        }
        pending.insert(cell, count);
    }

    let mut ready: Vec<usize> = pending
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&cell, _)| cell)
        .collect();
    // lowest index first
    ready.sort_unstable_by(|a, b| b.cmp(a));

    let mut order = Vec::with_capacity(precedents.len());
    while let Some(cell) = ready.pop() {
        order.push(cell);
        let mut unlocked = Vec::new();
        for &reader in readers.get(&cell).map_or(&[][..], Vec::as_slice) {
            if let Some(count) = pending.get_mut(&reader) {
                *count -= 1;
                if *count == 0 {
                    unlocked.push(reader);
                }
            }
        }
        ready.extend(unlocked);
        ready.sort_unstable_by(|a, b| b.cmp(a));
    }

    let mut cyclic: Vec<usize> = pending
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(cell, _)| cell)
        .collect();
    cyclic.sort_unstable();

    EvaluationOrder { order, cyclic }
}

fn dependents_of(cells: &[Cell], index: usize) -> &[usize] {
    cells.get(index).map_or(&[][..], |cell| cell.dependents.as_slice())
}
