//! Tests for formula evaluation through the cell-update workflow

use pretty_assertions::assert_eq;
use sheetcalc::prelude::*;
use sheetcalc::{
    index_from_cell_name, interpret, parse_formula, safe_eval, tokenize, EvaluationContext, Node,
    Span, TokenKind, MAX_DEPTH,
};

fn set(grid: &Grid, name: &str, content: &str) -> Grid {
    grid.update_cell_by_name(name, content)
        .unwrap_or_else(|e| panic!("{} = {}: {}", name, content, e))
        .grid
}

fn number(grid: &Grid, name: &str) -> f64 {
    match grid.value(name).unwrap() {
        CellValue::Number(n) => *n,
        other => panic!("{} holds {:?}", name, other),
    }
}

/// Test basic formula evaluation without cell references
#[test]
fn test_evaluate_simple_formulas() {
    let ctx = EvaluationContext::empty();

    let ast = parse_formula("1+2*3").unwrap();
    assert_eq!(interpret(&ast, &ctx).unwrap().result, 7.0);

    let ast = parse_formula("(1+2)*3").unwrap();
    assert_eq!(interpret(&ast, &ctx).unwrap().result, 9.0);

    let ast = parse_formula("2*3*4").unwrap();
    assert_eq!(ast.to_string(), "((2 * 3) * 4)");
}

/// Test the token stream the parser works from
#[test]
fn test_tokens_carry_spans() {
    let tokens = tokenize("SUM(A1:A2) * 3").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Function,
            TokenKind::ParenOpen,
            TokenKind::Cell,
            TokenKind::Operator,
            TokenKind::Cell,
            TokenKind::ParenClose,
            TokenKind::Operator,
            TokenKind::Number,
        ]
    );
    assert_eq!(tokens[7].span, Span::new(13, 14));
}

/// Test formula evaluation with cell references
#[test]
fn test_evaluate_with_cell_references() {
    let grid = Grid::new();
    let grid = set(&grid, "A0", "0");
    let grid = set(&grid, "B0", "1");
    let grid = set(&grid, "C0", "=A0+B0");

    assert_eq!(number(&grid, "C0"), 1.0);
    assert_eq!(grid.cell_by_name("C0").unwrap().dependencies, vec![0, 1]);
    assert_eq!(grid.cell_by_name("A0").unwrap().dependents, vec![2]);
    assert_eq!(grid.cell_by_name("B0").unwrap().dependents, vec![2]);
}

/// Test formula evaluation with range references
#[test]
fn test_evaluate_with_range_references() {
    let mut grid = Grid::new();
    for (name, v) in [
        ("A0", "10"),
        ("B0", "20"),
        ("C0", "30"),
        ("D0", "15"),
        ("E0", "25"),
        ("F0", "35"),
    ] {
        grid = set(&grid, name, v);
    }

    let grid = set(&grid, "A1", "=SUM(A0:F0)");
    assert_eq!(number(&grid, "A1"), 135.0);

    let grid = set(&grid, "A1", "=SUM(A0:F0)*3");
    assert_eq!(number(&grid, "A1"), 405.0);
    assert_eq!(
        grid.cell_by_name("A1").unwrap().dependencies,
        vec![0, 1, 2, 3, 4, 5]
    );

    let grid = set(&grid, "A2", "=MULT(A0:B0)");
    assert_eq!(number(&grid, "A2"), 200.0);
}

/// Ranges across rows cover the rectangle between their corners
#[test]
fn test_range_across_rows() {
    let mut grid = Grid::new();
    for (name, v) in [("B0", "1"), ("C0", "2"), ("B1", "3"), ("C1", "4"), ("D0", "100")] {
        grid = set(&grid, name, v);
    }
    let grid = set(&grid, "A5", "=SUM(C1:B0)");
    assert_eq!(number(&grid, "A5"), 10.0);
    assert_eq!(
        grid.cell_by_name("A5").unwrap().dependencies,
        vec![1, 2, 27, 28]
    );
}

/// Edits flow through chains of formulas
#[test]
fn test_propagation_chain() {
    let grid = Grid::new();
    let grid = set(&grid, "A0", "1");
    let grid = set(&grid, "A1", "=A0+1");
    let grid = set(&grid, "A2", "=A1*10");
    assert_eq!(number(&grid, "A2"), 20.0);

    let update = grid.update_cell_by_name("A0", "4").unwrap();
    let a1 = index_from_cell_name("A1", grid.dimensions()).unwrap();
    let a2 = index_from_cell_name("A2", grid.dimensions()).unwrap();
    assert_eq!(update.recalculated, vec![a1, a2]);
    assert_eq!(number(&update.grid, "A1"), 5.0);
    assert_eq!(number(&update.grid, "A2"), 50.0);
}

/// A cell whose formula breaks stops feeding its dependents
#[test]
fn test_failed_dependent_cascades() {
    let grid = Grid::new();
    let grid = set(&grid, "A0", "1");
    let grid = set(&grid, "A1", "=1/A0");
    let grid = set(&grid, "A2", "=A1+1");

    let update = grid.update_cell_by_name("A0", "0").unwrap();
    let kinds: Vec<ErrorKind> = update.errors.iter().map(|e| e.error.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::DivideBy0, ErrorKind::InvalidCell]);
    assert_eq!(update.grid.value("A1").unwrap(), &CellValue::Empty);
    assert_eq!(update.grid.value("A2").unwrap(), &CellValue::Empty);

    let fixed = set(&update.grid, "A0", "0,5");
    assert_eq!(number(&fixed, "A1"), 2.0);
    assert_eq!(number(&fixed, "A2"), 3.0);
}

/// Cycles are refused and the grid stays as it was
#[test]
fn test_circular_reference() {
    let grid = Grid::new();
    let grid = set(&grid, "B0", "1");
    let grid = set(&grid, "A0", "=B0");

    let err = grid.update_cell_by_name("B0", "=A0").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::CircularReference));
    assert_eq!(err.index(), Some(1));
    assert_eq!(grid.cell_by_name("B0").unwrap().content, "1");

    let err = grid.update_cell_by_name("C0", "=C0+1").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::CircularReference));
}

/// Parser errors reach the caller with the offending token
#[test]
fn test_malformed_functions() {
    let grid = Grid::new();
    let cases = [
        ("=SUM(A1*A2)*3", ErrorKind::UnexpectedToken, "*"),
        ("=SUM(A1:A2*3", ErrorKind::Parens, "*"),
        ("=SUM((A1:A2)*3", ErrorKind::UnexpectedToken, "("),
        ("=SUM(A1:)", ErrorKind::UnexpectedToken, ")"),
    ];

    for (formula, kind, token) in cases {
        match grid.update_cell_by_name("Z9", formula).unwrap_err() {
            CellUpdateError::Formula { index, source } => {
                assert_eq!(index, 9 * 26 + 25, "{}", formula);
                assert_eq!(source.kind, kind, "{}", formula);
                assert_eq!(source.token_value(), Some(token), "{}", formula);
            }
            other => panic!("{}: unexpected {:?}", formula, other),
        }
    }
}

/// Tokenizer errors surface the same way
#[test]
fn test_tokenizer_errors() {
    let grid = Grid::new();
    let cases = [
        ("=1+$", ErrorKind::InvalidChar),
        ("=3a", ErrorKind::InvalidNumber),
        ("=A999", ErrorKind::InvalidCell),
        ("=FOO(A1:A2)", ErrorKind::UnknownFunction),
        ("=1/0", ErrorKind::DivideBy0),
    ];
    for (formula, kind) in cases {
        let err = grid.update_cell(0, formula).unwrap_err();
        assert_eq!(err.kind(), Some(kind), "{}", formula);
    }
}

/// Text cells are not numbers
#[test]
fn test_text_cell_reference() {
    let grid = Grid::new();
    let grid = set(&grid, "A0", "hello");
    let err = grid.update_cell_by_name("B0", "=A0*2").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidCell));
}

/// Spans on the tree point back into the source
#[test]
fn test_ast_spans() {
    let ast = parse_formula("SUM(A1:A2)*3").unwrap();
    match ast {
        Node::BinaryOp { span, left, .. } => {
            assert_eq!(span, Span::new(0, 12));
            assert_eq!(left.span(), Span::new(0, 10));
        }
        other => panic!("unexpected {:?}", other),
    }
}

/// Smaller grids bound addressing
#[test]
fn test_custom_dimensions() {
    let grid = Grid::with_dimensions(GridDimensions::new(5, 3).unwrap());
    let grid = set(&grid, "C4", "7");
    let grid = set(&grid, "A0", "=C4*2");
    assert_eq!(number(&grid, "A0"), 14.0);

    let err = grid.update_cell_by_name("A1", "=D0").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidCell));
}

/// Deeply nested formulas are refused instead of exhausting the stack
#[test]
fn test_nesting_too_deep() {
    let grid = set(&Grid::new(), "A0", "1");

    let nested = format!("={}A0{}", "(".repeat(100_000), ")".repeat(100_000));
    let err = grid.update_cell_by_name("B0", &nested).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NestingTooDeep));

    let chain = format!("={}", vec!["A0"; 200_000].join("+"));
    let err = grid.update_cell_by_name("B0", &chain).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NestingTooDeep));

    let ctx = EvaluationContext::new(grid.cells(), grid.dimensions());
    let eval = safe_eval(&vec!["A0"; MAX_DEPTH].join("+"), &ctx).unwrap();
    assert_eq!(eval.result, MAX_DEPTH as f64);
    assert_eq!(eval.dependencies, vec![0]);
}

/// A range running past a short cell slice fails instead of panicking
#[test]
fn test_range_past_short_slice() {
    let cells = vec![Cell::number(1.0); 28];
    let ctx = EvaluationContext::new(&cells, GridDimensions::default());
    let err = interpret(&parse_formula("SUM(Z0:A1)").unwrap(), &ctx).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCell);
    assert_eq!(err.token_value(), Some("SUM"));
}
