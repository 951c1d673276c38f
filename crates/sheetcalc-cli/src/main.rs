//! sheetcalc CLI - evaluate formulas and inspect the pipeline

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheetcalc::prelude::*;
use sheetcalc::{
    cell_name_from_index, parse_formula, safe_eval, tokenize, EvaluationContext, DEFAULT_COLS,
    DEFAULT_ROWS,
};
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "sheetcalc")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula and print its result and the cells it read
    Eval {
        /// Formula, with or without the leading '='
        formula: String,

        /// Cell to fill before evaluating, as NAME=CONTENT (repeatable)
        #[arg(short, long = "set", value_name = "NAME=CONTENT")]
        set: Vec<String>,
    },

    /// Print the tokens of a formula with their spans
    Tokens {
        /// Formula, with or without the leading '='
        formula: String,
    },

    /// Print the syntax tree of a formula
    Ast {
        /// Formula, with or without the leading '='
        formula: String,
    },

    /// Apply cell edits in order and print the resulting grid
    Run {
        /// Edits as NAME=CONTENT, e.g. A0=5 or "A1==A0*2"
        #[arg(value_name = "NAME=CONTENT")]
        edits: Vec<String>,

        /// Number of rows
        #[arg(long, default_value_t = DEFAULT_ROWS)]
        rows: u32,

        /// Number of columns
        #[arg(long, default_value_t = DEFAULT_COLS)]
        cols: u16,

        /// Print the whole grid as JSON
        #[arg(long)]
        json: bool,

        /// Do not recompute dependents after each edit
        #[arg(long)]
        no_propagate: bool,

        /// Keep the previous value of dependents that fail to recompute
        #[arg(long)]
        keep_previous: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { formula, set } => eval(&formula, &set),
        Commands::Tokens { formula } => show_tokens(&formula),
        Commands::Ast { formula } => show_ast(&formula),
        Commands::Run {
            edits,
            rows,
            cols,
            json,
            no_propagate,
            keep_previous,
        } => {
            let options = CalculationOptions {
                propagate: !no_propagate,
                on_dependent_error: if keep_previous {
                    DependentErrorPolicy::KeepPrevious
                } else {
                    DependentErrorPolicy::Clear
                },
            };
            run(&edits, rows, cols, json, &options)
        }
    }
}

fn formula_body(formula: &str) -> &str {
    let formula = formula.trim();
    formula.strip_prefix('=').unwrap_or(formula)
}

/// Split `NAME=CONTENT` at the first '='
fn split_edit(edit: &str) -> Result<(&str, &str)> {
    match edit.split_once('=') {
        Some((name, content)) if !name.trim().is_empty() => Ok((name.trim(), content)),
        _ => bail!("Invalid edit '{}': expected NAME=CONTENT", edit),
    }
}

fn apply_edits(mut grid: Grid, edits: &[String], options: &CalculationOptions) -> Result<Grid> {
    for edit in edits {
        let (name, content) = split_edit(edit)?;
        let index = grid
            .index_of(name)
            .with_context(|| format!("Unknown cell '{}'", name))?;
        let update = grid
            .update_cell_with_options(index, content, options)
            .with_context(|| format!("Failed to set {} to '{}'", name, content))?;

        for failed in &update.errors {
            let cell = cell_name_from_index(failed.index, grid.dimensions())
                .unwrap_or_else(|_| format!("#{}", failed.index));
            eprintln!("Warning: {} could not be recalculated: {}", cell, failed.error);
        }
        grid = update.grid;
    }
    Ok(grid)
}

fn eval(formula: &str, set: &[String]) -> Result<()> {
    let grid = apply_edits(Grid::new(), set, &CalculationOptions::default())?;
    let ctx = EvaluationContext::new(grid.cells(), grid.dimensions());
    let eval = safe_eval(formula_body(formula), &ctx)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;

    let names = eval
        .dependencies
        .iter()
        .map(|&i| grid.name_of(i))
        .collect::<sheetcalc::Result<Vec<_>>>()?;

    println!("{}", CellValue::Number(eval.result));
    if !names.is_empty() {
        println!("dependencies: {}", names.join(", "));
    }
    Ok(())
}

fn show_tokens(formula: &str) -> Result<()> {
    let tokens = tokenize(formula_body(formula))
        .with_context(|| format!("Failed to tokenize '{}'", formula))?;

    let mut out = io::stdout().lock();
    for token in tokens {
        writeln!(
            out,
            "{:<12}{:<8}{}",
            token.kind.as_str(),
            token.span.to_string(),
            token.value
        )
        .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn show_ast(formula: &str) -> Result<()> {
    let tree = parse_formula(formula_body(formula))
        .with_context(|| format!("Failed to parse '{}'", formula))?;
    println!("{}", tree);
    println!("{:#?}", tree);
    Ok(())
}

fn run(
    edits: &[String],
    rows: u32,
    cols: u16,
    json: bool,
    options: &CalculationOptions,
) -> Result<()> {
    let dimensions = GridDimensions::new(rows, cols).context("Invalid grid size")?;
    let grid = apply_edits(Grid::with_dimensions(dimensions), edits, options)?;

    if json {
        let text = serde_json::to_string_pretty(&grid).context("Failed to serialize grid")?;
        println!("{}", text);
        return Ok(());
    }

    let mut out = io::stdout().lock();
    for (index, cell) in grid.non_empty_cells() {
        writeln!(
            out,
            "{}\t{}\t{}",
            grid.name_of(index)?,
            cell.content,
            cell.value
        )
        .context("Failed to write to stdout")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_edit() {
        assert_eq!(split_edit("A1=5").unwrap(), ("A1", "5"));
        assert_eq!(split_edit("A1==A0*2").unwrap(), ("A1", "=A0*2"));
        assert_eq!(split_edit("B2=").unwrap(), ("B2", ""));
        assert!(split_edit("A1").is_err());
        assert!(split_edit("=5").is_err());
    }

    #[test]
    fn test_apply_edits() {
        let edits = vec!["A0=2".to_string(), "B0==A0*21".to_string()];
        let grid = apply_edits(Grid::new(), &edits, &CalculationOptions::default()).unwrap();
        assert_eq!(grid.value("B0").unwrap(), &CellValue::Number(42.0));

        let bad = vec!["A0==1/0".to_string()];
        let err = apply_edits(Grid::new(), &bad, &CalculationOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("DIVIDE_BY_0"));
    }

    #[test]
    fn test_formula_body() {
        assert_eq!(formula_body(" =1+2 "), "1+2");
        assert_eq!(formula_body("SUM(A0:B0)"), "SUM(A0:B0)");
    }
}
