//! Analyze command - print the inferred schema of a data file.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::input::{PREVIEW_ROWS, Parser};

use super::{Context, normalize_file, print_diagnostics};

pub fn run(
    ctx: &Context,
    file: PathBuf,
    split_delimiter: Option<char>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ctx.load_config()?;
    if split_delimiter.is_some() {
        config.decomposition.split_delimiter = split_delimiter;
    }

    let (normalizer, result) = normalize_file(&file, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "Read {} rows x {} columns ({})",
        result.summary.input_rows.to_string().white().bold(),
        result.summary.input_columns.to_string().white().bold(),
        result.source.format
    );

    if result.decomposition.is_empty() {
        println!("{}", "No rows - nothing to normalize".yellow());
        return Ok(());
    }

    if ctx.verbose {
        let (rows, _) = Parser::with_config(normalizer.config().parser.clone()).parse_file(&file)?;
        println!();
        println!("{} (first {} rows)", "Preview:".yellow().bold(), PREVIEW_ROWS);
        println!("  {}", rows.columns.join(" | "));
        for row in rows.preview() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            println!("  {}", cells.join(" | "));
        }
    }

    println!();
    for table in result.schema().tables.values() {
        println!("{}", table.name.cyan().bold());
        for column in &table.columns {
            let sql_type = table
                .column_type(column)
                .map(|t| t.to_string())
                .unwrap_or_default();
            let marker = if table.is_primary_key(column) {
                "PK".green().bold().to_string()
            } else if let Some(fk) = table.foreign_key_for(column) {
                format!("FK -> {}", fk.referenced_table).blue().to_string()
            } else {
                String::new()
            };
            println!("  {:24} {:16} {}", column, sql_type, marker);
        }
        println!();
    }

    if !result.decomposition.key_candidates.is_empty() {
        println!(
            "Key candidates: {}",
            result.decomposition.key_candidates.join(", ")
        );
    }
    for alter in &result.reconciliation.alters {
        println!(
            "Unified {}.{}: {} -> {}",
            alter.table, alter.column, alter.from, alter.to
        );
    }
    print_diagnostics(&result);

    println!(
        "{} {} tables, {} foreign keys",
        "Done:".green().bold(),
        result.summary.tables,
        result.summary.foreign_keys - result.summary.skipped_foreign_keys
    );

    Ok(())
}
