//! Sql command - write the T-SQL script for a data file.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::export::{DEFAULT_SQL_FILE, write_file};

use super::{Context, normalize_file, print_diagnostics};

pub fn run(
    ctx: &Context,
    file: PathBuf,
    output: Option<PathBuf>,
    schema: Option<String>,
    ddl_only: bool,
    stdout: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ctx.load_config()?;
    if schema.is_some() {
        config.sql.schema = schema;
    }
    if ddl_only {
        config.sql.include_inserts = false;
    }

    let (_, result) = normalize_file(&file, config)?;
    print_diagnostics(&result);

    if stdout {
        print!("{}", result.sql);
        return Ok(());
    }

    let output_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_SQL_FILE));
    write_file(&output_path, &result.sql)?;

    println!(
        "{} {} ({} tables)",
        "Saved to".green().bold(),
        output_path.display().to_string().white(),
        result.summary.tables
    );

    Ok(())
}
