//! Fetch command - normalize a table from the service.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::Normalizer;
use tabnorm::export::write_file;

use super::{Context, print_diagnostics};

pub fn run(
    ctx: &Context,
    table: String,
    top: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ctx.remote_client()?;
    eprintln!(
        "{} {} (top {})",
        "Fetching".cyan().bold(),
        table.white(),
        top
    );

    let normalizer = Normalizer::with_config(ctx.load_config()?);
    let result = normalizer.normalize_remote(&client, &table, top)?;
    print_diagnostics(&result);

    println!(
        "{} rows -> {} tables, {} foreign keys",
        result.summary.input_rows,
        result.summary.tables,
        result.summary.foreign_keys
    );

    if let Some(path) = output {
        write_file(&path, &result.sql)?;
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
