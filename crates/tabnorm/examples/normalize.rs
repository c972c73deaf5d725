//! Example: Normalize a tabular data file and print the SQL script.
//!
//! Usage:
//!   cargo run --example normalize -- <file_path>

use std::env;
use std::path::Path;

use tabnorm::Normalizer;

fn main() -> tabnorm::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example normalize -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let result = Normalizer::new().normalize_file(path)?;

    println!(
        "-- {} ({} rows, {} columns)",
        result.source.name, result.source.row_count, result.source.column_count
    );
    for table in result.schema().tables.values() {
        println!("-- {}", table.name);
        for (column, sql_type) in &table.types {
            println!("--   {:24} {}", column, sql_type);
        }
    }
    for diagnostic in result.diagnostics() {
        println!("-- warning: {}", diagnostic);
    }
    println!();
    print!("{}", result.sql);

    Ok(())
}
