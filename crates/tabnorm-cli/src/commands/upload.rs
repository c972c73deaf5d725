//! Upload command - send normalized tables to the service.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::export::IfExists;
use tabnorm::remote::TableService;

use super::{Context, normalize_file, print_diagnostics};

pub fn run(
    ctx: &Context,
    file: PathBuf,
    schema: String,
    if_exists: IfExists,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, result) = normalize_file(&file, ctx.load_config()?)?;
    print_diagnostics(&result);

    if result.decomposition.is_empty() {
        return Err("No rows to upload".into());
    }

    let request = result
        .upload_request()
        .with_schema(schema)
        .with_if_exists(if_exists);

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let client = ctx.remote_client()?;
    let report = client.upload(&request)?;

    println!(
        "{} {} tables ({} rows) to {}",
        "Uploaded".green().bold(),
        request.tables.len(),
        request.row_count(),
        client.base_url()
    );
    if ctx.verbose {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
