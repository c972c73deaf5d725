//! Tables command - list tables on the service.

use colored::Colorize;
use tabnorm::remote::TableService;

use super::Context;

pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let client = ctx.remote_client()?;
    let tables = client.list_tables()?;

    if tables.is_empty() {
        println!("{}", "No tables found".yellow());
        return Ok(());
    }

    println!(
        "{} tables on {}",
        tables.len().to_string().white().bold(),
        client.base_url()
    );
    for table in tables {
        println!("  {}", table.qualified_name());
    }

    Ok(())
}
