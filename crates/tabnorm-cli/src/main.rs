//! tabnorm CLI - relational schema inference for flat data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    let ctx = commands::Context {
        config: cli.config,
        api_url: cli.api_url,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Analyze {
            file,
            split_delimiter,
            json,
        } => commands::analyze::run(&ctx, file, split_delimiter, json),

        Commands::Sql {
            file,
            output,
            schema,
            ddl_only,
            stdout,
        } => commands::sql::run(&ctx, file, output, schema, ddl_only, stdout),

        Commands::Export { file, report, zip } => commands::export::run(&ctx, file, report, zip),

        Commands::Graph { file, output, seed } => commands::graph::run(&ctx, file, output, seed),

        Commands::Tables => commands::tables::run(&ctx),

        Commands::Fetch { table, top, output } => commands::fetch::run(&ctx, table, top, output),

        Commands::Upload {
            file,
            schema,
            if_exists,
            dry_run,
        } => commands::upload::run(&ctx, file, schema, if_exists, dry_run),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
