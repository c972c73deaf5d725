//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tabnorm::export::IfExists;

/// tabnorm: infer a relational schema from flat tabular data
#[derive(Parser)]
#[command(name = "tabnorm")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the table service (default: $TABNORM_API_URL or http://localhost:4000)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the inferred tables, keys and foreign keys of a file
    Analyze {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Split text cells on this character before decomposing
        #[arg(long, value_name = "CHAR")]
        split_delimiter: Option<char>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate the T-SQL script for a file
    Sql {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: tablas_normalizadas.sql)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Schema prefix for table names, e.g. dbo
        #[arg(long)]
        schema: Option<String>,

        /// Emit CREATE/ALTER statements only
        #[arg(long)]
        ddl_only: bool,

        /// Print the script instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Export the schema report and table data
    Export {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the schema report CSV here
        #[arg(long, value_name = "OUT.csv")]
        report: Option<PathBuf>,

        /// Write all tables as CSV files into this ZIP archive
        #[arg(long, value_name = "OUT.zip")]
        zip: Option<PathBuf>,
    },

    /// Build the visualization graph as JSON
    Graph {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for reproducible node positions
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List tables available on the table service
    Tables,

    /// Fetch a table from the service and generate its script
    Fetch {
        /// Table name
        #[arg(value_name = "TABLE")]
        table: String,

        /// Maximum rows to fetch
        #[arg(long, default_value = "1000")]
        top: usize,

        /// Output path for the SQL script (default: stdout summary only)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize a file and upload its tables to the service
    Upload {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target schema
        #[arg(long, default_value = "dbo")]
        schema: String,

        /// What to do when a table exists: drop or fail
        #[arg(long, default_value = "drop")]
        if_exists: IfExists,

        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}
