//! Export command - schema report and CSV bundle.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::export::{csv_bundle, schema_report, write_file};

use super::{Context, normalize_file};

pub fn run(
    ctx: &Context,
    file: PathBuf,
    report: Option<PathBuf>,
    zip: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if report.is_none() && zip.is_none() {
        return Err("Nothing to export: pass --report and/or --zip".into());
    }

    let (_, result) = normalize_file(&file, ctx.load_config()?)?;

    if let Some(path) = report {
        write_file(&path, schema_report(result.schema())?)?;
        println!(
            "{} {}",
            "Report saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    if let Some(path) = zip {
        write_file(&path, csv_bundle(&result.decomposition)?)?;
        println!(
            "{} {} ({} tables)",
            "Bundle saved to".green().bold(),
            path.display().to_string().white(),
            result.summary.tables
        );
    }

    Ok(())
}
