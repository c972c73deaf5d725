//! Graph command - node/edge JSON for diagram tools.

use std::path::PathBuf;

use colored::Colorize;
use tabnorm::export::write_json;

use super::{Context, normalize_file};

pub fn run(
    ctx: &Context,
    file: PathBuf,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, result) = normalize_file(&file, ctx.load_config()?)?;
    let graph = result.visual_graph(seed);

    match output {
        Some(path) => {
            write_json(&path, &graph)?;
            println!(
                "{} {} ({} nodes, {} edges)",
                "Saved to".green().bold(),
                path.display().to_string().white(),
                graph.nodes.len(),
                graph.edges.len()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&graph)?),
    }

    Ok(())
}
