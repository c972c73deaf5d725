//! CLI command implementations.

pub mod analyze;
pub mod export;
pub mod fetch;
pub mod graph;
pub mod sql;
pub mod tables;
pub mod upload;

use std::error::Error;
use std::path::{Path, PathBuf};

use colored::Colorize;
use tabnorm::remote::RemoteClient;
use tabnorm::{NormalizationResult, Normalizer, NormalizerConfig};

/// Options shared by every command.
pub struct Context {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub verbose: bool,
}

impl Context {
    /// Configuration from `--config`, or defaults.
    pub fn load_config(&self) -> Result<NormalizerConfig, Box<dyn Error>> {
        match &self.config {
            Some(path) => Ok(NormalizerConfig::load(path)?),
            None => Ok(NormalizerConfig::default()),
        }
    }

    /// Client for `--api-url`, else the environment.
    pub fn remote_client(&self) -> Result<RemoteClient, Box<dyn Error>> {
        match &self.api_url {
            Some(url) => Ok(RemoteClient::new(url)?),
            None => Ok(RemoteClient::from_env()?),
        }
    }
}

/// Check the file exists, then normalize it with `config`.
pub fn normalize_file(
    file: &Path,
    config: NormalizerConfig,
) -> Result<(Normalizer, NormalizationResult), Box<dyn Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    eprintln!(
        "{} {}",
        "Normalizing".cyan().bold(),
        file.display().to_string().white()
    );

    let normalizer = Normalizer::with_config(config);
    let result = normalizer.normalize_file(file)?;
    Ok((normalizer, result))
}

/// Print foreign keys that were left out of the DDL.
pub fn print_diagnostics(result: &NormalizationResult) {
    for diagnostic in result.diagnostics() {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
}
