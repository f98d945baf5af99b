//! Model command implementation.

use anyhow::{Context, Result};
use console::style;

use super::common::OutputFormat;
use crate::config::RapqConfig;

/// Execute the model command.
pub fn execute(config: &RapqConfig, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let problem = &config.problem;
    let cqm = problem.build_cqm().context("Failed to build model")?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} RAP with {} component types, {} bits per type",
                style("→").cyan().bold(),
                problem.num_types(),
                problem.encoding().bits
            );
            println!("{cqm}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cqm).context("Failed to serialize model")?;
            println!("{json}");
        }
    }

    Ok(())
}
