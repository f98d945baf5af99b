//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use console::style;

use rapq_adapter_exact::ExactCqmSolver;
use rapq_hal::{SampleSet, Sampler, SamplerFactory};
use rapq_rap::Allocation;

#[cfg(feature = "leap")]
use rapq_adapter_leap::LeapHybridCqmSampler;

use crate::config::RapqConfig;

/// Output format shared by the model and solve commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse a format name, ignoring case.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown format: '{name}'. Available: text, json"),
        }
    }
}

/// Create the sampler selected in the configuration.
pub fn create_sampler(config: &RapqConfig) -> Result<Box<dyn Sampler>> {
    let solver_config = config.solver_config();
    match config.backend().as_str() {
        "exact" => Ok(Box::new(
            ExactCqmSolver::from_config(solver_config).context("Failed to create exact solver")?,
        )),
        #[cfg(feature = "leap")]
        "leap" => match LeapHybridCqmSampler::from_config(solver_config) {
            Ok(s) => Ok(Box::new(s)),
            Err(e) => {
                anyhow::bail!(
                    "Failed to configure Leap: {}. Set the DWAVE_API_TOKEN environment variable.",
                    e
                );
            }
        },
        #[cfg(not(feature = "leap"))]
        "leap" => {
            anyhow::bail!("Leap solver not available. Rebuild with --features leap");
        }
        other => {
            anyhow::bail!("Unknown solver: '{other}'. Available: exact, leap");
        }
    }
}

/// Print the first `limit` records of a sample set as a table.
pub fn print_sample_set(sample_set: &SampleSet, limit: usize) {
    println!(
        "\n{} Sample set ({} records, {} feasible):",
        style("✓").green().bold(),
        sample_set.len(),
        sample_set.feasible().count()
    );
    println!("{}", sample_set.display_head(limit));

    if sample_set.len() > limit {
        println!("  ... and {} more records", sample_set.len() - limit);
    }

    let info = &sample_set.info;
    if let Some(ms) = info.get("run_time_ms") {
        println!("\n  Run time: {} ms", style(ms).yellow());
    }
    if let Some(id) = info.get("job_id").and_then(|v| v.as_str()) {
        println!("  Job: {}", style(id).dim());
    }
    if let Some(ms) = info.get("turnaround_ms") {
        println!("  Turnaround: {ms} ms");
    }
}

/// Print a decoded allocation.
pub fn print_allocation(allocation: Option<&Allocation>) {
    match allocation {
        Some(best) => {
            println!("\n{} Best feasible allocation:", style("✓").green().bold());
            println!("{best}");
        }
        None => {
            println!(
                "\n{} No feasible allocation found",
                style("!").yellow().bold()
            );
        }
    }
}
