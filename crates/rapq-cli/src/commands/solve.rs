//! Solve command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use rapq_rap::{Allocation, run_on_solver_with_label};

use super::common::{OutputFormat, create_sampler, print_allocation, print_sample_set};
use crate::config::RapqConfig;

/// Execute the solve command.
pub async fn execute(config: &RapqConfig, limit: usize, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let problem = &config.problem;
    let label = &config.solver.label;

    let cqm = problem.build_cqm().context("Failed to build model")?;
    let sampler = create_sampler(config)?;

    if format == OutputFormat::Text {
        println!(
            "{} Solving {} on {} ({} variables, {} constraints)",
            style("→").cyan().bold(),
            style(label).green(),
            style(sampler.name()).yellow(),
            cqm.num_variables(),
            cqm.num_constraints()
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Waiting for solver...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = run_on_solver_with_label(&cqm, sampler.as_ref(), label).await;
    spinner.finish_and_clear();
    let sample_set = result.context("Solve failed")?;

    let best = Allocation::best(problem, &sample_set);

    match format {
        OutputFormat::Text => {
            print_sample_set(&sample_set, limit);
            print_allocation(best.as_ref());
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "sample_set": sample_set,
                "allocation": best,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
