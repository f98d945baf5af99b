//! Solvers command implementation.

use anyhow::Result;
use console::style;

use rapq_adapter_exact::ExactCqmSolver;
use rapq_hal::{Sampler, SamplerFactory};

#[cfg(feature = "leap")]
use rapq_adapter_leap::LeapHybridCqmSampler;

use crate::config::RapqConfig;

/// Execute the solvers command.
pub async fn execute(config: &RapqConfig) -> Result<()> {
    println!("{} Available solvers:\n", style("rapq").cyan().bold());

    // Exact
    let mut exact_config = config.solver_config();
    exact_config.name = "exact".into();
    let exact = ExactCqmSolver::from_config(exact_config)?;
    let caps = exact.capabilities();
    let available = exact.availability().await?.is_available;

    println!(
        "  {} {} {}",
        if available {
            style("●").green()
        } else {
            style("○").red()
        },
        style("exact").bold(),
        if caps.is_local { "(local)" } else { "" }
    );
    println!("    Max variables: {}", caps.max_variables);
    println!("    Problem types: {}", caps.problem_types.join(", "));
    println!();

    // Leap hybrid
    #[cfg(feature = "leap")]
    {
        let mut leap_config = config.solver_config();
        leap_config.name = "leap".into();
        match LeapHybridCqmSampler::from_config(leap_config) {
            Ok(leap) => {
                let availability = leap.availability().await?;
                let caps = leap.capabilities();
                println!(
                    "  {} {} ({})",
                    if availability.is_available {
                        style("●").green()
                    } else {
                        style("○").yellow()
                    },
                    style("leap").bold(),
                    leap.solver()
                );
                println!("    Max variables: {}", caps.max_variables);
                println!("    Max constraints: {}", caps.max_constraints);
                if let Some(t) = leap.time_limit() {
                    println!("    Time limit: {t} s");
                }
                match leap.list_cqm_solvers().await {
                    Ok(solvers) => {
                        for s in solvers {
                            println!(
                                "    - {} [{}]",
                                s.id,
                                s.status.as_deref().unwrap_or("unknown")
                            );
                        }
                    }
                    Err(e) => println!("    Status: {e}"),
                }
            }
            Err(_) => {
                println!(
                    "  {} {} (not configured)",
                    style("○").dim(),
                    style("leap").dim()
                );
                println!("    Set DWAVE_API_TOKEN environment variable to enable");
            }
        }
        println!();
    }

    #[cfg(not(feature = "leap"))]
    {
        println!(
            "  {} {} (not compiled)",
            style("○").dim(),
            style("leap").dim()
        );
        println!("    Rebuild with --features leap to enable");
        println!();
    }

    Ok(())
}
