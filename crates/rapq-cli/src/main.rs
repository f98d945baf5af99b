//! rapq Command-Line Interface
//!
//! Builds the redundancy allocation model from configuration, sends it to a
//! solver and prints the best allocation.
//!
//! ```text
//! rapq model --format json
//! rapq solve --solver exact
//! DWAVE_API_TOKEN=... rapq solve --solver leap --time-limit 10
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{model, solve, solvers, version};
use config::RapqConfig;

/// rapq - redundancy allocation solved as a constrained quadratic model
#[derive(Parser)]
#[command(name = "rapq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.rapq/config.yaml if present)
    #[arg(short, long, global = true, env = "RAPQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model and print it
    Model {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build the model, solve it and print the best allocation
    Solve {
        /// Solver to use (exact, leap)
        #[arg(short, long)]
        solver: Option<String>,

        /// Problem label
        #[arg(short, long)]
        label: Option<String>,

        /// Run-time limit in seconds (leap only)
        #[arg(short, long)]
        time_limit: Option<f64>,

        /// Number of sample-set records to print
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List available solvers
    Solvers,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match RapqConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Setup logging
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Model { format } => model::execute(&config, &format),

        Commands::Solve {
            solver,
            label,
            time_limit,
            limit,
            format,
        } => {
            let mut config = config;
            if let Some(solver) = solver {
                config.solver.backend = solver;
            }
            if let Some(label) = label {
                config.solver.label = label;
            }
            if time_limit.is_some() {
                config.solver.time_limit = time_limit;
            }
            match config.validate() {
                Ok(()) => solve::execute(&config, limit, &format).await,
                Err(e) => Err(e.into()),
            }
        }

        Commands::Solvers => solvers::execute(&config).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
