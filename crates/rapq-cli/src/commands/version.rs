//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - redundancy allocation as a constrained quadratic model",
        style("rapq").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  rapq-cqm            Constrained quadratic model IR");
    println!("  rapq-hal            Solver abstraction layer");
    println!("  rapq-rap            Redundancy allocation formulation");
    println!("  rapq-adapter-exact  Local exhaustive solver");
    if cfg!(feature = "leap") {
        println!("  rapq-adapter-leap   Leap hybrid CQM solver");
    }
    println!("  rapq-cli            Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
