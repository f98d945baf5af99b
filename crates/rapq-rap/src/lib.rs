//! Redundancy Allocation Problem as a constrained quadratic model.
//!
//! Given `n` component types, each with a unit cost and a unit reliability,
//! choose how many redundant units of each type to install so that system
//! reliability is maximised within a budget and a bound on the total unit
//! count.
//!
//! # Formulation
//!
//! Each per-type count is binary-encoded ([`encode`]) with
//! `bit_length(n_max)` variables. The objective minimises
//! `Σ count_k · ln(1 − r_k)` ([`ln_unreliability`]), a linear surrogate for
//! the product of subsystem failure probabilities. Coefficients are the
//! positional weights rescaled per type ([`rescale`]).
//!
//! | Constraint | Form |
//! |------------|------|
//! | `budget_limitation` | `Σ cost_k · count_k <= budget` |
//! | `upper_limit` | `Σ count_k <= n_max` |
//! | `bound_limit` | `Σ count_k >= n_min` |
//!
//! Both count constraints bound the total across all types.
//!
//! # Example
//!
//! ```ignore
//! use rapq_adapter_exact::ExactCqmSolver;
//! use rapq_rap::{Allocation, RapProblem, run_on_solver};
//!
//! let problem = RapProblem::default();
//! let cqm = problem.build_cqm()?;
//! let sample_set = run_on_solver(&cqm, &ExactCqmSolver::new()).await?;
//! if let Some(best) = Allocation::best(&problem, &sample_set) {
//!     println!("{best}");
//! }
//! ```

pub mod encoding;
pub mod error;
pub mod problem;
pub mod reliability;
pub mod solve;
pub mod weights;

pub use encoding::{BinaryEncoding, bit_length, encode, variable_label};
pub use error::{RapError, RapResult};
pub use problem::{BOUND_LIMIT, BUDGET_LIMITATION, RapProblem, UPPER_LIMIT, get_cqm};
pub use reliability::{
    ln_unreliability, subsystem_unreliability, system_log_unreliability, system_reliability,
};
pub use solve::{Allocation, DEFAULT_LABEL, run_on_solver, run_on_solver_with_label};
pub use weights::rescale;
