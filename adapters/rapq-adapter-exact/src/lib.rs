//! rapq Local Exact Solver
//!
//! This crate provides an exhaustive constrained-quadratic-model solver for
//! testing, development, and small instances. It evaluates every assignment,
//! so its answers are exact but its cost doubles with each variable.
//!
//! # Performance
//!
//! | Variables | Assignments | Speed |
//! |-----------|-------------|-------|
//! | 8 | 256 | Instant |
//! | 14 | ~16 K | Fast |
//! | 20 | ~1 M | Moderate |
//! | 25+ | ~32 M+ | Not recommended |
//!
//! # Example
//!
//! ```ignore
//! use rapq_adapter_exact::ExactCqmSolver;
//! use rapq_hal::Sampler;
//!
//! let solver = ExactCqmSolver::new();
//! let sample_set = solver.sample_cqm(&cqm, "RAP").await?;
//! println!("{sample_set}");
//! ```

mod solver;

pub use solver::ExactCqmSolver;
