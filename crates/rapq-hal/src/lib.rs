//! rapq Solver Abstraction Layer
//!
//! This crate provides a unified interface for sending constrained quadratic
//! models to solvers, whether they run in-process or behind a cloud API.
//!
//! # Overview
//!
//! - A common [`Sampler`] trait for problem submission and job management
//! - [`SolverCapabilities`] to describe solver limits
//! - Token providers so credentials are injected, never embedded
//! - Unified answers via [`SampleSet`]
//!
//! # Supported Solvers
//!
//! | Solver | Crate | Authentication |
//! |--------|-------|----------------|
//! | Exact (exhaustive) | `rapq-adapter-exact` | None |
//! | Leap hybrid CQM | `rapq-adapter-leap` | `DWAVE_API_TOKEN` env var |
//!
//! # Example
//!
//! ```ignore
//! use rapq_adapter_exact::ExactCqmSolver;
//! use rapq_hal::Sampler;
//!
//! let solver = ExactCqmSolver::new();
//! let sample_set = solver.sample_cqm(&cqm, "RAP").await?;
//! if let Some(best) = sample_set.best_feasible() {
//!     println!("energy {}", best.energy);
//! }
//! ```

pub mod auth;
pub mod capability;
pub mod error;
pub mod job;
pub mod sampler;
pub mod sampleset;

pub use auth::{DWAVE_TOKEN_ENV, EnvTokenProvider, StaticTokenProvider, TokenProvider};
pub use capability::{PROBLEM_TYPE_CQM, SolverCapabilities};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use sampler::{Sampler, SamplerFactory, SolverAvailability, SolverConfig, ValidationResult};
pub use sampleset::{Head, SampleRecord, SampleSet};
