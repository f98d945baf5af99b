//! rapq Leap Hybrid CQM Adapter
//!
//! This crate sends constrained quadratic models to D-Wave's Leap hybrid
//! CQM solver over the SAPI REST interface.
//!
//! # Authentication
//!
//! The API token is never embedded. It is read from `DWAVE_API_TOKEN`, or
//! handed over through [`rapq_hal::SolverConfig`] or a
//! [`rapq_hal::TokenProvider`]. `DWAVE_API_ENDPOINT` overrides the endpoint.
//!
//! # Example
//!
//! ```ignore
//! use rapq_adapter_leap::LeapHybridCqmSampler;
//! use rapq_hal::Sampler;
//!
//! let sampler = LeapHybridCqmSampler::new()?.with_time_limit(10.0)?;
//! let sample_set = sampler.sample_cqm(&cqm, "RAP").await?;
//! ```

mod api;
mod backend;
mod error;

pub use api::{
    Answer, DEFAULT_ENDPOINT, DEFAULT_SOLVER, LeapClient, ProblemStatus, SolverInfo,
    SolverProperties,
};
pub use backend::{DWAVE_ENDPOINT_ENV, LeapHybridCqmSampler, answer_to_sample_set, map_status};
pub use error::{LeapError, LeapResult};
