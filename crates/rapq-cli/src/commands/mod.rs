//! CLI command implementations.

pub mod common;
pub mod model;
pub mod solve;
pub mod solvers;
pub mod version;
