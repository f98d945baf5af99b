//! rapq Constrained Quadratic Model
//!
//! This crate provides the model representation shared by every part of rapq:
//! problem formulations build a [`ConstrainedQuadraticModel`], solvers consume
//! it and evaluate candidate [`Sample`]s against it.
//!
//! # Core Components
//!
//! - **Variables**: [`Binary`] named 0/1 decision variables
//! - **Expressions**: [`LinearExpr`] weighted sums of binaries plus an offset
//! - **Constraints**: [`Constraint`] labelled `lhs <sense> rhs` inequalities
//! - **Model**: [`ConstrainedQuadraticModel`] objective plus constraints
//! - **Samples**: [`Sample`] variable assignments for evaluation
//!
//! The objective is always minimised. Only linear terms are carried; the
//! quadratic part of a CQM is empty for every formulation rapq builds.
//!
//! # Example
//!
//! ```rust
//! use rapq_cqm::{Binary, ConstrainedQuadraticModel, LinearExpr, Sample, Sense};
//!
//! let x = Binary::new("x");
//! let y = Binary::new("y");
//!
//! let mut cqm = ConstrainedQuadraticModel::new();
//! cqm.set_objective(LinearExpr::from_terms([(x.clone(), -1.0), (y.clone(), -2.0)]))
//!     .unwrap();
//! cqm.add_constraint(
//!     LinearExpr::from_terms([(x.clone(), 1.0), (y.clone(), 1.0)]),
//!     Sense::Le,
//!     1.0,
//!     "at_most_one",
//! )
//! .unwrap();
//!
//! let sample = Sample::from_pairs([("x", 0), ("y", 1)]);
//! assert_eq!(cqm.energy(&sample).unwrap(), -2.0);
//! assert!(cqm.is_feasible(&sample).unwrap());
//! ```

pub mod constraint;
pub mod error;
pub mod expr;
pub mod model;
pub mod sample;
pub mod variable;

pub use constraint::{Constraint, FEASIBILITY_TOLERANCE, Sense};
pub use error::{CqmError, CqmResult};
pub use expr::LinearExpr;
pub use model::ConstrainedQuadraticModel;
pub use sample::Sample;
pub use variable::{Binary, VarLabel};
