//! Linear expressions over model variables.
//!
//! [`Expr`] holds coefficients and a constant; comparing it against a scalar
//! or another expression yields a [`ConstraintExpr`] the model folds into
//! row bounds.

pub mod core;
pub mod error;

pub use core::{ComparisonSense, ConstraintExpr, Expr};
pub use error::ExprError;
