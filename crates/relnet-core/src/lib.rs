//! Optimization model for relnet: variables, removable linear rows,
//! generalized log/exp constraints and the backend-agnostic solver surface.

pub mod model;
pub mod solver;
pub mod types;

pub use model::{GeneralConstraint, GeneralFunction, Model, ModelError};
pub use solver::{Solution, Solver, SolverConfig, SolverError, SolverStatus};
pub use types::{Bounds, Constraint, Objective, Sense, Variable};

pub use relnet_expr::{
    ComparisonSense, ConstraintExpr, ConstraintId, Expr, GeneralConstraintId, VariableId,
};
