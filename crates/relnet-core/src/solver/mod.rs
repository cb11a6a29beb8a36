//! Solver trait and common types for solver backends.
//!
//! Backends implement [`Solver`]; formulations only ever see the
//! solver-agnostic [`Solution`], [`SolverStatus`] and [`SolverError`].

mod config;
mod error;
mod status;

use crate::Model;
use relnet_expr::ids::VariableId;
use std::collections::BTreeMap;

pub use config::SolverConfig;
pub use error::SolverError;
pub use status::SolverStatus;

/// Solver-agnostic solution from an optimization solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Status of the solution.
    pub status: SolverStatus,
    /// Objective value of the solution.
    pub objective_value: f64,
    /// Primal values keyed by the model's variable ids.
    pub values: BTreeMap<VariableId, f64>,
    /// Solve time in seconds.
    pub solve_time_seconds: f64,
    /// Solver-agnostic metadata (e.g., node counts, gaps).
    pub metadata: BTreeMap<String, f64>,
}

impl Solution {
    /// Primal value of a model variable.
    pub fn value(&self, id: VariableId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    /// Primal value rounded to the nearest integer, for binary and integer columns.
    pub fn rounded(&self, id: VariableId) -> Option<i64> {
        self.value(id).map(|v| v.round() as i64)
    }

    /// Check if the solution is optimal.
    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Check if the solution carries a feasible point.
    pub fn is_feasible(&self) -> bool {
        self.status.is_feasible()
    }
}

/// Trait that all solver backends must implement.
pub trait Solver {
    /// Solve the given model and return a solver-agnostic solution.
    ///
    /// Statuses without a usable point are reported as
    /// [`SolverError::SolveFailure`].
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError>;
}
