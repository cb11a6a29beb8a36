//! Thin wrapper around the `highs` crate's row-oriented problem.
//!
//! Columns and rows are addressed by position. A solve consumes the built
//! problem; the wrapper keeps the solved model for value extraction.

use highs::{Col, HighsModelStatus, RowProblem, Sense as HighsSense, SolvedModel};
use std::fmt;
use tracing::{debug, trace, warn};

/// Objective sense for optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Status reported by HiGHS after a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Presolve proved the problem infeasible or unbounded without deciding which.
    UnboundedOrInfeasible,
    ReachedTimeLimit,
    ReachedIterationLimit,
    Unknown,
}

/// Errors returned by the HiGHS model wrapper.
#[derive(Debug, Clone)]
pub enum HighsModelError {
    ColumnCoefficientLengthMismatch {
        columns: usize,
        coefficients: usize,
    },
    ColumnIndexOutOfBounds {
        column_index: usize,
        num_columns: usize,
    },
    SolveRequired {
        operation: &'static str,
    },
}

impl fmt::Display for HighsModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsModelError::ColumnCoefficientLengthMismatch {
                columns,
                coefficients,
            } => write!(
                f,
                "columns length ({}) must match coefficients length ({})",
                columns, coefficients
            ),
            HighsModelError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "column index {} out of bounds (num_columns = {})",
                column_index, num_columns
            ),
            HighsModelError::SolveRequired { operation } => {
                write!(f, "solve must be called before {}", operation)
            }
        }
    }
}

impl std::error::Error for HighsModelError {}

/// Option value types for HiGHS solver configuration.
#[derive(Debug, Clone)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

/// Safe wrapper around a HiGHS problem.
pub struct HighsModel {
    problem: RowProblem,
    objective_sense: ObjectiveSense,
    solved: Option<SolvedModel>,
    columns: Vec<Col>,
    num_rows: usize,
    log_to_console: bool,
    options: Vec<(String, HighsOption)>,
}

impl HighsModel {
    pub fn new() -> Self {
        debug!(
            component = "solver",
            operation = "init_highs",
            status = "success",
            "Creating new HiGHS model"
        );
        HighsModel {
            problem: RowProblem::default(),
            objective_sense: ObjectiveSense::Minimize,
            solved: None,
            columns: Vec::new(),
            num_rows: 0,
            log_to_console: false,
            options: Vec::new(),
        }
    }

    /// Add a continuous column and return its index.
    pub fn add_col(&mut self, lower: f64, upper: f64, objective_coefficient: f64) -> usize {
        self.push_col(lower, upper, objective_coefficient, false)
    }

    /// Add an integer column and return its index.
    pub fn add_integer_col(&mut self, lower: f64, upper: f64, objective_coefficient: f64) -> usize {
        self.push_col(lower, upper, objective_coefficient, true)
    }

    fn push_col(
        &mut self,
        lower: f64,
        upper: f64,
        objective_coefficient: f64,
        is_integer: bool,
    ) -> usize {
        trace!(
            lower,
            upper,
            objective_coefficient,
            is_integer,
            component = "solver",
            operation = "add_column",
            status = "success",
            "Adding column"
        );
        self.solved = None;
        let col = if is_integer {
            self.problem
                .add_integer_column(objective_coefficient, lower..=upper)
        } else {
            self.problem.add_column(objective_coefficient, lower..=upper)
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Add a row `lower <= Σ coefficients[k]·x[columns[k]] <= upper`.
    ///
    /// # Errors
    ///
    /// Returns an error if columns and coefficients have different lengths
    /// or if any column index is out of bounds.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        columns: &[usize],
        coefficients: &[f64],
    ) -> Result<usize, HighsModelError> {
        if columns.len() != coefficients.len() {
            warn!(
                component = "solver",
                operation = "add_row",
                status = "error",
                columns = columns.len(),
                coefficients = coefficients.len(),
                "Column/coefficients length mismatch"
            );
            return Err(HighsModelError::ColumnCoefficientLengthMismatch {
                columns: columns.len(),
                coefficients: coefficients.len(),
            });
        }
        self.solved = None;
        let num_columns = self.columns.len();
        let mut factors = Vec::with_capacity(columns.len());
        for (&col_idx, &coeff) in columns.iter().zip(coefficients) {
            let col = *self
                .columns
                .get(col_idx)
                .ok_or(HighsModelError::ColumnIndexOutOfBounds {
                    column_index: col_idx,
                    num_columns,
                })?;
            factors.push((col, coeff));
        }
        self.problem.add_row(lower..=upper, factors);
        self.num_rows += 1;
        Ok(self.num_rows - 1)
    }

    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective_sense = sense;
    }

    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.log_to_console = enabled;
    }

    /// Set a HiGHS option for the next solve.
    pub fn set_option(&mut self, option: impl Into<String>, value: HighsOption) {
        self.options.push((option.into(), value));
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Solve the built problem.
    ///
    /// The problem is consumed; adding columns afterwards starts a new one.
    pub fn solve(&mut self) -> HighsStatus {
        debug!(
            num_cols = self.columns.len(),
            num_rows = self.num_rows,
            ?self.objective_sense,
            component = "solver",
            operation = "solve",
            status = "started",
            "Solving HiGHS model"
        );

        let sense = match self.objective_sense {
            ObjectiveSense::Minimize => HighsSense::Minimise,
            ObjectiveSense::Maximize => HighsSense::Maximise,
        };

        let problem = std::mem::take(&mut self.problem);
        let mut model = problem.optimise(sense);
        if self.log_to_console {
            model.set_option("output_flag", true);
            model.set_option("log_to_console", true);
        } else {
            model.make_quiet();
        }
        for (option, value) in self.options.drain(..) {
            match value {
                HighsOption::Bool(val) => model.set_option(option.as_str(), val),
                HighsOption::Int(val) => model.set_option(option.as_str(), val),
                HighsOption::Float(val) => model.set_option(option.as_str(), val),
                HighsOption::Str(val) => model.set_option(option.as_str(), val.as_str()),
            }
        }

        let solved = model.solve();
        let status = map_status(solved.status());
        trace!(
            component = "solver",
            operation = "solve",
            status = "success",
            ?status,
            "Solution status received"
        );
        self.solved = Some(solved);
        self.columns.clear();
        self.num_rows = 0;
        status
    }

    /// Objective value of the latest solve.
    pub fn objective_value(&self) -> Result<f64, HighsModelError> {
        let solved = self.solved.as_ref().ok_or(HighsModelError::SolveRequired {
            operation: "objective_value",
        })?;
        Ok(solved.objective_value())
    }

    /// Relative MIP gap of the latest solve (`NaN` before a solve).
    pub fn mip_gap(&self) -> f64 {
        self.solved
            .as_ref()
            .map_or(f64::NAN, |solved| solved.mip_gap())
    }

    /// Primal column values of the latest solve.
    ///
    /// Empty when HiGHS stopped before finding any point.
    pub fn col_values(&self) -> Result<Vec<f64>, HighsModelError> {
        let solved = self.solved.as_ref().ok_or(HighsModelError::SolveRequired {
            operation: "col_values",
        })?;
        Ok(solved.get_solution().columns().to_vec())
    }
}

impl Default for HighsModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HighsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objective_value = self.solved.as_ref().map(|s| s.objective_value());
        f.debug_struct("HighsModel")
            .field("num_columns", &self.columns.len())
            .field("num_rows", &self.num_rows)
            .field("objective_sense", &self.objective_sense)
            .field("objective_value", &objective_value)
            .finish_non_exhaustive()
    }
}

fn map_status(status: HighsModelStatus) -> HighsStatus {
    match status {
        HighsModelStatus::Optimal => HighsStatus::Optimal,
        HighsModelStatus::Infeasible => HighsStatus::Infeasible,
        HighsModelStatus::Unbounded => HighsStatus::Unbounded,
        HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
        HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
        HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
        _ => HighsStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_reject_unknown_columns() {
        let mut model = HighsModel::new();
        let x = model.add_col(0.0, 1.0, 1.0);
        assert_eq!(x, 0);

        let err = model.add_row(0.0, 1.0, &[0, 3], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            HighsModelError::ColumnIndexOutOfBounds {
                column_index: 3,
                num_columns: 1
            }
        ));
        let err = model.add_row(0.0, 1.0, &[0], &[1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("must match"));
        assert_eq!(model.num_rows(), 0);
    }

    #[test]
    fn test_values_require_solve() {
        let model = HighsModel::new();
        assert!(model.objective_value().is_err());
        assert!(model.col_values().is_err());
        assert!(model.mip_gap().is_nan());
    }
}
