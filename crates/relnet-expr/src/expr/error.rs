//! Expression construction errors.

use crate::ids::VariableId;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Variables and coefficients were supplied with different lengths.
    MismatchedLengths { variables: usize, coefficients: usize },
    /// A coefficient or constant is NaN or infinite.
    NonFiniteCoefficient { variable: Option<VariableId>, value: f64 },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::MismatchedLengths { .. } => "EXPR_MISMATCHED_LENGTHS",
            ExprError::NonFiniteCoefficient { .. } => "EXPR_NON_FINITE",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] {} variables but {} coefficients",
                self.code(),
                variables,
                coefficients
            ),
            ExprError::NonFiniteCoefficient {
                variable: Some(var),
                value,
            } => write!(
                f,
                "[{}] coefficient {} on variable {} is not finite",
                self.code(),
                value,
                var.inner()
            ),
            ExprError::NonFiniteCoefficient {
                variable: None,
                value,
            } => write!(f, "[{}] constant {} is not finite", self.code(), value),
        }
    }
}

impl std::error::Error for ExprError {}
