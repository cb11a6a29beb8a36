//! Model error types.

use relnet_expr::ExprError;
use relnet_expr::ids::{ConstraintId, GeneralConstraintId, VariableId};

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Model has no variables
    EmptyModel,
    /// Invalid variable ID
    InvalidVariableId(VariableId),
    /// Invalid variable bounds
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Invalid constraint ID
    InvalidConstraintId(ConstraintId),
    /// Invalid generalized constraint ID
    InvalidGeneralConstraintId(GeneralConstraintId),
    /// Invalid constraint bounds
    InvalidConstraintBounds { lower: f64, upper: f64 },
    /// Coefficient is NaN or infinite
    InvalidCoefficient { coefficient: f64 },
    /// No objective set
    NoObjective,
    /// Objective already set
    MultipleObjectives,
    /// Name already used by another variable or constraint
    DuplicateName { name: String },
    /// Breakpoints for a generalized constraint are unusable
    InvalidBreakpoints { reason: String },
    /// A logarithm argument can reach zero or below
    NonPositiveLogDomain { variable: VariableId, lower: f64 },
    /// Expression could not be lowered
    Expr(ExprError),
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::EmptyModel => "MODEL_EMPTY",
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidGeneralConstraintId(_) => "GENERAL_CONSTRAINT_INVALID_ID",
            ModelError::InvalidConstraintBounds { .. } => "CONSTRAINT_INVALID_BOUNDS",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::NoObjective => "OBJECTIVE_MISSING",
            ModelError::MultipleObjectives => "OBJECTIVE_ALREADY_SET",
            ModelError::DuplicateName { .. } => "NAME_DUPLICATE",
            ModelError::InvalidBreakpoints { .. } => "GENERAL_CONSTRAINT_BREAKPOINTS",
            ModelError::NonPositiveLogDomain { .. } => "GENERAL_CONSTRAINT_LOG_DOMAIN",
            ModelError::Expr(inner) => inner.code(),
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            ModelError::InvalidVariableId(id) => write!(
                f,
                "[{}] Variable ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidVariableBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidConstraintId(id) => write!(
                f,
                "[{}] Constraint ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidGeneralConstraintId(id) => write!(
                f,
                "[{}] Generalized constraint ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidConstraintBounds { lower, upper } => write!(
                f,
                "[{}] Constraint bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidCoefficient { coefficient } => write!(
                f,
                "[{}] Coefficient must be finite (got {})",
                self.code(),
                coefficient
            ),
            ModelError::NoObjective => {
                write!(f, "[{}] Model has no objective defined", self.code())
            }
            ModelError::MultipleObjectives => write!(
                f,
                "[{}] Model already has an objective; use set_objective to replace",
                self.code()
            ),
            ModelError::DuplicateName { name } => {
                write!(f, "[{}] Name '{}' is already in use", self.code(), name)
            }
            ModelError::InvalidBreakpoints { reason } => {
                write!(f, "[{}] Invalid breakpoints: {}", self.code(), reason)
            }
            ModelError::NonPositiveLogDomain { variable, lower } => write!(
                f,
                "[{}] Logarithm argument (variable {}) must have a positive lower bound (got {})",
                self.code(),
                variable.inner(),
                lower
            ),
            ModelError::Expr(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<ExprError> for ModelError {
    fn from(err: ExprError) -> Self {
        ModelError::Expr(err)
    }
}
