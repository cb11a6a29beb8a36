use super::SolverStatus;
use crate::model::ModelError;

/// Error type for solver operations.
#[derive(Debug, Clone)]
pub enum SolverError {
    /// Model has no variables.
    EmptyModel,
    /// No objective function set.
    NoObjective,
    /// Variable referenced by the model has no column.
    InvalidVariableId(u32),
    /// Model could not be prepared for the backend.
    Model(ModelError),
    /// Solver finished without a usable point.
    SolveFailure {
        /// The solver status that caused the failure.
        status: SolverStatus,
    },
    /// Configuration outside what any backend accepts.
    InvalidConfig { reason: String },
    /// Solver-specific error not covered by other variants.
    SolverSpecific(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "SOLVER_EMPTY_MODEL",
            SolverError::NoObjective => "SOLVER_NO_OBJECTIVE",
            SolverError::InvalidVariableId(_) => "SOLVER_INVALID_VARIABLE_ID",
            SolverError::Model(_) => "SOLVER_MODEL",
            SolverError::SolveFailure { .. } => "SOLVER_SOLVE_FAILURE",
            SolverError::InvalidConfig { .. } => "SOLVER_INVALID_CONFIG",
            SolverError::SolverSpecific(_) => "SOLVER_SPECIFIC",
        }
    }

    /// Status carried by a [`SolverError::SolveFailure`].
    pub fn failure_status(&self) -> Option<SolverStatus> {
        match self {
            SolverError::SolveFailure { status } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            SolverError::NoObjective => write!(f, "[{}] Model has no objective", self.code()),
            SolverError::InvalidVariableId(id) => {
                write!(f, "[{}] Variable ID {} does not exist", self.code(), id)
            }
            SolverError::Model(inner) => write!(f, "[{}] {}", self.code(), inner),
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] Solve failed with status: {}", self.code(), status)
            }
            SolverError::InvalidConfig { reason } => {
                write!(f, "[{}] Invalid solver config: {}", self.code(), reason)
            }
            SolverError::SolverSpecific(msg) => {
                write!(f, "[{}] Solver error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Model(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        SolverError::Model(err)
    }
}
