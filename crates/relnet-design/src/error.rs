//! Design error types.

use relnet_core::{ModelError, SolverError};

/// Errors raised while validating inputs, building or decoding a design.
///
/// An infeasible target is not an error; it is reported through
/// [`crate::DesignOutcome::Infeasible`].
#[derive(Debug, Clone)]
pub enum DesignError {
    /// Fewer nodes than the formulations support
    InvalidNodeCount { total_nodes: usize, minimum: usize },
    /// Link cost is not a positive finite number
    InvalidLinkCost { link_cost: f64 },
    /// Reliability target outside (0, 1)
    InvalidTarget { target: f64 },
    /// Catalog tables are empty or malformed
    InvalidCatalog { reason: String },
    /// Hybrid options cannot produce a valid layout
    InvalidOptions { reason: String },
    /// A handle of the base formulation is absent from its model
    MissingModelArtifact { artifact: String },
    /// Solver values do not describe a valid design
    Decode { reason: String },
    Model(ModelError),
    Solver(SolverError),
}

impl DesignError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            DesignError::InvalidNodeCount { .. } => "INPUT_NODE_COUNT",
            DesignError::InvalidLinkCost { .. } => "INPUT_LINK_COST",
            DesignError::InvalidTarget { .. } => "INPUT_TARGET",
            DesignError::InvalidCatalog { .. } => "INPUT_CATALOG",
            DesignError::InvalidOptions { .. } => "INPUT_OPTIONS",
            DesignError::MissingModelArtifact { .. } => "MODEL_MISSING_ARTIFACT",
            DesignError::Decode { .. } => "DESIGN_DECODE",
            DesignError::Model(inner) => inner.code(),
            DesignError::Solver(inner) => inner.code(),
        }
    }

    /// Whether the error stems from caller input rather than the model or solver.
    pub fn is_input_error(&self) -> bool {
        self.code().starts_with("INPUT_")
    }
}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::InvalidNodeCount {
                total_nodes,
                minimum,
            } => write!(
                f,
                "[{}] Total nodes must be at least {} (got {})",
                self.code(),
                minimum,
                total_nodes
            ),
            DesignError::InvalidLinkCost { link_cost } => write!(
                f,
                "[{}] Link cost must be positive and finite (got {})",
                self.code(),
                link_cost
            ),
            DesignError::InvalidTarget { target } => write!(
                f,
                "[{}] Required reliability must lie strictly between 0 and 1 (got {})",
                self.code(),
                target
            ),
            DesignError::InvalidCatalog { reason } => {
                write!(f, "[{}] Invalid catalog: {}", self.code(), reason)
            }
            DesignError::InvalidOptions { reason } => {
                write!(f, "[{}] Invalid hybrid options: {}", self.code(), reason)
            }
            DesignError::MissingModelArtifact { artifact } => write!(
                f,
                "[{}] Base model has no {}",
                self.code(),
                artifact
            ),
            DesignError::Decode { reason } => {
                write!(f, "[{}] Cannot decode design: {}", self.code(), reason)
            }
            DesignError::Model(inner) => write!(f, "{inner}"),
            DesignError::Solver(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for DesignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DesignError::Model(inner) => Some(inner),
            DesignError::Solver(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<ModelError> for DesignError {
    fn from(err: ModelError) -> Self {
        DesignError::Model(err)
    }
}

impl From<relnet_expr::ExprError> for DesignError {
    fn from(err: relnet_expr::ExprError) -> Self {
        DesignError::Model(ModelError::from(err))
    }
}

impl From<SolverError> for DesignError {
    fn from(err: SolverError) -> Self {
        DesignError::Solver(err)
    }
}

/// Reject node counts below [`crate::MIN_TOTAL_NODES`].
pub(crate) fn check_node_count(total_nodes: usize) -> Result<(), DesignError> {
    if total_nodes < crate::MIN_TOTAL_NODES {
        return Err(DesignError::InvalidNodeCount {
            total_nodes,
            minimum: crate::MIN_TOTAL_NODES,
        });
    }
    Ok(())
}

pub(crate) fn check_link_cost(link_cost: f64) -> Result<(), DesignError> {
    if !link_cost.is_finite() || link_cost <= 0.0 {
        return Err(DesignError::InvalidLinkCost { link_cost });
    }
    Ok(())
}

pub(crate) fn check_target(target: f64) -> Result<(), DesignError> {
    if !(target > 0.0 && target < 1.0) {
        return Err(DesignError::InvalidTarget { target });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_display() {
        let err = DesignError::InvalidNodeCount {
            total_nodes: 3,
            minimum: 4,
        };
        assert_eq!(err.code(), "INPUT_NODE_COUNT");
        assert!(err.to_string().starts_with("[INPUT_NODE_COUNT]"));
        assert!(err.is_input_error());

        let err = DesignError::MissingModelArtifact {
            artifact: "link-cost definition".into(),
        };
        assert!(err.to_string().contains("link-cost definition"));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_input_checks() {
        assert!(check_node_count(3).is_err());
        assert!(check_node_count(4).is_ok());
        assert!(check_link_cost(0.0).is_err());
        assert!(check_link_cost(f64::NAN).is_err());
        assert!(check_link_cost(7.69).is_ok());
        assert!(check_target(1.0).is_err());
        assert!(check_target(0.0).is_err());
        assert!(check_target(f64::NAN).is_err());
        assert!(check_target(0.9999999999999999).is_ok());
    }

    #[test]
    fn test_wrapped_errors_keep_inner_code() {
        let err = DesignError::from(ModelError::NoObjective);
        assert_eq!(err.code(), "OBJECTIVE_MISSING");
        assert!(std::error::Error::source(&err).is_some());
    }
}
