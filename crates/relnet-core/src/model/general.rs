//! Generalized nonlinear constraints `result = f(argument)`.
//!
//! Backends without native support lower these to piecewise-linear rows over
//! the stored breakpoints. Breakpoints double as the admissible grid: when the
//! argument can only take breakpoint values the lowering is exact.

use relnet_expr::ids::{GeneralConstraintId, VariableId};

use super::Model;
use super::error::ModelError;

/// Univariate function of a generalized constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralFunction {
    /// Natural logarithm.
    Log,
    /// Natural exponential.
    Exp,
}

impl GeneralFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneralFunction::Log => "log",
            GeneralFunction::Exp => "exp",
        }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            GeneralFunction::Log => x.ln(),
            GeneralFunction::Exp => x.exp(),
        }
    }
}

/// `result = function(argument)` sampled at `breakpoints`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralConstraint {
    pub function: GeneralFunction,
    pub argument: VariableId,
    pub result: VariableId,
    pub breakpoints: Vec<f64>,
}

impl GeneralConstraint {
    /// Function values at each breakpoint.
    pub fn values(&self) -> Vec<f64> {
        self.breakpoints
            .iter()
            .map(|&x| self.function.apply(x))
            .collect()
    }
}

impl Model {
    /// Add `result = ln(argument)`.
    ///
    /// The argument variable must have a strictly positive lower bound.
    pub fn add_log_constraint(
        &mut self,
        argument: VariableId,
        result: VariableId,
        breakpoints: Vec<f64>,
    ) -> Result<GeneralConstraintId, ModelError> {
        let lower = self.get_variable(argument)?.bounds.lower;
        if lower <= 0.0 || lower.is_nan() {
            return Err(ModelError::NonPositiveLogDomain {
                variable: argument,
                lower,
            });
        }
        if breakpoints.iter().any(|&b| b <= 0.0) {
            return Err(ModelError::InvalidBreakpoints {
                reason: "logarithm breakpoints must be positive".to_string(),
            });
        }
        self.add_general_constraint(GeneralFunction::Log, argument, result, breakpoints)
    }

    /// Add `result = exp(argument)`.
    pub fn add_exp_constraint(
        &mut self,
        argument: VariableId,
        result: VariableId,
        breakpoints: Vec<f64>,
    ) -> Result<GeneralConstraintId, ModelError> {
        self.get_variable(argument)?;
        self.add_general_constraint(GeneralFunction::Exp, argument, result, breakpoints)
    }

    /// Remove a generalized constraint.
    pub fn remove_general_constraint(
        &mut self,
        id: GeneralConstraintId,
    ) -> Result<GeneralConstraint, ModelError> {
        self.general_constraints
            .remove(&id)
            .ok_or(ModelError::InvalidGeneralConstraintId(id))
    }

    fn add_general_constraint(
        &mut self,
        function: GeneralFunction,
        argument: VariableId,
        result: VariableId,
        breakpoints: Vec<f64>,
    ) -> Result<GeneralConstraintId, ModelError> {
        self.ensure_variable_exists(result)?;
        validate_breakpoints(&breakpoints)?;

        let id = GeneralConstraintId::new(self.next_general_id);
        self.next_general_id += 1;
        self.general_constraints.insert(
            id,
            GeneralConstraint {
                function,
                argument,
                result,
                breakpoints,
            },
        );

        tracing::trace!(
            component = "model",
            operation = "add_general_constraint",
            status = "success",
            function = function.as_str(),
            general_id = id.inner(),
            "Added generalized constraint"
        );
        Ok(id)
    }
}

fn validate_breakpoints(breakpoints: &[f64]) -> Result<(), ModelError> {
    if breakpoints.is_empty() {
        return Err(ModelError::InvalidBreakpoints {
            reason: "at least one breakpoint is required".to_string(),
        });
    }
    if breakpoints.iter().any(|b| !b.is_finite()) {
        return Err(ModelError::InvalidBreakpoints {
            reason: "breakpoints must be finite".to_string(),
        });
    }
    if breakpoints.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ModelError::InvalidBreakpoints {
            reason: "breakpoints must be strictly increasing".to_string(),
        });
    }
    Ok(())
}
