//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Bounds, Constraint, Objective, Sense, Variable};
use relnet_expr::expr::{ConstraintExpr, Expr};
use relnet_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if !variable.bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            });
        }

        let id = VariableId::new(self.next_variable_id);
        self.next_variable_id += 1;
        self.variables.insert(id, variable);

        Ok(id)
    }

    /// Add a variable and register its name.
    pub fn add_named_variable(
        &mut self,
        name: impl Into<String>,
        variable: Variable,
    ) -> Result<VariableId, ModelError> {
        let name = name.into();
        if self.get_variable_by_name(&name).is_some() {
            return Err(ModelError::DuplicateName { name });
        }
        let id = self.add_variable(variable)?;
        self.variable_names.insert(id, name);
        Ok(id)
    }

    /// Tighten or relax the bounds of an existing variable.
    pub fn set_variable_bounds(&mut self, id: VariableId, bounds: Bounds) -> Result<(), ModelError> {
        if !bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        let variable = self
            .variables
            .get_mut(&id)
            .ok_or(ModelError::InvalidVariableId(id))?;
        variable.bounds = bounds;
        Ok(())
    }

    /// Add an empty constraint row to the model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ModelError> {
        if !constraint.bounds.is_valid() {
            return Err(ModelError::InvalidConstraintBounds {
                lower: constraint.bounds.lower,
                upper: constraint.bounds.upper,
            });
        }

        let id = ConstraintId::new(self.next_constraint_id);
        self.next_constraint_id += 1;
        self.constraints.insert(id, constraint);

        Ok(id)
    }

    /// Add a constraint from an expression and explicit bounds.
    ///
    /// A constant carried by `expr` is moved to the bounds.
    pub fn add_expr_constraint(
        &mut self,
        expr: Expr,
        bounds: Bounds,
    ) -> Result<ConstraintId, ModelError> {
        expr.ensure_finite()?;
        let (terms, constant) = expr.into_parts();
        let terms = self.normalize_terms(terms)?;
        let bounds = Bounds::new(bounds.lower - constant, bounds.upper - constant);
        let constraint_id = self.add_constraint(Constraint { bounds })?;
        for (var_id, coeff) in terms {
            self.set_coefficient(var_id, constraint_id, coeff)?;
        }
        Ok(constraint_id)
    }

    /// Add a constraint from a comparison expression (e.g., `x + y <= 10`).
    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        let (lower, upper) = sense.bounds_for(rhs);
        self.add_expr_constraint(expr, Bounds::new(lower, upper))
    }

    /// Add a comparison constraint and register its name.
    pub fn add_named_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let name = name.into();
        if self.get_constraint_by_name(&name).is_some() {
            return Err(ModelError::DuplicateName { name });
        }
        let id = self.add_constraint_expr(constraint)?;
        self.constraint_names.insert(id, name);
        Ok(id)
    }

    /// Remove a constraint row and every coefficient referencing it.
    ///
    /// Returns the removed row. Ids are never reused, so handles to other
    /// constraints stay valid.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<Constraint, ModelError> {
        let constraint = self
            .constraints
            .remove(&id)
            .ok_or(ModelError::InvalidConstraintId(id))?;
        self.constraint_names.remove(&id);
        for column in self.columns.values_mut() {
            column.retain(|(constraint_id, _)| *constraint_id != id);
        }
        self.columns.retain(|_, column| !column.is_empty());

        tracing::debug!(
            component = "model",
            operation = "remove_constraint",
            status = "success",
            constraint_id = id.inner(),
            remaining = self.constraints.len(),
            "Removed constraint"
        );
        Ok(constraint)
    }

    /// Set the coefficient at the intersection of a variable column and constraint row.
    ///
    /// Setting a coefficient twice overwrites the earlier value.
    pub fn set_coefficient(
        &mut self,
        var_id: VariableId,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.ensure_variable_exists(var_id)?;
        self.ensure_constraint_exists(constraint_id)?;

        let column = self.columns.entry(var_id).or_default();
        match column.iter_mut().find(|(id, _)| *id == constraint_id) {
            Some(entry) => entry.1 = coefficient,
            None => column.push((constraint_id, coefficient)),
        }

        Ok(())
    }

    /// Set the objective function, replacing any previous one.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let sense = objective.sense.ok_or(ModelError::NoObjective)?;
        if !objective.offset.is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: objective.offset,
            });
        }
        let terms = self.normalize_terms(objective.terms)?;
        self.objective = Objective {
            sense: Some(sense),
            terms,
            offset: objective.offset,
        };
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.terms.len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize a linear expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn minimize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_first_objective(Sense::Minimize, expr)
    }

    /// Maximize a linear expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn maximize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_first_objective(Sense::Maximize, expr)
    }

    fn set_first_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        if self.objective.sense.is_some() {
            return Err(ModelError::MultipleObjectives);
        }
        let (terms, offset) = expr.into_parts();
        self.set_objective(Objective {
            sense: Some(sense),
            terms,
            offset,
        })
    }
}
