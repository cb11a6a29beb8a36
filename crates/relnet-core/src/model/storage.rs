//! Storage access methods for the model.

use crate::types::{Constraint, Variable};
use relnet_expr::ids::{ConstraintId, GeneralConstraintId, VariableId};

use super::Model;
use super::error::ModelError;
use super::general::GeneralConstraint;

impl Model {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of linear constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get the number of generalized constraints
    pub fn num_general_constraints(&self) -> usize {
        self.general_constraints.len()
    }

    /// Get the number of coefficients in the model.
    pub fn num_coefficients(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(&id)
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(&id)
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// Get a generalized constraint by ID.
    pub fn get_general_constraint(
        &self,
        id: GeneralConstraintId,
    ) -> Result<&GeneralConstraint, ModelError> {
        self.general_constraints
            .get(&id)
            .ok_or(ModelError::InvalidGeneralConstraintId(id))
    }

    pub fn has_variable(&self, id: VariableId) -> bool {
        self.variables.contains_key(&id)
    }

    pub fn has_constraint(&self, id: ConstraintId) -> bool {
        self.constraints.contains_key(&id)
    }

    /// Variables in id order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter().map(|(id, var)| (*id, var))
    }

    /// Constraints in id order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints.iter().map(|(id, row)| (*id, row))
    }

    /// Generalized constraints in id order.
    pub fn general_constraints(
        &self,
    ) -> impl Iterator<Item = (GeneralConstraintId, &GeneralConstraint)> {
        self.general_constraints.iter().map(|(id, gc)| (*id, gc))
    }

    /// Column-sparse view: each variable with its (constraint_id, coefficient) pairs.
    pub fn columns(&self) -> impl Iterator<Item = (VariableId, &Vec<(ConstraintId, f64)>)> {
        self.columns.iter().map(|(&vid, coeffs)| (vid, coeffs))
    }

    /// Row-sparse view keyed by constraint id.
    pub fn rows(&self) -> std::collections::BTreeMap<ConstraintId, Vec<(VariableId, f64)>> {
        let mut rows: std::collections::BTreeMap<ConstraintId, Vec<(VariableId, f64)>> = self
            .constraints
            .keys()
            .map(|id| (*id, Vec::new()))
            .collect();
        for (var_id, coeffs) in &self.columns {
            for (constraint_id, coeff) in coeffs {
                if let Some(row) = rows.get_mut(constraint_id) {
                    row.push((*var_id, *coeff));
                }
            }
        }
        rows
    }

    /// Get the coefficients for a specific variable (column)
    pub fn get_column(&self, var_id: VariableId) -> Option<&Vec<(ConstraintId, f64)>> {
        self.columns.get(&var_id)
    }

    /// Whether every variable has finite bounds (the model cannot be unbounded).
    pub fn is_fully_bounded(&self) -> bool {
        self.variables.values().all(|var| var.bounds.is_finite())
    }
}
