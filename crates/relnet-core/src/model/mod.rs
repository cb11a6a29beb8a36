//! Model module for building optimization models.
//!
//! - [`error`]: Model error types
//! - [`builder`]: Adding and removing variables, rows and the objective
//! - [`general`]: Generalized log/exp constraints
//! - [`storage`]: Column-first sparse storage access
//! - [`metadata`]: Variable and constraint naming

mod builder;
mod error;
mod general;
mod metadata;
mod storage;

use crate::types::{Constraint, Objective, Variable};
use relnet_expr::ids::{ConstraintId, GeneralConstraintId, VariableId};
use std::collections::BTreeMap;

pub use error::ModelError;
pub use general::{GeneralConstraint, GeneralFunction};

/// A mixed-integer model with optional generalized constraints.
///
/// Models are plain values: `clone()` yields an independent copy, so one base
/// model can be extended in several directions without interference.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) name: Option<String>,
    pub(crate) variables: BTreeMap<VariableId, Variable>,
    pub(crate) constraints: BTreeMap<ConstraintId, Constraint>,
    pub(crate) general_constraints: BTreeMap<GeneralConstraintId, GeneralConstraint>,
    pub(crate) objective: Objective,
    // Column-first sparse storage: variable_id -> vec of (constraint_id, coefficient)
    pub(crate) columns: BTreeMap<VariableId, Vec<(ConstraintId, f64)>>,
    pub(crate) next_variable_id: u32,
    pub(crate) next_constraint_id: u32,
    pub(crate) next_general_id: u32,
    pub(crate) variable_names: BTreeMap<VariableId, String>,
    pub(crate) constraint_names: BTreeMap<ConstraintId, String>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty model carrying a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Get the objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if self.variables.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if self.constraints.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    /// Merge duplicate terms and drop zeros, rejecting unknown variables.
    pub(crate) fn normalize_terms(
        &self,
        terms: Vec<(VariableId, f64)>,
    ) -> Result<Vec<(VariableId, f64)>, ModelError> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in terms {
            self.ensure_variable_exists(var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient { coefficient: coeff });
            }
            *merged.entry(var_id).or_insert(0.0) += coeff;
        }
        Ok(merged
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect())
    }
}
