//! Metadata methods for variable and constraint naming.

use relnet_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;

impl Model {
    /// Get name for a variable.
    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names.get(&id).map(String::as_str)
    }

    /// Lookup a variable by name.
    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names
            .iter()
            .find_map(|(id, value)| (value == name).then_some(*id))
    }

    /// Iterate over named variables in id order.
    pub fn named_variables(&self) -> impl Iterator<Item = (VariableId, &str)> {
        self.variable_names
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
    }

    /// Lookup a constraint by name.
    pub fn get_constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_names
            .iter()
            .find_map(|(id, value)| (value == name).then_some(*id))
    }
}
