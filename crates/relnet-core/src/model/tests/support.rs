use crate::model::Model;
use crate::types::{Bounds, Variable};
use relnet_expr::VariableId;

pub(super) fn bounded_continuous(model: &mut Model, lower: f64, upper: f64) -> VariableId {
    model
        .add_variable(Variable::continuous(Bounds::new(lower, upper)))
        .expect("valid bounds")
}

pub(super) fn binary(model: &mut Model) -> VariableId {
    model.add_variable(Variable::binary()).expect("binary")
}
