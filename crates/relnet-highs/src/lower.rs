//! Piecewise-linear lowering of generalized constraints.
//!
//! Each `y = f(x)` with breakpoints `b_0 < … < b_m` becomes
//!
//! ```text
//! x = Σ λ_k b_k      y = Σ λ_k f(b_k)      Σ λ_k = 1,  λ_k ∈ [0, 1]
//! λ_0 ≤ z_0,  λ_k ≤ z_{k-1} + z_k,  λ_m ≤ z_{m-1}      Σ z_k = 1,  z binary
//! ```
//!
//! so at most two adjacent weights are non-zero. The argument is restricted
//! to `[b_0, b_m]` and whenever it sits on a breakpoint the result is exact.
//! Two breakpoints need no segment binaries; a single breakpoint pins both
//! variables.

use relnet_core::{Bounds, Expr, GeneralConstraint, Model, ModelError, Variable};
use std::borrow::Cow;
use tracing::debug;

/// Replace every generalized constraint of `model` by linear rows.
///
/// Models without generalized constraints are borrowed unchanged. Variable
/// ids of the input stay valid in the returned model.
pub fn lower_general_constraints(model: &Model) -> Result<Cow<'_, Model>, ModelError> {
    if model.num_general_constraints() == 0 {
        return Ok(Cow::Borrowed(model));
    }

    let mut lowered = model.clone();
    let general: Vec<_> = model
        .general_constraints()
        .map(|(id, gc)| (id, gc.clone()))
        .collect();
    let mut segments = 0usize;
    for (id, gc) in general {
        lowered.remove_general_constraint(id)?;
        segments += lower_one(&mut lowered, &gc)?;
    }

    debug!(
        component = "solver",
        operation = "lower_general",
        status = "success",
        general_constraints = model.num_general_constraints(),
        segment_binaries = segments,
        added_variables = lowered.num_variables() - model.num_variables(),
        added_rows = lowered.num_constraints() - model.num_constraints(),
        "Lowered generalized constraints to piecewise-linear rows"
    );
    Ok(Cow::Owned(lowered))
}

/// Lower one constraint; returns the number of segment binaries added.
fn lower_one(model: &mut Model, gc: &GeneralConstraint) -> Result<usize, ModelError> {
    let values = gc.values();
    if let ([point], [value]) = (gc.breakpoints.as_slice(), values.as_slice()) {
        model.add_constraint_expr(Expr::var(gc.argument).eq_scalar(*point))?;
        model.add_constraint_expr(Expr::var(gc.result).eq_scalar(*value))?;
        return Ok(0);
    }

    let weights = gc
        .breakpoints
        .iter()
        .map(|_| model.add_variable(Variable::continuous(Bounds::new(0.0, 1.0))))
        .collect::<Result<Vec<_>, _>>()?;

    model.add_constraint_expr(
        Expr::weighted(&weights, &gc.breakpoints)?.eq_expr(&Expr::var(gc.argument)),
    )?;
    model.add_constraint_expr(
        Expr::weighted(&weights, &values)?.eq_expr(&Expr::var(gc.result)),
    )?;
    model.add_constraint_expr(Expr::sum_of(weights.iter().copied()).eq_scalar(1.0))?;

    if weights.len() == 2 {
        return Ok(0);
    }

    let segments = (0..weights.len() - 1)
        .map(|_| model.add_variable(Variable::binary()))
        .collect::<Result<Vec<_>, _>>()?;
    model.add_constraint_expr(Expr::sum_of(segments.iter().copied()).eq_scalar(1.0))?;

    let last = weights.len() - 1;
    for (k, &weight) in weights.iter().enumerate() {
        let mut cover = Expr::new_empty();
        if k > 0 {
            cover.push_term(segments[k - 1], 1.0);
        }
        if k < last {
            cover.push_term(segments[k], 1.0);
        }
        model.add_constraint_expr(Expr::var(weight).le_expr(&cover))?;
    }
    Ok(segments.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relnet_core::GeneralFunction;

    fn log_model(breakpoints: Vec<f64>) -> Model {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous(Bounds::new(0.5, 1.0)))
            .unwrap();
        let y = model
            .add_variable(Variable::continuous(Bounds::new(-1.0, 0.0)))
            .unwrap();
        model.add_log_constraint(x, y, breakpoints).unwrap();
        model
    }

    #[test]
    fn test_linear_model_is_borrowed() {
        let mut model = Model::new();
        model.add_variable(Variable::binary()).unwrap();
        assert!(matches!(
            lower_general_constraints(&model).unwrap(),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_single_breakpoint_pins_both_sides() {
        let model = log_model(vec![0.9]);
        let lowered = lower_general_constraints(&model).unwrap();
        assert_eq!(lowered.num_general_constraints(), 0);
        assert_eq!(lowered.num_variables(), 2);
        assert_eq!(lowered.num_constraints(), 2);
    }

    #[test]
    fn test_two_breakpoints_skip_segment_binaries() {
        let model = log_model(vec![0.6, 0.9]);
        let lowered = lower_general_constraints(&model).unwrap();
        assert_eq!(lowered.num_variables(), 4);
        assert_eq!(lowered.num_constraints(), 3);
        assert!(lowered.variables().all(|(_, v)| !v.is_integer));
    }

    #[test]
    fn test_sos2_rows_for_many_breakpoints() {
        let model = log_model(vec![0.6, 0.7, 0.8, 0.9]);
        let lowered = lower_general_constraints(&model).unwrap();
        // 4 weights + 3 segment binaries
        assert_eq!(lowered.num_variables(), 2 + 4 + 3);
        // x, y and Σλ definitions, Σz, one adjacency row per weight
        assert_eq!(lowered.num_constraints(), 3 + 1 + 4);
        assert_eq!(lowered.variables().filter(|(_, v)| v.is_binary()).count(), 3);

        // original model untouched
        assert_eq!(model.num_general_constraints(), 1);
        let (_, gc) = model.general_constraints().next().unwrap();
        assert_eq!(gc.function, GeneralFunction::Log);
    }
}
