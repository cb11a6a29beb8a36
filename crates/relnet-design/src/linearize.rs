//! McCormick rows for products of a binary and a bounded continuous variable.

use relnet_core::{Bounds, Expr, Model, ModelError, Variable, VariableId};

/// Add `w = y·v` for binary `y` and `v ∈ [lower, upper]`; returns `w`.
///
/// With `y` binary the four envelope rows are exact:
///
/// ```text
/// lower·y ≤ w ≤ upper·y
/// v − upper·(1 − y) ≤ w ≤ v − lower·(1 − y)
/// ```
///
/// `y = 0` forces `w = 0`, `y = 1` forces `w = v`.
pub(crate) fn binary_product(
    model: &mut Model,
    binary: VariableId,
    value: VariableId,
    lower: f64,
    upper: f64,
) -> Result<VariableId, ModelError> {
    let product = model.add_variable(Variable::continuous(Bounds::new(
        lower.min(0.0),
        upper.max(0.0),
    )))?;
    let w = Expr::var(product);
    let y = Expr::var(binary);
    let v = Expr::var(value);

    model.add_constraint_expr(w.ge_expr(&(y.clone() * lower)))?;
    model.add_constraint_expr(w.le_expr(&(y.clone() * upper)))?;
    model.add_constraint_expr(w.ge_expr(&(v.clone() - (-y.clone() + 1.0) * upper)))?;
    model.add_constraint_expr(w.le_expr(&(v - (-y + 1.0) * lower)))?;
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_one_variable_and_four_rows() {
        let mut model = Model::new();
        let y = model.add_variable(Variable::binary()).unwrap();
        let v = model
            .add_variable(Variable::continuous(Bounds::new(-4.6, -0.1)))
            .unwrap();

        let w = binary_product(&mut model, y, v, -4.6, -0.1).unwrap();
        assert_eq!(model.num_variables(), 3);
        assert_eq!(model.num_constraints(), 4);
        assert_eq!(
            model.get_variable(w).unwrap().bounds,
            Bounds::new(-4.6, 0.0)
        );
    }

    #[test]
    fn test_rows_pin_product_for_both_binary_values() {
        let (lower, upper) = (-4.6_f64, -0.1_f64);
        let mut model = Model::new();
        let y = model.add_variable(Variable::binary()).unwrap();
        let v = model
            .add_variable(Variable::continuous(Bounds::new(lower, upper)))
            .unwrap();
        let w = binary_product(&mut model, y, v, lower, upper).unwrap();
        let rows = model.rows();

        let feasible = |yv: f64, vv: f64, wv: f64| {
            rows.iter().all(|(id, row)| {
                let activity: f64 = row
                    .iter()
                    .map(|(var, coeff)| {
                        coeff
                            * if *var == y {
                                yv
                            } else if *var == v {
                                vv
                            } else {
                                assert_eq!(*var, w);
                                wv
                            }
                    })
                    .sum();
                let bounds = model.get_constraint(*id).unwrap().bounds;
                activity >= bounds.lower - 1e-12 && activity <= bounds.upper + 1e-12
            })
        };

        assert!(feasible(1.0, -2.0, -2.0));
        assert!(!feasible(1.0, -2.0, -1.9));
        assert!(!feasible(1.0, -2.0, 0.0));
        assert!(feasible(0.0, -2.0, 0.0));
        assert!(!feasible(0.0, -2.0, -2.0));
        assert!(!feasible(0.0, -2.0, -0.05));
    }
}
