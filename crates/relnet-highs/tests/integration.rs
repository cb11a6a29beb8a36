#![allow(clippy::float_cmp)]

use relnet_core::{
    Bounds, Constraint, Expr, Model, Objective, Sense, Solver, SolverConfig, SolverError,
    SolverStatus, Variable,
};
use relnet_highs::HighsSolver;

/// minimize 2x + 3y subject to x + y >= 5
#[test]
fn test_simple_lp() {
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous(Bounds::new(0.0, 100.0)))
        .unwrap();
    let y = model
        .add_variable(Variable::continuous(Bounds::new(0.0, 100.0)))
        .unwrap();

    let constraint = model
        .add_constraint(Constraint {
            bounds: Bounds::new(5.0, f64::INFINITY),
        })
        .unwrap();
    model.set_coefficient(x, constraint, 1.0).unwrap();
    model.set_coefficient(y, constraint, 1.0).unwrap();
    model
        .set_objective(Objective {
            sense: Some(Sense::Minimize),
            terms: vec![(x, 2.0), (y, 3.0)],
            offset: 0.0,
        })
        .unwrap();

    let solution = HighsSolver::new().solve(&model).expect("solve");
    assert!(solution.is_optimal());
    assert!((solution.objective_value - 10.0).abs() < 1e-6);
    assert!((solution.value(x).unwrap() - 5.0).abs() < 1e-6);
    assert!(solution.value(y).unwrap().abs() < 1e-6);
}

#[test]
fn test_integer_variable_and_offset() {
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::integer(Bounds::new(0.0, 10.0)))
        .unwrap();
    model
        .add_constraint_expr(Expr::var(x).le_scalar(1.5))
        .unwrap();
    model.maximize(Expr::var(x) + 0.25).unwrap();

    let solution = HighsSolver::new().solve(&model).expect("solve");
    assert_eq!(solution.rounded(x), Some(1));
    assert!((solution.objective_value - 1.25).abs() < 1e-6);
}

#[test]
fn test_infeasible_model_reports_failure() {
    let mut model = Model::new();
    let a = model.add_variable(Variable::binary()).unwrap();
    let b = model.add_variable(Variable::binary()).unwrap();
    model
        .add_constraint_expr((Expr::var(a) + Expr::var(b)).ge_scalar(3.0))
        .unwrap();
    model.minimize(Expr::var(a)).unwrap();

    let err = HighsSolver::new().solve(&model).unwrap_err();
    assert!(matches!(
        err,
        SolverError::SolveFailure {
            status: SolverStatus::Infeasible
        }
    ));
}

/// Picking among catalog reliabilities through a log constraint is exact.
#[test]
fn test_log_constraint_exact_on_breakpoints() {
    let reliabilities = [0.6, 0.7, 0.8];
    let costs = [5.0, 12.0, 30.0];
    let mut model = Model::new();

    let mut log_terms = Vec::new();
    let mut cost = Expr::new_empty();
    let mut picks = Vec::new();
    for _ in 0..2 {
        let x: Vec<_> = (0..3)
            .map(|_| model.add_variable(Variable::binary()).unwrap())
            .collect();
        model
            .add_constraint_expr(Expr::sum_of(x.iter().copied()).eq_scalar(1.0))
            .unwrap();
        let r = model
            .add_variable(Variable::continuous(Bounds::new(0.6, 0.8)))
            .unwrap();
        model
            .add_constraint_expr(
                Expr::var(r).eq_expr(&Expr::weighted(&x, &reliabilities).unwrap()),
            )
            .unwrap();
        let log_r = model
            .add_variable(Variable::continuous(Bounds::new(0.6_f64.ln(), 0.8_f64.ln())))
            .unwrap();
        model
            .add_log_constraint(r, log_r, reliabilities.to_vec())
            .unwrap();
        log_terms.push(log_r);
        cost = cost + Expr::weighted(&x, &costs).unwrap();
        picks.push(x);
    }
    // r0 * r1 >= 0.55 needs at least 0.7 * 0.8 = 0.56
    model
        .add_constraint_expr(Expr::sum_of(log_terms.iter().copied()).ge_scalar(0.55_f64.ln()))
        .unwrap();
    model.minimize(cost).unwrap();

    let solution = HighsSolver::new().solve(&model).expect("solve");
    assert!((solution.objective_value - 42.0).abs() < 1e-6);

    let product: f64 = picks
        .iter()
        .map(|x| {
            x.iter()
                .zip(reliabilities)
                .filter(|(var, _)| solution.rounded(**var) == Some(1))
                .map(|(_, r)| r)
                .sum::<f64>()
        })
        .product();
    assert!((product - 0.56).abs() < 1e-9);
    // auxiliaries added by lowering are not reported
    assert_eq!(solution.values.len(), model.num_variables());
}

#[test]
fn test_exp_constraint_interpolates_between_breakpoints() {
    let mut model = Model::new();
    let s = model
        .add_variable(Variable::continuous(Bounds::new(-2.0, 0.0)))
        .unwrap();
    let e = model
        .add_variable(Variable::continuous(Bounds::new(0.0, 1.0)))
        .unwrap();
    model.add_exp_constraint(s, e, vec![-2.0, -1.0, 0.0]).unwrap();
    model
        .add_constraint_expr(Expr::var(s).eq_scalar(-1.0))
        .unwrap();
    model.minimize(Expr::var(e)).unwrap();

    let solution = HighsSolver::new().solve(&model).expect("solve");
    assert!((solution.value(e).unwrap() - (-1.0_f64).exp()).abs() < 1e-7);
}

#[test]
fn test_config_is_applied() {
    let mut model = Model::new();
    let x = model.add_variable(Variable::binary()).unwrap();
    model.minimize(Expr::var(x)).unwrap();

    let config = SolverConfig::new()
        .with_time_limit(10.0)
        .with_mip_gap(0.0)
        .with_threads(1)
        .with_presolve(false);
    let solution = HighsSolver::with_config(config).solve(&model).expect("solve");
    assert!(solution.is_optimal());
    assert!(solution.metadata.contains_key("num_cols"));
}

#[test]
fn test_invalid_config_is_rejected_before_solving() {
    let mut model = Model::new();
    let x = model.add_variable(Variable::binary()).unwrap();
    model.minimize(Expr::var(x)).unwrap();

    let err = HighsSolver::with_config(SolverConfig::new().with_mip_gap(-0.1))
        .solve(&model)
        .unwrap_err();
    assert_eq!(err.code(), "SOLVER_INVALID_CONFIG");
}
