//! HiGHS implementation of the [`Solver`] trait.

use crate::ffi::{HighsModel, HighsModelError, HighsOption, ObjectiveSense};
use crate::lower::lower_general_constraints;
use crate::status::{highs_status_string, highs_to_core_status};
use relnet_core::{Model, Sense, Solution, Solver, SolverConfig, SolverError, VariableId};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, trace, warn};

fn highs_model_error_to_solver_error(err: HighsModelError) -> SolverError {
    SolverError::SolverSpecific(err.to_string())
}

/// HiGHS-backed solver. Holds only configuration, so one instance can solve
/// many models.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }
}

impl Solver for HighsSolver {
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
        solve_model(model, &self.config)
    }
}

fn validate_model(model: &Model) -> Result<Sense, SolverError> {
    if model.num_variables() == 0 {
        return Err(SolverError::EmptyModel);
    }
    model.objective().sense.ok_or(SolverError::NoObjective)
}

fn apply_solver_config(highs_model: &mut HighsModel, config: &SolverConfig) {
    highs_model.set_log_to_console(config.log_to_console.unwrap_or(false));

    if let Some(limit) = config.time_limit {
        highs_model.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        highs_model.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(presolve) = config.presolve {
        let presolve_str = if presolve { "on" } else { "off" };
        highs_model.set_option("presolve", HighsOption::Str(presolve_str.to_string()));
    }
    if let Some(threads) = config.threads {
        highs_model.set_option(
            "threads",
            HighsOption::Int(i32::try_from(threads).unwrap_or(i32::MAX)),
        );
    }
    if let Some(tolerance) = config.tolerance {
        highs_model.set_option(
            "primal_feasibility_tolerance",
            HighsOption::Float(tolerance),
        );
        highs_model.set_option("mip_feasibility_tolerance", HighsOption::Float(tolerance));
    }
}

fn add_variables_to_highs(
    model: &Model,
    highs_model: &mut HighsModel,
) -> Result<BTreeMap<VariableId, usize>, SolverError> {
    let mut objective_coeffs: BTreeMap<VariableId, f64> = BTreeMap::new();
    for (var_id, coeff) in &model.objective().terms {
        if !model.has_variable(*var_id) {
            return Err(SolverError::InvalidVariableId(var_id.inner()));
        }
        *objective_coeffs.entry(*var_id).or_insert(0.0) += *coeff;
    }

    let mut var_id_to_col = BTreeMap::new();
    for (var_id, var) in model.variables() {
        let obj_coeff = objective_coeffs.get(&var_id).copied().unwrap_or(0.0);
        let col_idx = if var.is_integer {
            highs_model.add_integer_col(var.bounds.lower, var.bounds.upper, obj_coeff)
        } else {
            highs_model.add_col(var.bounds.lower, var.bounds.upper, obj_coeff)
        };
        var_id_to_col.insert(var_id, col_idx);
    }

    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_vars = var_id_to_col.len(),
        "Added all variables to HiGHS"
    );
    Ok(var_id_to_col)
}

fn add_constraints_to_highs(
    model: &Model,
    highs_model: &mut HighsModel,
    var_id_to_col: &BTreeMap<VariableId, usize>,
) -> Result<(), SolverError> {
    for (constraint_id, row) in model.rows() {
        let constraint = model.get_constraint(constraint_id)?;
        let mut col_indices = Vec::with_capacity(row.len());
        let mut coefficients = Vec::with_capacity(row.len());
        for (var_id, coeff) in row {
            let col_idx = var_id_to_col
                .get(&var_id)
                .ok_or(SolverError::InvalidVariableId(var_id.inner()))?;
            col_indices.push(*col_idx);
            coefficients.push(coeff);
        }
        highs_model
            .add_row(
                constraint.bounds.lower,
                constraint.bounds.upper,
                &col_indices,
                &coefficients,
            )
            .map_err(highs_model_error_to_solver_error)?;

        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            num_coeffs = col_indices.len(),
            "Added constraint to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = highs_model.num_rows(),
        "Added all constraints to HiGHS"
    );
    Ok(())
}

fn solve_model(model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
    config.validate()?;
    let sense = validate_model(model)?;
    let solve_started = Instant::now();

    let lowered = lower_general_constraints(model)?;
    debug!(
        component = "solver",
        operation = "solve",
        status = "started",
        solver = "highs",
        model = model.name().unwrap_or("unnamed"),
        variables = lowered.num_variables(),
        constraints = lowered.num_constraints(),
        nnz = lowered.num_coefficients(),
        "Starting solve process"
    );

    let mut highs_model = HighsModel::new();
    apply_solver_config(&mut highs_model, config);
    highs_model.set_objective_sense(match sense {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    });

    let var_id_to_col = add_variables_to_highs(&lowered, &mut highs_model)?;
    add_constraints_to_highs(&lowered, &mut highs_model, &var_id_to_col)?;
    let num_cols = highs_model.num_columns();
    let num_rows = highs_model.num_rows();

    let highs_status = highs_model.solve();
    let status = highs_to_core_status(highs_status, lowered.is_fully_bounded());
    let duration_ms = solve_started.elapsed().as_secs_f64() * 1000.0;
    let mip_gap = highs_model.mip_gap();

    let col_values = highs_model
        .col_values()
        .map_err(highs_model_error_to_solver_error)?;
    let has_point = status.is_feasible() && col_values.len() == num_cols;

    if !has_point {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = highs_status_string(highs_status),
            duration_ms,
            "Solver finished without a usable solution"
        );
        return Err(SolverError::SolveFailure { status });
    }
    if !status.is_optimal() {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = highs_status_string(highs_status),
            mip_gap,
            duration_ms,
            "Solver hit limit but returning best solution found"
        );
    }

    let objective_value = highs_model
        .objective_value()
        .map_err(highs_model_error_to_solver_error)?
        + model.objective().offset;

    // Only ids of the caller's model are reported; lowering auxiliaries are dropped.
    let values: BTreeMap<VariableId, f64> = model
        .variables()
        .filter_map(|(var_id, _)| {
            let col_idx = var_id_to_col.get(&var_id)?;
            col_values.get(*col_idx).map(|value| (var_id, *value))
        })
        .collect();

    let mut metadata = BTreeMap::new();
    metadata.insert("mip_gap".to_string(), mip_gap);
    metadata.insert("num_cols".to_string(), num_cols as f64);
    metadata.insert("num_rows".to_string(), num_rows as f64);

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_status = status.as_str(),
        objective_value,
        mip_gap,
        duration_ms,
        "HiGHS solve completed"
    );

    Ok(Solution {
        status,
        objective_value,
        values,
        solve_time_seconds: solve_started.elapsed().as_secs_f64(),
        metadata,
    })
}
