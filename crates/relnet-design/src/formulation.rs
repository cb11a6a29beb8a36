//! Shared plumbing of the topology formulations: node reliability rows,
//! solving, and decoding solutions through typed handles.

use crate::base::{BaseFormulation, BaseHandles};
use crate::catalog::Catalog;
use crate::error::DesignError;
use crate::hybrid::{HybridOptions, solve_hybrid};
use crate::outcome::{Design, DesignOutcome, SolveReport, SubnetLayout, Topology};
use crate::parallel::solve_parallel;
use crate::reliability::{hybrid_reliability, parallel_reliability, series_reliability};
use crate::series::solve_series;
use relnet_core::{Bounds, Expr, Model, Solution, Solver, SolverError, Variable, VariableId};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Slack accepted between the achieved and the required reliability of a
/// decoded design, covering solver feasibility tolerances.
const RELIABILITY_TOLERANCE: f64 = 1e-9;

/// A topology model ready to solve, with the handles needed to decode it.
#[derive(Debug, Clone)]
pub struct TopologyFormulation {
    topology: Topology,
    model: Model,
    base: BaseHandles,
    link_cost: f64,
    target: f64,
    /// Hybrid only: `membership[u][j]` is the binary `y[u,j]`.
    membership: Option<Vec<Vec<VariableId>>>,
}

impl TopologyFormulation {
    pub(crate) fn new(
        topology: Topology,
        model: Model,
        base: &BaseFormulation,
        link_cost: f64,
        target: f64,
        membership: Option<Vec<Vec<VariableId>>>,
    ) -> Self {
        Self {
            topology,
            model,
            base: base.handles.clone(),
            link_cost,
            target,
            membership,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Solve the model and decode the result.
    ///
    /// Infeasibility and limits are outcomes; only unexpected solver states
    /// and undecodable optimal points are errors.
    pub fn solve<S: Solver>(
        self,
        catalog: &Catalog,
        solver: &mut S,
    ) -> Result<SolveReport, DesignError> {
        let (outcome, status) = match solver.solve(&self.model) {
            Ok(solution) if solution.is_optimal() => {
                let design = self.decode(&solution, catalog)?;
                if !design.meets_target(RELIABILITY_TOLERANCE) {
                    warn!(
                        component = "design",
                        operation = "decode",
                        status = "warn",
                        topology = self.topology.as_str(),
                        achieved = design.achieved_reliability,
                        required = self.target,
                        "Optimal design misses the target within solver tolerance"
                    );
                }
                (DesignOutcome::Optimal(design), solution.status)
            }
            Ok(solution) => {
                let incumbent = match self.decode(&solution, catalog) {
                    Ok(design) if design.meets_target(RELIABILITY_TOLERANCE) => {
                        Some(Box::new(design))
                    }
                    Ok(_) => None,
                    Err(err) => {
                        debug!(
                            component = "design",
                            operation = "decode",
                            status = "skipped",
                            error = %err,
                            "Discarding incumbent of interrupted solve"
                        );
                        None
                    }
                };
                (DesignOutcome::TimedOut { incumbent }, solution.status)
            }
            Err(SolverError::SolveFailure { status }) if status.is_infeasible() => {
                (DesignOutcome::Infeasible, status)
            }
            Err(SolverError::SolveFailure { status }) if status.is_limit() => {
                (DesignOutcome::TimedOut { incumbent: None }, status)
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            component = "design",
            operation = "solve",
            status = "success",
            topology = self.topology.as_str(),
            total_nodes = self.base.total_nodes(),
            target = self.target,
            outcome = outcome.as_str(),
            solver_status = status.as_str(),
            total_cost = ?outcome.design().map(|d| d.total_cost),
            "Solved design"
        );

        Ok(SolveReport {
            outcome,
            model: self.model,
            status,
        })
    }

    fn decode(&self, solution: &Solution, catalog: &Catalog) -> Result<Design, DesignError> {
        let total_nodes = self.base.total_nodes();
        let node_types = self
            .base
            .assignment
            .iter()
            .enumerate()
            .map(|(u, row)| single_choice(solution, row, || format!("node {u} type")))
            .collect::<Result<Vec<_>, _>>()?;
        let chosen = node_types
            .iter()
            .map(|&i| {
                catalog.get(i).ok_or_else(|| DesignError::Decode {
                    reason: format!("type {i} is not in the catalog"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let reliabilities: Vec<f64> = chosen.iter().map(|t| t.reliability).collect();

        let subnets = self
            .membership
            .as_ref()
            .map(|membership| decode_layout(solution, membership))
            .transpose()?;

        let (link_count, achieved_reliability) = match (self.topology, &subnets) {
            (Topology::Series, _) => (total_nodes - 1, series_reliability(&reliabilities)),
            (Topology::Parallel, _) => (
                total_nodes * (total_nodes - 1) / 2,
                parallel_reliability(&reliabilities),
            ),
            (Topology::Hybrid, Some(layout)) => {
                let pick = |members: &[usize]| -> Vec<f64> {
                    members.iter().map(|&u| reliabilities[u]).collect()
                };
                let groups: Vec<Vec<f64>> =
                    layout.parallel.iter().map(|members| pick(members)).collect();
                (
                    layout.link_count(),
                    hybrid_reliability(&pick(&layout.series), &groups),
                )
            }
            (Topology::Hybrid, None) => {
                return Err(DesignError::Decode {
                    reason: "hybrid formulation without subnet handles".to_string(),
                });
            }
        };

        let nodes_cost: f64 = chosen.iter().map(|t| t.cost).sum();
        let links_cost = self.link_cost * link_count as f64;
        let mut type_counts = vec![0; catalog.len()];
        for &i in &node_types {
            type_counts[i] += 1;
        }
        let decision_variables: BTreeMap<String, f64> = self
            .model
            .named_variables()
            .filter_map(|(id, name)| solution.value(id).map(|value| (name.to_string(), value)))
            .collect();

        Ok(Design {
            topology: self.topology,
            total_nodes,
            total_cost: nodes_cost + links_cost,
            nodes_cost,
            links_cost,
            link_count,
            node_types,
            type_counts,
            subnets,
            achieved_reliability,
            required_reliability: self.target,
            objective_value: solution.objective_value,
            decision_variables,
        })
    }
}

/// Index of the single binary set in `row`.
fn single_choice(
    solution: &Solution,
    row: &[VariableId],
    what: impl Fn() -> String,
) -> Result<usize, DesignError> {
    let set: Vec<usize> = row
        .iter()
        .enumerate()
        .filter(|(_, var)| solution.value(**var).is_some_and(|v| v > 0.5))
        .map(|(index, _)| index)
        .collect();
    match set.as_slice() {
        [index] => Ok(*index),
        _ => Err(DesignError::Decode {
            reason: format!("{} has {} selections instead of one", what(), set.len()),
        }),
    }
}

fn decode_layout(
    solution: &Solution,
    membership: &[Vec<VariableId>],
) -> Result<SubnetLayout, DesignError> {
    let subnets = membership.first().map_or(0, Vec::len);
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); subnets];
    for (u, row) in membership.iter().enumerate() {
        let j = single_choice(solution, row, || format!("node {u} subnet"))?;
        groups[j].push(u);
    }

    let mut groups = groups.into_iter();
    let series = groups.next().unwrap_or_default();
    let parallel: Vec<Vec<usize>> = groups.filter(|members| !members.is_empty()).collect();
    if let Some(small) = parallel.iter().find(|members| members.len() < 3) {
        return Err(DesignError::Decode {
            reason: format!("parallel subnet with {} members", small.len()),
        });
    }
    if parallel.is_empty() {
        return Err(DesignError::Decode {
            reason: "no active parallel subnet".to_string(),
        });
    }
    Ok(SubnetLayout { series, parallel })
}

/// Per node `r[u] = Σ r_i·x[u,i]` and `ln r[u]`; returns the log variables.
pub(crate) fn add_node_log_reliability(
    model: &mut Model,
    base: &BaseHandles,
    catalog: &Catalog,
) -> Result<Vec<VariableId>, DesignError> {
    let reliabilities = catalog.reliabilities();
    let breakpoints = catalog.reliability_breakpoints();
    let (lower, upper) = (catalog.min_reliability(), catalog.max_reliability());

    let mut logs = Vec::with_capacity(base.total_nodes());
    for (u, row) in base.assignment.iter().enumerate() {
        let r = model.add_named_variable(
            format!("nodeReliability[{u}]"),
            Variable::continuous(Bounds::new(lower, upper)),
        )?;
        model.add_constraint_expr(Expr::var(r).eq_expr(&Expr::weighted(row, &reliabilities)?))?;
        let log_r = model.add_named_variable(
            format!("logNodeReliability[{u}]"),
            Variable::continuous(Bounds::new(lower.ln(), upper.ln())),
        )?;
        model.add_log_constraint(r, log_r, breakpoints.clone())?;
        logs.push(log_r);
    }
    Ok(logs)
}

/// Per node `q[u] = 1 − Σ r_i·x[u,i]` and `ln q[u]`; returns the log variables.
pub(crate) fn add_node_log_unreliability(
    model: &mut Model,
    base: &BaseHandles,
    catalog: &Catalog,
) -> Result<Vec<VariableId>, DesignError> {
    let reliabilities = catalog.reliabilities();
    let breakpoints = catalog.unreliability_breakpoints();
    let (lower, upper) = (
        1.0 - catalog.max_reliability(),
        1.0 - catalog.min_reliability(),
    );

    let mut logs = Vec::with_capacity(base.total_nodes());
    for (u, row) in base.assignment.iter().enumerate() {
        let q = model.add_named_variable(
            format!("nodeUnreliability[{u}]"),
            Variable::continuous(Bounds::new(lower, upper)),
        )?;
        model.add_constraint_expr(
            (Expr::var(q) + Expr::weighted(row, &reliabilities)?).eq_scalar(1.0),
        )?;
        let log_q = model.add_named_variable(
            format!("logNodeUnreliability[{u}]"),
            Variable::continuous(Bounds::new(lower.ln(), upper.ln())),
        )?;
        model.add_log_constraint(q, log_q, breakpoints.clone())?;
        logs.push(log_q);
    }
    Ok(logs)
}

/// Solve one topology on a shared base.
pub fn solve_topology<S: Solver>(
    topology: Topology,
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
    options: &HybridOptions,
    solver: &mut S,
) -> Result<SolveReport, DesignError> {
    match topology {
        Topology::Series => solve_series(base, catalog, link_cost, target, solver),
        Topology::Parallel => solve_parallel(base, catalog, link_cost, target, solver),
        Topology::Hybrid => solve_hybrid(base, catalog, link_cost, target, options, solver),
    }
}
