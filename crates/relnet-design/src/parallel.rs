//! Parallel topology: the network works while any node does.

use crate::base::{BaseFormulation, clone_without_link_cost};
use crate::catalog::Catalog;
use crate::error::{DesignError, check_link_cost, check_target};
use crate::formulation::{TopologyFormulation, add_node_log_unreliability};
use crate::outcome::{SolveReport, Topology};
use relnet_core::{Expr, Solver};
use tracing::debug;

/// Extend `base` with `Σ_u ln(1 − r[u]) ≤ ln(1 − target)` and `N(N − 1)/2` links.
pub fn build_parallel(
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
) -> Result<TopologyFormulation, DesignError> {
    check_link_cost(link_cost)?;
    check_target(target)?;

    let total_nodes = base.total_nodes();
    let links_cost = link_cost * Topology::Parallel.min_links(total_nodes) as f64;
    let mut model = clone_without_link_cost(base, catalog, links_cost)?;
    model.set_name(format!("parallel_{total_nodes}"));
    model.add_named_constraint(
        "LinksCost_Parallel",
        Expr::var(base.handles.links_cost).eq_scalar(links_cost),
    )?;

    let logs = add_node_log_unreliability(&mut model, &base.handles, catalog)?;
    model.add_named_constraint(
        "Reliability_Parallel",
        Expr::sum_of(logs.iter().copied()).le_scalar((1.0 - target).ln()),
    )?;

    debug!(
        component = "design",
        operation = "build_parallel",
        status = "success",
        total_nodes,
        target,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "Built parallel formulation"
    );
    Ok(TopologyFormulation::new(
        Topology::Parallel,
        model,
        base,
        link_cost,
        target,
        None,
    ))
}

/// Build and solve the parallel formulation.
pub fn solve_parallel<S: Solver>(
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
    solver: &mut S,
) -> Result<SolveReport, DesignError> {
    build_parallel(base, catalog, link_cost, target)?.solve(catalog, solver)
}
