//! Series topology: every node must work.

use crate::base::{BaseFormulation, clone_without_link_cost};
use crate::catalog::Catalog;
use crate::error::{DesignError, check_link_cost, check_target};
use crate::formulation::{TopologyFormulation, add_node_log_reliability};
use crate::outcome::{SolveReport, Topology};
use relnet_core::{Expr, Solver};
use tracing::debug;

/// Extend `base` with `Σ_u ln r[u] ≥ ln(target)` and `N − 1` links.
pub fn build_series(
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
) -> Result<TopologyFormulation, DesignError> {
    check_link_cost(link_cost)?;
    check_target(target)?;

    let total_nodes = base.total_nodes();
    let links_cost = link_cost * Topology::Series.min_links(total_nodes) as f64;
    let mut model = clone_without_link_cost(base, catalog, links_cost)?;
    model.set_name(format!("series_{total_nodes}"));
    model.add_named_constraint(
        "LinksCost_Series",
        Expr::var(base.handles.links_cost).eq_scalar(links_cost),
    )?;

    let logs = add_node_log_reliability(&mut model, &base.handles, catalog)?;
    model.add_named_constraint(
        "Reliability_Series",
        Expr::sum_of(logs.iter().copied()).ge_scalar(target.ln()),
    )?;

    debug!(
        component = "design",
        operation = "build_series",
        status = "success",
        total_nodes,
        target,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "Built series formulation"
    );
    Ok(TopologyFormulation::new(
        Topology::Series,
        model,
        base,
        link_cost,
        target,
        None,
    ))
}

/// Build and solve the series formulation.
pub fn solve_series<S: Solver>(
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
    solver: &mut S,
) -> Result<SolveReport, DesignError> {
    build_series(base, catalog, link_cost, target)?.solve(catalog, solver)
}
