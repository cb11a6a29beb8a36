//! Hybrid topology: a series backbone chained to fully-linked parallel subnets.
//!
//! Subnet `0` is the backbone; subnets `1..=⌊N/3⌋` are parallel candidates.
//! A node joins exactly one subnet, an active parallel subnet has at least
//! three members, at least one parallel subnet is active and the backbone
//! keeps at least [`HybridOptions::min_series_nodes`] nodes.
//!
//! Log reliability of the backbone is `Σ_u y[u,0]·ln r[u]`; each parallel
//! subnet sums `s_j = Σ_u y[u,j]·ln(1 − r[u])` and contributes at most
//! `ln(1 − e^{s_j})`, bounded from above by chords through every value `s_j`
//! can take. Products of
//! binaries and node logs use exact McCormick rows.

use crate::base::{BaseFormulation, clone_without_link_cost};
use crate::catalog::Catalog;
use crate::envelope::{SecantEnvelope, complement_log, subnet_breakpoints};
use crate::error::{DesignError, check_link_cost, check_target};
use crate::formulation::{
    TopologyFormulation, add_node_log_reliability, add_node_log_unreliability,
};
use crate::linearize::binary_product;
use crate::outcome::{SolveReport, Topology};
use relnet_core::{Bounds, Expr, Model, Solver, Variable, VariableId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Smallest active parallel subnet.
pub const MIN_PARALLEL_SUBNET: usize = 3;

/// Tuning of the hybrid formulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridOptions {
    /// Fewest nodes kept on the series backbone.
    pub min_series_nodes: usize,
    /// Upper limit on envelope segments per subnet. Catalogs with more
    /// reachable subnet values than this get a thinned, conservative envelope.
    pub max_envelope_segments: usize,
}

impl Default for HybridOptions {
    fn default() -> Self {
        Self {
            min_series_nodes: 1,
            max_envelope_segments: 4096,
        }
    }
}

impl HybridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_series_nodes(mut self, nodes: usize) -> Self {
        self.min_series_nodes = nodes;
        self
    }

    pub fn with_max_envelope_segments(mut self, segments: usize) -> Self {
        self.max_envelope_segments = segments;
        self
    }

    /// Check the options against a network of `total_nodes` nodes.
    pub fn validate(&self, total_nodes: usize) -> Result<(), DesignError> {
        let invalid = |reason: String| DesignError::InvalidOptions { reason };
        if self.max_envelope_segments == 0 {
            return Err(invalid("at least one envelope segment is required".into()));
        }
        if self.min_series_nodes + MIN_PARALLEL_SUBNET > total_nodes {
            return Err(invalid(format!(
                "{} backbone nodes leave no room for a parallel subnet of {} among {} nodes",
                self.min_series_nodes, MIN_PARALLEL_SUBNET, total_nodes
            )));
        }
        Ok(())
    }
}

/// Subnet-level variables of one candidate.
struct Subnet {
    size: VariableId,
    active: VariableId,
}

/// Extend `base` with the subnet assignment, link count and nested reliability.
pub fn build_hybrid(
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
    options: &HybridOptions,
) -> Result<TopologyFormulation, DesignError> {
    check_link_cost(link_cost)?;
    check_target(target)?;
    let n = base.total_nodes();
    options.validate(n)?;

    let candidates = n / MIN_PARALLEL_SUBNET;
    let subnet_count = candidates + 1;
    let max_parallel = n - options.min_series_nodes;
    let max_links = n + n * (n - 1) / 2;

    let mut model = clone_without_link_cost(base, catalog, link_cost * max_links as f64)?;
    model.set_name(format!("hybrid_{n}"));

    // y[u,j]
    let mut membership = Vec::with_capacity(n);
    for u in 0..n {
        let row = (0..subnet_count)
            .map(|j| model.add_named_variable(format!("y[{u},{j}]"), Variable::binary()))
            .collect::<Result<Vec<_>, _>>()?;
        model.add_named_constraint(
            format!("OneSubnet[{u}]"),
            Expr::sum_of(row.iter().copied()).eq_scalar(1.0),
        )?;
        membership.push(row);
    }

    let mut subnets = Vec::with_capacity(subnet_count);
    for j in 0..subnet_count {
        let size_bounds = if j == 0 {
            Bounds::new(
                options.min_series_nodes as f64,
                (n - MIN_PARALLEL_SUBNET) as f64,
            )
        } else {
            Bounds::new(0.0, max_parallel as f64)
        };
        let size = model.add_named_variable(
            format!("nodesInSubnet[{j}]"),
            Variable::integer(size_bounds),
        )?;
        let active = model.add_named_variable(format!("active[{j}]"), Variable::binary())?;

        let members = Expr::sum_of(membership.iter().map(|row| row[j]));
        model.add_constraint_expr(Expr::var(size).eq_expr(&members))?;
        for row in &membership {
            model.add_constraint_expr(Expr::var(active).ge_expr(&Expr::var(row[j])))?;
        }
        model.add_constraint_expr(Expr::var(active).le_expr(&Expr::var(size)))?;
        subnets.push(Subnet { size, active });
    }

    let mut internal_links = Vec::with_capacity(candidates);
    for (j, subnet) in subnets.iter().enumerate().skip(1) {
        internal_links.push(add_size_indicators(&mut model, j, subnet, max_parallel)?);
    }

    let parallel = &subnets[1..];
    model.add_named_constraint(
        "AtLeastOneParallel",
        Expr::sum_of(parallel.iter().map(|s| s.active)).ge_scalar(1.0),
    )?;
    model.add_named_constraint(
        "NodeAccounting",
        Expr::sum_of(subnets.iter().map(|s| s.size)).eq_scalar(n as f64),
    )?;
    for pair in parallel.windows(2) {
        model.add_constraint_expr(Expr::var(pair[0].size).ge_expr(&Expr::var(pair[1].size)))?;
        model.add_constraint_expr(
            Expr::var(pair[0].active).ge_expr(&Expr::var(pair[1].active)),
        )?;
    }

    // links = backbone nodes + active parallel subnets − 1 + internal links
    let link_count = Expr::var(subnets[0].size)
        + Expr::sum_of(parallel.iter().map(|s| s.active))
        + Expr::sum_of(internal_links.iter().copied())
        - 1.0;
    model.add_named_constraint(
        "LinksCost_Hybrid",
        Expr::var(base.handles.links_cost).eq_expr(&(link_count * link_cost)),
    )?;

    add_hybrid_reliability(
        &mut model,
        base,
        catalog,
        &membership,
        &subnets,
        target,
        options,
    )?;

    debug!(
        component = "design",
        operation = "build_hybrid",
        status = "success",
        total_nodes = n,
        candidates,
        target,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "Built hybrid formulation"
    );
    Ok(TopologyFormulation::new(
        Topology::Hybrid,
        model,
        base,
        link_cost,
        target,
        Some(membership),
    ))
}

/// One-hot size indicators `c[j,k]` for `k ∈ {0} ∪ [3, max_size]`.
///
/// They make `internalLinks[j] = k(k − 1)/2` and the activation exact.
/// Returns the internal-links variable.
fn add_size_indicators(
    model: &mut Model,
    j: usize,
    subnet: &Subnet,
    max_size: usize,
) -> Result<VariableId, DesignError> {
    let sizes: Vec<usize> = std::iter::once(0)
        .chain(MIN_PARALLEL_SUBNET..=max_size)
        .collect();
    let indicators = sizes
        .iter()
        .map(|_| model.add_variable(Variable::binary()))
        .collect::<Result<Vec<_>, _>>()?;
    let internal = model.add_named_variable(
        format!("internalLinks[{j}]"),
        Variable::integer(Bounds::new(0.0, (max_size * (max_size - 1) / 2) as f64)),
    )?;

    let size_values: Vec<f64> = sizes.iter().map(|&k| k as f64).collect();
    let link_values: Vec<f64> = sizes
        .iter()
        .map(|&k| (k * k.saturating_sub(1) / 2) as f64)
        .collect();
    model.add_constraint_expr(Expr::sum_of(indicators.iter().copied()).eq_scalar(1.0))?;
    model.add_constraint_expr(
        Expr::var(subnet.size).eq_expr(&Expr::weighted(&indicators, &size_values)?),
    )?;
    model.add_constraint_expr(
        Expr::var(internal).eq_expr(&Expr::weighted(&indicators, &link_values)?),
    )?;
    // active[j] = 1 − c[j,0]
    model.add_constraint_expr(
        (Expr::var(subnet.active) + Expr::var(indicators[0])).eq_scalar(1.0),
    )?;
    model.add_constraint_expr(
        Expr::var(subnet.size).ge_expr(&Expr::term(subnet.active, MIN_PARALLEL_SUBNET as f64)),
    )?;
    Ok(internal)
}

fn add_hybrid_reliability(
    model: &mut Model,
    base: &BaseFormulation,
    catalog: &Catalog,
    membership: &[Vec<VariableId>],
    subnets: &[Subnet],
    target: f64,
    options: &HybridOptions,
) -> Result<(), DesignError> {
    let n = base.total_nodes();
    let log_r = add_node_log_reliability(model, &base.handles, catalog)?;
    let log_q = add_node_log_unreliability(model, &base.handles, catalog)?;
    let (r_lo, r_hi) = (
        catalog.min_reliability().ln(),
        catalog.max_reliability().ln(),
    );
    let (q_lo, q_hi) = (
        (1.0 - catalog.max_reliability()).ln(),
        (1.0 - catalog.min_reliability()).ln(),
    );

    let mut subnet_logs = Vec::with_capacity(subnets.len());

    // backbone: Σ_u y[u,0]·ln r[u]
    let backbone = model.add_named_variable(
        "logSubnetReliability[0]",
        Variable::continuous(Bounds::new((n - MIN_PARALLEL_SUBNET) as f64 * r_lo, 0.0)),
    )?;
    let mut terms = Expr::new_empty();
    for (row, &lr) in membership.iter().zip(&log_r) {
        terms.push_term(binary_product(model, row[0], lr, r_lo, r_hi)?, 1.0);
    }
    model.add_constraint_expr(Expr::var(backbone).eq_expr(&terms))?;
    subnet_logs.push(backbone);

    // parallel subnets: t_j ≤ ln(1 − e^{s_j}) when active, t_j = 0 otherwise
    let max_parallel = n - options.min_series_nodes;
    let s_lo = max_parallel as f64 * q_lo;
    let s_hi = MIN_PARALLEL_SUBNET as f64 * q_hi;
    let node_logs: Vec<f64> = catalog
        .unreliability_breakpoints()
        .iter()
        .map(|q| q.ln())
        .collect();
    let breakpoints = subnet_breakpoints(
        &node_logs,
        MIN_PARALLEL_SUBNET,
        max_parallel,
        options.max_envelope_segments,
    );
    if !breakpoints.exact {
        warn!(
            component = "design",
            operation = "hybrid_envelope",
            status = "thinned",
            segments = breakpoints.points.len().saturating_sub(1),
            "Subnet envelope thinned below the reachable values"
        );
    }
    let envelope = SecantEnvelope::complement_log(&breakpoints.points);
    let t_lo = complement_log(s_hi);

    for (j, subnet) in subnets.iter().enumerate().skip(1) {
        let s = model.add_named_variable(
            format!("logSubnetUnreliability[{j}]"),
            Variable::continuous(Bounds::new(s_lo, 0.0)),
        )?;
        let mut terms = Expr::new_empty();
        for (row, &lq) in membership.iter().zip(&log_q) {
            terms.push_term(binary_product(model, row[j], lq, q_lo, q_hi)?, 1.0);
        }
        model.add_constraint_expr(Expr::var(s).eq_expr(&terms))?;

        let t = model.add_named_variable(
            format!("logSubnetReliability[{j}]"),
            Variable::continuous(Bounds::new(t_lo, 0.0)),
        )?;
        for line in envelope.lines() {
            // relaxed by M when inactive, where s_j = 0
            let relax = (-line.intercept).max(0.0);
            model.add_constraint_expr(
                (Expr::var(t) - Expr::term(s, line.slope) + Expr::term(subnet.active, relax))
                    .le_scalar(line.intercept + relax),
            )?;
        }
        model.add_constraint_expr(Expr::var(t).ge_expr(&Expr::term(subnet.active, t_lo)))?;
        subnet_logs.push(t);
    }

    let total_lower: f64 = subnet_logs
        .iter()
        .map(|&id| model.get_variable(id).map(|v| v.bounds.lower))
        .sum::<Result<f64, _>>()?;
    let total = model.add_named_variable(
        "totalReliability",
        Variable::continuous(Bounds::new(total_lower, 0.0)),
    )?;
    model.add_constraint_expr(
        Expr::var(total).eq_expr(&Expr::sum_of(subnet_logs.iter().copied())),
    )?;
    model.add_named_constraint(
        "Reliability_Hybrid",
        Expr::var(total).ge_scalar(target.ln()),
    )?;
    Ok(())
}

/// Build and solve the hybrid formulation.
pub fn solve_hybrid<S: Solver>(
    base: &BaseFormulation,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
    options: &HybridOptions,
    solver: &mut S,
) -> Result<SolveReport, DesignError> {
    build_hybrid(base, catalog, link_cost, target, options)?.solve(catalog, solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::build_base;

    fn catalog() -> Catalog {
        Catalog::from_slices(&[5.0, 12.0, 30.0], &[0.6, 0.7, 0.8]).unwrap()
    }

    #[test]
    fn test_options_validation() {
        assert!(HybridOptions::default().validate(4).is_ok());
        let err = HybridOptions::new()
            .with_min_series_nodes(2)
            .validate(4)
            .unwrap_err();
        assert_eq!(err.code(), "INPUT_OPTIONS");
        assert!(
            HybridOptions::new()
                .with_max_envelope_segments(0)
                .validate(6)
                .is_err()
        );
        assert!(
            HybridOptions::new()
                .with_min_series_nodes(0)
                .validate(4)
                .is_ok()
        );
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: HybridOptions =
            serde_json::from_str(r#"{"min_series_nodes": 2}"#).unwrap();
        assert_eq!(options.min_series_nodes, 2);
        assert_eq!(options.max_envelope_segments, 4096);
    }

    #[test]
    fn test_hybrid_model_layout() {
        let base = build_base(7, &catalog()).unwrap();
        let hybrid =
            build_hybrid(&base, &catalog(), 10.0, 0.9, &HybridOptions::default()).unwrap();
        let model = hybrid.model();

        assert_eq!(hybrid.topology(), Topology::Hybrid);
        // ⌊7/3⌋ parallel candidates plus the backbone
        assert!(model.get_variable_by_name("y[6,2]").is_some());
        assert!(model.get_variable_by_name("y[6,3]").is_none());
        assert!(model.get_variable_by_name("internalLinks[2]").is_some());
        assert!(model.get_variable_by_name("internalLinks[0]").is_none());
        assert!(model.get_constraint_by_name("LinksCost_Hybrid").is_some());
        assert!(model.get_constraint_by_name("Reliability_Hybrid").is_some());
        // reliability and unreliability logs per node
        assert_eq!(model.num_general_constraints(), 14);
        assert!(model.is_fully_bounded());
        // base stays reusable
        assert!(base.model.get_variable_by_name("y[0,0]").is_none());
    }
}
