//! Cost sweeps over node counts, topologies and reliability targets.

use crate::grid::{DEFAULT_COUNT, DEFAULT_END, DEFAULT_START, GridError, equidistant};
use rayon::prelude::*;
use relnet_core::{Solver, SolverConfig};
use relnet_design::{
    Catalog, DesignError, DesignOutcome, HybridOptions, Topology, build_base, solve_topology,
};
use relnet_highs::HighsSolver;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

pub const DEFAULT_NODE_COUNTS: [usize; 3] = [5, 6, 11];

/// What to solve in a sweep.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub node_counts: Vec<usize>,
    pub targets: Vec<f64>,
    pub topologies: Vec<Topology>,
    pub options: HybridOptions,
    pub solver_config: SolverConfig,
}

impl SweepPlan {
    /// Every topology over `targets` for each of `node_counts`.
    pub fn new(node_counts: Vec<usize>, targets: Vec<f64>) -> Self {
        Self {
            node_counts,
            targets,
            topologies: Topology::ALL.to_vec(),
            options: HybridOptions::default(),
            solver_config: SolverConfig::default(),
        }
    }

    /// Node counts 5, 6 and 11 over 200 targets between 0.5 and one.
    pub fn standard() -> Result<Self, GridError> {
        Ok(Self::new(
            DEFAULT_NODE_COUNTS.to_vec(),
            equidistant(DEFAULT_START, DEFAULT_END, DEFAULT_COUNT)?,
        ))
    }

    pub fn with_topologies(mut self, topologies: Vec<Topology>) -> Self {
        self.topologies = topologies;
        self
    }

    pub fn with_options(mut self, options: HybridOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }
}

/// One solved grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub target: f64,
    /// Minimized total cost; `None` when infeasible or interrupted.
    pub cost: Option<f64>,
    pub outcome: &'static str,
    /// Nodes per catalog type of the optimal design.
    pub type_counts: Option<Vec<usize>>,
}

/// All points of one node count and topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSeries {
    /// `nodes_{n}_{topology}`
    pub key: String,
    pub total_nodes: usize,
    pub topology: Topology,
    pub points: Vec<SweepPoint>,
}

impl SweepSeries {
    pub fn key_for(total_nodes: usize, topology: Topology) -> String {
        format!("nodes_{total_nodes}_{topology}")
    }

    pub fn costs(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|point| point.cost).collect()
    }
}

/// Run `plan` with one HiGHS instance per grid point.
pub fn run_sweep(
    plan: &SweepPlan,
    catalog: &Catalog,
    link_cost: f64,
) -> Result<Vec<SweepSeries>, DesignError> {
    run_sweep_with(plan, catalog, link_cost, || {
        HighsSolver::with_config(plan.solver_config.clone())
    })
}

/// Run `plan` with solvers from `make_solver`, solving grid points in parallel.
///
/// Infeasible and interrupted points are recorded and the sweep moves on;
/// any other error aborts it.
pub fn run_sweep_with<S, F>(
    plan: &SweepPlan,
    catalog: &Catalog,
    link_cost: f64,
    make_solver: F,
) -> Result<Vec<SweepSeries>, DesignError>
where
    S: Solver,
    F: Fn() -> S + Sync,
{
    let mut series = Vec::with_capacity(plan.node_counts.len() * plan.topologies.len());
    for &total_nodes in &plan.node_counts {
        let base = build_base(total_nodes, catalog)?;
        for &topology in &plan.topologies {
            let start = Instant::now();
            let points = plan
                .targets
                .par_iter()
                .map(|&target| {
                    let mut solver = make_solver();
                    let report = solve_topology(
                        topology,
                        &base,
                        catalog,
                        link_cost,
                        target,
                        &plan.options,
                        &mut solver,
                    )?;
                    Ok(point(target, &report.outcome))
                })
                .collect::<Result<Vec<_>, DesignError>>()?;

            info!(
                component = "sweep",
                operation = "run",
                status = "success",
                total_nodes,
                topology = topology.as_str(),
                points = points.len(),
                solved = points.iter().filter(|p| p.cost.is_some()).count(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Finished sweep series"
            );
            series.push(SweepSeries {
                key: SweepSeries::key_for(total_nodes, topology),
                total_nodes,
                topology,
                points,
            });
        }
    }
    Ok(series)
}

fn point(target: f64, outcome: &DesignOutcome) -> SweepPoint {
    SweepPoint {
        target,
        cost: outcome.optimal_cost(),
        outcome: outcome.as_str(),
        type_counts: match outcome {
            DesignOutcome::Optimal(design) => Some(design.type_counts.clone()),
            _ => None,
        },
    }
}
