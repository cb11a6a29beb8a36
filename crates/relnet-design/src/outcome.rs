//! Solve outcomes and decoded designs.

use relnet_core::{Model, SolverStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Network arrangement of the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Every node in one chain.
    Series,
    /// Every pair of nodes linked; the network works while one node does.
    Parallel,
    /// A series backbone followed by fully-linked parallel subnets.
    Hybrid,
}

impl Topology {
    pub const ALL: [Topology; 3] = [Topology::Series, Topology::Parallel, Topology::Hybrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Topology::Series => "series",
            Topology::Parallel => "parallel",
            Topology::Hybrid => "hybrid",
        }
    }

    /// Fewest links any layout of `total_nodes` nodes needs.
    pub fn min_links(self, total_nodes: usize) -> usize {
        match self {
            Topology::Series => total_nodes.saturating_sub(1),
            Topology::Parallel => total_nodes * total_nodes.saturating_sub(1) / 2,
            // (N − 3) backbone nodes chained to one triangle
            Topology::Hybrid => total_nodes,
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "series" => Ok(Topology::Series),
            "parallel" => Ok(Topology::Parallel),
            "hybrid" => Ok(Topology::Hybrid),
            other => Err(format!("unknown topology '{other}'")),
        }
    }
}

/// Node membership of a hybrid layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetLayout {
    /// Nodes of the series backbone (subnet 0).
    pub series: Vec<usize>,
    /// Members of each active parallel subnet.
    pub parallel: Vec<Vec<usize>>,
}

impl SubnetLayout {
    /// Subnet index per node, backbone first (`0`), parallel subnets from `1`.
    pub fn subnet_of_nodes(&self, total_nodes: usize) -> Vec<Option<usize>> {
        let mut subnet = vec![None; total_nodes];
        for &u in &self.series {
            subnet[u] = Some(0);
        }
        for (j, members) in self.parallel.iter().enumerate() {
            for &u in members {
                subnet[u] = Some(j + 1);
            }
        }
        subnet
    }

    /// Links of the layout: the backbone chain, one link between consecutive
    /// blocks and every pair inside each parallel subnet.
    pub fn link_count(&self) -> usize {
        let internal: usize = self
            .parallel
            .iter()
            .map(|members| members.len() * members.len().saturating_sub(1) / 2)
            .sum();
        (self.series.len() + self.parallel.len()).saturating_sub(1) + internal
    }
}

/// A decoded design with exactly recomputed costs and reliability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Design {
    pub topology: Topology,
    pub total_nodes: usize,
    pub total_cost: f64,
    pub nodes_cost: f64,
    pub links_cost: f64,
    pub link_count: usize,
    /// Catalog index chosen for each node.
    pub node_types: Vec<usize>,
    /// Number of nodes of each catalog type.
    pub type_counts: Vec<usize>,
    /// Hybrid membership; `None` for the other topologies.
    pub subnets: Option<SubnetLayout>,
    pub achieved_reliability: f64,
    pub required_reliability: f64,
    /// Objective value reported by the solver.
    pub objective_value: f64,
    /// Named model variables (`x[3,1]`, `y[2,0]`, `linksCost`, …) and their values.
    pub decision_variables: BTreeMap<String, f64>,
}

impl Design {
    pub fn meets_target(&self, tolerance: f64) -> bool {
        self.achieved_reliability >= self.required_reliability - tolerance
    }
}

/// Result of one formulation solve.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignOutcome {
    Optimal(Design),
    /// No layout meets the target.
    Infeasible,
    /// The solver stopped on a limit; carries the best verified design if any.
    TimedOut { incumbent: Option<Box<Design>> },
}

impl DesignOutcome {
    pub fn design(&self) -> Option<&Design> {
        match self {
            DesignOutcome::Optimal(design) => Some(design),
            DesignOutcome::TimedOut { incumbent } => incumbent.as_deref(),
            DesignOutcome::Infeasible => None,
        }
    }

    /// Total cost of a proven optimal design.
    pub fn optimal_cost(&self) -> Option<f64> {
        match self {
            DesignOutcome::Optimal(design) => Some(design.total_cost),
            _ => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, DesignOutcome::Infeasible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignOutcome::Optimal(_) => "optimal",
            DesignOutcome::Infeasible => "infeasible",
            DesignOutcome::TimedOut { .. } => "timed_out",
        }
    }
}

/// Outcome plus the solved model and the raw solver status.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub outcome: DesignOutcome,
    pub model: Model,
    pub status: SolverStatus,
}
