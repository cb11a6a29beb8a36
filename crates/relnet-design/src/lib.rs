//! Minimum-cost network design under a reliability target.
//!
//! A [`Catalog`] of node types feeds [`build_base`], whose model is cloned
//! and extended by the series, parallel and hybrid formulations. Each
//! formulation returns a [`SolveReport`] whose outcome is either an optimal
//! [`Design`], an explicit infeasibility or a timeout.
//!
//! Reliability products are handled in log space: per-node logarithms come
//! from generalized log constraints over the catalog values, which the solver
//! backend lowers exactly because node reliabilities are one-hot choices.

pub mod base;
pub mod catalog;
pub mod error;
pub mod hybrid;
pub mod outcome;
pub mod parallel;
pub mod reliability;
pub mod series;

mod envelope;
mod formulation;
mod linearize;

pub use base::{BaseFormulation, BaseHandles, build_base};
pub use catalog::{Catalog, NodeType};
pub use error::DesignError;
pub use formulation::{TopologyFormulation, solve_topology};
pub use hybrid::{HybridOptions, build_hybrid, solve_hybrid};
pub use outcome::{Design, DesignOutcome, SolveReport, SubnetLayout, Topology};
pub use parallel::{build_parallel, solve_parallel};
pub use series::{build_series, solve_series};

/// Smallest network the formulations accept.
pub const MIN_TOTAL_NODES: usize = 4;
