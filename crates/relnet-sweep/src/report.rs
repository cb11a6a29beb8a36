//! Table and JSON rendering of designs and sweeps.

use crate::sweep::SweepSeries;
use relnet_core::SolverStatus;
use relnet_design::{Design, DesignOutcome};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Column labels for a catalog of `count` types.
pub fn type_labels(count: usize) -> Vec<String> {
    if count == 3 {
        return vec!["Low".to_string(), "Mid".to_string(), "High".to_string()];
    }
    (0..count).map(|i| format!("Type {i}")).collect()
}

/// Nodes per labelled type.
pub fn type_distribution(design: &Design) -> BTreeMap<String, usize> {
    type_labels(design.type_counts.len())
        .into_iter()
        .zip(design.type_counts.iter().copied())
        .collect()
}

/// Serializable view of a single solve.
#[derive(Debug, Clone, Serialize)]
pub struct DesignRecord<'a> {
    pub outcome: &'static str,
    pub solver_status: &'static str,
    pub design: Option<&'a Design>,
    pub type_distribution: Option<BTreeMap<String, usize>>,
}

impl<'a> DesignRecord<'a> {
    pub fn new(outcome: &'a DesignOutcome, status: SolverStatus) -> Self {
        let design = outcome.design();
        Self {
            outcome: outcome.as_str(),
            solver_status: status.as_str(),
            design,
            type_distribution: design.map(type_distribution),
        }
    }
}

/// Cost breakdown, node × type assignment and, for hybrid designs, the
/// node × subnet membership.
pub fn write_design_table<W: Write>(out: &mut W, outcome: &DesignOutcome) -> io::Result<()> {
    let Some(design) = outcome.design() else {
        return writeln!(out, "no solution ({})", outcome.as_str());
    };
    if matches!(outcome, DesignOutcome::TimedOut { .. }) {
        writeln!(out, "time limit reached, best design found:")?;
    }

    writeln!(
        out,
        "{} network, {} nodes",
        design.topology, design.total_nodes
    )?;
    writeln!(out, "{:<18} {:>14.4}", "total cost", design.total_cost)?;
    writeln!(out, "{:<18} {:>14.4}", "nodes cost", design.nodes_cost)?;
    writeln!(
        out,
        "{:<18} {:>14.4} ({} links)",
        "links cost", design.links_cost, design.link_count
    )?;
    writeln!(
        out,
        "{:<18} {:>14.10} (required {})",
        "reliability", design.achieved_reliability, design.required_reliability
    )?;

    writeln!(out)?;
    let labels = type_labels(design.type_counts.len());
    write_matrix(
        out,
        &labels,
        design.node_types.iter().map(|&i| Some(i)),
    )?;

    if let Some(layout) = &design.subnets {
        writeln!(out)?;
        let mut labels = vec!["Series".to_string()];
        labels.extend((1..=layout.parallel.len()).map(|j| format!("Parallel {j}")));
        write_matrix(
            out,
            &labels,
            layout.subnet_of_nodes(design.total_nodes).into_iter(),
        )?;
    }
    Ok(())
}

/// One row per node with a `1` under its column.
fn write_matrix<W: Write>(
    out: &mut W,
    labels: &[String],
    selection: impl Iterator<Item = Option<usize>>,
) -> io::Result<()> {
    write!(out, "{:<6}", "node")?;
    for label in labels {
        write!(out, " {label:>10}")?;
    }
    writeln!(out)?;
    for (u, chosen) in selection.enumerate() {
        write!(out, "{u:<6}")?;
        for column in 0..labels.len() {
            let mark = u8::from(chosen == Some(column));
            write!(out, " {mark:>10}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Summary row per sweep series.
pub fn write_sweep_table<W: Write>(out: &mut W, series: &[SweepSeries]) -> io::Result<()> {
    writeln!(
        out,
        "{:<22} {:>7} {:>7} {:>12} {:>12} {:>14}",
        "series", "points", "solved", "min_cost", "max_cost", "max_target"
    )?;
    for entry in series {
        let solved: Vec<_> = entry
            .points
            .iter()
            .filter_map(|point| point.cost.map(|cost| (point.target, cost)))
            .collect();
        let min_cost = solved.iter().map(|&(_, c)| c).reduce(f64::min);
        let max_cost = solved.iter().map(|&(_, c)| c).reduce(f64::max);
        let max_target = solved.iter().map(|&(t, _)| t).reduce(f64::max);
        writeln!(
            out,
            "{:<22} {:>7} {:>7} {:>12} {:>12} {:>14}",
            entry.key,
            entry.points.len(),
            solved.len(),
            format_option(min_cost, 4),
            format_option(max_cost, 4),
            format_option(max_target, 10),
        )?;
    }
    Ok(())
}

fn format_option(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}
