//! Structural properties of solved designs.

use relnet_design::{
    Catalog, Design, DesignOutcome, HybridOptions, Topology, build_base, solve_series,
    solve_topology,
};
use relnet_highs::HighsSolver;

const TOL: f64 = 1e-6;

fn catalog() -> Catalog {
    Catalog::from_slices(&[5.0, 12.0, 30.0], &[0.6, 0.7, 0.8]).unwrap()
}

fn solve(
    topology: Topology,
    total_nodes: usize,
    catalog: &Catalog,
    link_cost: f64,
    target: f64,
) -> DesignOutcome {
    let base = build_base(total_nodes, catalog).unwrap();
    solve_topology(
        topology,
        &base,
        catalog,
        link_cost,
        target,
        &HybridOptions::default(),
        &mut HighsSolver::new(),
    )
    .unwrap()
    .outcome
}

fn optimal(outcome: DesignOutcome) -> Design {
    match outcome {
        DesignOutcome::Optimal(design) => design,
        other => panic!("expected an optimal design, got {}", other.as_str()),
    }
}

fn assert_consistent(design: &Design, catalog: &Catalog, link_cost: f64) {
    assert_eq!(design.node_types.len(), design.total_nodes);
    assert_eq!(design.type_counts.iter().sum::<usize>(), design.total_nodes);
    let nodes_cost: f64 = design
        .node_types
        .iter()
        .map(|&i| catalog.get(i).unwrap().cost)
        .sum();
    assert!((design.nodes_cost - nodes_cost).abs() < TOL);
    assert!((design.links_cost - link_cost * design.link_count as f64).abs() < TOL);
    assert!((design.total_cost - design.nodes_cost - design.links_cost).abs() < TOL);
    assert!((design.objective_value - design.total_cost).abs() < 1e-4);
    assert!(design.meets_target(1e-9));
}

#[test]
fn test_every_topology_hits_the_floor_at_a_low_target() {
    let catalog = catalog();
    // four cheapest nodes reach 0.6^4 = 0.1296 in series
    for (topology, links) in [
        (Topology::Series, 3.0),
        (Topology::Parallel, 6.0),
        (Topology::Hybrid, 4.0),
    ] {
        let design = optimal(solve(topology, 4, &catalog, 10.0, 0.1));
        assert_consistent(&design, &catalog, 10.0);
        assert_eq!(design.type_counts, vec![4, 0, 0], "{topology}");
        assert!(
            (design.total_cost - (20.0 + 10.0 * links)).abs() < TOL,
            "{topology}: {}",
            design.total_cost
        );
        assert_eq!(design.link_count, topology.min_links(4));
    }
}

#[test]
fn test_series_cost_never_drops_as_target_rises() {
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let mut solver = HighsSolver::new();

    let mut previous = 0.0;
    for target in [0.1, 0.15, 0.2, 0.25, 0.3, 0.35, 0.4] {
        let report = solve_series(&base, &catalog, 10.0, target, &mut solver).unwrap();
        let cost = report
            .outcome
            .optimal_cost()
            .unwrap_or_else(|| panic!("target {target} should be reachable"));
        assert!(cost + TOL >= previous, "{target}: {cost} < {previous}");
        previous = cost;
    }
    let report = solve_series(&base, &catalog, 10.0, 0.45, &mut solver).unwrap();
    assert!(report.outcome.is_infeasible());
}

#[test]
fn test_redundant_topologies_win_when_nodes_dominate_cost() {
    let catalog = catalog();
    let link_cost = 0.01;
    let series = optimal(solve(Topology::Series, 4, &catalog, link_cost, 0.4));
    let parallel = optimal(solve(Topology::Parallel, 4, &catalog, link_cost, 0.4));
    let hybrid = optimal(solve(Topology::Hybrid, 4, &catalog, link_cost, 0.4));

    assert!((series.total_cost - 120.03).abs() < TOL);
    assert!(parallel.total_cost <= series.total_cost);
    assert!(hybrid.total_cost <= series.total_cost);
    for design in [&series, &parallel, &hybrid] {
        assert_consistent(design, &catalog, link_cost);
    }
}

#[test]
fn test_hybrid_layout_partitions_nodes() {
    let catalog = catalog();
    let design = optimal(solve(Topology::Hybrid, 7, &catalog, 10.0, 0.6));
    assert_consistent(&design, &catalog, 10.0);

    let layout = design.subnets.clone().expect("hybrid layout");
    assert!(!layout.series.is_empty());
    assert!(!layout.parallel.is_empty());
    assert!(layout.parallel.iter().all(|members| members.len() >= 3));
    assert_eq!(design.link_count, layout.link_count());

    let membership = layout.subnet_of_nodes(7);
    assert!(membership.iter().all(Option::is_some));
    let mut seen: Vec<usize> = layout
        .series
        .iter()
        .chain(layout.parallel.iter().flatten())
        .copied()
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..7).collect::<Vec<_>>());
}

#[test]
fn test_hybrid_respects_backbone_minimum() {
    let catalog = catalog();
    let base = build_base(7, &catalog).unwrap();
    let options = HybridOptions::default().with_min_series_nodes(4);
    let report = relnet_design::solve_hybrid(
        &base,
        &catalog,
        10.0,
        0.1,
        &options,
        &mut HighsSolver::new(),
    )
    .unwrap();

    let layout = report
        .outcome
        .design()
        .and_then(|design| design.subnets.clone())
        .expect("feasible hybrid");
    assert!(layout.series.len() >= 4);
    assert_eq!(layout.parallel.len(), 1);
    assert_eq!(layout.parallel[0].len(), 3);
}

#[test]
fn test_decision_variables_carry_model_names() {
    let catalog = catalog();
    let design = optimal(solve(Topology::Hybrid, 4, &catalog, 10.0, 0.7));

    for (u, &i) in design.node_types.iter().enumerate() {
        let chosen = design.decision_variables[&format!("x[{u},{i}]")];
        assert!((chosen - 1.0).abs() < 1e-6);
    }
    let backbone = design.subnets.as_ref().unwrap().series[0];
    assert!((design.decision_variables[&format!("y[{backbone},0]")] - 1.0).abs() < 1e-6);
    assert!(design.decision_variables.contains_key("nodesCost"));
    assert!(design.decision_variables.contains_key("linksCost"));
}
