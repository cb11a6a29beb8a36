//! End-to-end scenarios solved with HiGHS.

use relnet_design::{
    Catalog, DesignOutcome, HybridOptions, Topology, build_base, solve_hybrid, solve_parallel,
    solve_series,
};
use relnet_highs::HighsSolver;

const TOL: f64 = 1e-6;

fn catalog() -> Catalog {
    Catalog::from_slices(&[5.0, 12.0, 30.0], &[0.6, 0.7, 0.8]).unwrap()
}

#[test]
fn test_series_four_nodes_pays_three_links() {
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let report = solve_series(&base, &catalog, 10.0, 0.3, &mut HighsSolver::new()).unwrap();

    let DesignOutcome::Optimal(design) = report.outcome else {
        panic!("expected optimal series design, got {:?}", report.outcome);
    };
    assert_eq!(design.topology, Topology::Series);
    assert!((design.links_cost - 30.0).abs() < TOL);
    // two 0.8 nodes and two 0.7 nodes: 0.3136
    assert!((design.nodes_cost - 84.0).abs() < TOL);
    assert!((design.total_cost - 114.0).abs() < TOL);
    assert!((design.objective_value - design.total_cost).abs() < TOL);
    assert_eq!(design.type_counts, vec![0, 2, 2]);
    assert!(design.achieved_reliability >= 0.3);
    assert!(report.status.is_optimal());
}

#[test]
fn test_series_target_above_best_product_is_infeasible() {
    // 0.8^4 = 0.4096 is the best four-node chain
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let mut solver = HighsSolver::new();

    let report = solve_series(&base, &catalog, 10.0, 0.4, &mut solver).unwrap();
    let design = report.outcome.design().expect("0.4 is reachable");
    assert_eq!(design.node_types, vec![2, 2, 2, 2]);
    assert!((design.links_cost - 30.0).abs() < TOL);

    let report = solve_series(&base, &catalog, 10.0, 0.5, &mut solver).unwrap();
    assert_eq!(report.outcome, DesignOutcome::Infeasible);
    assert!(report.status.is_infeasible());
}

#[test]
fn test_parallel_four_nodes_links_every_pair() {
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let report = solve_parallel(&base, &catalog, 10.0, 0.95, &mut HighsSolver::new()).unwrap();

    let design = match report.outcome {
        DesignOutcome::Optimal(design) => design,
        other => panic!("expected optimal parallel design, got {other:?}"),
    };
    assert!((design.links_cost - 60.0).abs() < TOL);
    assert_eq!(design.link_count, 6);
    // four cheapest nodes already fail together with probability 0.0256
    assert!((design.nodes_cost - 20.0).abs() < TOL);
    assert!(design.achieved_reliability >= 0.95);
    assert!(design.subnets.is_none());
}

#[test]
fn test_parallel_buys_reliability_when_needed() {
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let report = solve_parallel(&base, &catalog, 10.0, 0.99, &mut HighsSolver::new()).unwrap();

    let design = report.outcome.design().expect("feasible");
    let failure: f64 = design
        .node_types
        .iter()
        .map(|&i| 1.0 - catalog.get(i).unwrap().reliability)
        .product();
    assert!(failure <= 0.01 + 1e-12);
    // below 48 every mix fails: 0.3^3·0.4 = 0.0108 at 41, 0.2·0.4^3 = 0.0128 at 45
    assert!((design.nodes_cost - 48.0).abs() < TOL);
    assert_eq!(design.type_counts, vec![0, 4, 0]);
}

#[test]
fn test_hybrid_all_half_reliability_is_infeasible() {
    let catalog = Catalog::from_slices(&[1.0, 2.0, 3.0], &[0.5, 0.5, 0.5]).unwrap();
    let base = build_base(4, &catalog).unwrap();
    let report = solve_hybrid(
        &base,
        &catalog,
        10.0,
        0.999999,
        &HybridOptions::default(),
        &mut HighsSolver::new(),
    )
    .unwrap();

    assert_eq!(report.outcome, DesignOutcome::Infeasible);
    assert!(report.outcome.design().is_none());
}

#[test]
fn test_hybrid_four_nodes_backbone_and_triangle() {
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let report = solve_hybrid(
        &base,
        &catalog,
        10.0,
        0.7,
        &HybridOptions::default(),
        &mut HighsSolver::new(),
    )
    .unwrap();

    let design = report.outcome.design().expect("feasible").clone();
    let layout = design.subnets.clone().expect("hybrid layout");
    assert_eq!(layout.series.len(), 1);
    assert_eq!(layout.parallel.len(), 1);
    assert_eq!(layout.parallel[0].len(), 3);
    assert_eq!(design.link_count, 4);
    assert!((design.links_cost - 40.0).abs() < TOL);
    // 0.8 backbone with three 0.6 nodes: 0.8 · 0.936 = 0.7488
    assert_eq!(design.node_types[layout.series[0]], 2);
    assert!((design.nodes_cost - 45.0).abs() < TOL);
    assert!((design.achieved_reliability - 0.7488).abs() < 1e-9);
}

#[test]
fn test_hybrid_target_at_exact_design_reliability() {
    // 0.8 backbone with three 0.7 nodes reaches 0.8 · (1 − 0.3³) = 0.7784
    let target = 0.8 * (1.0 - 0.3_f64.powi(3)) - 1e-7;
    let catalog = catalog();
    let base = build_base(4, &catalog).unwrap();
    let report = solve_hybrid(
        &base,
        &catalog,
        10.0,
        target,
        &HybridOptions::default(),
        &mut HighsSolver::new(),
    )
    .unwrap();

    let design = report.outcome.design().expect("feasible").clone();
    let layout = design.subnets.clone().expect("hybrid layout");
    assert_eq!(layout.parallel.len(), 1);
    assert_eq!(design.node_types[layout.series[0]], 2);
    assert_eq!(design.type_counts, vec![0, 3, 1]);
    assert!((design.nodes_cost - 66.0).abs() < TOL);
    assert!((design.links_cost - 40.0).abs() < TOL);
    assert!(design.achieved_reliability >= target);
}
