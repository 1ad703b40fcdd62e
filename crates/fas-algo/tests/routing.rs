//! Routing over hand-built placements.

mod common;

use common::subject;
use fas_core::{Arrangement, FasError, FlowDemand, Layout, Metric, Point, TypeCatalog};

fn two_point_layout() -> Layout<i64, i64> {
    Layout::from_points(
        [
            ("p".to_string(), Point::new(0, 0, 100)),
            ("q".to_string(), Point::new(3, 0, 100)),
        ],
        Metric::manhattan(),
    )
    .unwrap()
}

fn shuttle_catalog(a_out: i64) -> TypeCatalog<i64> {
    TypeCatalog::from_entries([
        ("A".to_string(), subject(0, a_out, 100, 2, 2, 400.0)),
        ("B".to_string(), subject(60, 0, 0, 3, 3, 600.0)),
    ])
    .unwrap()
}

fn shuttle_demand() -> FlowDemand<i64> {
    FlowDemand::from_entries([(("A".to_string(), "B".to_string()), 100)]).unwrap()
}

#[test]
fn separated_producers_pay_full_distance() {
    let layout = two_point_layout();
    let catalog = shuttle_catalog(50);
    let demand = shuttle_demand();

    let mut arrangement = Arrangement::new(&layout);
    assert!(arrangement.add("p", "A", 2) && arrangement.add("p", "A", 2));
    for _ in 0..3 {
        assert!(arrangement.add("q", "B", 3));
    }

    let outcome = fas_algo::routing::route(&layout, &catalog, &demand, &arrangement).unwrap();
    assert_eq!(outcome.cost, 300.0, "100 units over distance 3");
    assert!(outcome
        .flows
        .iter()
        .any(|(s, d, sp, dp, amount)| s == "A" && d == "B" && sp == "p" && dp == "q" && *amount == 100));
    // Everything A ships it must produce itself.
    assert!(outcome
        .produced
        .iter()
        .any(|(ty, point, amount)| ty == "A" && point == "p" && *amount == 100));
}

#[test]
fn colocated_producers_route_for_free() {
    let layout = two_point_layout();
    let catalog = shuttle_catalog(50);
    let demand = shuttle_demand();

    let mut arrangement = Arrangement::new(&layout);
    assert!(arrangement.add("p", "A", 2) && arrangement.add("p", "A", 2));
    for _ in 0..3 {
        assert!(arrangement.add("p", "B", 3));
    }

    let outcome = fas_algo::routing::route(&layout, &catalog, &demand, &arrangement).unwrap();
    assert_eq!(outcome.cost, 0.0);
}

#[test]
fn undersized_output_capacity_is_infeasible() {
    let layout = two_point_layout();
    // Two subjects emitting 25 each cannot ship 100 units.
    let catalog = shuttle_catalog(25);
    let demand = shuttle_demand();

    let mut arrangement = Arrangement::new(&layout);
    assert!(arrangement.add("p", "A", 2) && arrangement.add("p", "A", 2));
    for _ in 0..3 {
        assert!(arrangement.add("q", "B", 3));
    }

    let result = fas_algo::routing::route(&layout, &catalog, &demand, &arrangement);
    assert!(matches!(result, Err(FasError::RoutingInfeasible)));
}

#[test]
fn demanded_pair_with_no_subjects_is_infeasible() {
    let layout = two_point_layout();
    let catalog = shuttle_catalog(50);
    let demand = shuttle_demand();

    // B subjects were never placed, so the demand cannot be met.
    let mut arrangement = Arrangement::new(&layout);
    assert!(arrangement.add("p", "A", 2) && arrangement.add("p", "A", 2));

    let result = fas_algo::routing::route(&layout, &catalog, &demand, &arrangement);
    assert!(matches!(result, Err(FasError::RoutingInfeasible)));
}

#[test]
fn zero_demand_routes_nothing() {
    let layout = two_point_layout();
    let catalog = shuttle_catalog(50);
    let demand = FlowDemand::new();

    let mut arrangement = Arrangement::new(&layout);
    assert!(arrangement.add("p", "A", 2));

    // With no demand there is no net supply either, so nothing moves and
    // nothing is produced.
    let outcome = fas_algo::routing::route(&layout, &catalog, &demand, &arrangement).unwrap();
    assert_eq!(outcome.cost, 0.0);
    assert!(outcome.flows.is_empty());
    assert!(outcome.produced.is_empty());
}
