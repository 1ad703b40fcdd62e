#![allow(dead_code)]

use fas_core::{Arrangement, FlowDemand, Layout, SubjectType, TypeCatalog};
use std::collections::BTreeMap;

pub fn subject(
    in_capacity: i64,
    out_capacity: i64,
    production_target: i64,
    area: i64,
    initially_available: u64,
    price: f64,
) -> SubjectType<i64> {
    SubjectType {
        in_capacity,
        out_capacity,
        production_target,
        area,
        initially_available,
        price,
    }
}

/// Check a solved arrangement against every constraint family with exact
/// integer arithmetic.
pub fn assert_feasible(
    layout: &Layout<i64, i64>,
    catalog: &TypeCatalog<i64>,
    demand: &FlowDemand<i64>,
    arrangement: &Arrangement<i64>,
    expected_production: &BTreeMap<&str, i64>,
    expected_counts: &BTreeMap<&str, u64>,
) {
    for (point, place) in layout.points() {
        let used: i64 = catalog
            .iter()
            .map(|(ty, spec)| arrangement.count_at(point, ty) as i64 * spec.area)
            .sum();
        assert!(
            used <= place.capacity,
            "point {point} holds {used} area units but only {} fit",
            place.capacity
        );
    }

    for (ty, spec) in catalog.iter() {
        for (point, _) in layout.points() {
            let count = arrangement.count_at(point, ty) as i64;
            let inflow = arrangement.inflow_at(point, ty);
            let outflow = arrangement.outflow_at(point, ty);
            let produced = arrangement.state(point).map_or(0, |s| s.produced(ty));
            assert!(
                inflow <= count * spec.in_capacity,
                "inflow {inflow} into {count} × {ty} at {point} exceeds capacity"
            );
            assert!(
                outflow <= count * spec.out_capacity,
                "outflow {outflow} out of {count} × {ty} at {point} exceeds capacity"
            );
            assert!(
                outflow <= produced + inflow,
                "{ty} at {point} emits {outflow} but only produces {produced} and receives {inflow}"
            );
        }
        assert_eq!(
            arrangement.produced_total(ty),
            expected_production[ty.as_str()],
            "production of {ty}"
        );
        assert_eq!(
            arrangement.subjects_of(ty),
            expected_counts[ty.as_str()],
            "subject count of {ty}"
        );
    }

    for (src, _) in catalog.iter() {
        for (dst, _) in catalog.iter() {
            assert_eq!(
                arrangement.flow_total(src, dst),
                demand.get(src, dst),
                "total flow for pair ({src}, {dst})"
            );
        }
    }
}
