//! Starting-point translation from a heuristic arrangement.
//!
//! The full model's variable handles are created name-first (see
//! `VariableRegistry`), so a heuristic arrangement can be turned into a
//! `(variable, value)` list by walking the registry and reading the
//! arrangement at each key. The assignment is advisory: the solver checks
//! it and is free to repair or discard it.

use crate::milp::VariableRegistry;
use fas_core::{Arrangement, Scalar};
use good_lp::Variable;

/// A complete starting assignment for the `n`, `g` and `f` variable
/// families; entries absent from the arrangement become zeros. Purchase
/// counts are left for the solver to deduce.
pub(crate) fn initial_assignment<U: Scalar>(
    registry: &VariableRegistry,
    arrangement: &Arrangement<U>,
) -> Vec<(Variable, f64)> {
    let mut assignment =
        Vec::with_capacity(registry.n.len() + registry.g.len() + registry.f.len());
    for ((ty, point), var) in &registry.n {
        assignment.push((*var, arrangement.count_at(point, ty) as f64));
    }
    for ((ty, point), var) in &registry.g {
        let produced = arrangement
            .state(point)
            .map_or_else(U::zero, |s| s.produced(ty));
        assignment.push((*var, produced.to_f64()));
    }
    for ((src_ty, dst_ty, src_point, dst_point), var) in &registry.f {
        let amount = arrangement.flow_at(src_point, src_ty, dst_ty, dst_point);
        assignment.push((*var, amount.to_f64()));
    }
    assignment
}
