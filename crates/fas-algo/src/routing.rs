//! Optimal object routing over a fixed placement.
//!
//! With subjects pinned down, what remains is a transport problem: choose
//! flows between occupied point pairs and per-point production so that
//! every pairwise flow requirement is met at minimum total distance
//! travelled. Variables exist only where they can be non-zero: a type
//! pair needs positive demand and both endpoints need at least one
//! subject of the right type.

use crate::solver::{self, SolveOptions};
use fas_core::{Arrangement, FasError, FasResult, FlowDemand, Layout, Scalar, TypeCatalog};
use good_lp::{constraint, variables, Constraint, Expression, Solution, Variable};
use std::collections::HashMap;

/// Routing found for a fixed placement.
#[derive(Debug, Clone)]
pub struct RoutingOutcome<U> {
    /// Total distance-weighted transport cost.
    pub cost: f64,
    /// `(type, point, units)` produced entries, non-zero only.
    pub produced: Vec<(String, String, U)>,
    /// `(src type, dst type, src point, dst point, units)` flows, non-zero only.
    pub flows: Vec<(String, String, String, String, U)>,
}

/// Solve the routing problem for `arrangement`.
///
/// Returns [`FasError::RoutingInfeasible`] when the placement admits no
/// routing (callers treat that as a skipped sample) and
/// [`FasError::Solver`] for genuine backend faults.
pub fn route<C: Scalar, U: Scalar>(
    layout: &Layout<C, U>,
    catalog: &TypeCatalog<U>,
    demand: &FlowDemand<U>,
    arrangement: &Arrangement<U>,
) -> FasResult<RoutingOutcome<U>> {
    let mut vars = variables!();

    // Production variables and flow-sum expressions for every occupied
    // (type, point) slot.
    let mut produced_vars: HashMap<(String, String), Variable> = HashMap::new();
    let mut in_sums: HashMap<(String, String), Expression> = HashMap::new();
    let mut out_sums: HashMap<(String, String), Expression> = HashMap::new();
    for (ty, _) in catalog.iter() {
        for (point, state) in arrangement.points() {
            if state.count(ty) > 0 {
                let key = (ty.clone(), point.clone());
                produced_vars.insert(key.clone(), solver::quantity_variable(&mut vars, U::INTEGER));
                in_sums.insert(key.clone(), Expression::from(0.0));
                out_sums.insert(key, Expression::from(0.0));
            }
        }
    }

    // Flow variables for demanded pairs between occupied endpoints. Each
    // carries its distance for the objective and the cost readback.
    let mut flow_vars: Vec<(String, String, String, String, Variable, f64)> = Vec::new();
    let mut pair_totals: HashMap<(String, String), Expression> = HashMap::new();
    let mut cost_expr = Expression::from(0.0);
    for (src_ty, dst_ty, amount) in demand.entries() {
        if amount == U::zero() {
            continue;
        }
        for (src_point, src_state) in arrangement.points() {
            if src_state.count(src_ty) == 0 {
                continue;
            }
            for (dst_point, dst_state) in arrangement.points() {
                if dst_state.count(dst_ty) == 0 {
                    continue;
                }
                let distance = layout.distance(src_point, dst_point).ok_or_else(|| {
                    FasError::InputInvalid(format!(
                        "arrangement references point pair ({src_point}, {dst_point}) unknown to the layout"
                    ))
                })?;
                let f = solver::quantity_variable(&mut vars, U::INTEGER);
                cost_expr += distance * f;
                *in_sums
                    .get_mut(&(dst_ty.clone(), dst_point.clone()))
                    .expect("occupied destination slot was registered above") += f;
                *out_sums
                    .get_mut(&(src_ty.clone(), src_point.clone()))
                    .expect("occupied source slot was registered above") += f;
                *pair_totals
                    .entry((src_ty.clone(), dst_ty.clone()))
                    .or_insert_with(|| Expression::from(0.0)) += f;
                flow_vars.push((
                    src_ty.clone(),
                    dst_ty.clone(),
                    src_point.clone(),
                    dst_point.clone(),
                    f,
                    distance,
                ));
            }
        }
    }

    let mut constraints: Vec<Constraint> = Vec::new();

    // Per occupied (type, point):
    // (1) inflow bounded by the subjects' total input capacity,
    // (2) outflow bounded by their total output capacity,
    // (4) weak Kirchhoff: outflow covered by production plus inflow.
    for (ty, spec) in catalog.iter() {
        for (point, state) in arrangement.points() {
            let count = state.count(ty);
            if count == 0 {
                continue;
            }
            let key = (ty.clone(), point.clone());
            let in_sum = in_sums[&key].clone();
            let out_sum = out_sums[&key].clone();
            let produced = produced_vars[&key];
            let count = count as f64;
            constraints.push(constraint!(in_sum.clone() <= count * spec.in_capacity.to_f64()));
            constraints.push(constraint!(out_sum.clone() <= count * spec.out_capacity.to_f64()));
            constraints.push(constraint!(out_sum <= Expression::from(produced) + in_sum));
        }
    }

    // (5) every demanded pair total is met exactly. A demanded pair with
    // no admissible endpoints contributes an empty sum and the model is
    // correctly reported infeasible.
    for (src_ty, dst_ty, amount) in demand.entries() {
        if amount == U::zero() {
            continue;
        }
        let total = pair_totals
            .remove(&(src_ty.clone(), dst_ty.clone()))
            .unwrap_or_else(|| Expression::from(0.0));
        constraints.push(constraint!(total == amount.to_f64()));
    }

    // (6) per type, production adds up to the net supply the flow table
    // implies for it.
    for (ty, _) in catalog.iter() {
        let mut total = Expression::from(0.0);
        for (point, state) in arrangement.points() {
            if state.count(ty) > 0 {
                total += produced_vars[&(ty.clone(), point.clone())];
            }
        }
        constraints.push(constraint!(total == demand.net_supply(ty)));
    }

    // One solver environment per sample, single-threaded: the workers
    // around us already saturate the machine.
    let options = SolveOptions {
        threads: Some(1),
        ..SolveOptions::default()
    };
    let solution = solver::minimise(vars, cost_expr, constraints, options).map_err(|e| {
        if solver::is_infeasible(&e) {
            FasError::RoutingInfeasible
        } else {
            solver::fatal(e)
        }
    })?;

    // Read the model back; the cost is recomputed from the rounded values
    // so integral instances report exact integral costs.
    let mut cost = 0.0;
    let mut flows = Vec::new();
    for (src_ty, dst_ty, src_point, dst_point, var, distance) in flow_vars {
        let amount = U::from_f64(solution.value(var));
        if amount != U::zero() {
            cost += distance * amount.to_f64();
            flows.push((src_ty, dst_ty, src_point, dst_point, amount));
        }
    }
    let mut produced = Vec::new();
    for ((ty, point), var) in produced_vars {
        let amount = U::from_f64(solution.value(var));
        if amount != U::zero() {
            produced.push((ty, point, amount));
        }
    }

    Ok(RoutingOutcome {
        cost,
        produced,
        flows,
    })
}
