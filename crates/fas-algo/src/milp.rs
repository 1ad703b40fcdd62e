//! The complete placement-and-routing model.
//!
//! Unlike the routing problem, nothing is pruned here: subject counts are
//! decision variables themselves, so flow and production variables span
//! the full (type, point) grid. The model decides, per type and point,
//! how many subjects stand there (`n`), how many extra subjects to buy
//! (`nt`), what each slot produces (`g`) and how objects move between
//! slots (`f`), minimising
//!
//! ```text
//! alpha · Σ price(i)·nt(i)  +  (2 − alpha) · Σ distance(p,q)·f(i,j,p,q)
//! ```
//!
//! subject to, for all types i, j and points p, q:
//!
//! ```text
//! (1) Σ_{j,p} f(j,i,p,q) ≤ in_capacity(i)·n(i,q)
//! (2) Σ_{j,q} f(i,j,p,q) ≤ out_capacity(i)·n(i,p)
//! (3) Σ_i  area(i)·n(i,p) ≤ capacity(p)
//! (4) Σ_{j,q} f(i,j,p,q) ≤ g(i,p) + Σ_{j,q} f(j,i,q,p)
//! (5) Σ_{p,q} f(i,j,p,q) = demand(i,j)
//! (6) Σ_p g(i,p) = production_target(i)
//! (7) Σ_p n(i,p) = initially_available(i) + nt(i)
//! ```
//!
//! `n` and `nt` count physical subjects and stay integral in every
//! instantiation; `g` and `f` follow the unit kind.

use crate::config::SolveConfig;
use crate::solver::{self, SolveOptions};
use crate::warm_start;
use fas_core::{Arrangement, FasError, FasResult, FlowDemand, Layout, Scalar, TypeCatalog};
use good_lp::{constraint, variables, Constraint, Expression, ProblemVariables, Solution, Variable};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;

/// Handles of every decision variable, keyed by the names they were
/// created for. The warm-start bridge walks this to line starting values
/// up with model variables.
pub(crate) struct VariableRegistry {
    /// `(type, point)` → subject count variable.
    pub n: HashMap<(String, String), Variable>,
    /// `(type, point)` → produced units variable.
    pub g: HashMap<(String, String), Variable>,
    /// `(src type, dst type, src point, dst point)` → flow variable.
    pub f: HashMap<(String, String, String, String), Variable>,
    /// type → additional purchased subjects variable.
    pub nt: HashMap<String, Variable>,
}

impl VariableRegistry {
    pub(crate) fn build<C: Scalar, U: Scalar>(
        vars: &mut ProblemVariables,
        layout: &Layout<C, U>,
        catalog: &TypeCatalog<U>,
    ) -> Self {
        let mut n = HashMap::new();
        let mut g = HashMap::new();
        let mut f = HashMap::new();
        let mut nt = HashMap::new();
        for (ty, _) in catalog.iter() {
            nt.insert(ty.clone(), solver::quantity_variable(vars, true));
            for (point, _) in layout.points() {
                let key = (ty.clone(), point.clone());
                n.insert(key.clone(), solver::quantity_variable(vars, true));
                g.insert(key, solver::quantity_variable(vars, U::INTEGER));
            }
        }
        for (src_ty, _) in catalog.iter() {
            for (dst_ty, _) in catalog.iter() {
                for (src_point, _) in layout.points() {
                    for (dst_point, _) in layout.points() {
                        let key = (
                            src_ty.clone(),
                            dst_ty.clone(),
                            src_point.clone(),
                            dst_point.clone(),
                        );
                        f.insert(key, solver::quantity_variable(vars, U::INTEGER));
                    }
                }
            }
        }
        Self { n, g, f, nt }
    }
}

/// A solved full model.
#[derive(Debug, Clone, Serialize)]
pub struct ArrangementSolution<U> {
    /// Placement, production and flows read back from the solver.
    pub arrangement: Arrangement<U>,
    /// Additional subjects bought, per type (zero entries included).
    pub purchased: BTreeMap<String, u64>,
    /// Distance-weighted transport cost, unweighted by `alpha`.
    pub flow_cost: f64,
    /// Purchase cost, unweighted by `alpha`.
    pub purchase_cost: f64,
    /// The weighted objective value.
    pub objective: f64,
    /// Whether a heuristic starting point was handed to the solver.
    pub warm_started: bool,
    /// Model construction wall-clock time, seconds.
    pub build_seconds: f64,
    /// Solve wall-clock time, seconds.
    pub solve_seconds: f64,
}

impl<U: Scalar> ArrangementSolution<U> {
    /// One-line human-readable account of the solve.
    pub fn summary(&self) -> String {
        let bought: u64 = self.purchased.values().sum();
        format!(
            "objective {:.4} (transport {:.4}, purchases {:.4}, {} subjects bought); \
             built in {:.3}s, solved in {:.3}s{}",
            self.objective,
            self.flow_cost,
            self.purchase_cost,
            bought,
            self.build_seconds,
            self.solve_seconds,
            if self.warm_started { " from a warm start" } else { " from a cold start" },
        )
    }

    /// Write the solution as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> FasResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Build and solve the full model, optionally warm-started from a
/// heuristic arrangement.
///
/// Infeasibility here is fatal: the instance as stated has no solution.
pub fn solve<C: Scalar, U: Scalar>(
    layout: &Layout<C, U>,
    catalog: &TypeCatalog<U>,
    demand: &FlowDemand<U>,
    warm_start_from: Option<&Arrangement<U>>,
    config: &SolveConfig,
) -> FasResult<ArrangementSolution<U>> {
    let alpha = config.alpha;
    if !(0.0..=2.0).contains(&alpha) {
        return Err(FasError::InputInvalid(format!(
            "objective weight alpha must lie in [0, 2], got {alpha}"
        )));
    }

    let build_start = Instant::now();
    let mut vars = variables!();
    let registry = VariableRegistry::build(&mut vars, layout, catalog);

    let mut constraints: Vec<Constraint> = Vec::new();
    let mut purchase_expr = Expression::from(0.0);
    let mut transport_expr = Expression::from(0.0);

    for (ty, spec) in catalog.iter() {
        let mut produced_sum = Expression::from(0.0);
        let mut count_sum = Expression::from(0.0);
        for (point, _) in layout.points() {
            let key = (ty.clone(), point.clone());
            let n = registry.n[&key];
            let g = registry.g[&key];
            produced_sum += g;
            count_sum += n;

            let mut in_sum = Expression::from(0.0);
            let mut out_sum = Expression::from(0.0);
            for (other_ty, _) in catalog.iter() {
                for (other_point, _) in layout.points() {
                    in_sum += registry.f[&(
                        other_ty.clone(),
                        ty.clone(),
                        other_point.clone(),
                        point.clone(),
                    )];
                    out_sum += registry.f[&(
                        ty.clone(),
                        other_ty.clone(),
                        point.clone(),
                        other_point.clone(),
                    )];
                }
            }
            // (1), (2), (4)
            constraints.push(constraint!(in_sum.clone() <= spec.in_capacity.to_f64() * n));
            constraints.push(constraint!(out_sum.clone() <= spec.out_capacity.to_f64() * n));
            constraints.push(constraint!(out_sum <= Expression::from(g) + in_sum));
        }
        // (5) for every ordered pair, demanded or not: undemanded pairs
        // are pinned to zero.
        for (other_ty, _) in catalog.iter() {
            let mut pair_total = Expression::from(0.0);
            for (src_point, _) in layout.points() {
                for (dst_point, _) in layout.points() {
                    pair_total += registry.f[&(
                        ty.clone(),
                        other_ty.clone(),
                        src_point.clone(),
                        dst_point.clone(),
                    )];
                }
            }
            constraints.push(constraint!(pair_total == demand.get(ty, other_ty).to_f64()));
        }
        // (6), (7)
        let nt = registry.nt[ty];
        constraints.push(constraint!(produced_sum == spec.production_target.to_f64()));
        constraints.push(constraint!(
            count_sum == spec.initially_available as f64 + Expression::from(nt)
        ));
        purchase_expr += spec.price * nt;
    }

    // (3)
    for (point, place) in layout.points() {
        let mut used_area = Expression::from(0.0);
        for (ty, spec) in catalog.iter() {
            used_area += spec.area.to_f64() * registry.n[&(ty.clone(), point.clone())];
        }
        constraints.push(constraint!(used_area <= place.capacity.to_f64()));
    }

    // Objective, plus distances kept for the cost readback.
    let mut flow_distances: Vec<(&(String, String, String, String), Variable, f64)> = Vec::new();
    for (key, var) in &registry.f {
        let (_, _, src_point, dst_point) = key;
        let distance = layout.distance(src_point, dst_point).ok_or_else(|| {
            FasError::InputInvalid(format!(
                "layout lost point pair ({src_point}, {dst_point})"
            ))
        })?;
        transport_expr += distance * *var;
        flow_distances.push((key, *var, distance));
    }
    let objective = alpha * purchase_expr + (2.0 - alpha) * transport_expr;

    let warm_started = warm_start_from.is_some();
    let options = SolveOptions {
        threads: None,
        time_limit: config.time_limit,
        initial: warm_start_from
            .map(|arrangement| warm_start::initial_assignment(&registry, arrangement))
            .unwrap_or_default(),
    };
    let build_seconds = build_start.elapsed().as_secs_f64();

    let solve_start = Instant::now();
    let solution = solver::minimise(vars, objective, constraints, options).map_err(|e| {
        if solver::is_infeasible(&e) {
            FasError::MilpInfeasible
        } else {
            solver::fatal(e)
        }
    })?;
    let solve_seconds = solve_start.elapsed().as_secs_f64();

    // === Readback ===
    let mut arrangement = Arrangement::new(layout);
    for (ty, spec) in catalog.iter() {
        for (point, _) in layout.points() {
            let count = solution.value(registry.n[&(ty.clone(), point.clone())]).round() as u64;
            for _ in 0..count {
                if !arrangement.add(point, ty, spec.area) {
                    return Err(FasError::Solver(format!(
                        "solution places {count} × `{ty}` at `{point}` beyond its area capacity"
                    )));
                }
            }
            let produced = U::from_f64(solution.value(registry.g[&(ty.clone(), point.clone())]));
            if produced != U::zero() {
                arrangement.set_produced(point, ty, produced)?;
            }
        }
    }
    let mut flow_cost = 0.0;
    for (key, var, distance) in flow_distances {
        let amount = U::from_f64(solution.value(var));
        if amount != U::zero() {
            let (src_ty, dst_ty, src_point, dst_point) = key;
            arrangement.set_flow(src_point, src_ty, dst_ty, dst_point, amount)?;
            flow_cost += distance * amount.to_f64();
        }
    }
    let mut purchased = BTreeMap::new();
    let mut purchase_cost = 0.0;
    for (ty, spec) in catalog.iter() {
        let bought = solution.value(registry.nt[ty]).round() as u64;
        purchase_cost += spec.price * bought as f64;
        purchased.insert(ty.clone(), bought);
    }

    Ok(ArrangementSolution {
        arrangement,
        purchased,
        flow_cost,
        purchase_cost,
        objective: alpha * purchase_cost + (2.0 - alpha) * flow_cost,
        warm_started,
        build_seconds,
        solve_seconds,
    })
}
