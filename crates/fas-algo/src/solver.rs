//! Thin shim over the MILP backend.
//!
//! Everything backend-specific lives here: variable bounds, option names,
//! the starting-point submission and the status mapping. The model
//! builders only deal in `good_lp` variables, expressions and constraints.

use fas_core::FasError;
use good_lp::solvers::highs::{highs, HighsSolution};
use good_lp::{
    variable, Constraint, Expression, ProblemVariables, ResolutionError, SolverModel, Variable,
    WithInitialSolution,
};

/// Upper bound given to every decision variable. Far above any quantity a
/// sane instance produces, finite so the backend can presolve.
pub(crate) const VARIABLE_UPPER_BOUND: f64 = 1e9;

/// Knobs forwarded to the backend for one solve.
#[derive(Default)]
pub(crate) struct SolveOptions {
    /// Cap on solver-internal threads.
    pub threads: Option<i32>,
    /// Wall-clock limit in seconds.
    pub time_limit: Option<f64>,
    /// Starting assignment, checked by the solver and repaired or
    /// discarded if it is not feasible.
    pub initial: Vec<(Variable, f64)>,
}

/// A fresh non-negative decision variable, integral on request.
pub(crate) fn quantity_variable(vars: &mut ProblemVariables, integral: bool) -> Variable {
    let definition = variable().min(0.0).max(VARIABLE_UPPER_BOUND);
    if integral {
        vars.add(definition.integer())
    } else {
        vars.add(definition)
    }
}

/// Minimise `objective` subject to `constraints`; solver output is kept
/// off the process stdout.
pub(crate) fn minimise(
    vars: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    options: SolveOptions,
) -> Result<HighsSolution, ResolutionError> {
    let mut model = vars.minimise(objective).using(highs);
    model.set_verbose(false);
    if let Some(threads) = options.threads {
        model = model.set_option("threads", threads);
    }
    if let Some(limit) = options.time_limit {
        model = model.set_option("time_limit", limit);
    }
    if !options.initial.is_empty() {
        model = model.with_initial_solution(options.initial);
    }
    for constraint in constraints {
        model = model.with(constraint);
    }
    model.solve()
}

/// Whether a solve failure means "this instance has no solution" as
/// opposed to a solver fault.
pub(crate) fn is_infeasible(error: &ResolutionError) -> bool {
    matches!(error, ResolutionError::Infeasible)
}

/// Map a non-infeasibility failure onto the fatal error taxonomy.
pub(crate) fn fatal(error: ResolutionError) -> FasError {
    FasError::Solver(error.to_string())
}
