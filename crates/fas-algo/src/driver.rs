//! End-to-end pipeline: validate, search, solve, report.

use crate::config::{SearchConfig, SolveConfig};
use crate::milp::{self, ArrangementSolution};
use crate::monte_carlo::{self, RatedArrangement, SearchOutcome};
use crate::validation;
use fas_core::{FasError, FasResult, FlowDemand, Layout, Logger, Scalar, TypeCatalog};

/// Everything one run produces.
#[derive(Debug)]
pub struct SolveReport<U> {
    /// The full model's solution.
    pub solution: ArrangementSolution<U>,
    /// The heuristic's best arrangement, when it found one.
    pub heuristic: Option<RatedArrangement<U>>,
    /// Heuristic samples attempted.
    pub samples_processed: u64,
    /// Heuristic samples discarded as infeasible.
    pub samples_skipped: u64,
}

/// Validate the instance, search for a feasible arrangement, then solve
/// the full model warm-started from it.
///
/// The full model is solved even when the heuristic comes up empty — a
/// cold start still answers the question; per-sample heuristic failures
/// never mask a genuine model verdict. Every fatal error is echoed on the
/// logger's error channel before it is returned.
pub fn run<C: Scalar, U: Scalar>(
    layout: &Layout<C, U>,
    catalog: &TypeCatalog<U>,
    demand: &FlowDemand<U>,
    search: &SearchConfig,
    solve: &SolveConfig,
    logger: &Logger,
) -> FasResult<SolveReport<U>> {
    validation::validate(layout, catalog, demand, solve.alpha, logger)
        .map_err(|e| announce(logger, e))?;

    let outcome = if search.workload == 0 || search.generation_count == 0 {
        logger.info("heuristic search disabled; the full model starts cold");
        SearchOutcome {
            best: None,
            processed: 0,
            skipped: 0,
        }
    } else {
        monte_carlo::search(layout, catalog, demand, search, logger)
            .map_err(|e| announce(logger, e))?
    };
    if outcome.best.is_none() && outcome.processed > 0 {
        logger.warning("no feasible arrangement found; the full model starts cold");
    }

    let solution = milp::solve(layout, catalog, demand, outcome.best.as_ref().map(|b| &b.arrangement), solve)
        .map_err(|e| announce(logger, e))?;
    logger.info(&solution.summary());

    if let Some(path) = &solve.export_path {
        solution.write_json(path).map_err(|e| announce(logger, e))?;
        logger.info(&format!("solution written to {}", path.display()));
    }

    Ok(SolveReport {
        solution,
        heuristic: outcome.best,
        samples_processed: outcome.processed,
        samples_skipped: outcome.skipped,
    })
}

fn announce(logger: &Logger, error: FasError) -> FasError {
    logger.error(&error.to_string());
    error
}
