//! Feasible-arrangement search by (Genetic) Monte-Carlo sampling.
//!
//! Each generation fans out over a private worker pool. A worker starts
//! from the best arrangement so far (generations past the first free a
//! shrinking random fraction of it for re-placement), then repeatedly
//! clones, places and routes, keeping its cheapest sample. The
//! coordinator joins the generation and takes the argmin across workers
//! in worker order, so for a fixed seed sequence the result does not
//! depend on scheduling, and the carried best can only improve from one
//! generation to the next.

use crate::config::SearchConfig;
use crate::placement;
use crate::routing::{self, RoutingOutcome};
use fas_core::{Arrangement, FasError, FasResult, FlowDemand, Layout, Logger, Scalar, TypeCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// An arrangement with the transport cost its routing achieved.
#[derive(Debug, Clone)]
pub struct RatedArrangement<U> {
    pub arrangement: Arrangement<U>,
    pub cost: f64,
}

/// What the search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome<U> {
    /// The cheapest feasible arrangement found, if any sample succeeded.
    pub best: Option<RatedArrangement<U>>,
    /// Samples attempted across all workers and generations.
    pub processed: u64,
    /// Samples discarded for placement or routing infeasibility.
    pub skipped: u64,
}

struct WorkerOutcome<U> {
    best: Option<RatedArrangement<U>>,
    skipped: u64,
}

/// Run the search.
///
/// `generation_count == 1` is plain Monte-Carlo; larger values re-fix a
/// `1 − 1/2^g` share of the incumbent before generation `g`. A zero
/// workload or generation count returns an empty outcome.
pub fn search<C: Scalar, U: Scalar>(
    layout: &Layout<C, U>,
    catalog: &TypeCatalog<U>,
    demand: &FlowDemand<U>,
    config: &SearchConfig,
    logger: &Logger,
) -> FasResult<SearchOutcome<U>> {
    let thread_count = if config.thread_count == 0 {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        usize::from(config.thread_count)
    };
    let seeds = expand_seeds(&config.seed_sequence, thread_count);

    {
        let mut log = logger.lock();
        log.info(&format!(
            "searching for a feasible arrangement: {} generations, {} workers, \
             {} samples per worker per generation",
            config.generation_count, thread_count, config.workload
        ));
        log.info(&format!(
            "each sample gets at most {} placement attempts per subject",
            config.max_attempts
        ));
        log.info(&format!("seed sequence: {:?}", config.seed_sequence));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| FasError::Solver(format!("cannot start worker pool: {e}")))?;

    let mut best: Option<RatedArrangement<U>> = None;
    let mut processed = 0u64;
    let mut skipped = 0u64;

    for generation in 0..config.generation_count {
        let base = match &best {
            Some(rated) => rated.arrangement.clone(),
            None => Arrangement::new(layout),
        };
        let results: Vec<FasResult<WorkerOutcome<U>>> = pool.install(|| {
            (0..thread_count)
                .into_par_iter()
                .map(|worker| {
                    run_worker(
                        layout,
                        catalog,
                        demand,
                        &base,
                        generation,
                        worker as u16,
                        seeds[worker],
                        config,
                        logger,
                    )
                })
                .collect()
        });
        // Argmin in worker order; ties keep the earlier holder.
        for result in results {
            let outcome = result?;
            processed += config.workload;
            skipped += outcome.skipped;
            if let Some(candidate) = outcome.best {
                if best.as_ref().map_or(true, |b| candidate.cost < b.cost) {
                    best = Some(candidate);
                }
            }
        }
        match &best {
            Some(rated) => logger.info(&format!(
                "generation {} done; best transport cost so far {}",
                generation + 1,
                rated.cost
            )),
            None => logger.warning(&format!(
                "generation {} done; no feasible arrangement yet",
                generation + 1
            )),
        }
    }

    match &best {
        Some(rated) => logger.info(&format!(
            "search finished with a feasible arrangement of transport cost {}",
            rated.cost
        )),
        None => logger.warning("search finished without a feasible arrangement"),
    }

    Ok(SearchOutcome {
        best,
        processed,
        skipped,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_worker<C: Scalar, U: Scalar>(
    layout: &Layout<C, U>,
    catalog: &TypeCatalog<U>,
    demand: &FlowDemand<U>,
    base: &Arrangement<U>,
    generation: u16,
    worker: u16,
    seed: u64,
    config: &SearchConfig,
    logger: &Logger,
) -> FasResult<WorkerOutcome<U>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let point_names: Vec<String> = layout.names().cloned().collect();

    // Decide what this worker must place. From the second generation on,
    // the incumbent keeps a fixed share and only the released remainder is
    // re-placed; with no incumbent the full complement is placed.
    let mut base = base.clone();
    let to_place: BTreeMap<String, u64> = if generation == 0 || base.subjects() == 0 {
        catalog
            .iter()
            .map(|(name, ty)| (name.clone(), ty.initially_available))
            .collect()
    } else {
        placement::release(&mut base, catalog, &point_names, generation, &mut rng)
    };

    let mut best: Option<RatedArrangement<U>> = None;
    let mut skipped = 0u64;
    for sample in 0..config.workload {
        let mut current = base.clone();
        let mut succeeded = false;
        let placed = placement::place(
            &mut current,
            catalog,
            &to_place,
            &point_names,
            &mut rng,
            config.max_attempts,
        );
        match placed {
            Ok(()) => match routing::route(layout, catalog, demand, &current) {
                Ok(outcome) => {
                    succeeded = true;
                    if best.as_ref().map_or(true, |b| outcome.cost < b.cost) {
                        apply_routing(&mut current, &outcome)?;
                        best = Some(RatedArrangement {
                            arrangement: current,
                            cost: outcome.cost,
                        });
                    }
                }
                Err(FasError::RoutingInfeasible) => {}
                Err(fatal) => return Err(fatal),
            },
            Err(FasError::AreaInfeasible) => {}
            Err(fatal) => return Err(fatal),
        }
        if !succeeded {
            skipped += 1;
        }

        if (sample + 1) % 100 == 0 {
            let done = sample + 1;
            let mut log = logger.lock();
            log.info(&format!("generation {}, worker {} reports:", generation + 1, worker));
            log.info(&format!("  processed samples: {done}/{}", config.workload));
            log.info(&format!("  successful: {}/{done}", done - skipped));
            if skipped > 0 {
                log.warning(&format!("  skipped: {skipped}/{done}"));
            }
            match &best {
                Some(rated) => log.info(&format!("  best transport cost: {}", rated.cost)),
                None => log.info("  best transport cost: none yet"),
            }
        }
    }

    Ok(WorkerOutcome { best, skipped })
}

fn apply_routing<U: Scalar>(
    arrangement: &mut Arrangement<U>,
    outcome: &RoutingOutcome<U>,
) -> FasResult<()> {
    arrangement.clear_routing();
    for (ty, point, amount) in &outcome.produced {
        arrangement.set_produced(point, ty, *amount)?;
    }
    for (src_ty, dst_ty, src_point, dst_point, amount) in &outcome.flows {
        arrangement.set_flow(src_point, src_ty, dst_ty, dst_point, *amount)?;
    }
    Ok(())
}

/// Expand the configured seed words into one seed per worker.
///
/// Splitmix64 over a fold of the sequence: single-threaded, deterministic,
/// and stable across platforms.
fn expand_seeds(sequence: &[u32], count: usize) -> Vec<u64> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for &word in sequence {
        state = (state ^ u64::from(word))
            .wrapping_mul(0xBF58_476D_1CE4_E5B9)
            .rotate_left(17);
    }
    (0..count)
        .map(|_| {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        })
        .collect()
}
