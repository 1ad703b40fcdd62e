//! # fas-algo: Facility Arrangement Optimisation Engine
//!
//! Two-stage optimisation over the data model of `fas-core`:
//!
//! 1. **Feasible-arrangement search** ([`monte_carlo::search`]) —
//!    Monte-Carlo sampling with optional genetic refinement. Parallel
//!    workers repeatedly place subjects at random ([`placement`]) and
//!    price each placement with a routing program ([`routing`]); across
//!    generations a shrinking share of the incumbent is re-placed.
//! 2. **Full model** ([`milp::solve`]) — one mixed-integer program over
//!    the entire layout × type grid that decides placement, purchases,
//!    production and routing together, warm-started from stage 1.
//!
//! [`driver::run`] wires the stages together behind input validation and
//! a shared [`fas_core::Logger`].
//!
//! ## Example
//!
//! ```no_run
//! use fas_algo::{driver, SearchConfig, SolveConfig};
//! use fas_core::{FlowDemand, Layout, Logger, Metric, SubjectType, TypeCatalog};
//!
//! let layout: Layout<i64, i64> = Layout::grid(3, 3, 1, 5, Metric::manhattan())?;
//! let catalog = TypeCatalog::from_entries([(
//!     "A".to_string(),
//!     SubjectType {
//!         in_capacity: 0,
//!         out_capacity: 25,
//!         production_target: 0,
//!         area: 2,
//!         initially_available: 4,
//!         price: 400.0,
//!     },
//! )])?;
//! let demand = FlowDemand::new();
//!
//! let logger = Logger::stderr();
//! let report = driver::run(
//!     &layout,
//!     &catalog,
//!     &demand,
//!     &SearchConfig::default(),
//!     &SolveConfig::default(),
//!     &logger,
//! )?;
//! println!("objective: {}", report.solution.objective);
//! # Ok::<(), fas_core::FasError>(())
//! ```

pub mod config;
pub mod driver;
pub mod milp;
pub mod monte_carlo;
pub mod placement;
pub mod routing;
mod solver;
pub mod validation;
mod warm_start;

pub use config::{SearchConfig, SolveConfig};
pub use driver::SolveReport;
pub use milp::ArrangementSolution;
pub use monte_carlo::{RatedArrangement, SearchOutcome};
pub use routing::RoutingOutcome;
