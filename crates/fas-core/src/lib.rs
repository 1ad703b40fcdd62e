//! # fas-core: Facility Arrangement Data Model
//!
//! Core data structures for the facility arrangement problem: given a set
//! of candidate locations (a layout), a catalog of subject types and a
//! table of required flows between type pairs, decide where subjects go
//! and how objects move between them.
//!
//! This crate holds the *model* only; the optimisation engine lives in
//! `fas-algo`.
//!
//! ## Core types
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Point`] | candidate 2D location with an area capacity |
//! | [`Layout`] | named points plus a [`Metric`], sorted deterministic iteration |
//! | [`SubjectType`] / [`TypeCatalog`] | per-type capacities, footprint, stock and price |
//! | [`FlowDemand`] | required total flow per ordered type pair (absent ⇒ 0) |
//! | [`Arrangement`] | mutable placement state: counts, produced units, routed flows |
//! | [`Logger`] | mutex-serialised three-channel log sink |
//! | [`FasError`] | unified error taxonomy |
//!
//! ## Numeric kinds
//!
//! Containers are generic over [`Scalar`], implemented for `i64` and
//! `f64`. An instance fixes its coordinate kind and its unit/area kind
//! once, at construction; subject counts are always `u64`.
//!
//! ## Example
//!
//! ```
//! use fas_core::{Arrangement, Layout, Metric};
//!
//! let layout: Layout<i64, i64> = Layout::grid(3, 3, 1, 5, Metric::manhattan())?;
//! let mut arrangement = Arrangement::new(&layout);
//! assert!(arrangement.add("(0,0)", "A", 2));
//! assert_eq!(arrangement.remaining_area("(0,0)"), Some(3));
//! # Ok::<(), fas_core::FasError>(())
//! ```

pub mod arrangement;
pub mod error;
pub mod flow;
pub mod layout;
pub mod logger;
pub mod metric;
pub mod scalar;
pub mod subject;

pub use arrangement::{Arrangement, PointState};
pub use error::{FasError, FasResult};
pub use flow::FlowDemand;
pub use layout::{Layout, Point};
pub use logger::{Logger, LoggerGuard};
pub use metric::Metric;
pub use scalar::{ulp_distance, ulp_eq, Scalar};
pub use subject::{SubjectType, TypeCatalog};
