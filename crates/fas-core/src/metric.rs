//! Planar distance functions.
//!
//! A [`Metric`] is a cheap value-semantics object: copy it freely, share it
//! across threads. Distances are evaluated on demand and never cached.

use crate::error::{FasError, FasResult};
use crate::layout::Point;
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};

/// Distance function over the plane.
///
/// Minkowski metrics of order `n ∈ {1, …, 255}` plus the order-∞ limit
/// (Chebyshev). Orders 1 and ∞ have closed forms evaluated in the
/// coordinate kind's own arithmetic, so integral coordinates produce exact
/// integral distances; every other order goes through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Minkowski metric of the given order (≥ 1).
    Minkowski(u8),
    /// The order-∞ Minkowski limit: max of coordinate differences.
    Chebyshev,
}

impl Metric {
    /// Minkowski metric of order `order`. Order 0 is not a metric.
    pub fn minkowski(order: u8) -> FasResult<Self> {
        if order == 0 {
            return Err(FasError::InputInvalid(
                "Minkowski metric order must be at least 1".into(),
            ));
        }
        Ok(Metric::Minkowski(order))
    }

    /// Order-1 Minkowski (rectilinear) metric.
    pub fn manhattan() -> Self {
        Metric::Minkowski(1)
    }

    /// Order-2 Minkowski (Euclidean) metric.
    pub fn euclidean() -> Self {
        Metric::Minkowski(2)
    }

    /// Distance between two points.
    pub fn distance<C: Scalar, U: Scalar>(&self, a: &Point<C, U>, b: &Point<C, U>) -> f64 {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        match *self {
            Metric::Minkowski(1) => (dx + dy).to_f64(),
            Metric::Minkowski(order) => {
                let n = f64::from(order);
                (dx.to_f64().powf(n) + dy.to_f64().powf(n)).powf(1.0 / n)
            }
            Metric::Chebyshev => {
                if dx >= dy {
                    dx.to_f64()
                } else {
                    dy.to_f64()
                }
            }
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Minkowski(order) => write!(f, "minkowski({order})"),
            Metric::Chebyshev => write!(f, "chebyshev"),
        }
    }
}
