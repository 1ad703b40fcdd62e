//! Scalar kinds used throughout the data model.
//!
//! Every quantity in an instance (coordinates, areas, produced units, flows)
//! is either integral or real. The choice is fixed once, at construction
//! time, by instantiating the generic containers with [`i64`] or [`f64`];
//! no numeric-kind flag travels with the data at runtime. Subject counts are
//! deliberately *not* generic: subjects are physical items and are counted
//! in `u64` everywhere.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A numeric kind the model can be instantiated with.
///
/// Implemented for exactly two types: `i64` (integral instances) and `f64`
/// (real instances). The solver layer uses [`Scalar::INTEGER`] to decide
/// whether unit-valued decision variables are declared integral.
pub trait Scalar:
    Copy
    + Clone
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + SubAssign
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Whether values of this kind are whole numbers.
    const INTEGER: bool;

    /// The additive identity.
    fn zero() -> Self;

    /// Lossy-for-huge-values conversion from a subject count.
    fn from_u64(value: u64) -> Self;

    /// The value as a solver-side `f64`.
    fn to_f64(self) -> f64;

    /// Read a solver value back; integral kinds round to the nearest whole.
    fn from_f64(value: f64) -> Self;

    /// `|self − other|`.
    fn abs_diff(self, other: Self) -> Self;
}

impl Scalar for i64 {
    const INTEGER: bool = true;

    fn zero() -> Self {
        0
    }

    fn from_u64(value: u64) -> Self {
        value as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.round() as i64
    }

    fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }
}

impl Scalar for f64 {
    const INTEGER: bool = false;

    fn zero() -> Self {
        0.0
    }

    fn from_u64(value: u64) -> Self {
        value as f64
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }
}

/// Distance between two floats in units in the last place.
///
/// Bit patterns are mapped onto a monotone integer line so that adjacent
/// representable floats differ by exactly 1. `NaN` compares unequal to
/// everything, including itself.
pub fn ulp_distance(a: f64, b: f64) -> u64 {
    if a == b {
        return 0;
    }
    if a.is_nan() || b.is_nan() {
        return u64::MAX;
    }
    let a = monotone_bits(a);
    let b = monotone_bits(b);
    a.abs_diff(b)
}

/// Near-equality for user-facing cost comparisons: within 4 ULP.
pub fn ulp_eq(a: f64, b: f64) -> bool {
    ulp_distance(a, b) <= 4
}

fn monotone_bits(x: f64) -> i64 {
    let bits = x.to_bits() as i64;
    if bits < 0 {
        i64::MIN - bits
    } else {
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_roundtrip_rounds() {
        assert_eq!(i64::from_f64(2.4), 2);
        assert_eq!(i64::from_f64(2.6), 3);
        assert_eq!(f64::from_f64(2.6), 2.6);
    }

    #[test]
    fn abs_diff_is_symmetric() {
        assert_eq!(Scalar::abs_diff(7i64, 3), 4);
        assert_eq!(Scalar::abs_diff(3i64, 7), 4);
        assert_eq!(Scalar::abs_diff(1.5f64, 4.0), 2.5);
    }

    #[test]
    fn ulp_eq_accepts_adjacent_floats() {
        let x = 0.1 + 0.2;
        assert!(ulp_eq(x, 0.3));
        assert!(ulp_eq(1.0, 1.0));
        assert!(ulp_eq(-0.0, 0.0));
    }

    #[test]
    fn ulp_eq_rejects_distant_floats() {
        assert!(!ulp_eq(1.0, 1.0 + 1e-9));
        assert!(!ulp_eq(300.0, 301.0));
        assert!(!ulp_eq(f64::NAN, f64::NAN));
    }

    #[test]
    fn ulp_distance_counts_representable_steps() {
        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 3);
        assert_eq!(ulp_distance(a, b), 3);
        assert!(ulp_eq(a, b));
    }
}
