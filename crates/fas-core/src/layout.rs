//! Placement candidates and the facility layout.

use crate::error::{FasError, FasResult};
use crate::metric::Metric;
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A candidate location inside the facility: 2D coordinates plus the total
/// area available for subjects placed there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<C, U> {
    pub x: C,
    pub y: C,
    pub capacity: U,
}

impl<C: Scalar, U: Scalar> Point<C, U> {
    pub fn new(x: C, y: C, capacity: U) -> Self {
        Self { x, y, capacity }
    }
}

/// An immutable collection of named points plus the metric that measures
/// distances between them.
///
/// Iteration is deterministic: points come out sorted by name, regardless
/// of insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<C, U> {
    points: BTreeMap<String, Point<C, U>>,
    metric: Metric,
}

impl<C: Scalar, U: Scalar> Layout<C, U> {
    /// Build a layout from named points.
    ///
    /// Rejects empty layouts, duplicate names and negative capacities.
    pub fn from_points<I>(points: I, metric: Metric) -> FasResult<Self>
    where
        I: IntoIterator<Item = (String, Point<C, U>)>,
    {
        let mut map = BTreeMap::new();
        for (name, point) in points {
            if point.capacity < U::zero() {
                return Err(FasError::InputInvalid(format!(
                    "point `{name}` has negative area capacity {}",
                    point.capacity
                )));
            }
            if map.insert(name.clone(), point).is_some() {
                return Err(FasError::InputInvalid(format!(
                    "duplicate point name `{name}`"
                )));
            }
        }
        if map.is_empty() {
            return Err(FasError::InputInvalid("layout has no points".into()));
        }
        Ok(Self {
            points: map,
            metric,
        })
    }

    /// A `rows × cols` grid with the given spacing between neighbours and
    /// a uniform area capacity. Point `(r,c)` sits at `(c·spacing, r·spacing)`.
    pub fn grid(rows: u32, cols: u32, spacing: C, capacity: U, metric: Metric) -> FasResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(FasError::InputInvalid(
                "grid layout needs at least one row and one column".into(),
            ));
        }
        let mut points = Vec::with_capacity(rows as usize * cols as usize);
        for r in 0..rows {
            for c in 0..cols {
                let x = spacing * C::from_u64(u64::from(c));
                let y = spacing * C::from_u64(u64::from(r));
                points.push((format!("({r},{c})"), Point::new(x, y, capacity)));
            }
        }
        Self::from_points(points, metric)
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn get(&self, name: &str) -> Option<&Point<C, U>> {
        self.points.get(name)
    }

    /// Points in name order.
    pub fn points(&self) -> impl Iterator<Item = (&String, &Point<C, U>)> {
        self.points.iter()
    }

    /// Point names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.points.keys()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance between two named points, `None` if either is unknown.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        let pa = self.points.get(a)?;
        let pb = self.points.get(b)?;
        Some(self.metric.distance(pa, pb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_names_and_coordinates() {
        let layout: Layout<i64, i64> = Layout::grid(2, 3, 1, 5, Metric::manhattan()).unwrap();
        assert_eq!(layout.len(), 6);
        let p = layout.get("(1,2)").unwrap();
        assert_eq!((p.x, p.y, p.capacity), (2, 1, 5));
        assert_eq!(layout.metric(), Metric::manhattan());
        assert_eq!(layout.distance("(0,0)", "(1,2)"), Some(3.0));
        assert_eq!(layout.distance("(0,0)", "elsewhere"), None);
    }

    #[test]
    fn iteration_is_sorted_by_name() {
        let layout: Layout<i64, i64> = Layout::from_points(
            [
                ("b".to_string(), Point::new(1, 0, 1)),
                ("a".to_string(), Point::new(0, 0, 1)),
                ("c".to_string(), Point::new(2, 0, 1)),
            ],
            Metric::manhattan(),
        )
        .unwrap();
        let names: Vec<_> = layout.names().cloned().collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result: FasResult<Layout<i64, i64>> = Layout::from_points(
            [
                ("a".to_string(), Point::new(0, 0, 1)),
                ("a".to_string(), Point::new(1, 0, 1)),
            ],
            Metric::manhattan(),
        );
        assert!(matches!(result, Err(FasError::InputInvalid(_))));
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let result: FasResult<Layout<i64, f64>> = Layout::from_points(
            [("a".to_string(), Point::new(0, 0, -1.0))],
            Metric::manhattan(),
        );
        assert!(matches!(result, Err(FasError::InputInvalid(_))));
    }

    #[test]
    fn empty_layout_is_rejected() {
        let result: FasResult<Layout<i64, i64>> =
            Layout::from_points(std::iter::empty(), Metric::manhattan());
        assert!(result.is_err());
    }
}
