//! Required object flows between subject type pairs.

use crate::error::{FasError, FasResult};
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required total flow for each ordered (source type, destination type)
/// pair. Pairs that were never set read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowDemand<U> {
    flows: BTreeMap<String, BTreeMap<String, U>>,
}

impl<U: Scalar> FlowDemand<U> {
    pub fn new() -> Self {
        Self {
            flows: BTreeMap::new(),
        }
    }

    /// Build from `((src, dst), amount)` entries, rejecting duplicate pairs.
    pub fn from_entries<I>(entries: I) -> FasResult<Self>
    where
        I: IntoIterator<Item = ((String, String), U)>,
    {
        let mut demand = Self::new();
        for ((src, dst), amount) in entries {
            if demand.flows.entry(src.clone()).or_default().insert(dst.clone(), amount).is_some() {
                return Err(FasError::InputInvalid(format!(
                    "duplicate flow demand for pair ({src}, {dst})"
                )));
            }
        }
        Ok(demand)
    }

    pub fn set(&mut self, src: &str, dst: &str, amount: U) {
        self.flows
            .entry(src.to_string())
            .or_default()
            .insert(dst.to_string(), amount);
    }

    /// Required flow for a pair; absent pairs are zero demand.
    pub fn get(&self, src: &str, dst: &str) -> U {
        self.flows
            .get(src)
            .and_then(|row| row.get(dst))
            .copied()
            .unwrap_or_else(U::zero)
    }

    /// All recorded `(src, dst, amount)` entries in sorted pair order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &String, U)> {
        self.flows
            .iter()
            .flat_map(|(src, row)| row.iter().map(move |(dst, amount)| (src, dst, *amount)))
    }

    /// Total demanded outflow of a type.
    pub fn out_total(&self, ty: &str) -> f64 {
        self.flows
            .get(ty)
            .map(|row| row.values().map(|v| v.to_f64()).sum())
            .unwrap_or(0.0)
    }

    /// Total demanded inflow into a type.
    pub fn in_total(&self, ty: &str) -> f64 {
        self.flows
            .values()
            .filter_map(|row| row.get(ty))
            .map(|v| v.to_f64())
            .sum()
    }

    /// Units a type must create out of thin air to satisfy its outflow:
    /// `max(out_total − in_total, 0)`.
    pub fn net_supply(&self, ty: &str) -> f64 {
        (self.out_total(ty) - self.in_total(ty)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand() -> FlowDemand<i64> {
        FlowDemand::from_entries([
            (("A".to_string(), "B".to_string()), 100),
            (("B".to_string(), "C".to_string()), 25),
            (("B".to_string(), "D".to_string()), 75),
            (("C".to_string(), "D".to_string()), 10),
        ])
        .unwrap()
    }

    #[test]
    fn absent_pairs_read_as_zero() {
        let d = demand();
        assert_eq!(d.get("A", "B"), 100);
        assert_eq!(d.get("B", "A"), 0);
        assert_eq!(d.get("X", "Y"), 0);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut d: FlowDemand<i64> = FlowDemand::new();
        d.set("A", "B", 5);
        d.set("A", "B", 8);
        assert_eq!(d.get("A", "B"), 8);
    }

    #[test]
    fn totals_and_net_supply() {
        let d = demand();
        assert_eq!(d.out_total("A"), 100.0);
        assert_eq!(d.in_total("A"), 0.0);
        assert_eq!(d.net_supply("A"), 100.0);
        // B receives 100 and emits 100: nothing to create.
        assert_eq!(d.net_supply("B"), 0.0);
        // C receives 25 and emits 10.
        assert_eq!(d.net_supply("C"), 0.0);
        assert_eq!(d.in_total("D"), 85.0);
    }

    #[test]
    fn duplicate_pairs_are_rejected() {
        let result = FlowDemand::from_entries([
            (("A".to_string(), "B".to_string()), 1i64),
            (("A".to_string(), "B".to_string()), 2i64),
        ]);
        assert!(matches!(result, Err(FasError::InputInvalid(_))));
    }
}
