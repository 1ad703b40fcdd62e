//! Mutable placement state: subject counts, produced units and routed
//! flows per point.
//!
//! An [`Arrangement`] snapshots the area capacities of a [`Layout`] at
//! construction and is self-contained afterwards, so worker threads can
//! clone it per sample without touching the layout again.

use crate::error::{FasError, FasResult};
use crate::layout::Layout;
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-point placement state.
///
/// Maps hold only non-zero entries: an absent key reads as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointState<U> {
    remaining: U,
    counts: BTreeMap<String, u64>,
    produced: BTreeMap<String, U>,
    /// src type → dst type → dst point → routed flow.
    out_flows: BTreeMap<String, BTreeMap<String, BTreeMap<String, U>>>,
}

impl<U: Scalar> PointState<U> {
    fn new(capacity: U) -> Self {
        Self {
            remaining: capacity,
            counts: BTreeMap::new(),
            produced: BTreeMap::new(),
            out_flows: BTreeMap::new(),
        }
    }

    /// Area still free at this point.
    pub fn remaining(&self) -> U {
        self.remaining
    }

    /// Subjects of one type placed here.
    pub fn count(&self, ty: &str) -> u64 {
        self.counts.get(ty).copied().unwrap_or(0)
    }

    /// All subjects placed here.
    pub fn subjects(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Units of one type produced here.
    pub fn produced(&self, ty: &str) -> U {
        self.produced.get(ty).copied().unwrap_or_else(U::zero)
    }

    /// Recorded outgoing flows as `(src type, dst type, dst point, amount)`.
    pub fn flows(&self) -> impl Iterator<Item = (&String, &String, &String, U)> {
        self.out_flows.iter().flat_map(|(src, by_dst_ty)| {
            by_dst_ty.iter().flat_map(move |(dst_ty, by_point)| {
                by_point
                    .iter()
                    .map(move |(dst_point, amount)| (src, dst_ty, dst_point, *amount))
            })
        })
    }
}

/// A layout populated with subjects, produced units and flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement<U> {
    points: BTreeMap<String, PointState<U>>,
}

impl<U: Scalar> Arrangement<U> {
    /// An empty arrangement over the given layout's points.
    pub fn new<C: Scalar>(layout: &Layout<C, U>) -> Self {
        let points = layout
            .points()
            .map(|(name, point)| (name.clone(), PointState::new(point.capacity)))
            .collect();
        Self { points }
    }

    /// Try to place one subject of `ty` (footprint `area`) at `point`.
    /// Succeeds iff enough area remains.
    pub fn add(&mut self, point: &str, ty: &str, area: U) -> bool {
        match self.points.get_mut(point) {
            Some(state) if area <= state.remaining => {
                state.remaining -= area;
                *state.counts.entry(ty.to_string()).or_insert(0) += 1;
                true
            }
            _ => false,
        }
    }

    /// Remove one subject of `ty` from `point`, freeing its area.
    /// No-op when no such subject is placed there.
    pub fn remove(&mut self, point: &str, ty: &str, area: U) {
        if let Some(state) = self.points.get_mut(point) {
            if let Some(count) = state.counts.get_mut(ty) {
                *count -= 1;
                if *count == 0 {
                    state.counts.remove(ty);
                }
                state.remaining += area;
            }
        }
    }

    /// Subjects of `ty` at `point`.
    pub fn count_at(&self, point: &str, ty: &str) -> u64 {
        self.points.get(point).map_or(0, |s| s.count(ty))
    }

    /// Area still free at `point`.
    pub fn remaining_area(&self, point: &str) -> Option<U> {
        self.points.get(point).map(|s| s.remaining)
    }

    /// All placed subjects.
    pub fn subjects(&self) -> u64 {
        self.points.values().map(|s| s.subjects()).sum()
    }

    /// All placed subjects of one type.
    pub fn subjects_of(&self, ty: &str) -> u64 {
        self.points.values().map(|s| s.count(ty)).sum()
    }

    /// Point states in name order.
    pub fn points(&self) -> impl Iterator<Item = (&String, &PointState<U>)> {
        self.points.iter()
    }

    pub fn state(&self, point: &str) -> Option<&PointState<U>> {
        self.points.get(point)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all produced units and routed flows, keeping placements.
    pub fn clear_routing(&mut self) {
        for state in self.points.values_mut() {
            state.produced.clear();
            state.out_flows.clear();
        }
    }

    /// Record units produced by `ty` at `point`. Fails on unknown points.
    pub fn set_produced(&mut self, point: &str, ty: &str, amount: U) -> FasResult<()> {
        let state = self
            .points
            .get_mut(point)
            .ok_or_else(|| FasError::InputInvalid(format!("unknown point `{point}`")))?;
        if amount == U::zero() {
            state.produced.remove(ty);
        } else {
            state.produced.insert(ty.to_string(), amount);
        }
        Ok(())
    }

    /// Record a routed flow leaving `src_point`. Fails on unknown points.
    pub fn set_flow(
        &mut self,
        src_point: &str,
        src_ty: &str,
        dst_ty: &str,
        dst_point: &str,
        amount: U,
    ) -> FasResult<()> {
        let state = self
            .points
            .get_mut(src_point)
            .ok_or_else(|| FasError::InputInvalid(format!("unknown point `{src_point}`")))?;
        if amount == U::zero() {
            return Ok(());
        }
        state
            .out_flows
            .entry(src_ty.to_string())
            .or_default()
            .entry(dst_ty.to_string())
            .or_default()
            .insert(dst_point.to_string(), amount);
        Ok(())
    }

    /// Recorded flow for one (src point, src type, dst type, dst point).
    pub fn flow_at(&self, src_point: &str, src_ty: &str, dst_ty: &str, dst_point: &str) -> U {
        self.points
            .get(src_point)
            .and_then(|s| s.out_flows.get(src_ty))
            .and_then(|by_dst| by_dst.get(dst_ty))
            .and_then(|by_point| by_point.get(dst_point))
            .copied()
            .unwrap_or_else(U::zero)
    }

    /// Total recorded flow for one ordered type pair across all point pairs.
    pub fn flow_total(&self, src_ty: &str, dst_ty: &str) -> U {
        let mut total = U::zero();
        for state in self.points.values() {
            if let Some(by_point) = state.out_flows.get(src_ty).and_then(|m| m.get(dst_ty)) {
                for amount in by_point.values() {
                    total += *amount;
                }
            }
        }
        total
    }

    /// Total recorded production of a type across all points.
    pub fn produced_total(&self, ty: &str) -> U {
        let mut total = U::zero();
        for state in self.points.values() {
            total += state.produced(ty);
        }
        total
    }

    /// Total flow arriving at `(dst_point, dst_ty)` from anywhere.
    pub fn inflow_at(&self, dst_point: &str, dst_ty: &str) -> U {
        let mut total = U::zero();
        for state in self.points.values() {
            for by_dst_ty in state.out_flows.values() {
                if let Some(amount) = by_dst_ty.get(dst_ty).and_then(|m| m.get(dst_point)) {
                    total += *amount;
                }
            }
        }
        total
    }

    /// Total flow leaving `(src_point, src_ty)` towards anywhere.
    pub fn outflow_at(&self, src_point: &str, src_ty: &str) -> U {
        let mut total = U::zero();
        if let Some(state) = self.points.get(src_point) {
            if let Some(by_dst_ty) = state.out_flows.get(src_ty) {
                for by_point in by_dst_ty.values() {
                    for amount in by_point.values() {
                        total += *amount;
                    }
                }
            }
        }
        total
    }
}
