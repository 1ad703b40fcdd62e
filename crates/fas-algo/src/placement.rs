//! Randomised subject placement.
//!
//! [`place`] drops pending subjects onto uniformly drawn points, retrying
//! on full points; [`release`] frees a shrinking random fraction of an
//! existing arrangement so a later generation can re-place it.

use fas_core::{Arrangement, FasError, FasResult, Scalar, TypeCatalog};
use rand::Rng;
use std::collections::BTreeMap;

/// Place `to_place[ty]` subjects of each type onto random points.
///
/// Types are visited in catalog order, so the outcome is a function of the
/// PRNG state alone. Each subject gets one draw plus up to `max_attempts`
/// redraws; if all of them land on full points the whole sample is
/// abandoned with [`FasError::AreaInfeasible`].
pub fn place<U: Scalar>(
    arrangement: &mut Arrangement<U>,
    catalog: &TypeCatalog<U>,
    to_place: &BTreeMap<String, u64>,
    point_names: &[String],
    rng: &mut impl Rng,
    max_attempts: u64,
) -> FasResult<()> {
    for (ty, spec) in catalog.iter() {
        let pending = to_place.get(ty).copied().unwrap_or(0);
        for _ in 0..pending {
            let mut placed = false;
            for _ in 0..=max_attempts {
                let name = &point_names[rng.gen_range(0..point_names.len())];
                if arrangement.add(name, ty, spec.area) {
                    placed = true;
                    break;
                }
            }
            if !placed {
                return Err(FasError::AreaInfeasible);
            }
        }
    }
    Ok(())
}

/// Remove a random `1/2^generation` fraction of the placed subjects,
/// at least one, and report how many of each type were freed.
///
/// Draws that hit a point or type with nothing removable are redrawn from
/// the same distributions. An empty arrangement releases nothing.
pub fn release<U: Scalar>(
    arrangement: &mut Arrangement<U>,
    catalog: &TypeCatalog<U>,
    point_names: &[String],
    generation: u16,
    rng: &mut impl Rng,
) -> BTreeMap<String, u64> {
    let mut released = BTreeMap::new();
    let placed = arrangement.subjects();
    if placed == 0 {
        return released;
    }
    let shift = u32::from(generation).min(63);
    let count = (placed >> shift).max(1);
    let type_names: Vec<&String> = catalog.names().collect();
    for _ in 0..count {
        let point = loop {
            let name = &point_names[rng.gen_range(0..point_names.len())];
            if arrangement.state(name).is_some_and(|s| s.subjects() > 0) {
                break name.clone();
            }
        };
        let ty = loop {
            let name = type_names[rng.gen_range(0..type_names.len())];
            if arrangement.count_at(&point, name) > 0 {
                break name.clone();
            }
        };
        let area = catalog.get(&ty).map_or_else(U::zero, |t| t.area);
        arrangement.remove(&point, &ty, area);
        *released.entry(ty).or_insert(0) += 1;
    }
    released
}
