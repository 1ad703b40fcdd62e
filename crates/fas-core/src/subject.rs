//! Subject types and the type catalog.

use crate::error::{FasError, FasResult};
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static description of one subject type.
///
/// Capacities and the production target are per subject per planning
/// period; `area` is the footprint one subject occupies at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectType<U> {
    /// Units of flow one subject can receive.
    pub in_capacity: U,
    /// Units of flow one subject can emit.
    pub out_capacity: U,
    /// Units all subjects of this type together must produce.
    pub production_target: U,
    /// Area one subject occupies.
    pub area: U,
    /// Subjects already owned and awaiting placement.
    pub initially_available: u64,
    /// Cost of purchasing one additional subject.
    pub price: f64,
}

/// Name → type map with deterministic (sorted) iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCatalog<U> {
    types: BTreeMap<String, SubjectType<U>>,
}

impl<U: Scalar> TypeCatalog<U> {
    /// Build a catalog, rejecting duplicate names and empty catalogs.
    pub fn from_entries<I>(entries: I) -> FasResult<Self>
    where
        I: IntoIterator<Item = (String, SubjectType<U>)>,
    {
        let mut types = BTreeMap::new();
        for (name, ty) in entries {
            if types.insert(name.clone(), ty).is_some() {
                return Err(FasError::InputInvalid(format!(
                    "duplicate subject type name `{name}`"
                )));
            }
        }
        if types.is_empty() {
            return Err(FasError::InputInvalid("type catalog is empty".into()));
        }
        Ok(Self { types })
    }

    pub fn get(&self, name: &str) -> Option<&SubjectType<U>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Types in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SubjectType<U>)> {
        self.types.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Total number of subjects awaiting placement across all types.
    pub fn total_available(&self) -> u64 {
        self.types.values().map(|t| t.initially_available).sum()
    }
}
