//! Instance validation, run once before any sampling.
//!
//! Everything caught here is fatal [`FasError::InputInvalid`]. Name
//! collisions are already rejected when layouts, catalogs and demand
//! tables are constructed; this pass checks the cross-references and the
//! value ranges a single container cannot see.

use fas_core::{ulp_eq, FasError, FasResult, FlowDemand, Layout, Logger, Scalar, TypeCatalog};

/// Validate one problem instance.
///
/// A type whose `production_target` disagrees with the net supply implied
/// by the flow demand (`max(out − in, 0)`) gets a warning: such instances
/// are solvable, but a heuristic starting point may be rejected by the
/// full model.
pub fn validate<C: Scalar, U: Scalar>(
    layout: &Layout<C, U>,
    catalog: &TypeCatalog<U>,
    demand: &FlowDemand<U>,
    alpha: f64,
    logger: &Logger,
) -> FasResult<()> {
    if !(0.0..=2.0).contains(&alpha) {
        return Err(FasError::InputInvalid(format!(
            "objective weight alpha must lie in [0, 2], got {alpha}"
        )));
    }

    for (name, point) in layout.points() {
        if point.capacity < U::zero() {
            return Err(FasError::InputInvalid(format!(
                "point `{name}` has negative area capacity {}",
                point.capacity
            )));
        }
    }

    for (name, ty) in catalog.iter() {
        if ty.in_capacity < U::zero()
            || ty.out_capacity < U::zero()
            || ty.production_target < U::zero()
            || ty.area < U::zero()
        {
            return Err(FasError::InputInvalid(format!(
                "subject type `{name}` has a negative capacity, target or area"
            )));
        }
        if !(ty.price >= 0.0) {
            return Err(FasError::InputInvalid(format!(
                "subject type `{name}` has invalid price {}",
                ty.price
            )));
        }
    }

    for (src, dst, amount) in demand.entries() {
        if !catalog.contains(src) {
            return Err(FasError::InputInvalid(format!(
                "flow demand references unknown source type `{src}`"
            )));
        }
        if !catalog.contains(dst) {
            return Err(FasError::InputInvalid(format!(
                "flow demand references unknown destination type `{dst}`"
            )));
        }
        if amount < U::zero() {
            return Err(FasError::InputInvalid(format!(
                "flow demand ({src}, {dst}) is negative"
            )));
        }
    }

    for (name, ty) in catalog.iter() {
        let implied = demand.net_supply(name);
        let target = ty.production_target.to_f64();
        if !ulp_eq(target, implied) {
            logger.warning(&format!(
                "type `{name}` has production target {target} but the flow table implies {implied}; \
                 a heuristic starting point may be rejected"
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fas_core::{Metric, Point, SubjectType};

    fn layout() -> Layout<i64, i64> {
        Layout::grid(2, 2, 1, 10, Metric::manhattan()).unwrap()
    }

    fn catalog() -> TypeCatalog<i64> {
        TypeCatalog::from_entries([(
            "A".to_string(),
            SubjectType {
                in_capacity: 0,
                out_capacity: 10,
                production_target: 10,
                area: 1,
                initially_available: 1,
                price: 100.0,
            },
        ), (
            "B".to_string(),
            SubjectType {
                in_capacity: 10,
                out_capacity: 0,
                production_target: 0,
                area: 1,
                initially_available: 1,
                price: 100.0,
            },
        )])
        .unwrap()
    }

    fn demand() -> FlowDemand<i64> {
        FlowDemand::from_entries([(("A".to_string(), "B".to_string()), 10)]).unwrap()
    }

    #[test]
    fn valid_instance_passes() {
        assert!(validate(&layout(), &catalog(), &demand(), 1.0, &Logger::null()).is_ok());
    }

    #[test]
    fn alpha_out_of_range_is_rejected() {
        for alpha in [-0.1, 2.1, f64::NAN] {
            let result = validate(&layout(), &catalog(), &demand(), alpha, &Logger::null());
            assert!(matches!(result, Err(FasError::InputInvalid(_))), "alpha {alpha}");
        }
        assert!(validate(&layout(), &catalog(), &demand(), 0.0, &Logger::null()).is_ok());
        assert!(validate(&layout(), &catalog(), &demand(), 2.0, &Logger::null()).is_ok());
    }

    #[test]
    fn unknown_flow_types_are_rejected() {
        let bad = FlowDemand::from_entries([(("A".to_string(), "Z".to_string()), 5i64)]).unwrap();
        let result = validate(&layout(), &catalog(), &bad, 1.0, &Logger::null());
        assert!(matches!(result, Err(FasError::InputInvalid(_))));
    }

    #[test]
    fn negative_demand_is_rejected() {
        let bad = FlowDemand::from_entries([(("A".to_string(), "B".to_string()), -5i64)]).unwrap();
        let result = validate(&layout(), &catalog(), &bad, 1.0, &Logger::null());
        assert!(matches!(result, Err(FasError::InputInvalid(_))));
    }

    #[test]
    fn negative_type_fields_are_rejected() {
        let bad = TypeCatalog::from_entries([(
            "A".to_string(),
            SubjectType {
                in_capacity: -1,
                out_capacity: 0,
                production_target: 0,
                area: 1,
                initially_available: 0,
                price: 1.0,
            },
        )])
        .unwrap();
        let result = validate(&layout(), &bad, &FlowDemand::new(), 1.0, &Logger::null());
        assert!(matches!(result, Err(FasError::InputInvalid(_))));
    }
}
