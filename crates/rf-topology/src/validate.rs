//! Topology validation logic.

use crate::component::Component;
use crate::error::{TopologyError, TopologyResult};
use crate::schema::schema_for;

/// Validate one component against its type schema.
pub(crate) fn validate_component(component: &Component) -> TopologyResult<()> {
    if component.id.trim().is_empty() {
        return Err(TopologyError::EmptyId);
    }

    for fam in schema_for(component.kind).dynamic {
        let Some(value) = component.property(fam.count_property) else {
            continue;
        };
        let invalid = |reason: String| TopologyError::InvalidCount {
            id: component.id.clone(),
            property: fam.count_property.to_string(),
            reason,
        };
        let count = value
            .as_count()
            .ok_or_else(|| invalid(format!("{:?} is not a non-negative integer", value)))?;
        if !(fam.min_count..=fam.max_count).contains(&count) {
            return Err(invalid(format!(
                "{} is outside {}..={}",
                count, fam.min_count, fam.max_count
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;

    #[test]
    fn rejects_fractional_circuit_count() {
        let mut evap = Component::new("evap_1", ComponentType::Evaporator);
        evap.properties.insert("circuits".into(), 2.5.into());
        let err = validate_component(&evap).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidCount { .. }));
    }

    #[test]
    fn rejects_count_above_schema_limit() {
        let mut dist = Component::new("dist_1", ComponentType::Distributor);
        dist.properties.insert("circuit_count".into(), 13.into());
        assert!(validate_component(&dist).is_err());
    }

    #[test]
    fn ignores_counts_of_other_types() {
        let mut txv = Component::new("txv_1", ComponentType::Txv);
        txv.properties.insert("circuits".into(), "many".into());
        assert!(validate_component(&txv).is_ok());
    }
}
